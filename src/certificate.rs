//! Certificate retrieval and public verification.
//!
//! Two independent entry points. Retrieval fetches the full certificate
//! snapshot either directly by id or derived through an enrollment-status
//! lookup, trusting the authority's response as-is (no local recomputation
//! or signature checking). Verification submits a user-supplied
//! (certificate id, verification code) pair and renders only the explicit
//! `valid` flag the authority returns.

use crate::api::{ApiError, Authority};
use crate::model::{Certificate, Verification};
use regex::Regex;
use std::sync::OnceLock;

/// Issued certificate ids look like `AGRO-` followed by 8 alphanumerics.
/// The format is advisory on input: unexpected shapes are still submitted.
pub const CERTIFICATE_ID_HINT: &str = "AGRO-XXXXXXXX";

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^AGRO-[A-Z0-9]{8}$").expect("certificate id pattern"))
}

/// Case-normalize a user-supplied certificate id before submission.
pub fn normalize_certificate_id(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Advisory format check for normalized ids.
pub fn id_matches_format(certificate_id: &str) -> bool {
    id_pattern().is_match(certificate_id)
}

/// Outcome of a derived certificate lookup.
#[derive(Debug, Clone)]
pub enum CertificateLookup {
    Found(Box<Certificate>),
    /// The enrollment exists but carries no certificate reference yet.
    NotYetIssued { enrollment_id: String },
}

/// Fetch a certificate snapshot directly by id.
pub fn fetch_by_id<A: Authority>(
    authority: &A,
    certificate_id: &str,
) -> Result<Certificate, ApiError> {
    authority.certificate(&normalize_certificate_id(certificate_id))
}

/// Resolve an enrollment to its certificate, if one has been issued.
pub fn fetch_for_enrollment<A: Authority>(
    authority: &A,
    enrollment_id: &str,
) -> Result<CertificateLookup, ApiError> {
    let status = authority.enrollment_status(enrollment_id)?;
    match status.certificate_id {
        Some(certificate_id) => {
            let certificate = authority.certificate(&certificate_id)?;
            Ok(CertificateLookup::Found(Box::new(certificate)))
        }
        None => Ok(CertificateLookup::NotYetIssued {
            enrollment_id: enrollment_id.to_string(),
        }),
    }
}

/// Why a verification came back negative. Both kinds render the same
/// negative branch today; they stay distinguishable for future reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// The authority answered and said no.
    Authoritative,
    /// The call itself failed; no authoritative answer exists.
    CallFailed,
}

/// User-visible verdict of a verification attempt.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    Valid(Box<Verification>),
    Invalid {
        message: String,
        kind: RejectionKind,
    },
}

impl VerifyOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifyOutcome::Valid(_))
    }
}

/// Submit a (certificate id, verification code) pair to the authority.
///
/// The id is case-normalized first. Only the authority's explicit `valid`
/// flag selects the positive branch; partial data never implies validity.
pub fn verify<A: Authority>(authority: &A, certificate_id: &str, code: &str) -> VerifyOutcome {
    let certificate_id = normalize_certificate_id(certificate_id);
    if !id_matches_format(&certificate_id) {
        tracing::debug!(%certificate_id, "certificate id does not match {CERTIFICATE_ID_HINT}");
    }
    match authority.verify_certificate(&certificate_id, code) {
        Ok(verification) if verification.valid => VerifyOutcome::Valid(Box::new(verification)),
        Ok(verification) => VerifyOutcome::Invalid {
            message: verification
                .message
                .unwrap_or_else(|| "Invalid certificate or verification code".to_string()),
            kind: RejectionKind::Authoritative,
        },
        Err(err) => {
            tracing::warn!(error = %err, "verification call failed");
            VerifyOutcome::Invalid {
                message: "Verification failed".to_string(),
                kind: RejectionKind::CallFailed,
            }
        }
    }
}
