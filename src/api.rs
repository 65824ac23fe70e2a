//! HTTP client for the Agro Youth authority.
//!
//! Thin wrapper over a blocking [`ureq::Agent`]: one method per endpoint,
//! bearer credential attached when the session holds one, structured errors
//! for everything the transport or the authority rejects. No retries and no
//! timeout policy beyond the transport default; failures surface
//! synchronously to the caller.

use crate::model::{
    Ack, Certificate, CertificateReceipt, CertificateSummary, Course, CourseFilter, EnrollReceipt,
    EnrollmentStatus, EnrollmentSummary, KnowledgeEntry, LoginRequest, LoginResponse,
    MarketListing, NewKnowledgeEntry, NewMarketListing, RegisterReceipt, RegisterRequest,
    Verification,
};
use crate::session::Session;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use ureq::http::Response;
use ureq::{Agent, Body};

/// Failure taxonomy for authority calls.
///
/// Domain-negative outcomes (an invalid certificate, a certificate not yet
/// issued) are *not* errors; they are ordinary response payloads handled by
/// the workflow layers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network/transport failure before any authoritative answer arrived.
    #[error("network error: {0}")]
    Transport(String),
    /// The authority answered with a non-2xx status. `message` is the
    /// server-provided explanation when one could be extracted.
    #[error("{message} (http {status})")]
    Status { status: u16, message: String },
    /// The authority answered 2xx but the body did not match the endpoint's
    /// declared shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of an authority rejection, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 4xx rejections, where the authority understood the request
    /// and refused it.
    pub fn is_rejection(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }
}

/// The remote operations the workflow cores depend on.
///
/// [`ApiClient`] is the production implementation; tests drive the same
/// workflows against an in-memory authority.
pub trait Authority {
    fn enroll(&self, course_id: &str) -> Result<EnrollReceipt, ApiError>;
    fn update_progress(&self, enrollment_id: &str, module_number: u32) -> Result<Ack, ApiError>;
    fn request_certificate(&self, enrollment_id: &str) -> Result<CertificateReceipt, ApiError>;
    fn enrollment_status(&self, enrollment_id: &str) -> Result<EnrollmentStatus, ApiError>;
    fn certificate(&self, certificate_id: &str) -> Result<Certificate, ApiError>;
    fn verify_certificate(&self, certificate_id: &str, code: &str)
        -> Result<Verification, ApiError>;
}

/// Blocking client bound to one base URL and one session.
pub struct ApiClient {
    agent: Agent,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        // Non-2xx statuses are handled here, not by the transport, so the
        // authority's error body stays readable.
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(config),
            base_url: base_url.into(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Option<String> {
        // Read fresh on every outbound call.
        self.session.token().map(|token| format!("Bearer {token}"))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let mut request = self.agent.get(&url);
        if let Some(bearer) = self.bearer() {
            request = request.header("Authorization", bearer.as_str());
        }
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        let response = request
            .call()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        decode(response)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, method, "send");
        let request = match method {
            "PUT" => self.agent.put(&url),
            _ => self.agent.post(&url),
        };
        let request = match self.bearer() {
            Some(bearer) => request.header("Authorization", bearer.as_str()),
            None => request,
        };
        let response = request
            .send_json(body)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        decode(response)
    }

    fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let request = match self.bearer() {
            Some(bearer) => self.agent.post(&url).header("Authorization", bearer.as_str()),
            None => self.agent.post(&url),
        };
        let response = request
            .send_empty()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        decode(response)
    }

    // Auth -------------------------------------------------------------

    pub fn register(&self, request: &RegisterRequest) -> Result<RegisterReceipt, ApiError> {
        self.send_json("POST", "/auth/register", request)
    }

    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send_json("POST", "/auth/login", request)
    }

    // Catalog ----------------------------------------------------------

    pub fn courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, ApiError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(category) = filter.category.as_deref() {
            query.push(("category", category));
        }
        if let Some(level) = filter.level.as_deref() {
            query.push(("level", level));
        }
        if let Some(language) = filter.language.as_deref() {
            query.push(("language", language));
        }
        self.get_json("/courses", &query)
    }

    pub fn course(&self, course_id: &str) -> Result<Course, ApiError> {
        self.get_json(&format!("/courses/{course_id}"), &[])
    }

    pub fn my_courses(&self) -> Result<Vec<EnrollmentSummary>, ApiError> {
        self.get_json("/my-courses", &[])
    }

    pub fn my_certificates(&self) -> Result<Vec<CertificateSummary>, ApiError> {
        self.get_json("/my-certificates", &[])
    }

    // Knowledge board ---------------------------------------------------

    pub fn knowledge_entries(&self) -> Result<Vec<KnowledgeEntry>, ApiError> {
        self.get_json("/knowledge/", &[])
    }

    pub fn post_knowledge(&self, entry: &NewKnowledgeEntry) -> Result<Ack, ApiError> {
        self.send_json("POST", "/knowledge/", entry)
    }

    // Marketplace -------------------------------------------------------

    pub fn market_listings(&self, available_only: bool) -> Result<Vec<MarketListing>, ApiError> {
        let value = if available_only { "true" } else { "false" };
        self.get_json("/market/", &[("available_only", value)])
    }

    pub fn post_listing(&self, listing: &NewMarketListing) -> Result<Ack, ApiError> {
        self.send_json("POST", "/market/", listing)
    }
}

impl Authority for ApiClient {
    fn enroll(&self, course_id: &str) -> Result<EnrollReceipt, ApiError> {
        self.post_empty(&format!("/courses/{course_id}/enroll"))
    }

    fn update_progress(&self, enrollment_id: &str, module_number: u32) -> Result<Ack, ApiError> {
        self.send_json(
            "PUT",
            &format!("/enrollments/{enrollment_id}/progress"),
            &json!({ "module_number": module_number }),
        )
    }

    fn request_certificate(&self, enrollment_id: &str) -> Result<CertificateReceipt, ApiError> {
        self.post_empty(&format!("/enrollments/{enrollment_id}/certificate"))
    }

    fn enrollment_status(&self, enrollment_id: &str) -> Result<EnrollmentStatus, ApiError> {
        self.get_json(&format!("/enrollments/{enrollment_id}/status"), &[])
    }

    fn certificate(&self, certificate_id: &str) -> Result<Certificate, ApiError> {
        self.get_json(&format!("/certificates/{certificate_id}"), &[])
    }

    fn verify_certificate(
        &self,
        certificate_id: &str,
        code: &str,
    ) -> Result<Verification, ApiError> {
        self.send_json(
            "POST",
            &format!("/certificates/{certificate_id}/verify"),
            &json!({ "verification_code": code }),
        )
    }
}

fn decode<T: DeserializeOwned>(mut response: Response<Body>) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        let body = response.body_mut().read_to_string().unwrap_or_default();
        return Err(ApiError::Status {
            status,
            message: error_message(&body),
        });
    }
    response
        .body_mut()
        .read_json()
        .map_err(|err| ApiError::Decode(err.to_string()))
}

/// Pull the human-readable explanation out of an authority error body. The
/// platform uses both `{"error": ...}` and `{"message": ...}` shapes.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.len() > 200 {
        "request rejected by the authority".to_string()
    } else {
        trimmed.to_string()
    }
}
