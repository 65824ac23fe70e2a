//! Enrollment lifecycle workflow.
//!
//! Drives a learner through enroll → consume modules → mark progress →
//! detect completion → request certificate, per (learner, course) pair:
//!
//! ```text
//! NotEnrolled → InProgress → Complete → Certified
//! ```
//!
//! The controller is result-driven: each mutation merges the acknowledged
//! record into its local snapshot instead of refetching the enrollment.
//! Completion is recomputed after every merge by comparing the progress
//! count against the course's module count; the transition happens the
//! instant the counts become equal. The authority remains the only writer
//! of durable state; a failed call surfaces an error and never advances
//! the machine.

use crate::api::{ApiError, Authority};
use crate::model::{Course, EnrollmentStatus, EnrollmentSummary, ProgressRecord};
use chrono::Utc;

/// Derived position in the enrollment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotEnrolled,
    InProgress,
    /// All modules complete, certificate not yet issued.
    Complete,
    Certified,
}

/// Client-held copy of one enrollment. Ephemeral and non-owned; the
/// authority's state is canonical.
#[derive(Debug, Clone)]
pub struct EnrollmentSnapshot {
    pub enrollment_id: String,
    pub progress: Vec<ProgressRecord>,
    pub certificate_issued: bool,
    pub certificate_id: Option<String>,
}

impl EnrollmentSnapshot {
    pub fn from_summary(summary: &EnrollmentSummary) -> Self {
        Self {
            enrollment_id: summary.enrollment_id.clone(),
            progress: summary.progress.clone(),
            certificate_issued: summary.certificate_issued,
            certificate_id: None,
        }
    }

    pub fn from_status(status: &EnrollmentStatus) -> Self {
        Self {
            enrollment_id: status.enrollment_id.clone(),
            progress: status.progress.clone(),
            certificate_issued: status.certificate_issued || status.certificate_id.is_some(),
            certificate_id: status.certificate_id.clone(),
        }
    }

    /// Count of distinct completed modules.
    pub fn completed_modules(&self) -> usize {
        self.progress.len()
    }
}

/// Result of a "mark module complete" action. All variants are ordinary
/// outcomes, not errors; authority failures are reported separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The record was accepted and merged. `course_complete` is true when
    /// this very record made the progress count reach the module count.
    Recorded { course_complete: bool },
    /// Guarded no-op: the module was already in the progress set.
    AlreadyCompleted,
    /// The module number is not part of this course.
    UnknownModule,
    NotEnrolled,
}

/// Result of a certificate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateOutcome {
    Issued { certificate_id: String },
    /// The authority had already issued one; the existing reference is
    /// returned instead of an error.
    AlreadyIssued { certificate_id: String },
    NotYetComplete { completed: usize, total: usize },
    NotEnrolled,
}

/// Workflow controller for one (learner, course) pair.
pub struct CourseWorkflow<'a, A: Authority> {
    authority: &'a A,
    course: Course,
    enrollment: Option<EnrollmentSnapshot>,
}

impl<'a, A: Authority> CourseWorkflow<'a, A> {
    pub fn new(authority: &'a A, course: Course, enrollment: Option<EnrollmentSnapshot>) -> Self {
        Self {
            authority,
            course,
            enrollment,
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn enrollment(&self) -> Option<&EnrollmentSnapshot> {
        self.enrollment.as_ref()
    }

    pub fn phase(&self) -> Phase {
        phase_of(self.enrollment.as_ref(), self.course.modules.len())
    }

    /// Enroll in the course. Duplicate enrollment is the authority's call:
    /// a rejection surfaces as an error and the machine stays put.
    pub fn enroll(&mut self) -> Result<&EnrollmentSnapshot, ApiError> {
        let receipt = self.authority.enroll(&self.course.id)?;
        tracing::info!(course = %self.course.title, enrollment = %receipt.enrollment_id, "enrolled");
        Ok(self.enrollment.insert(EnrollmentSnapshot {
            enrollment_id: receipt.enrollment_id,
            progress: Vec::new(),
            certificate_issued: false,
            certificate_id: None,
        }))
    }

    /// Mark one module complete and merge the resulting progress record.
    pub fn mark_module_complete(&mut self, module_number: u32) -> Result<MarkOutcome, ApiError> {
        let total = self.course.modules.len();
        if !self
            .course
            .modules
            .iter()
            .any(|module| module.module_number == module_number)
        {
            return Ok(MarkOutcome::UnknownModule);
        }
        let Some(enrollment) = self.enrollment.as_mut() else {
            return Ok(MarkOutcome::NotEnrolled);
        };
        if is_module_completed(&enrollment.progress, module_number) {
            // The re-mark button is hidden in any real surface; tolerate the
            // action anyway without another authority round trip.
            return Ok(MarkOutcome::AlreadyCompleted);
        }

        self.authority
            .update_progress(&enrollment.enrollment_id, module_number)?;
        let merged = merge_progress(
            &mut enrollment.progress,
            ProgressRecord {
                module_number,
                completed_at: Some(now_timestamp()),
                quiz_score: None,
            },
        );
        debug_assert!(merged);
        let course_complete = enrollment.completed_modules() == total;
        tracing::info!(
            module = module_number,
            completed = enrollment.completed_modules(),
            total,
            course_complete,
            "progress recorded"
        );
        Ok(MarkOutcome::Recorded { course_complete })
    }

    /// Request certificate issuance. Only meaningful once complete; a
    /// rejected request (typically "already exists" after a racing submit)
    /// falls back to the status lookup and returns the existing reference.
    pub fn request_certificate(&mut self) -> Result<CertificateOutcome, ApiError> {
        let total = self.course.modules.len();
        let Some(enrollment) = self.enrollment.as_mut() else {
            return Ok(CertificateOutcome::NotEnrolled);
        };
        let completed = enrollment.completed_modules();
        // A course with no modules is never completable; phase derivation
        // applies the same rule.
        if total == 0 || completed < total {
            return Ok(CertificateOutcome::NotYetComplete { completed, total });
        }
        if let Some(certificate_id) = enrollment.certificate_id.clone() {
            return Ok(CertificateOutcome::AlreadyIssued { certificate_id });
        }

        match self.authority.request_certificate(&enrollment.enrollment_id) {
            Ok(receipt) => {
                enrollment.certificate_issued = true;
                enrollment.certificate_id = Some(receipt.certificate_id.clone());
                tracing::info!(certificate = %receipt.certificate_id, "certificate issued");
                Ok(CertificateOutcome::Issued {
                    certificate_id: receipt.certificate_id,
                })
            }
            Err(err) if err.is_rejection() => {
                // Issuance may have happened already (racing request, or an
                // earlier run). The status lookup is authoritative.
                let status = self.authority.enrollment_status(&enrollment.enrollment_id)?;
                match status.certificate_id {
                    Some(certificate_id) => {
                        enrollment.certificate_issued = true;
                        enrollment.certificate_id = Some(certificate_id.clone());
                        tracing::info!(certificate = %certificate_id, "certificate already issued");
                        Ok(CertificateOutcome::AlreadyIssued { certificate_id })
                    }
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }
}

/// Derive the lifecycle phase from a snapshot and the course module count.
pub fn phase_of(enrollment: Option<&EnrollmentSnapshot>, total_modules: usize) -> Phase {
    match enrollment {
        None => Phase::NotEnrolled,
        Some(snapshot) if snapshot.certificate_issued || snapshot.certificate_id.is_some() => {
            Phase::Certified
        }
        Some(snapshot) if total_modules > 0 && snapshot.completed_modules() >= total_modules => {
            Phase::Complete
        }
        Some(_) => Phase::InProgress,
    }
}

/// Badge rule: a module is completed iff its number appears in the
/// enrollment's progress set.
pub fn is_module_completed(progress: &[ProgressRecord], module_number: u32) -> bool {
    progress
        .iter()
        .any(|record| record.module_number == module_number)
}

/// Merge one progress record, keeping module numbers unique. Returns false
/// when the module was already present (the count must stay unchanged).
pub fn merge_progress(progress: &mut Vec<ProgressRecord>, record: ProgressRecord) -> bool {
    if is_module_completed(progress, record.module_number) {
        return false;
    }
    progress.push(record);
    true
}

/// Progress fraction in [0, 1].
pub fn progress_fraction(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 / total as f64).clamp(0.0, 1.0)
}

/// Progress percentage rounded to the nearest whole number.
pub fn progress_percent(completed: usize, total: usize) -> u32 {
    (progress_fraction(completed, total) * 100.0).round() as u32
}

/// Completion timestamps in the authority's ISO-8601 shape.
fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
