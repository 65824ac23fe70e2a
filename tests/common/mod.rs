//! Shared test infrastructure: an in-memory authority implementing the
//! platform's documented contract.
//!
//! The authority is the single writer of durable state. This fake enforces
//! the same invariants the backend does: at most one enrollment per course,
//! deduplicated progress records, certificate issuance only after full
//! completion and at most once per enrollment, verification succeeding only
//! for the exact issued (certificate id, verification code) pair.

use agroyouth::api::{ApiError, Authority};
use agroyouth::model::{
    Ack, Certificate, CertificateReceipt, Course, CourseModule, EnrollReceipt, EnrollmentStatus,
    ProgressRecord, Verification,
};
use std::cell::RefCell;
use std::collections::BTreeMap;

pub fn course(id: &str, title: &str, modules: u32) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} fundamentals"),
        category: Some("Soil".to_string()),
        level: None,
        duration_hours: Some(4.0),
        language: Some("English".to_string()),
        modules: (1..=modules)
            .map(|n| CourseModule {
                module_number: n,
                title: format!("Module {n}"),
                content: String::new(),
                video_url: None,
                duration_minutes: Some(30),
            })
            .collect(),
    }
}

#[derive(Debug)]
struct StoredEnrollment {
    course_id: String,
    progress: Vec<ProgressRecord>,
    certificate_id: Option<String>,
}

#[derive(Debug)]
struct StoredCertificate {
    verification_code: String,
    enrollment_id: String,
    course_title: String,
}

#[derive(Debug, Default)]
struct State {
    courses: BTreeMap<String, Course>,
    enrollments: BTreeMap<String, StoredEnrollment>,
    certificates: BTreeMap<String, StoredCertificate>,
    issued: u32,
}

#[derive(Debug, Default)]
pub struct InMemoryAuthority {
    state: RefCell<State>,
}

impl InMemoryAuthority {
    pub fn with_course(course: Course) -> Self {
        let authority = Self::default();
        authority
            .state
            .borrow_mut()
            .courses
            .insert(course.id.clone(), course);
        authority
    }

    /// Verification code the authority issued for a certificate.
    pub fn verification_code(&self, certificate_id: &str) -> Option<String> {
        self.state
            .borrow()
            .certificates
            .get(certificate_id)
            .map(|cert| cert.verification_code.clone())
    }

    pub fn progress_count(&self, enrollment_id: &str) -> usize {
        self.state
            .borrow()
            .enrollments
            .get(enrollment_id)
            .map(|enrollment| enrollment.progress.len())
            .unwrap_or(0)
    }

    fn rejection(status: u16, message: &str) -> ApiError {
        ApiError::Status {
            status,
            message: message.to_string(),
        }
    }
}

impl Authority for InMemoryAuthority {
    fn enroll(&self, course_id: &str) -> Result<EnrollReceipt, ApiError> {
        let mut state = self.state.borrow_mut();
        if !state.courses.contains_key(course_id) {
            return Err(Self::rejection(404, "Course not found"));
        }
        if state
            .enrollments
            .values()
            .any(|enrollment| enrollment.course_id == course_id)
        {
            return Err(Self::rejection(400, "Already enrolled in this course"));
        }
        let enrollment_id = format!("enr-{}", state.enrollments.len() + 1);
        state.enrollments.insert(
            enrollment_id.clone(),
            StoredEnrollment {
                course_id: course_id.to_string(),
                progress: Vec::new(),
                certificate_id: None,
            },
        );
        Ok(EnrollReceipt {
            enrollment_id,
            message: Some("Successfully enrolled in course".to_string()),
        })
    }

    fn update_progress(&self, enrollment_id: &str, module_number: u32) -> Result<Ack, ApiError> {
        let mut state = self.state.borrow_mut();
        let enrollment = state
            .enrollments
            .get_mut(enrollment_id)
            .ok_or_else(|| Self::rejection(404, "Enrollment not found"))?;
        // Idempotent server semantics: re-marking changes nothing.
        if !enrollment
            .progress
            .iter()
            .any(|record| record.module_number == module_number)
        {
            enrollment.progress.push(ProgressRecord {
                module_number,
                completed_at: Some("2024-03-02T10:00:00".to_string()),
                quiz_score: None,
            });
        }
        Ok(Ack {
            message: Some("Progress updated".to_string()),
        })
    }

    fn request_certificate(&self, enrollment_id: &str) -> Result<CertificateReceipt, ApiError> {
        let mut state = self.state.borrow_mut();
        let enrollment = state
            .enrollments
            .get(enrollment_id)
            .ok_or_else(|| Self::rejection(404, "Enrollment not found"))?;
        let course_id = enrollment.course_id.clone();
        let total = state
            .courses
            .get(&course_id)
            .map(|course| course.modules.len())
            .unwrap_or(0);
        if enrollment.progress.len() < total {
            return Err(Self::rejection(400, "Complete all modules to get certificate"));
        }
        if enrollment.certificate_id.is_some() {
            // Issue-once contract: duplicates are rejected and the client
            // recovers through the status lookup.
            return Err(Self::rejection(400, "Certificate already exists"));
        }

        state.issued += 1;
        let certificate_id = format!("AGRO-{:08X}", 0x00C0FFEEu32 + state.issued);
        let verification_code = format!("vc-{}-{enrollment_id}", state.issued);
        let course_title = state
            .courses
            .get(&course_id)
            .map(|course| course.title.clone())
            .unwrap_or_default();
        state.certificates.insert(
            certificate_id.clone(),
            StoredCertificate {
                verification_code,
                enrollment_id: enrollment_id.to_string(),
                course_title,
            },
        );
        if let Some(enrollment) = state.enrollments.get_mut(enrollment_id) {
            enrollment.certificate_id = Some(certificate_id.clone());
        }
        Ok(CertificateReceipt {
            certificate_id,
            certificate_url: None,
            message: Some("Certificate generated".to_string()),
        })
    }

    fn enrollment_status(&self, enrollment_id: &str) -> Result<EnrollmentStatus, ApiError> {
        let state = self.state.borrow();
        let enrollment = state
            .enrollments
            .get(enrollment_id)
            .ok_or_else(|| Self::rejection(404, "Enrollment not found"))?;
        let course = state
            .courses
            .get(&enrollment.course_id)
            .ok_or_else(|| Self::rejection(404, "Course not found"))?;
        let total = course.modules.len() as u32;
        let completed = enrollment.progress.len() as u32;
        Ok(EnrollmentStatus {
            enrollment_id: enrollment_id.to_string(),
            course_id: enrollment.course_id.clone(),
            course_title: course.title.clone(),
            enrolled_at: Some("2024-03-01T09:00:00".to_string()),
            progress: enrollment.progress.clone(),
            completed_modules: completed,
            total_modules: total,
            progress_percentage: Some(f64::from(completed) / f64::from(total.max(1)) * 100.0),
            completed_at: None,
            is_completed: completed == total,
            certificate_issued: enrollment.certificate_id.is_some(),
            certificate_id: enrollment.certificate_id.clone(),
            certificate_url: None,
        })
    }

    fn certificate(&self, certificate_id: &str) -> Result<Certificate, ApiError> {
        let state = self.state.borrow();
        let stored = state
            .certificates
            .get(certificate_id)
            .ok_or_else(|| Self::rejection(404, "Certificate not found"))?;
        let enrollment = state.enrollments.get(&stored.enrollment_id);
        let modules_completed = enrollment.map(|e| e.progress.len() as u32);
        Ok(Certificate {
            certificate_id: certificate_id.to_string(),
            course_title: stored.course_title.clone(),
            course_category: Some("Soil".to_string()),
            course_level: None,
            course_duration: Some(4.0),
            student_name: "Amina O.".to_string(),
            student_email: None,
            issue_date: "2024-03-10T00:00:00".to_string(),
            completion_date: Some("2024-03-09T00:00:00".to_string()),
            verification_code: Some(stored.verification_code.clone()),
            modules_completed,
            total_modules: modules_completed,
        })
    }

    fn verify_certificate(
        &self,
        certificate_id: &str,
        code: &str,
    ) -> Result<Verification, ApiError> {
        let state = self.state.borrow();
        match state.certificates.get(certificate_id) {
            Some(stored) if stored.verification_code == code => Ok(Verification {
                valid: true,
                certificate_id: Some(certificate_id.to_string()),
                student_name: Some("Amina O.".to_string()),
                course_title: Some(stored.course_title.clone()),
                issue_date: Some("2024-03-10T00:00:00".to_string()),
                issuer: Some("Agro Youth Platform".to_string()),
                message: None,
            }),
            _ => Ok(Verification {
                valid: false,
                certificate_id: None,
                student_name: None,
                course_title: None,
                issue_date: None,
                issuer: None,
                message: Some("Invalid certificate or verification code".to_string()),
            }),
        }
    }
}
