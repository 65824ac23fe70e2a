//! Typed payloads for the Agro Youth authority API.
//!
//! Every endpoint gets an explicit response type validated at the boundary;
//! no dynamic JSON flows into workflow logic. Unknown fields from the
//! authority are ignored, and fields the authority sometimes omits are
//! optional. Dates travel as the ISO-8601 strings the authority emits; the
//! client renders them without reinterpreting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Course difficulty level as published in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "Beginner"),
            Level::Intermediate => write!(f, "Intermediate"),
            Level::Advanced => write!(f, "Advanced"),
        }
    }
}

/// One unit of course content. `module_number` is 1-based and unique within
/// a course; ordering in `Course::modules` is significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseModule {
    pub module_number: u32,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

/// Catalog course as returned by `GET /courses` and `GET /courses/{id}`.
/// Immutable from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

/// Optional catalog filters forwarded as query parameters.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub category: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
}

/// Evidence that one module was completed. Append-only from the client's
/// point of view; the set of completed module numbers grows monotonically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub module_number: u32,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub quiz_score: Option<f64>,
}

/// One entry of `GET /my-courses`: an enrollment joined with course facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentSummary {
    pub enrollment_id: String,
    pub course_id: String,
    pub course_title: String,
    #[serde(default)]
    pub enrolled_at: Option<String>,
    #[serde(default)]
    pub progress: Vec<ProgressRecord>,
    pub total_modules: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub certificate_issued: bool,
}

/// Acknowledgement of `POST /courses/{id}/enroll`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollReceipt {
    pub enrollment_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /enrollments/{id}/status`: the authority's full view of one
/// enrollment, including the certificate reference once issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentStatus {
    pub enrollment_id: String,
    pub course_id: String,
    pub course_title: String,
    #[serde(default)]
    pub enrolled_at: Option<String>,
    #[serde(default)]
    pub progress: Vec<ProgressRecord>,
    pub completed_modules: u32,
    pub total_modules: u32,
    #[serde(default)]
    pub progress_percentage: Option<f64>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub certificate_issued: bool,
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub certificate_url: Option<String>,
}

/// Acknowledgement of `POST /enrollments/{id}/certificate`.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateReceipt {
    pub certificate_id: String,
    #[serde(default)]
    pub certificate_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Full certificate snapshot from `GET /certificates/{id}`. Denormalized
/// course/student facts frozen at issuance; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub certificate_id: String,
    pub course_title: String,
    #[serde(default)]
    pub course_category: Option<String>,
    #[serde(default)]
    pub course_level: Option<Level>,
    #[serde(default)]
    pub course_duration: Option<f64>,
    pub student_name: String,
    #[serde(default)]
    pub student_email: Option<String>,
    pub issue_date: String,
    #[serde(default)]
    pub completion_date: Option<String>,
    #[serde(default)]
    pub verification_code: Option<String>,
    #[serde(default)]
    pub modules_completed: Option<u32>,
    #[serde(default)]
    pub total_modules: Option<u32>,
}

/// One entry of `GET /my-certificates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateSummary {
    pub certificate_id: String,
    pub course_title: String,
    #[serde(default)]
    pub course_category: Option<String>,
    #[serde(default)]
    pub course_level: Option<Level>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub certificate_url: Option<String>,
}

/// Response of `POST /certificates/{id}/verify`. Only the explicit `valid`
/// flag drives the rendered outcome branch; the descriptive fields are
/// whatever the authority chose to include on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    pub valid: bool,
    #[serde(default)]
    pub certificate_id: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub course_title: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic acknowledgement body for mutations that return no snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /auth/register` request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub user_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// `POST /auth/register` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterReceipt {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /auth/login` request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /auth/login` response carrying the bearer credential.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Knowledge-board entry from `GET /knowledge/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author_username: Option<String>,
    #[serde(default)]
    pub crop_type: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `POST /knowledge/` request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewKnowledgeEntry {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Produce listing from `GET /market/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketListing {
    #[serde(rename = "_id")]
    pub id: String,
    pub crop_name: String,
    pub quantity: f64,
    pub unit: String,
    pub price_per_unit: f64,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub farmer_username: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_available() -> bool {
    true
}

/// `POST /market/` request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewMarketListing {
    pub crop_name: String,
    pub quantity: f64,
    pub unit: String,
    pub price_per_unit: f64,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_parses_authority_shape() {
        let json = r#"{
            "_id": "64f0c2",
            "title": "Soil Health 101",
            "description": "Basics of soil biology",
            "category": "Soil",
            "level": "Beginner",
            "duration_hours": 4,
            "language": "English",
            "instructor_id": "64f0aa",
            "modules": [
                {"module_number": 1, "title": "Why soil matters", "content": "<p>...</p>", "duration_minutes": 30},
                {"module_number": 2, "title": "Composting", "content": "", "video_url": "https://cdn/x.mp4"}
            ]
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.id, "64f0c2");
        assert_eq!(course.level, Some(Level::Beginner));
        assert_eq!(course.modules.len(), 2);
        assert_eq!(course.modules[1].video_url.as_deref(), Some("https://cdn/x.mp4"));
    }

    #[test]
    fn enrollment_status_tolerates_missing_certificate() {
        let json = r#"{
            "enrollment_id": "e1",
            "course_id": "c1",
            "course_title": "Soil Health 101",
            "enrolled_at": "2024-03-01T09:00:00",
            "progress": [{"module_number": 1, "completed_at": "2024-03-02T10:00:00", "quiz_score": null}],
            "completed_modules": 1,
            "total_modules": 3,
            "progress_percentage": 33.33,
            "completed_at": null,
            "is_completed": false,
            "certificate_issued": false,
            "certificate_id": null,
            "certificate_url": null
        }"#;
        let status: EnrollmentStatus = serde_json::from_str(json).unwrap();
        assert!(!status.is_completed);
        assert!(status.certificate_id.is_none());
        assert_eq!(status.progress[0].module_number, 1);
    }

    #[test]
    fn verification_only_needs_valid_flag() {
        let rejected: Verification =
            serde_json::from_str(r#"{"valid": false, "message": "Invalid certificate or verification code"}"#)
                .unwrap();
        assert!(!rejected.valid);
        assert!(rejected.student_name.is_none());

        let accepted: Verification = serde_json::from_str(
            r#"{"valid": true, "certificate_id": "AGRO-A1B2C3D4", "student_name": "Amina O.",
                "course_title": "Soil Health 101", "issue_date": "2024-03-10T00:00:00",
                "issuer": "Agro Youth Platform"}"#,
        )
        .unwrap();
        assert!(accepted.valid);
        assert_eq!(accepted.issuer.as_deref(), Some("Agro Youth Platform"));
    }
}
