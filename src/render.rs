//! Plain-text rendering of workflow state.
//!
//! Pure builders (strings, plus the course page's JSON form) so the output
//! is testable without a terminal. The
//! renderer holds no logic of its own beyond the display rules: completion
//! badges come from the progress set, the progress bar fraction is clamped
//! and shown as a whole-number percentage.

use crate::certificate::{CertificateLookup, VerifyOutcome};
use crate::enrollment::{
    is_module_completed, progress_fraction, progress_percent, EnrollmentSnapshot,
};
use crate::model::{
    Certificate, CertificateSummary, Course, EnrollmentSummary, KnowledgeEntry, MarketListing,
};
use serde_json::json;
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// `[########------------] 40% (2 of 5 modules)`
pub fn progress_bar(completed: usize, total: usize) -> String {
    let filled = (progress_fraction(completed, total) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "[{}{}] {}% ({} of {} modules)",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress_percent(completed, total),
        completed,
        total
    )
}

pub fn course_list(courses: &[Course]) -> String {
    if courses.is_empty() {
        return "no courses found\n".to_string();
    }
    let mut out = String::new();
    for course in courses {
        let level = course
            .level
            .map(|level| level.to_string())
            .unwrap_or_else(|| "-".to_string());
        let hours = course
            .duration_hours
            .map(|hours| format!("{hours}h"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{}  {:<40} {:<12} {:>5}  {} modules",
            course.id,
            course.title,
            level,
            hours,
            course.modules.len()
        );
    }
    out
}

/// Course page: facts, progress bar when enrolled, module list with
/// 0-based selection indexes and completion badges.
pub fn course_detail(course: &Course, enrollment: Option<&EnrollmentSnapshot>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", course.title);
    if !course.description.is_empty() {
        let _ = writeln!(out, "{}", course.description);
    }
    let mut facts = Vec::new();
    if let Some(level) = course.level {
        facts.push(format!("level: {level}"));
    }
    if let Some(hours) = course.duration_hours {
        facts.push(format!("duration: {hours}h"));
    }
    if let Some(language) = &course.language {
        facts.push(format!("language: {language}"));
    }
    facts.push(format!("modules: {}", course.modules.len()));
    let _ = writeln!(out, "{}", facts.join("  |  "));

    if let Some(enrollment) = enrollment {
        let _ = writeln!(
            out,
            "\nprogress: {}",
            progress_bar(enrollment.completed_modules(), course.modules.len())
        );
    }

    let _ = writeln!(out);
    for (index, module) in course.modules.iter().enumerate() {
        let badge = match enrollment {
            Some(enrollment) if is_module_completed(&enrollment.progress, module.module_number) => {
                "[x]"
            }
            Some(_) => "[ ]",
            None => "   ",
        };
        let minutes = module
            .duration_minutes
            .map(|m| format!(" ({m} min)"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{index:>3}. {badge} Module {}: {}{minutes}",
            module.module_number, module.title
        );
    }
    out
}

/// JSON form of the course page, carrying the same enrollment facts the
/// text form renders. `enrollment` is null when the caller is not enrolled.
pub fn course_json(course: &Course, enrollment: Option<&EnrollmentSnapshot>) -> serde_json::Value {
    let enrollment = match enrollment {
        Some(snapshot) => json!({
            "enrollment_id": snapshot.enrollment_id,
            "completed_modules": snapshot.completed_modules(),
            "total_modules": course.modules.len(),
            "progress": snapshot.progress,
            "certificate_issued": snapshot.certificate_issued,
        }),
        None => serde_json::Value::Null,
    };
    json!({ "course": course, "enrollment": enrollment })
}

pub fn enrollment_list(enrollments: &[EnrollmentSummary]) -> String {
    if enrollments.is_empty() {
        return "no enrollments yet\n".to_string();
    }
    let mut out = String::new();
    for enrollment in enrollments {
        let state = if enrollment.certificate_issued {
            "certified"
        } else if enrollment.completed {
            "complete"
        } else {
            "in progress"
        };
        let _ = writeln!(
            out,
            "{}  {:<40} {}  [{}]",
            enrollment.enrollment_id,
            enrollment.course_title,
            progress_bar(enrollment.progress.len(), enrollment.total_modules as usize),
            state
        );
    }
    out
}

/// Certificate "card", including the verification pair the holder shares.
pub fn certificate(certificate: &Certificate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Certificate of Completion");
    let _ = writeln!(out, "=========================");
    let _ = writeln!(out, "certificate id:    {}", certificate.certificate_id);
    let _ = writeln!(out, "student:           {}", certificate.student_name);
    let _ = writeln!(out, "course:            {}", certificate.course_title);
    if let Some(category) = &certificate.course_category {
        let _ = writeln!(out, "category:          {category}");
    }
    if let Some(level) = certificate.course_level {
        let _ = writeln!(out, "level:             {level}");
    }
    if let Some(hours) = certificate.course_duration {
        let _ = writeln!(out, "duration:          {hours} hours");
    }
    if let (Some(completed), Some(total)) =
        (certificate.modules_completed, certificate.total_modules)
    {
        let _ = writeln!(out, "modules:           {completed} of {total} completed");
    }
    if let Some(date) = &certificate.completion_date {
        let _ = writeln!(out, "completed:         {date}");
    }
    let _ = writeln!(out, "issued:            {}", certificate.issue_date);
    if let Some(code) = &certificate.verification_code {
        let _ = writeln!(out, "verification code: {code}");
    }
    out
}

pub fn certificate_list(certificates: &[CertificateSummary]) -> String {
    if certificates.is_empty() {
        return "no certificates yet\n".to_string();
    }
    let mut out = String::new();
    for summary in certificates {
        let issued = summary.issue_date.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{}  {:<40} issued {}",
            summary.certificate_id, summary.course_title, issued
        );
    }
    out
}

pub fn certificate_lookup(lookup: &CertificateLookup) -> String {
    match lookup {
        CertificateLookup::Found(snapshot) => certificate(snapshot),
        CertificateLookup::NotYetIssued { enrollment_id } => format!(
            "certificate not yet issued for enrollment {enrollment_id}\n\
             complete all modules, then run `agro certificate request`\n"
        ),
    }
}

/// Verification verdict. Both negative kinds render the same branch.
pub fn verification(outcome: &VerifyOutcome) -> String {
    match outcome {
        VerifyOutcome::Valid(details) => {
            let mut out = String::new();
            let _ = writeln!(out, "VALID certificate");
            if let Some(name) = &details.student_name {
                let _ = writeln!(out, "  student: {name}");
            }
            if let Some(title) = &details.course_title {
                let _ = writeln!(out, "  course:  {title}");
            }
            if let Some(date) = &details.issue_date {
                let _ = writeln!(out, "  issued:  {date}");
            }
            if let Some(issuer) = &details.issuer {
                let _ = writeln!(out, "  issuer:  {issuer}");
            }
            out
        }
        VerifyOutcome::Invalid { message, .. } => {
            format!("INVALID certificate: {message}\n")
        }
    }
}

pub fn knowledge_list(entries: &[KnowledgeEntry]) -> String {
    if entries.is_empty() {
        return "no knowledge entries yet\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let author = entry.author_username.as_deref().unwrap_or("unknown");
        let _ = writeln!(out, "{}  {:<40} by {}", entry.id, entry.title, author);
    }
    out
}

pub fn market_list(listings: &[MarketListing]) -> String {
    if listings.is_empty() {
        return "no listings available\n".to_string();
    }
    let mut out = String::new();
    for listing in listings {
        let farmer = listing.farmer_username.as_deref().unwrap_or("unknown");
        let _ = writeln!(
            out,
            "{}  {:<24} {} {} @ {}/{}  {}  ({})",
            listing.id,
            listing.crop_name,
            listing.quantity,
            listing.unit,
            listing.price_per_unit,
            listing.unit,
            listing.location,
            farmer
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::RejectionKind;
    use crate::model::{CourseModule, ProgressRecord, Verification};

    #[test]
    fn bar_shows_forty_percent_for_two_of_five() {
        let bar = progress_bar(2, 5);
        assert!(bar.contains("40%"), "got {bar}");
        assert!(bar.contains("(2 of 5 modules)"));
        assert_eq!(bar.matches('#').count(), 8);
    }

    #[test]
    fn bar_clamps_degenerate_input() {
        assert!(progress_bar(0, 0).contains("0%"));
        assert!(progress_bar(9, 5).contains("100%"));
    }

    #[test]
    fn detail_badges_follow_progress_set() {
        let course = Course {
            id: "c1".to_string(),
            title: "Soil Health 101".to_string(),
            description: String::new(),
            category: None,
            level: None,
            duration_hours: None,
            language: None,
            modules: vec![
                CourseModule {
                    module_number: 1,
                    title: "Why soil matters".to_string(),
                    content: String::new(),
                    video_url: None,
                    duration_minutes: None,
                },
                CourseModule {
                    module_number: 2,
                    title: "Composting".to_string(),
                    content: String::new(),
                    video_url: None,
                    duration_minutes: None,
                },
            ],
        };
        let enrollment = EnrollmentSnapshot {
            enrollment_id: "e1".to_string(),
            progress: vec![ProgressRecord {
                module_number: 2,
                completed_at: None,
                quiz_score: None,
            }],
            certificate_issued: false,
            certificate_id: None,
        };
        let text = course_detail(&course, Some(&enrollment));
        assert!(text.contains("  0. [ ] Module 1: Why soil matters"));
        assert!(text.contains("  1. [x] Module 2: Composting"));
        assert!(text.contains("50%"));
    }

    #[test]
    fn course_json_carries_the_enrollment_facts() {
        let course = Course {
            id: "c1".to_string(),
            title: "Soil Health 101".to_string(),
            description: String::new(),
            category: None,
            level: None,
            duration_hours: None,
            language: None,
            modules: vec![
                CourseModule {
                    module_number: 1,
                    title: "Why soil matters".to_string(),
                    content: String::new(),
                    video_url: None,
                    duration_minutes: None,
                },
                CourseModule {
                    module_number: 2,
                    title: "Composting".to_string(),
                    content: String::new(),
                    video_url: None,
                    duration_minutes: None,
                },
            ],
        };
        let enrollment = EnrollmentSnapshot {
            enrollment_id: "e1".to_string(),
            progress: vec![ProgressRecord {
                module_number: 2,
                completed_at: None,
                quiz_score: None,
            }],
            certificate_issued: false,
            certificate_id: None,
        };

        let value = course_json(&course, Some(&enrollment));
        assert_eq!(value["course"]["_id"], "c1");
        assert_eq!(value["enrollment"]["enrollment_id"], "e1");
        assert_eq!(value["enrollment"]["completed_modules"], 1);
        assert_eq!(value["enrollment"]["total_modules"], 2);
        assert_eq!(value["enrollment"]["progress"][0]["module_number"], 2);

        let anonymous = course_json(&course, None);
        assert!(anonymous["enrollment"].is_null());
    }

    #[test]
    fn verification_branches_on_valid_flag_only() {
        let valid = VerifyOutcome::Valid(Box::new(Verification {
            valid: true,
            certificate_id: Some("AGRO-A1B2C3D4".to_string()),
            student_name: Some("Amina O.".to_string()),
            course_title: Some("Soil Health 101".to_string()),
            issue_date: None,
            issuer: Some("Agro Youth Platform".to_string()),
            message: None,
        }));
        let text = verification(&valid);
        assert!(text.starts_with("VALID"));
        assert!(text.contains("Amina O."));

        for kind in [RejectionKind::Authoritative, RejectionKind::CallFailed] {
            let invalid = VerifyOutcome::Invalid {
                message: "Invalid certificate or verification code".to_string(),
                kind,
            };
            assert!(verification(&invalid).starts_with("INVALID"));
        }
    }
}
