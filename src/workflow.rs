//! Command plumbing: one `run_*` function per CLI subcommand.
//!
//! Each function drives exactly one workflow operation against the
//! authority and renders the result. Authority failures surface as errors
//! with context; domain-negative outcomes (not enrolled, not yet complete,
//! certificate invalid) are printed through their own branch and are not
//! errors.

use crate::api::ApiClient;
use crate::certificate::{self, CertificateLookup};
use crate::cli::{
    CertificateRequestArgs, CertificateShowArgs, CompleteArgs, CourseArgs, CoursesArgs,
    EnrollArgs, KnowledgeListArgs, KnowledgePostArgs, LoginArgs, MarketListArgs, MarketPostArgs,
    MyCertificatesArgs, MyCoursesArgs, RegisterArgs, VerifyArgs,
};
use crate::enrollment::{CertificateOutcome, CourseWorkflow, EnrollmentSnapshot, MarkOutcome};
use crate::model::{
    CourseFilter, LoginRequest, NewKnowledgeEntry, NewMarketListing, RegisterRequest,
};
use crate::render;
use anyhow::{anyhow, Context, Result};

pub fn run_register(client: &ApiClient, args: RegisterArgs) -> Result<()> {
    let receipt = client
        .register(&RegisterRequest {
            username: args.username.clone(),
            email: args.email,
            password: args.password,
            user_type: args.user_type,
            location: args.location,
        })
        .context("register")?;
    println!(
        "{}",
        receipt
            .message
            .unwrap_or_else(|| "registered".to_string())
    );
    println!("log in with: agro login --username {} --password ...", args.username);
    Ok(())
}

pub fn run_login(client: &mut ApiClient, args: LoginArgs) -> Result<()> {
    let response = client
        .login(&LoginRequest {
            username: args.username,
            password: args.password,
        })
        .context("login")?;
    let name = response.username.clone();
    client.session_mut().login(response.access_token)?;
    match name {
        Some(name) => println!("logged in as {name}"),
        None => println!("logged in"),
    }
    Ok(())
}

pub fn run_logout(client: &mut ApiClient) -> Result<()> {
    client.session_mut().logout()?;
    println!("logged out");
    Ok(())
}

pub fn run_courses(client: &ApiClient, args: CoursesArgs) -> Result<()> {
    let filter = CourseFilter {
        category: args.category,
        level: args.level,
        language: args.language,
    };
    let courses = client.courses(&filter).context("list courses")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
    } else {
        print!("{}", render::course_list(&courses));
    }
    Ok(())
}

pub fn run_course(client: &ApiClient, args: CourseArgs) -> Result<()> {
    let course = client.course(&args.course_id).context("fetch course")?;
    let enrollment = if client.session().is_authenticated() {
        find_enrollment(client, &course.id)?
    } else {
        None
    };
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&render::course_json(&course, enrollment.as_ref()))?
        );
    } else {
        print!("{}", render::course_detail(&course, enrollment.as_ref()));
    }
    Ok(())
}

pub fn run_enroll(client: &ApiClient, args: EnrollArgs) -> Result<()> {
    let course = client.course(&args.course_id).context("fetch course")?;
    let mut workflow = CourseWorkflow::new(client, course, None);
    let enrollment_id = workflow.enroll().context("enroll")?.enrollment_id.clone();
    println!(
        "enrolled in {} (enrollment {})",
        workflow.course().title,
        enrollment_id
    );
    Ok(())
}

pub fn run_my_courses(client: &ApiClient, args: MyCoursesArgs) -> Result<()> {
    let enrollments = client.my_courses().context("list enrollments")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&enrollments)?);
    } else {
        print!("{}", render::enrollment_list(&enrollments));
    }
    Ok(())
}

pub fn run_complete(client: &ApiClient, args: CompleteArgs) -> Result<()> {
    let course = client.course(&args.course_id).context("fetch course")?;
    let enrollment = find_enrollment(client, &course.id)?
        .ok_or_else(|| anyhow!("not enrolled in {} - run `agro enroll` first", course.title))?;
    let total = course.modules.len();
    let mut workflow = CourseWorkflow::new(client, course, Some(enrollment));

    match workflow.mark_module_complete(args.module)? {
        MarkOutcome::Recorded { course_complete } => {
            let snapshot = workflow
                .enrollment()
                .ok_or_else(|| anyhow!("enrollment snapshot missing after update"))?;
            println!(
                "module {} completed  {}",
                args.module,
                render::progress_bar(snapshot.completed_modules(), total)
            );
            if course_complete {
                println!(
                    "all modules complete - run `agro certificate request {}`",
                    args.course_id
                );
            }
        }
        MarkOutcome::AlreadyCompleted => {
            println!("module {} was already completed", args.module);
        }
        MarkOutcome::UnknownModule => {
            return Err(anyhow!(
                "course has no module {} (1..={})",
                args.module,
                total
            ));
        }
        MarkOutcome::NotEnrolled => {
            return Err(anyhow!("not enrolled"));
        }
    }
    Ok(())
}

pub fn run_certificate_request(client: &ApiClient, args: CertificateRequestArgs) -> Result<()> {
    let course = client.course(&args.course_id).context("fetch course")?;
    let enrollment = find_enrollment(client, &course.id)?
        .ok_or_else(|| anyhow!("not enrolled in {}", course.title))?;
    let mut workflow = CourseWorkflow::new(client, course, Some(enrollment));

    match workflow.request_certificate()? {
        CertificateOutcome::Issued { certificate_id }
        | CertificateOutcome::AlreadyIssued { certificate_id } => {
            let snapshot =
                certificate::fetch_by_id(client, &certificate_id).context("fetch certificate")?;
            print!("{}", render::certificate(&snapshot));
        }
        CertificateOutcome::NotYetComplete { completed, total } => {
            println!(
                "not yet complete: {}",
                render::progress_bar(completed, total)
            );
        }
        CertificateOutcome::NotEnrolled => {
            return Err(anyhow!("not enrolled"));
        }
    }
    Ok(())
}

pub fn run_certificate_show(client: &ApiClient, args: CertificateShowArgs) -> Result<()> {
    let lookup = match (&args.id, &args.enrollment) {
        (Some(id), _) => CertificateLookup::Found(Box::new(
            certificate::fetch_by_id(client, id).context("fetch certificate")?,
        )),
        (None, Some(enrollment_id)) => certificate::fetch_for_enrollment(client, enrollment_id)
            .context("resolve enrollment certificate")?,
        (None, None) => {
            return Err(anyhow!("pass --id or --enrollment"));
        }
    };
    if args.json {
        match &lookup {
            CertificateLookup::Found(snapshot) => {
                println!("{}", serde_json::to_string_pretty(snapshot)?);
            }
            CertificateLookup::NotYetIssued { enrollment_id } => {
                println!(
                    "{}",
                    serde_json::json!({ "certificate": null, "enrollment_id": enrollment_id })
                );
            }
        }
    } else {
        print!("{}", render::certificate_lookup(&lookup));
    }
    Ok(())
}

pub fn run_my_certificates(client: &ApiClient, args: MyCertificatesArgs) -> Result<()> {
    let certificates = client.my_certificates().context("list certificates")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&certificates)?);
    } else {
        print!("{}", render::certificate_list(&certificates));
    }
    Ok(())
}

pub fn run_verify(client: &ApiClient, args: VerifyArgs) -> Result<()> {
    let outcome = certificate::verify(client, &args.certificate_id, &args.code);
    print!("{}", render::verification(&outcome));
    Ok(())
}

pub fn run_knowledge_list(client: &ApiClient, args: KnowledgeListArgs) -> Result<()> {
    let entries = client.knowledge_entries().context("list knowledge entries")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", render::knowledge_list(&entries));
    }
    Ok(())
}

pub fn run_knowledge_post(client: &ApiClient, args: KnowledgePostArgs) -> Result<()> {
    let ack = client
        .post_knowledge(&NewKnowledgeEntry {
            title: args.title,
            content: args.content,
            crop_type: args.crop_type,
            season: args.season,
            region: args.region,
        })
        .context("post knowledge entry")?;
    println!("{}", ack.message.unwrap_or_else(|| "posted".to_string()));
    Ok(())
}

pub fn run_market_list(client: &ApiClient, args: MarketListArgs) -> Result<()> {
    let listings = client
        .market_listings(!args.all)
        .context("list market listings")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
    } else {
        print!("{}", render::market_list(&listings));
    }
    Ok(())
}

pub fn run_market_post(client: &ApiClient, args: MarketPostArgs) -> Result<()> {
    let ack = client
        .post_listing(&NewMarketListing {
            crop_name: args.crop_name,
            quantity: args.quantity,
            unit: args.unit,
            price_per_unit: args.price_per_unit,
            location: args.location,
            description: args.description,
        })
        .context("post market listing")?;
    println!("{}", ack.message.unwrap_or_else(|| "posted".to_string()));
    Ok(())
}

/// Resolve the caller's enrollment in a course, the same way the course
/// page does: scan `/my-courses` for a matching course id.
fn find_enrollment(client: &ApiClient, course_id: &str) -> Result<Option<EnrollmentSnapshot>> {
    let enrollments = client.my_courses().context("list enrollments")?;
    Ok(enrollments
        .iter()
        .find(|enrollment| enrollment.course_id == course_id)
        .map(EnrollmentSnapshot::from_summary))
}
