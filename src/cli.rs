//! CLI argument parsing for the Agro Youth client.
//!
//! The CLI is intentionally thin: each subcommand maps to one workflow
//! operation, so the same core logic can be reused elsewhere.
use clap::{Parser, Subcommand};

/// Root CLI entrypoint.
///
/// Keeping a single `RootArgs` type makes command routing obvious and avoids
/// hidden defaults in subcommand constructors.
#[derive(Parser, Debug)]
#[command(
    name = "agro",
    version,
    about = "Client for the Agro Youth learning platform",
    after_help = "Examples:\n  agro courses --category Soil\n  agro enroll 64f0c2a1\n  agro complete 64f0c2a1 --module 1\n  agro certificate request 64f0c2a1\n  agro verify AGRO-A1B2C3D4 --code <verification-code>",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Authority base URL (overrides AGRO_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a platform account
    Register(RegisterArgs),
    /// Log in and store the session token
    Login(LoginArgs),
    /// Clear the stored session token
    Logout,
    /// Browse the course catalog
    Courses(CoursesArgs),
    /// Show one course, with your progress when enrolled
    Course(CourseArgs),
    /// Enroll in a course
    Enroll(EnrollArgs),
    /// List your enrollments
    MyCourses(MyCoursesArgs),
    /// Mark a course module as completed
    Complete(CompleteArgs),
    /// Request or show certificates
    Certificate(CertificateArgs),
    /// List your certificates
    MyCertificates(MyCertificatesArgs),
    /// Verify a certificate by id and verification code
    Verify(VerifyArgs),
    /// Knowledge-sharing board
    Knowledge(KnowledgeArgs),
    /// Produce marketplace
    Market(MarketArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Create a platform account")]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Account type (farmer, student, buyer, ...)
    #[arg(long, default_value = "farmer")]
    pub user_type: String,

    #[arg(long)]
    pub location: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Log in and store the session token")]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Parser, Debug)]
#[command(about = "Browse the course catalog")]
pub struct CoursesArgs {
    #[arg(long)]
    pub category: Option<String>,

    /// Beginner, Intermediate or Advanced
    #[arg(long)]
    pub level: Option<String>,

    #[arg(long)]
    pub language: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Show one course, with your progress when enrolled")]
pub struct CourseArgs {
    /// Course id from the catalog
    pub course_id: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Enroll in a course")]
pub struct EnrollArgs {
    /// Course id from the catalog
    pub course_id: String,
}

#[derive(Parser, Debug)]
#[command(about = "List your enrollments")]
pub struct MyCoursesArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Mark a course module as completed")]
pub struct CompleteArgs {
    /// Course id from the catalog
    pub course_id: String,

    /// 1-based module number within the course
    #[arg(long, value_name = "N")]
    pub module: u32,
}

#[derive(Parser, Debug)]
#[command(about = "Request or show certificates")]
pub struct CertificateArgs {
    #[command(subcommand)]
    pub command: CertificateCommand,
}

#[derive(Subcommand, Debug)]
pub enum CertificateCommand {
    /// Request certificate issuance for a completed course
    Request(CertificateRequestArgs),
    /// Show a certificate by id or via an enrollment
    Show(CertificateShowArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Request certificate issuance for a completed course")]
pub struct CertificateRequestArgs {
    /// Course id from the catalog
    pub course_id: String,
}

#[derive(Parser, Debug)]
#[command(about = "Show a certificate by id or via an enrollment")]
pub struct CertificateShowArgs {
    /// Certificate id (AGRO-XXXXXXXX)
    #[arg(long, value_name = "ID", conflicts_with = "enrollment")]
    pub id: Option<String>,

    /// Enrollment id, resolved to its certificate if one was issued
    #[arg(long, value_name = "ID")]
    pub enrollment: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "List your certificates")]
pub struct MyCertificatesArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Verify a certificate by id and verification code")]
pub struct VerifyArgs {
    /// Certificate id, case-insensitive (AGRO-XXXXXXXX)
    pub certificate_id: String,

    /// Verification code printed on the certificate
    #[arg(long)]
    pub code: String,
}

#[derive(Parser, Debug)]
#[command(about = "Knowledge-sharing board")]
pub struct KnowledgeArgs {
    #[command(subcommand)]
    pub command: KnowledgeCommand,
}

#[derive(Subcommand, Debug)]
pub enum KnowledgeCommand {
    /// List board entries
    List(KnowledgeListArgs),
    /// Post a new entry
    Post(KnowledgePostArgs),
}

#[derive(Parser, Debug)]
#[command(about = "List board entries")]
pub struct KnowledgeListArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Post a new entry")]
pub struct KnowledgePostArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub content: String,

    #[arg(long)]
    pub crop_type: Option<String>,

    #[arg(long)]
    pub season: Option<String>,

    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Produce marketplace")]
pub struct MarketArgs {
    #[command(subcommand)]
    pub command: MarketCommand,
}

#[derive(Subcommand, Debug)]
pub enum MarketCommand {
    /// List produce listings
    List(MarketListArgs),
    /// Post a new listing
    Post(MarketPostArgs),
}

#[derive(Parser, Debug)]
#[command(about = "List produce listings")]
pub struct MarketListArgs {
    /// Include listings already marked unavailable
    #[arg(long)]
    pub all: bool,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Post a new listing")]
pub struct MarketPostArgs {
    #[arg(long)]
    pub crop_name: String,

    #[arg(long)]
    pub quantity: f64,

    #[arg(long)]
    pub unit: String,

    #[arg(long)]
    pub price_per_unit: f64,

    #[arg(long)]
    pub location: String,

    #[arg(long)]
    pub description: Option<String>,
}
