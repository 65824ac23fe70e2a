use agroyouth::api::ApiClient;
use agroyouth::cli::{
    CertificateCommand, Command, KnowledgeCommand, MarketCommand, RootArgs,
};
use agroyouth::config::ClientConfig;
use agroyouth::session::Session;
use agroyouth::workflow;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = RootArgs::parse();
    let config = ClientConfig::resolve(cli.base_url.as_deref())?;
    let session = match Session::load_default() {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(error = %err, "session storage unavailable, continuing anonymously");
            Session::anonymous()
        }
    };
    let mut client = ApiClient::new(config.base_url, session);

    match cli.command {
        Command::Register(args) => workflow::run_register(&client, args),
        Command::Login(args) => workflow::run_login(&mut client, args),
        Command::Logout => workflow::run_logout(&mut client),
        Command::Courses(args) => workflow::run_courses(&client, args),
        Command::Course(args) => workflow::run_course(&client, args),
        Command::Enroll(args) => workflow::run_enroll(&client, args),
        Command::MyCourses(args) => workflow::run_my_courses(&client, args),
        Command::Complete(args) => workflow::run_complete(&client, args),
        Command::Certificate(args) => match args.command {
            CertificateCommand::Request(args) => workflow::run_certificate_request(&client, args),
            CertificateCommand::Show(args) => workflow::run_certificate_show(&client, args),
        },
        Command::MyCertificates(args) => workflow::run_my_certificates(&client, args),
        Command::Verify(args) => workflow::run_verify(&client, args),
        Command::Knowledge(args) => match args.command {
            KnowledgeCommand::List(args) => workflow::run_knowledge_list(&client, args),
            KnowledgeCommand::Post(args) => workflow::run_knowledge_post(&client, args),
        },
        Command::Market(args) => match args.command {
            MarketCommand::List(args) => workflow::run_market_list(&client, args),
            MarketCommand::Post(args) => workflow::run_market_post(&client, args),
        },
    }
}
