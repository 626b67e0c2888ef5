use clap::Parser;
use formmate_fill::report::{FieldStatus, FillReport};
use formmate_fill::{FillError, FillSession};

mod args;
use args::{Args, OutputFormat};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting fill pass for form: {}", args.url);

    println!("Note: filling requires a WebDriver server (e.g., ChromeDriver).");
    println!("Set --webdriver-url if not using the default http://localhost:4444");

    let report = match run(&args).await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Fill pass failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match args.output {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                ::log::error!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
        OutputFormat::Summary => print_summary(&report),
    }
}

async fn run(args: &Args) -> Result<FillReport, FillError> {
    let mut session = match &args.config {
        Some(path) => FillSession::from_config_file(path)?,
        None => FillSession::new(&args.url),
    };

    session = session.with_backend_urls(args.backend_urls.clone());

    if args.dry_run {
        session = session.with_dry_run(true);
    }
    if let Some(timeout) = args.timeout {
        session = session.with_request_timeout(timeout);
    }
    if let Some(uid) = &args.uid {
        session = session.with_uid(uid);
    }
    if let Some(url) = &args.webdriver_url {
        session = session.with_webdriver_url(url);
    }

    session.run().await
}

fn print_summary(report: &FillReport) {
    if report.total_fields == 0 {
        println!("No fillable fields found on {}", report.form_url);
        return;
    }

    for field in &report.fields {
        let marker = match field.status {
            FieldStatus::Filled | FieldStatus::Planned => "+",
            FieldStatus::Missed => "-",
            FieldStatus::Diagnostic | FieldStatus::WriteFailed => "!",
        };
        match &field.detail {
            Some(detail) => println!("{} {} ({})", marker, field.question, detail),
            None => println!("{} {}", marker, field.question),
        }
    }

    println!("{}", report.summary());
}
