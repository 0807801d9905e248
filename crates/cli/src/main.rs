use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info};

use carelens_fhir::{
    resource::demo_patient, FhirError, FhirService, ManagedFhirClient, ParsedOptions,
    RestFhirClient, SearchQuery,
};
use carelens_nlu::{facts, render_relations, ExpertAiClient, GoogleNluClient, NluError, WitClient};
use carelens_runtime::{Config, ExitStatus};

#[derive(Parser)]
#[command(name = "carelens")]
#[command(about = "Clinical language understanding and FHIR search", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Understand a sentence with the Wit provider
    Wit(TextArgs),

    /// Analyze clinical text with the Healthcare NLP service
    Google(TextArgs),

    /// Extract verb relations with the expert.ai provider
    Expert(ExpertArgs),

    /// Search patients in the FHIR store
    Search(SearchArgs),

    /// Create the fixed demonstration patient
    #[command(name = "create-demo")]
    CreateDemo(CreateDemoArgs),
}

#[derive(Args)]
struct TextArgs {
    /// The text to understand
    #[arg(short, long)]
    text: String,

    /// Print the raw provider response
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExpertArgs {
    /// The text to analyze
    #[arg(short, long)]
    text: String,
}

#[derive(Args)]
struct SearchArgs {
    /// Comma-separated key=value filters, e.g. "family=Park,gender=male"
    #[arg(short, long)]
    query: String,

    /// Sort results by this field
    #[arg(long)]
    order_by: Option<String>,

    /// Include resources linked through this search parameter
    #[arg(long)]
    include: Option<String>,

    /// Requested page size
    #[arg(long)]
    limit: Option<u32>,

    /// Print the raw bundle
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CreateDemoArgs {
    /// Identifier value for the demonstration patient
    #[arg(short, long)]
    id: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    // Outstanding requests are not cancelled; the process just stops.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C pressed. Exiting.");
            std::process::exit(ExitStatus::Success.code());
        }
    });

    if let Err(err) = run(cli.command).await {
        error!("{err:#}");
        std::process::exit(classify_error(&err).code());
    }
}

async fn run(command: Commands) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let client = carelens_runtime::http::client().context("Failed to build the HTTP client")?;

    match command {
        Commands::Wit(args) => run_wit(args, client, &config).await,
        Commands::Google(args) => run_google(args, client, &config).await,
        Commands::Expert(args) => run_expert(args, client, &config).await,
        Commands::Search(args) => run_search(args, client, &config).await,
        Commands::CreateDemo(args) => run_create_demo(args, client, &config).await,
    }
}

fn classify_error(err: &anyhow::Error) -> ExitStatus {
    if let Some(err) = err.downcast_ref::<NluError>() {
        match err {
            NluError::Transport(..) => ExitStatus::NotFoundOrServerError,
            NluError::UnexpectedShape { .. } => ExitStatus::UnknownError,
            NluError::Runtime(_) => ExitStatus::UnhandledError,
        }
    } else if let Some(err) = err.downcast_ref::<FhirError>() {
        match err {
            FhirError::InvalidFilters(_) | FhirError::Endpoint(..) => ExitStatus::InvalidOptions,
            FhirError::Transport(_) => ExitStatus::NotFoundOrServerError,
            FhirError::UnexpectedShape(_) => ExitStatus::UnknownError,
            FhirError::Runtime(_) => ExitStatus::UnhandledError,
        }
    } else {
        ExitStatus::UnhandledError
    }
}

async fn run_wit(args: TextArgs, client: reqwest::Client, config: &Config) -> Result<()> {
    let wit = WitClient::from_config(client, config)?;
    if args.json {
        println!("{}", wit.message_raw(&args.text).await?);
        return Ok(());
    }
    let meaning = wit.message(&args.text).await?;
    match meaning.top_intent() {
        Some(intent) => info!("intent: {} ({})", intent.name, intent.confidence),
        None => info!("intent: none"),
    }
    for fact in facts(&meaning) {
        info!("{}: {} ({})", fact.label, fact.value, fact.confidence);
    }
    Ok(())
}

async fn run_google(args: TextArgs, client: reqwest::Client, config: &Config) -> Result<()> {
    let google = GoogleNluClient::from_config(client, config)?;
    if args.json {
        println!("{}", google.analyze_raw(&args.text).await?);
        return Ok(());
    }
    let response = google.analyze(&args.text).await?;
    println!("Entities:\n{}", response.render());
    Ok(())
}

async fn run_expert(args: ExpertArgs, client: reqwest::Client, config: &Config) -> Result<()> {
    let expert = ExpertAiClient::from_config(client, config)?;
    let relations = expert.relations(&args.text).await?;
    println!("{}", render_relations(&relations)?);
    Ok(())
}

async fn run_search(args: SearchArgs, client: reqwest::Client, config: &Config) -> Result<()> {
    let options = ParsedOptions::parse(&args.query);
    let query = SearchQuery::from_parts(
        &options,
        args.order_by.as_deref(),
        args.include.as_deref(),
        args.limit,
    )?;
    let service = fhir_service(client, config)?;
    let bundle = service.search_patients(&query).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }
    if let Some(total) = bundle.total {
        info!("{total} matching records");
    }
    for entry in &bundle.entry {
        let Some(patient) = entry.resource.as_ref() else {
            continue;
        };
        println!(
            "{}  {}",
            patient.id.as_deref().unwrap_or("(no id)"),
            patient.display_name()
        );
    }
    Ok(())
}

async fn run_create_demo(args: CreateDemoArgs, client: reqwest::Client, config: &Config) -> Result<()> {
    let patient = demo_patient(&args.id);
    let service = fhir_service(client, config)?;
    service.create_patient(&patient).await?;
    info!("created demonstration patient {}", patient.display_name());
    Ok(())
}

/// A plain endpoint wins when configured; otherwise the Healthcare API store
/// with per-request credentials.
fn fhir_service(client: reqwest::Client, config: &Config) -> Result<Box<dyn FhirService>> {
    if config.get("FHIR_ENDPOINT").is_some() {
        Ok(Box::new(RestFhirClient::from_config(client, config)?))
    } else {
        Ok(Box::new(ManagedFhirClient::from_config(client, config)?))
    }
}
