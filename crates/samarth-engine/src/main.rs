//! CLI entry point for the Samarth question-answering engine.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use samarth_engine::fetch::{ClosureSource, DatasetSource, FetchRequest, parse_body};
use samarth_engine::{
    AnalysisEngine, Conversation, Credentials, EngineConfig, QueryHandler, Role, SummaryScope,
    Turn,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[cfg(feature = "webhook")]
use samarth_engine::fetch::{WebhookConfig, WebhookSource};

/// Environment variable holding the workflow webhook URL.
const ENDPOINT_ENV: &str = "SAMARTH_WEBHOOK_URL";

/// Environment variable holding the data.gov.in API key.
const API_KEY_ENV: &str = "DATA_GOV_API_KEY";

#[derive(Parser, Debug)]
#[command(
    author = "Project Samarth Team",
    version,
    about = "Ask questions about data.gov.in tables",
    long_about = "Forwards a question to a data workflow, analyses the table it returns \
                  and prints a markdown answer with its source.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  SAMARTH_WEBHOOK_URL   Workflow webhook URL (or --endpoint)\n  \
                  DATA_GOV_API_KEY      data.gov.in API key (or --api-key)\n\n\
                  EXAMPLES:\n  \
                  # Ask a single question\n  \
                  samarth -q \"Share of Union Taxes for Telangana in 2017\"\n\n  \
                  # Interactive session\n  \
                  samarth --endpoint https://n8n.example.org/webhook/samarth\n\n  \
                  # Analyse a saved workflow response offline\n  \
                  samarth --payload response.json -q \"compare rainfall by crop\""
)]
struct Args {
    /// Workflow webhook URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// data.gov.in API key
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Question to answer; without it an interactive prompt is started
    #[arg(short, long)]
    question: Option<String>,

    /// Answer from a saved workflow response instead of calling the webhook
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Timeout for workflow requests in seconds
    #[arg(long, default_value = "60")]
    timeout_secs: u64,

    /// Show every row in summaries instead of the first five
    #[arg(long)]
    all_rows: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,

    /// Print the conversation as JSON instead of markdown
    ///
    /// Disables all logs so stdout only carries the transcript.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    let scope = if args.all_rows {
        SummaryScope::All
    } else {
        SummaryScope::default()
    };
    let config = EngineConfig::builder().summary_scope(scope).build()?;

    let source = build_source(&args)?;
    info!("Using {} source", source.name());
    let handler = QueryHandler::new(AnalysisEngine::new(config), source);

    let credentials = resolve_credentials(&args);

    match args.question.as_deref() {
        Some(question) => run_once(&handler, &credentials, question, args.json),
        None => run_interactive(&handler, &credentials, args.json),
    }
}

/// Take credentials from flags, falling back to the environment.
///
/// Offline payloads need neither, so placeholders are filled in.
fn resolve_credentials(args: &Args) -> Credentials {
    let api_key = args.api_key.clone().or_else(|| env::var(API_KEY_ENV).ok());
    let endpoint = args.endpoint.clone().or_else(|| env::var(ENDPOINT_ENV).ok());

    match &args.payload {
        Some(path) => Credentials::new(
            api_key.or_else(|| Some("offline".to_string())),
            Some(path.display().to_string()),
        ),
        None => Credentials::new(api_key, endpoint),
    }
}

/// Pick the dataset source: a saved payload, or the webhook.
fn build_source(args: &Args) -> Result<Arc<dyn DatasetSource>> {
    if let Some(path) = &args.payload {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read payload file: {}", path.display()))?;
        info!("Answering from saved payload: {}", path.display());
        return Ok(Arc::new(ClosureSource::new(
            "payload",
            move |_req: &FetchRequest| parse_body(&body),
        )));
    }
    build_webhook_source(args)
}

#[cfg(feature = "webhook")]
fn build_webhook_source(args: &Args) -> Result<Arc<dyn DatasetSource>> {
    let config = WebhookConfig::builder()
        .timeout_secs(args.timeout_secs)
        .build();
    Ok(Arc::new(WebhookSource::with_config(config)?))
}

#[cfg(not(feature = "webhook"))]
fn build_webhook_source(_args: &Args) -> Result<Arc<dyn DatasetSource>> {
    Err(anyhow!(
        "Webhook support not compiled in. Use --payload, or compile with --features webhook."
    ))
}

fn run_once(
    handler: &QueryHandler,
    credentials: &Credentials,
    question: &str,
    json: bool,
) -> Result<()> {
    let outcome = handler.handle(Conversation::new(), question, credentials);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.conversation)?);
    } else {
        for turn in outcome.conversation.turns() {
            print_turn(turn);
        }
    }

    match outcome.error {
        Some(e) => {
            error!("Query failed: {}", e);
            Err(anyhow!(e))
        }
        None => Ok(()),
    }
}

/// Prompt loop over stdin. The conversation lives for the whole loop.
fn run_interactive(handler: &QueryHandler, credentials: &Credentials, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut conversation = Conversation::new();

    if !json {
        println!("Ask a question about data.gov.in tables (empty line or 'exit' to quit).");
    }

    loop {
        if !json {
            print!("> ");
            io::stdout().flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() || question.eq_ignore_ascii_case("exit") {
            break;
        }

        let seen = conversation.len();
        let outcome = handler.handle(conversation, question, credentials);
        conversation = outcome.conversation;

        if let Some(e) = &outcome.error
            && e.is_missing_credential()
        {
            eprintln!("{}", e);
            continue;
        }

        if !json {
            for turn in conversation.turns().iter().skip(seen) {
                if turn.role == Role::Assistant {
                    print_turn(turn);
                }
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&conversation)?);
    }
    Ok(())
}

/// Print a turn as markdown, followed by its source.
///
/// Uses `println!` intentionally: the answer is the output of the CLI and
/// must show regardless of log level.
fn print_turn(turn: &Turn) {
    match turn.role {
        Role::User => println!("\n**You:** {}\n", turn.content),
        Role::Assistant => {
            println!("{}", turn.content);
            if let Some(citation) = &turn.citation {
                println!("\nView Data Source: {}", citation);
            }
            println!();
        }
    }
}
