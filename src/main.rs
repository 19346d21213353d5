//! LogIQ CLI binary entry point.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use logiq::bootstrap::{ChatScope, SessionBootstrap};
use logiq::bridge::run_turn_blocking;
use logiq::catalog::Catalog;
use logiq::cli::{Cli, Commands, CustomerArgs};
use logiq::config::{load_dotenv, AppConfig};
use logiq::customer::product_enquiry_agent;
use logiq::provider::{self, ModelProvider};
use logiq::session::{InMemorySessionService, SessionService};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

fn main() {
    init_tracing();
    let cli = Cli::parse_args();

    let result = match cli.command {
        Commands::Chat(args) => handle_chat(&args.customer),
        Commands::Ask(args) => handle_ask(&args.customer, &args.message),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("logiq=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Everything a conversation needs: the bootstrap plus the scope it fills in.
struct Conversation {
    bootstrap: SessionBootstrap,
    scope: ChatScope,
    user_id: String,
}

fn start(args: &CustomerArgs) -> Result<Conversation, Box<dyn std::error::Error>> {
    load_dotenv(&args.env_dir)?;
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::from_env()?,
    };
    if let Some(model) = &args.model {
        config.set_model(model.parse()?)?;
    }

    let catalog = Arc::new(Catalog::load_or_sample(config.catalog_path.as_deref())?);
    let agent = Arc::new(product_enquiry_agent(&config, catalog));
    let provider: Arc<dyn ModelProvider> =
        Arc::from(provider::create_provider(agent.model(), &config)?);
    let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());

    Ok(Conversation {
        bootstrap: SessionBootstrap::new(&config.app_name, agent, provider, sessions),
        scope: ChatScope::new(&args.name),
        user_id: args.user_id.clone(),
    })
}

fn handle_ask(args: &CustomerArgs, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut conversation = start(args)?;
    let (runner, session_id) = conversation
        .bootstrap
        .initialize_blocking(&mut conversation.scope, &conversation.user_id)?;
    println!(
        "{}",
        run_turn_blocking(&conversation.user_id, runner.as_ref(), &session_id, message)
    );
    Ok(())
}

fn handle_chat(args: &CustomerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut conversation = start(args)?;
    let (runner, session_id) = conversation
        .bootstrap
        .initialize_blocking(&mut conversation.scope, &conversation.user_id)?;

    eprintln!(
        "Chatting as {} (session {session_id}). Empty line to quit.",
        conversation.scope.customer_name
    );
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            break;
        }

        let reply = run_turn_blocking(&conversation.user_id, runner.as_ref(), &session_id, message);
        writeln!(stdout, "{reply}")?;
    }
    Ok(())
}
