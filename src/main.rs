use clap::{Parser, Subcommand};
use std::sync::Arc;

use squabble_bot::application::errors::BotError;
use squabble_bot::application::messaging::{CommandParser, CommandRouter, StreamDispatcher};
use squabble_bot::application::services::IdentityResolver;
use squabble_bot::domain::traits::{MessagingClient, TextGenerator};
use squabble_bot::infrastructure::adapters::ConsoleClient;
use squabble_bot::infrastructure::config::Config;
use squabble_bot::infrastructure::gateway::{HttpGameService, LlmTextGenerator, NeynarDirectory};
use squabble_bot::infrastructure::http;
use squabble_bot::infrastructure::llm::{LLMConfig, OpenAiCompatibleProvider};

#[derive(Parser)]
#[command(name = "squabble-bot")]
#[command(about = "Chat bot that runs Squabble games from group conversations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot inbox id (overrides config and AGENT_INBOX_ID)
    #[arg(long)]
    inbox_id: Option<String>,

    /// Wallet address given to the console user
    #[arg(long)]
    console_address: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bot(&cli.config, cli.inbox_id, cli.console_address) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("squabble-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => init_config(),
    }
}

fn load_config(config_path: &str, inbox_override: Option<String>) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(config_path).exists() {
        match Config::load(config_path) {
            Ok(mut config) => {
                config.apply_env();
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::load_env()
            }
        }
    } else {
        Config::load_env()
    };

    if let Some(inbox_id) = inbox_override {
        config.bot.inbox_id = Some(inbox_id);
    }
    config.validate()?;
    Ok(config)
}

fn run_bot(
    config_path: &str,
    inbox_override: Option<String>,
    console_address: Option<String>,
) -> Result<(), BotError> {
    let config = load_config(config_path, inbox_override)?;
    tracing::info!("Starting {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(serve(config, console_address))
}

async fn serve(config: Config, console_address: Option<String>) -> Result<(), BotError> {
    let inbox_id = config.bot.inbox_id.clone().unwrap_or_default();

    let mut console = ConsoleClient::new(inbox_id.as_str());
    if let Some(address) = console_address {
        console = console.with_user_address(address);
    }
    let client: Arc<dyn MessagingClient> = Arc::new(console);

    let games = Arc::new(HttpGameService::new(
        config.game.base_url.clone().unwrap_or_default(),
        config.game.agent_secret.clone().unwrap_or_default(),
        config.game.timeout_seconds,
    )?);
    let directory = Arc::new(
        NeynarDirectory::new(
            config.directory.base_url.as_str(),
            config.directory.api_key.clone().unwrap_or_default(),
            config.directory.timeout_seconds,
        )?
        .with_max_batch(config.directory.max_batch),
    );
    let resolver = Arc::new(IdentityResolver::new(client.clone(), directory));

    let parser = config
        .bot
        .aliases
        .iter()
        .fold(CommandParser::new(config.bot.sigil.as_str(), config.bot.keyword.as_str()), |p, alias| {
            p.with_alias(alias.as_str())
        });

    let mut router = CommandRouter::new(games, resolver.clone(), inbox_id.as_str())
        .with_invocation(&config.bot.sigil, parser.keyword());
    match text_generator(&config.llm) {
        Some(text) => router = router.with_text_generator(text),
        None => tracing::warn!("No LLM API key set, help replies use static rules"),
    }

    if config.http.enabled {
        let admin_client = client.clone();
        let bind = config.http.bind.clone();
        let port = config.http.port;
        tokio::spawn(async move {
            if let Err(e) = http::serve(&bind, port, admin_client).await {
                tracing::error!("{}", e);
            }
        });
    }

    let stream = client.stream_all_messages().await?;
    tracing::info!("Bot started with inbox {}", inbox_id);

    let mut dispatcher = StreamDispatcher::new(client, parser, router, resolver)
        .with_dedup_window(config.dispatcher.dedup_window);
    let stats = dispatcher.run(stream).await;
    tracing::info!(
        "Processed {} messages ({} handled, {} failed)",
        stats.received,
        stats.handled,
        stats.failed
    );
    Ok(())
}

fn text_generator(config: &LLMConfig) -> Option<Arc<dyn TextGenerator>> {
    let provider = config.provider;
    let api_key = config.api_key(provider)?;
    tracing::info!("Using {} {} for help replies", provider.name(), config.model(provider));

    let llm = Arc::new(OpenAiCompatibleProvider::new(provider, api_key, config.model(provider)));
    Some(Arc::new(
        LlmTextGenerator::new(llm)
            .with_system_prompt(config.system_prompt.clone())
            .with_sampling(config.temperature, config.max_tokens),
    ))
}

fn init_config() {
    match serde_yaml::to_string(&Config::default()) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => eprintln!("Failed to render default config: {}", e),
    }
}
