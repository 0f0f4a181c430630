use clap::{Parser, Subcommand};
use std::sync::Arc;

use status_board_bot::application::errors::{BotError, ConfigError};
use status_board_bot::application::messaging::{CommandDispatcher, MessageParser};
use status_board_bot::application::services::{BoardSync, CommandGateway, ListStore};
use status_board_bot::domain::entities::{ChannelId, CommandRegistry, User};
use status_board_bot::domain::traits::{AuthorizationPolicy, BoardChannel, SinglePrincipal, Store};
use status_board_bot::infrastructure::adapters::{ConsoleAdapter, DiscordAdapter, InteractionServer, InteractionVerifier};
use status_board_bot::infrastructure::config::Config;
use status_board_bot::infrastructure::storage::FileStore;

#[derive(Parser)]
#[command(name = "status-board-bot")]
#[command(about = "Keeps an Ally/Enemies status board up to date", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long, global = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run {
        /// Use the console adapter even when a token is configured
        #[arg(long)]
        console: bool,

        /// User id to act as in console mode (defaults to the allowed user)
        #[arg(long)]
        as_user: Option<String>,
    },
    /// Register the slash commands with Discord and exit
    RegisterCommands,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { console, as_user } => {
            load_config(&cli.config, cli.token).and_then(|config| run_bot(config, console, as_user))
        }
        Commands::RegisterCommands => load_config(&cli.config, cli.token).and_then(register_commands),
        Commands::Version => {
            println!("status-board-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// File first (if present), then environment, then the CLI token
fn load_config(path: &str, token_override: Option<String>) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(path).exists() {
        tracing::info!("Loading config from {}", path);
        Config::load(path)?
    } else {
        Config::default()
    };
    config.apply_env(|key| std::env::var(key).ok())?;

    if let Some(token) = token_override {
        config.discord.token = Some(token);
    }
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime, BotError> {
    tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))
}

fn build_gateway(
    channel: Arc<dyn BoardChannel>,
    store: Arc<dyn Store>,
    policy: Arc<dyn AuthorizationPolicy>,
    channel_id: ChannelId,
) -> Arc<CommandGateway> {
    let lists = ListStore::new(store.clone());
    let sync = BoardSync::new(channel, store, channel_id);
    Arc::new(CommandGateway::new(lists, sync, policy))
}

fn run_bot(config: Config, console: bool, as_user: Option<String>) -> Result<(), BotError> {
    config.validate()?;
    tracing::info!("Starting {}", config.bot.name);

    runtime()?.block_on(start_bot(&config, console, as_user))
}

async fn start_bot(config: &Config, console: bool, as_user: Option<String>) -> Result<(), BotError> {
    let policy = Arc::new(SinglePrincipal::new(config.access.allowed_user_id.clone()));
    tracing::info!("Board owner: {}", policy.user_id());

    match config.discord.token.clone().filter(|t| !t.is_empty()) {
        Some(token) if !console => {
            let store = open_store(config.store_dir(false)).await?;
            run_discord(config, token, store, policy).await
        }
        _ => {
            let store = open_store(config.store_dir(true)).await?;
            run_console(config, store, policy, as_user).await
        }
    }
}

async fn open_store(dir: std::path::PathBuf) -> Result<Arc<FileStore>, BotError> {
    let store = Arc::new(FileStore::new(dir));
    store.init().await?;
    tracing::info!("Data directory: {}", store.base_path().display());
    Ok(store)
}

async fn run_discord(
    config: &Config,
    token: String,
    store: Arc<FileStore>,
    policy: Arc<SinglePrincipal>,
) -> Result<(), BotError> {
    config.validate_discord()?;
    let application_id = config.discord.application_id.clone().unwrap_or_default();
    let verifier = InteractionVerifier::from_hex(config.discord.public_key.as_deref().unwrap_or_default())?;
    let addr = config.listen_addr()?;

    let mut discord = DiscordAdapter::new(token, application_id);
    discord.fetch_bot_info().await?;
    tracing::info!("Bot started: @{}", discord.bot_info().username);
    let discord = Arc::new(discord);

    let gateway = build_gateway(discord.clone(), store, policy, config.discord.channel_id);
    gateway.start().await?;

    let dispatcher = CommandDispatcher::new(gateway);
    if let Err(e) = discord.register_commands(dispatcher.registry()).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    Arc::new(InteractionServer::new(verifier, dispatcher)).serve(addr).await
}

async fn run_console(
    config: &Config,
    store: Arc<FileStore>,
    policy: Arc<SinglePrincipal>,
    as_user: Option<String>,
) -> Result<(), BotError> {
    let console = Arc::new(ConsoleAdapter::new());
    let caller = User::new(as_user.unwrap_or_else(|| config.access.allowed_user_id.clone()));

    let gateway = build_gateway(console.clone(), store, policy, config.discord.channel_id);
    gateway.start().await?;

    let dispatcher = CommandDispatcher::new(gateway);
    let parser = MessageParser::new(config.bot.prefix.clone());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    console.run(stdin, &parser, &dispatcher, &caller).await
}

fn register_commands(config: Config) -> Result<(), BotError> {
    let token = config
        .discord
        .token
        .clone()
        .ok_or_else(|| ConfigError::MissingField("discord.token".to_string()))?;
    let application_id = config
        .discord
        .application_id
        .clone()
        .ok_or_else(|| ConfigError::MissingField("discord.application-id".to_string()))?;

    let count = runtime()?.block_on(async {
        DiscordAdapter::new(token, application_id)
            .register_commands(&CommandRegistry::status_board())
            .await
    })?;
    println!("Registered {} slash command(s)", count);
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
