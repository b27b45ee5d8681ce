use anyhow::Context as _;
use dotenvy::dotenv;
use poise::serenity_prelude as serenity;
use serenity::{
    async_trait,
    model::{
        gateway::GatewayIntents,
        gateway::Ready,
        id::{ChannelId, GuildId},
        voice::VoiceState,
    },
    prelude::*,
    Client,
};
use std::{path::Path, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod db;
mod voice;

use command::{amikool, ping, seen, vctime, vctop};
use config::Config;
use db::DbPool;
use voice::VoiceTracker;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub struct Data {
    pub db: DbPool,
    pub tracker: Arc<VoiceTracker>,
    pub config: Config,
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => panic!("Failed to start bot: {:?}", error),
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e)
            }
        }
    }
}

struct Handler {
    tracker: Arc<VoiceTracker>,
    guild_id: GuildId,
    admin_channel_id: ChannelId,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: serenity::Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);
        info!("Bot ID: {}", ready.user.id);
        info!("Connected to {} guilds", ready.guilds.len());

        if let Err(e) = self
            .admin_channel_id
            .say(&ctx.http, "Bot is now online and available!")
            .await
        {
            warn!("Failed to post online notice to admin channel: {e}");
        }
    }

    async fn voice_state_update(
        &self,
        _ctx: serenity::Context,
        _old: Option<VoiceState>,
        new: VoiceState,
    ) {
        if new.guild_id != Some(self.guild_id) {
            return;
        }

        self.tracker
            .handle_transition(
                new.user_id.get(),
                new.channel_id.map(|c| c.get()),
                chrono::Utc::now(),
            )
            .await;
    }
}

fn init_logging(log_file: &str) -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("error opening log file {log_file}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vctally=info,serenity=warn,poise=warn")),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(Path::new(&config_path))
        .with_context(|| format!("Failed to load {config_path}"))?;

    init_logging(config.log_file()).context("Failed to set up logging")?;
    info!("Configuration loaded from {}", config_path);

    let db_pool = db::init_db(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database initialized successfully");

    let tracker = Arc::new(VoiceTracker::new(
        db_pool.clone(),
        config.excluded_channels.iter().copied(),
    ));

    let guild_id = GuildId::new(config.guild_id);
    let admin_channel_id = ChannelId::new(config.admin_channel_id);

    let options = poise::FrameworkOptions {
        commands: vec![ping(), amikool(), seen(), vctime(), vctop()],
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    };

    let framework = poise::Framework::builder()
        .setup({
            let db = db_pool.clone();
            let tracker = Arc::clone(&tracker);
            let config = config.clone();
            move |ctx, _ready, framework| {
                Box::pin(async move {
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                        .await?;
                    info!("Registered commands for guild {}", guild_id);

                    Ok(Data {
                        db,
                        tracker,
                        config,
                    })
                })
            }
        })
        .options(options)
        .build();

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = Client::builder(&config.discord_token, intents)
        .framework(framework)
        .event_handler(Handler {
            tracker: Arc::clone(&tracker),
            guild_id,
            admin_channel_id,
        })
        .await
        .context("Failed to build Discord client")?;

    let shard_manager = client.shard_manager.clone();
    let http = client.http.clone();
    {
        let tracker = Arc::clone(&tracker);
        tokio::spawn(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");

            let open_sessions = tracker.registry().len();
            if open_sessions > 0 {
                info!("Discarding {} unresolved voice sessions", open_sessions);
            }

            if let Err(e) = admin_channel_id.say(&http, "Bot is shutting down.").await {
                warn!("Failed to post shutdown notice to admin channel: {e}");
            }

            shard_manager.shutdown_all().await;
        });
    }

    client.start().await.context("Gateway connection failed")?;
    Ok(())
}
