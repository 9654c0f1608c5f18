//! chat-relay server binary.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use chat_relay::adapters::ai::{OpenAIResponsesConfig, OpenAIResponsesGenerator};
use chat_relay::adapters::http::{relay_router, RelayAppState};
use chat_relay::adapters::memory::{InMemoryMessageStore, InMemoryUserRepository};
use chat_relay::adapters::postgres::{self, PostgresMessageStore, PostgresUserRepository};
use chat_relay::adapters::twilio::{TwilioConfig, TwilioSender};
use chat_relay::application::batching::{BatchCoordinator, CoordinatorConfig, FlushPipeline};
use chat_relay::config::{AppConfig, ConfigError};
use chat_relay::observability::init_tracing;
use chat_relay::ports::{MessageStore, UserRepository};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate().map_err(ConfigError::from)?;

    init_tracing(&config.server);

    let relay = config.twilio.relay_number()?;

    let (store, users): (Arc<dyn MessageStore>, Arc<dyn UserRepository>) =
        match &config.database {
            Some(database) => {
                let pool = postgres::connect(database).await?;
                if database.run_migrations {
                    postgres::run_migrations(&pool).await?;
                    info!("Database migrations applied");
                }
                (
                    Arc::new(PostgresMessageStore::new(pool.clone())),
                    Arc::new(PostgresUserRepository::new(pool)),
                )
            }
            None => {
                warn!("No database configured; messages and users are kept in memory");
                (
                    Arc::new(InMemoryMessageStore::new()),
                    Arc::new(InMemoryUserRepository::new()),
                )
            }
        };

    let openai = &config.openai;
    let generator = Arc::new(OpenAIResponsesGenerator::new(
        OpenAIResponsesConfig::new(openai.api_key.clone())
            .with_base_url(openai.base_url.clone())
            .with_model(openai.model.clone())
            .with_instructions(openai.instructions.clone())
            .with_temperature(openai.temperature)
            .with_max_output_tokens(openai.max_output_tokens)
            .with_timeout(openai.timeout()),
    )?);

    let twilio = &config.twilio;
    let sender = Arc::new(TwilioSender::new(
        TwilioConfig::new(
            twilio.account_sid.clone(),
            twilio.auth_token.clone(),
            relay.clone(),
        )
        .with_base_url(twilio.base_url.clone())
        .with_channel_prefix(twilio.channel_prefix.clone())
        .with_timeout(config.batching.downstream_timeout()),
    )?);

    let pipeline = FlushPipeline::new(generator.clone(), sender, store.clone(), relay.clone())
        .with_timeout(config.batching.downstream_timeout());
    let coordinator = BatchCoordinator::new(
        pipeline,
        CoordinatorConfig::default().with_debounce(config.batching.debounce()),
    );

    let state = RelayAppState {
        users,
        store,
        generator,
        coordinator: coordinator.clone(),
        relay,
    };
    let app = relay_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        debounce_secs = config.batching.debounce_secs,
        environment = ?config.server.environment,
        "chat-relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let summary = coordinator.flush_all().await;
    info!(
        drained = summary.drained,
        succeeded = summary.succeeded,
        in_flight = summary.in_flight,
        "Shutdown complete"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received; draining pending batches");
}
