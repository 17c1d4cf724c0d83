use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use otpgate_auth::config::AuthConfig;
use otpgate_auth::infra::mailer::LogMailer;
use otpgate_auth::infra::sms::LogSmsTransport;
use otpgate_auth::router::build_router;
use otpgate_auth::state::AppState;
use otpgate_core::config::Config;
use otpgate_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = AuthConfig::try_from_env().context("failed to load config from environment")?;
    let cookie_key = config.cookie_key()?;
    let two_factor = config.two_factor()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState {
        db,
        two_factor,
        session_secret: config.session_secret,
        cookie_key,
        cookie_domain: config.cookie_domain,
        sms: LogSmsTransport,
        mailer: LogMailer,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
