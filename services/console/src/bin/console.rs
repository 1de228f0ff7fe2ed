//! services/console/src/bin/console.rs
//!
//! Non-interactive console entry point: logs in with configured credentials,
//! loads the dashboard and fee screens, prints a snapshot of the school's
//! totals, and logs out.

use chrono::Utc;
use console_lib::{
    config::Config,
    error::ConsoleError,
    screens::{DashboardScreen, FeesScreen},
    AppState, HttpGateway,
};
use school_console_core::session::SessionContext;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            config.log_level.to_string(),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. API at {}", config.api_base_url);

    // --- 2. Build Session Context, Gateway & Shared State ---
    let session = Arc::new(SessionContext::new());
    let gateway = Arc::new(HttpGateway::new(
        config.api_base_url.clone(),
        config.request_timeout,
        session.clone(),
    )?);
    let state = AppState {
        config: config.clone(),
        session,
        gateway: gateway.clone(),
        auth: gateway,
    };

    // --- 3. Log In ---
    let username = state
        .config
        .username
        .clone()
        .ok_or_else(|| ConsoleError::MissingCredentials("CONSOLE_USERNAME".to_string()))?;
    let password = state
        .config
        .password
        .clone()
        .ok_or_else(|| ConsoleError::MissingCredentials("CONSOLE_PASSWORD".to_string()))?;
    state.auth.login(&username, &password).await?;
    info!("Logged in as {username}");

    // --- 4. Load Screens & Print the Snapshot ---
    let now = Utc::now();
    let mut dashboard = DashboardScreen::new();
    dashboard.mount(state.gateway.as_ref(), now).await;
    if let Some(notice) = dashboard.notifier.current(now) {
        warn!("{}", notice.message);
    }

    let mut fees = FeesScreen::new();
    fees.mount(state.gateway.as_ref(), now).await;
    if let Some(notice) = fees.manager.notifier.current(now) {
        warn!("{}", notice.message);
    }

    let summary = dashboard.summary();
    let stats = fees.stats();
    println!("Students enrolled:    {}", summary.total_students);
    println!("Total collected:      ₹{}", stats.total_collected);
    println!("Collected this month: ₹{}", fees.collected_this_month(now));
    println!("Pending fees:         ₹{}", stats.pending_fees);
    println!("Paid students:        {}", stats.paid_students);
    println!("Defaulters:           {}", stats.defaulters);
    println!("Dues on dashboard:    ₹{}", summary.total_dues);

    // --- 5. Log Out ---
    if let Err(err) = state.auth.logout().await {
        warn!(%err, "logout call failed; local session cleared anyway");
    }
    Ok(())
}
