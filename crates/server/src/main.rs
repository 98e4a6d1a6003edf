use anyhow::Error as AnyhowError;
use db::models::order::{CreateOrder, OrderError};
use db::types::{AgendaItem, Template, WeddingDetails};
use server::{http, state::AppState};
use services::services::config::Config;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, prelude::*};
use utils::assets::asset_dir;

#[derive(Debug, Error)]
pub enum EverafterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] AnyhowError),
}

#[tokio::main]
async fn main() -> Result<(), EverafterError> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},services={level},db={level},utils={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string).expect("Failed to create tracing filter");
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    // Create asset directory if it doesn't exist
    if !asset_dir().exists() {
        std::fs::create_dir_all(asset_dir())?;
    }

    let config = Config::from_env();
    let state = AppState::new(&config).await?;

    if cfg!(debug_assertions) {
        if let Err(err) = seed_demo_order(&state).await {
            tracing::warn!("Failed to seed demo order: {err}");
        }
    }

    let app_router = http::router(state);

    let port = std::env::var("BACKEND_PORT")
        .or_else(|_| std::env::var("PORT"))
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or_else(|| {
            tracing::info!("No PORT environment variable set, using port 0 for auto-assignment");
            0
        });

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    let actual_port = listener.local_addr()?.port();

    tracing::info!("Server running on http://{host}:{actual_port}");

    axum::serve(listener, app_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Local runs get a ready-made order so the wizard is reachable immediately.
async fn seed_demo_order(state: &AppState) -> Result<(), OrderError> {
    if state.store().get_by_access_code("DEMO123").await?.is_some() {
        return Ok(());
    }

    let details = WeddingDetails {
        couple_names: Some("Emma & Lucas".to_string()),
        wedding_date: Some("2027-06-22".to_string()),
        wedding_time: Some("16:00".to_string()),
        venue: Some("Opera Castle".to_string()),
        venue_address: Some("123 Elegance Lane, Paris".to_string()),
        google_maps_url: Some("https://maps.google.com".to_string()),
        love_story: Some("From a shared glance to a lifetime of love.".to_string()),
        agenda: Some(vec![
            AgendaItem {
                time: "4:00 PM".to_string(),
                event: "Wedding Ceremony".to_string(),
            },
            AgendaItem {
                time: "5:30 PM".to_string(),
                event: "Cocktail Hour".to_string(),
            },
            AgendaItem {
                time: "7:00 PM".to_string(),
                event: "Dinner & Reception".to_string(),
            },
        ]),
        ..Default::default()
    };

    state
        .store()
        .create(CreateOrder {
            etsy_order_id: "DEMO-001".to_string(),
            access_code: "DEMO123".to_string(),
            status: None,
            template: Some(Template::SageGreen),
            wedding_details: Some(details),
        })
        .await?;

    tracing::info!("Seeded demo order with access code DEMO123");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sig) => Some(sig),
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                None
            }
        };

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(err) = result {
                    tracing::error!("Failed to install Ctrl+C handler: {err}");
                }
            }
            _ = async {
                if let Some(sigterm) = sigterm.as_mut() {
                    sigterm.recv().await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {}
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
        }
    }

    tracing::info!("Shutdown signal received, stopping server");
}
