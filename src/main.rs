//! GuessWho Back binary entrypoint wiring the HTTP surface to blob storage.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guesswho_back::{
    config::AppConfig,
    dao::{
        session_store::{
            SessionStore,
            blob::{BlobConfig, BlobSessionStore},
        },
        storage::StorageError,
    },
    game::{
        AppState, SharedState,
        roster::{Category, Roster},
    },
    routes,
    services::{session_service, storage_supervisor},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();

    let blob_config = BlobConfig::from_env().context("reading blob storage configuration")?;
    let store = BlobSessionStore::connect(blob_config.clone())
        .await
        .context("connecting to blob storage")?;
    let store: Arc<dyn SessionStore> = Arc::new(store);

    let roster = load_roster(store.as_ref()).await?;
    info!(persons = roster.len(), "roster loaded");

    let app_state = AppState::new(config, roster);
    app_state.install_session_store(store.clone()).await;

    // A corrupt or unreachable session table at boot is fatal; serving with an
    // empty table would overwrite every player's history on the next flush.
    session_service::load_sessions(&app_state)
        .await
        .context("loading session table")?;

    tokio::spawn(storage_supervisor::run(
        app_state.clone(),
        supervisor_connect(store, blob_config),
    ));

    let app = build_router(app_state.clone());

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    // Persist whatever answered picks have not reached the flush interval yet.
    if let Err(err) = session_service::flush_sessions(&app_state).await {
        warn!(error = %err, "final session flush failed");
    }

    Ok(())
}

/// List both photo folders and assemble the immutable roster.
async fn load_roster(store: &dyn SessionStore) -> anyhow::Result<Roster> {
    let male = store
        .list_folder(Category::Male.folder())
        .await
        .context("listing male photo folder")?;
    let female = store
        .list_folder(Category::Female.folder())
        .await
        .context("listing female photo folder")?;

    let roster = Roster::new(male, female);
    anyhow::ensure!(!roster.is_empty(), "photo folders contain no persons");
    Ok(roster)
}

/// Connect closure handed to the storage supervisor.
///
/// The first call returns the store that startup already validated; later
/// calls rebuild the connection from the same configuration.
fn supervisor_connect(
    store: Arc<dyn SessionStore>,
    config: BlobConfig,
) -> impl FnMut() -> futures::future::BoxFuture<'static, Result<Arc<dyn SessionStore>, StorageError>>
+ Send
+ 'static {
    let mut initial = Some(store);
    move || {
        let initial = initial.take();
        let config = config.clone();
        Box::pin(async move {
            match initial {
                Some(store) => Ok(store),
                None => BlobSessionStore::connect(config)
                    .await
                    .map(|store| Arc::new(store) as Arc<dyn SessionStore>)
                    .map_err(StorageError::from),
            }
        })
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
