#![allow(dead_code)]

mod db_core;
mod email;
mod error;
mod model;
mod prompt;
mod request_tracing;
mod routes;
mod server_config;
mod signals;
mod state;
mod testing;

use std::{
    env,
    future::Future,
    net::SocketAddr,
    pin::Pin,
    sync::Arc,
    time::Duration,
};

use axum::{extract::FromRef, Router};
use email::MaildirStore;
use mimalloc::MiMalloc;
use routes::AppRouter;
use sea_orm::{prelude::Uuid, ConnectOptions, Database, DatabaseConnection};
use state::dedup_store::DedupStore;
use state::pipeline::AnalysisPipeline;
use tokio::{signal, sync::Mutex, task::JoinHandle};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::server_config::cfg;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub type HttpClient = reqwest::Client;
type CycleGuard = Arc<Mutex<()>>;

#[derive(Clone, FromRef)]
pub struct ServerState {
    http_client: HttpClient,
    conn: DatabaseConnection,
    dedup_store: DedupStore,
    mail_store: MaildirStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
    let mut db_options = ConnectOptions::new(db_url);
    db_options.sqlx_logging(false);

    let conn = Database::connect(db_options)
        .await
        .expect("Database connection failed");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::Layer::default().with_ansi(false))
        .init();

    db_core::migrate::run(&conn).await?;

    let http_client = reqwest::ClientBuilder::new().use_rustls_tls().build()?;
    let dedup_store = DedupStore::new(cfg.settings.dedup_ttl_secs);
    let mail_store = MaildirStore::new(&cfg.settings.vmail_path);

    let state = ServerState {
        http_client,
        conn,
        dedup_store,
        mail_store,
    };

    let router = AppRouter::create(state.clone());
    let pipeline = AnalysisPipeline::new(
        state.conn.clone(),
        state.http_client.clone(),
        state.dedup_store.clone(),
        state.mail_store.clone(),
    );
    let cycle_guard: CycleGuard = Arc::new(Mutex::new(()));

    let mut scheduler = JobScheduler::new()
        .await
        .expect("Failed to create scheduler");

    let server_only = env::var("SERVER_ONLY").is_ok_and(|v| v == "true");
    if !server_only {
        let state_clone = state.clone();
        let pipeline_clone = pipeline.clone();
        let guard = cycle_guard.clone();
        scheduler
            .add(Job::new_one_shot_async(
                Duration::from_secs(5),
                move |uuid, l| {
                    run_batch_cycle_job(
                        uuid,
                        l,
                        state_clone.clone(),
                        pipeline_clone.clone(),
                        guard.clone(),
                    )
                },
            )?)
            .await?;

        let state_clone = state.clone();
        let pipeline_clone = pipeline.clone();
        let guard = cycle_guard.clone();
        scheduler
            .add(Job::new_repeated_async(
                Duration::from_secs(cfg.settings.processing_interval_secs),
                move |uuid, l| {
                    run_batch_cycle_job(
                        uuid,
                        l,
                        state_clone.clone(),
                        pipeline_clone.clone(),
                        guard.clone(),
                    )
                },
            )?)
            .await?;

        // Sweep expired dedup markers so the map stays bounded
        let dedup_store = state.dedup_store.clone();
        scheduler
            .add(Job::new_repeated(
                Duration::from_secs(5 * 60),
                move |_uuid, _lock| {
                    dedup_store.clean_store();
                },
            )?)
            .await?;
    }

    scheduler.set_shutdown_handler(Box::new(move || {
        Box::pin(async move {
            tracing::info!("Shutting down scheduler");
        })
    }));

    match scheduler.start().await {
        Ok(_) => {
            tracing::info!("Scheduler started");
        }
        Err(e) => {
            tracing::error!("Failed to start scheduler: {:?}", e);
        }
    }

    run_server(router, scheduler).await?;

    Ok(())
}

async fn shutdown_signal(mut scheduler: JobScheduler) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            scheduler.shutdown().await.ok();
            tracing::info!("Cleanups done, shutting down");
        },
        _ = terminate => {
            scheduler.shutdown().await.ok();
            tracing::info!("Cleanups done, shutting down");
        },
    }
}

fn run_server(router: Router, scheduler: JobScheduler) -> JoinHandle<()> {
    tokio::spawn(async {
        let port = env::var("PORT").unwrap_or("8080".to_string());
        tracing::info!("Mailsense server running on http://0.0.0.0:{}", port);
        println!("{}", *cfg);

        let addr = SocketAddr::from(([0, 0, 0, 0], port.parse::<u16>().unwrap()));
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(shutdown_signal(scheduler))
            .await
            .unwrap();
    })
}

fn run_batch_cycle_job(
    uuid: Uuid,
    mut l: JobScheduler,
    state: ServerState,
    pipeline: AnalysisPipeline,
    cycle_guard: CycleGuard,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> {
    Box::pin(async move {
        state::tasks::run_batch_cycle(state, pipeline, cycle_guard).await;

        let next_tick = l.next_tick_for_job(uuid).await;
        if let Ok(Some(ts)) = next_tick {
            tracing::debug!("Next batch cycle at {:?}", ts);
        }
    })
}
