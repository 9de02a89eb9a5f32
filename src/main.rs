use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod calendar;
mod config;
mod error;
mod handlers;
mod models;
mod stats;
mod storage;
mod store;

use config::Config;
use storage::Snapshot;
use store::HabitStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<HabitStore>>,
    pub snapshot: Snapshot,
    pub config: Arc<Config>,
    pub ws_tx: Option<broadcast::Sender<String>>,
}

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .frontend_url
                .parse::<axum::http::HeaderValue>()
                .expect("FRONTEND_URL must be a valid origin"),
        )
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ws", get(handlers::ws::ws_handler))
        // Habits
        .route("/api/habits", get(handlers::habits::list_habits))
        .route("/api/habits", post(handlers::habits::create_habit))
        .route("/api/habits/:id", delete(handlers::habits::delete_habit))
        // Completions
        .route(
            "/api/completions/toggle",
            post(handlers::completions::toggle_completion),
        )
        // View state
        .route("/api/view", get(handlers::view::get_view))
        .route("/api/view/period", put(handlers::view::set_period))
        .route("/api/view/navigate", post(handlers::view::navigate))
        // Selection
        .route("/api/selection/toggle", post(handlers::view::toggle_selection))
        .route("/api/selection/all", post(handlers::view::select_all))
        .route("/api/selection/only", post(handlers::view::select_only))
        // Stats
        .route("/api/stats/chart", get(handlers::stats::get_chart))
        .route("/api/stats/pie", get(handlers::stats::get_pie))
        .route("/api/stats/today", get(handlers::stats::get_today))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "habitloop_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let snapshot = Snapshot::new(config.snapshot_path.clone());
    let habits = snapshot
        .load()
        .await
        .expect("Failed to load habit snapshot");
    tracing::info!(
        count = habits.len(),
        path = %snapshot.path().display(),
        "Loaded habit snapshot"
    );

    let store = HabitStore::from_habits(habits, config.day_convention.today());

    let (ws_tx, _) = broadcast::channel::<String>(256);

    let state = AppState {
        store: Arc::new(RwLock::new(store)),
        snapshot,
        config: config.clone(),
        ws_tx: Some(ws_tx),
    };

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app(state)).await.expect("Server error");
}
