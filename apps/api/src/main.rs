use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::handlers::AppointmentState;
use appointment_cell::models::SchedulerSettings;
use appointment_cell::store::{BookingStore, InMemoryBookingStore, RestBookingStore};
use appointment_cell::{AvailabilityEngine, BookingService};
use assistant_cell::{GeminiAssistant, SessionController};
use doctor_cell::DoctorCatalog;
use shared_config::AppConfig;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Telemedicine Scheduler API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Wire up the booking stack
    let store: Arc<dyn BookingStore> = if config.is_store_configured() {
        Arc::new(RestBookingStore::new(&config))
    } else {
        warn!("Booking store not configured, falling back to in-memory bookings");
        Arc::new(InMemoryBookingStore::new())
    };

    let settings = SchedulerSettings::from_config(&config);
    let availability = Arc::new(AvailabilityEngine::new(store.clone(), settings));
    let catalog = Arc::new(DoctorCatalog::new());
    let booking = Arc::new(BookingService::new(
        store,
        availability.clone(),
        catalog.clone(),
    ));

    if !config.is_assistant_configured() {
        warn!("Assistant not configured, chat replies will degrade to an apology");
    }
    let assistant = Arc::new(GeminiAssistant::new(&config));
    let sessions = Arc::new(SessionController::new(booking.clone(), assistant));

    let appointment_state = Arc::new(AppointmentState {
        booking,
        availability,
    });

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(catalog, appointment_state, sessions)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
