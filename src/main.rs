use library_api::{
    adapters::{
        email::{LogNotificationService, SmtpNotificationService},
        memory::InMemoryStore,
        postgres::{PostgresBookStore, PostgresLoanStore},
    },
    api::{handlers::AppState, router::create_router},
    application::ServiceDependencies,
    config::AppConfig,
    ports::{BookStore, LoanStore, NotificationService},
    scheduler::{DailySchedule, OverdueNotifierJob, spawn_overdue_notifier},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    // Initialize stores
    let (book_store, loan_store): (Arc<dyn BookStore>, Arc<dyn LoanStore>) =
        match &config.database.url {
            Some(database_url) => {
                tracing::info!("Using PostgreSQL store");
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .connect(database_url)
                    .await?;
                sqlx::migrate!("./migrations").run(&pool).await?;

                (
                    Arc::new(PostgresBookStore::new(pool.clone())) as Arc<dyn BookStore>,
                    Arc::new(PostgresLoanStore::new(pool)) as Arc<dyn LoanStore>,
                )
            }
            None => {
                tracing::warn!("No database configured; books and loans are kept in memory");
                let store = Arc::new(InMemoryStore::new());
                (
                    store.clone() as Arc<dyn BookStore>,
                    store as Arc<dyn LoanStore>,
                )
            }
        };

    // Initialize notification adapter
    let notification_service: Arc<dyn NotificationService> = if config.mail.enabled {
        Arc::new(SmtpNotificationService::new(config.mail.clone()))
    } else {
        tracing::warn!("Mail delivery disabled; late loan notifications are only logged");
        Arc::new(LogNotificationService::new())
    };

    // Create service dependencies
    let service_deps = ServiceDependencies {
        book_store,
        loan_store,
        notification_service,
    };

    // Schedule the late loan notification
    if config.scheduler.enabled {
        let schedule: DailySchedule = config.scheduler.late_loans_at.parse()?;
        let job = Arc::new(OverdueNotifierJob::new(
            service_deps.clone(),
            config.mail.late_loan_message.clone(),
        ));
        tracing::info!(at = %schedule.at(), "Late loan notification scheduled daily (UTC)");
        spawn_overdue_notifier(job, schedule);
    }

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
