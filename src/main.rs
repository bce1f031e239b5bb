use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_catalog::infrastructure::AppState;
use recipe_catalog::{classification, config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    // Check for --profile CLI argument
    let args: Vec<String> = std::env::args().collect();
    let config = match args.iter().position(|arg| arg == "--profile") {
        Some(pos) => match args.get(pos + 1) {
            Some(profile) => config::Config::for_profile(profile.clone()),
            None => {
                tracing::warn!("--profile given without a value, using environment");
                config::Config::from_env()
            }
        },
        None => config::Config::from_env(),
    };

    tracing::info!(
        "Profile '{}', database {}, sequence numbers from level {}",
        config.profile,
        config.database_url,
        config.sequence_min_level
    );

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    classification::init();
    let state = AppState::with_settings(db, config.classification_settings());

    // Check for seed flag
    if config.seed_demo {
        tracing::info!("Seeding demo classification scheme...");
        match seed::seed_demo_data(&state).await {
            Ok(summary) => tracing::info!(
                "Demo data seeded: {} categories imported, {} errors",
                summary.imported_count,
                summary.error_count
            ),
            Err(e) => tracing::error!("Failed to seed data: {}", e),
        }
    }

    let app = server::build_router(state, &config.cors_allowed_origins);

    if let Err(e) = server::serve(app, config.port).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
