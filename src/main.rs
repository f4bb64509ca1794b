use scoutsync::{config::Config, router, startup};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let state = startup::build_app_state(&config)
        .await
        .expect("Failed to initialize application state");

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!("ScoutSync listening on {}", config.listen_addr);

    let app = router::routes().with_state(state);

    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
