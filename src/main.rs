use notes_api::config::Args;
use notes_api::store::Store;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    dotenv::dotenv().ok();

    let config_name = std::env::var("NOTES_CONFIG").unwrap_or_else(|_| "setup".to_string());
    let config = Args::load(&config_name)?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "handle_errors={},notes_api={},warp={}",
            config.log_level, config.log_level, config.log_level
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let db_path = config.resolve_database_path()?;
    let store = Store::new(&db_path).await?;
    let cors = notes_api::cors(&config)?;
    let routes = notes_api::api(store, cors);

    info!(
        "notes api listening on port {} (database {})",
        config.port,
        db_path.display()
    );
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;

    Ok(())
}
