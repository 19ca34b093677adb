use tokio::net::TcpListener;
use ozetdunyasi::{
    api::routes::create_router,
    config::Config,
    error::Result,
    observability,
    summarizer::{self, SummarizerHandle},
    AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "server stopped");
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load configuration
    let config = Config::load()?;
    observability::init_logging(config.log_format, "info");

    // A model that cannot be loaded is fatal; nothing is served without it.
    let model = summarizer::load(&config.summarizer).await?;
    let handle = SummarizerHandle::from_config(model, &config.summarizer);

    let app_state = AppState::new(&config, handle)?;
    let app = create_router(app_state);

    let listener = TcpListener::bind(config.server_addr).await?;
    tracing::info!(addr = %config.server_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
