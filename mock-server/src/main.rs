use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_server=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let characters = match std::env::var("MOCK_FIXTURE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let characters: Vec<mock_server::MockCharacter> =
                serde_json::from_str(&raw).map_err(std::io::Error::other)?;
            tracing::info!(%path, count = characters.len(), "loaded fixture");
            characters
        }
        Err(_) => mock_server::sample_characters(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    mock_server::run_with(listener, characters).await
}
