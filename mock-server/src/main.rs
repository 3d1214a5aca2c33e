use mock_strapi::{Behavior, EnvelopeStyle};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mock_strapi=info")))
        .with_target(false)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "1337".to_string());
    let style = match std::env::var("STRAPI_ENVELOPE").as_deref() {
        Ok("v4") => EnvelopeStyle::Wrapped,
        _ => EnvelopeStyle::Bare,
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, ?style, "listening");
    mock_strapi::run(listener, mock_strapi::sample_content(), Behavior::Serve(style)).await
}
