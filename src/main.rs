//! Demo binary: a hello-world server on localhost:8080.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinyserve::{mime, Server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinyserve=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut server = Server::builder()
        .localhost(8080)
        .get_route_text("/", "Hello World!")
        .get_route_bytes(
            "/index.html",
            &b"<h1>Hello World!</h1>"[..],
            mime::TEXT_HTML,
        )
        .get_route("/greet", |mut exchange| async move {
            let body = format!("Hello, {}!", exchange.path().trim_start_matches('/'));
            exchange.set_status(200);
            exchange.set_content_type(mime::TEXT_PLAIN);
            exchange.set_content_length(body.len());
            exchange.write_body(body.as_bytes()).await;
            exchange.close();
        })
        .logger(|line| tracing::warn!("{line}"))
        .build()?;

    server.start().await?;
    tracing::info!("Serving on http://localhost:8080/ (Ctrl+C to stop)");

    tokio::signal::ctrl_c().await?;
    server.stop();

    tracing::info!("Shutdown complete");
    Ok(())
}
