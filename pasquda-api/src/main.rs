mod routes;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let context = pasquda_app::AppContext::from_env()
        .await
        .expect("database initialization failed");

    let addr = std::env::var("PASQUDA_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listen address");
    tracing::info!(%addr, "pasquda-api listening");

    axum::serve(listener, routes::router(context))
        .await
        .expect("server error");
}
