use axum::Router;
use snaplink_api_server::config::AppConfig;
use snaplink_api_server::routes::AppState;

/// Serve `router` on an ephemeral port and return its `/api/v1` base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

pub async fn spawn_server(config: AppConfig) -> String {
    spawn(snaplink_api_server::app(AppState::new(config))).await
}
