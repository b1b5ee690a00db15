use axum::Router;
use tokio::net::TcpListener;

pub const MARKETS_PATH: &str = "/api/v3/coins/markets";

/// Serves `router` on an ephemeral local port and returns the markets URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}{}", addr, MARKETS_PATH)
}

/// A markets URL on a port nothing is listening on.
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, MARKETS_PATH)
}
