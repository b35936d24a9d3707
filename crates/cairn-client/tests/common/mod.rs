use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Serve an in-process mock of the Cairn REST API on an ephemeral port.
pub async fn spawn_api(app: Router) -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("addr");
    let server = axum::serve(listener, app.into_make_service());
    let handle = tokio::spawn(async move {
        let _ = server.await;
    });
    (format!("http://{addr}"), handle)
}
