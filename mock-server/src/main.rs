use mock_server::Fault;
use tokio::net::TcpListener;

/// `PORT` picks the port (default 3000). `FAULT=reset` serves connections
/// that are dropped without a response instead of the echo app.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;

    match std::env::var("FAULT").as_deref() {
        Ok("reset") => {
            println!("resetting every connection on {addr}");
            mock_server::run_fault(listener, Fault::ResetConnection).await
        }
        _ => {
            println!("echo server listening on {addr}");
            mock_server::run(listener).await
        }
    }
}
