// src/checker/test_server.rs
// =============================================================================
// Throwaway HTTP/1.1 servers on 127.0.0.1 for the checker tests.
//
// Each server runs as a background tokio task for the rest of the test and
// answers every request the same way. All of them return their base URL
// (e.g. "http://127.0.0.1:12345/").
// =============================================================================

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// How the server ends the exchange after writing its response
#[derive(Clone, Copy)]
enum Ending {
    Close,
    HoldOpen,
}

async fn serve(response: String, ending: Ending) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let response = response.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response.as_bytes()).await;
                match ending {
                    Ending::Close => {
                        let _ = stream.shutdown().await;
                    }
                    Ending::HoldOpen => {
                        // Keep the socket until the client gives up
                        let _ = stream.read(&mut buf).await;
                    }
                }
            });
        }
    });

    format!("http://127.0.0.1:{port}/")
}

/// Answers every request with `status` and an empty body.
pub async fn respond_with(status: u16) -> String {
    respond_with_body(status, "").await
}

/// Answers every request with `status` and `body`.
pub async fn respond_with_body(status: u16, body: &str) -> String {
    let response = format!(
        "HTTP/1.1 {status} Test\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    serve(response, Ending::Close).await
}

/// Promises a 100-byte body, sends 5 bytes of it and closes the connection.
pub async fn truncated_body(status: u16) -> String {
    let response =
        format!("HTTP/1.1 {status} Test\r\nContent-Length: 100\r\nConnection: close\r\n\r\nhello");
    serve(response, Ending::Close).await
}

/// Sends the status line and headers, then never sends the promised body.
pub async fn stalled_body(status: u16) -> String {
    let response = format!("HTTP/1.1 {status} Test\r\nContent-Length: 100\r\n\r\n");
    serve(response, Ending::HoldOpen).await
}

/// Accepts connections and never answers.
pub async fn never_respond() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            // Hold the socket so the client waits instead of seeing a reset
            open.push(stream);
        }
    });

    format!("http://127.0.0.1:{port}/")
}

/// A URL on a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}
