//! Integration tests for the WebSocket transport.

use cardclash_transport::{Connection, Listener, WebSocketListener};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

async fn bound_listener() -> (WebSocketListener, String) {
    let listener = WebSocketListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

#[tokio::test]
async fn test_accept_assigns_unique_ids() {
    let (mut listener, addr) = bound_listener().await;

    let url = format!("ws://{addr}");
    let client1 = tokio::spawn({
        let url = url.clone();
        async move { tokio_tungstenite::connect_async(url).await.unwrap() }
    });
    let conn1 = listener.accept().await.unwrap();
    let client2 = tokio::spawn(async move {
        tokio_tungstenite::connect_async(url).await.unwrap()
    });
    let conn2 = listener.accept().await.unwrap();

    assert_ne!(conn1.id(), conn2.id());
    let _ = client1.await.unwrap();
    let _ = client2.await.unwrap();
}

#[tokio::test]
async fn test_text_round_trip() {
    let (mut listener, addr) = bound_listener().await;

    let client = tokio::spawn(async move {
        let (mut ws, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .unwrap();
        ws.send(Message::Text("hello server".into())).await.unwrap();
        let reply = ws.next().await.unwrap().unwrap();
        assert_eq!(reply.into_text().unwrap().as_str(), "hello client");
        ws.close(None).await.unwrap();
    });

    let conn = listener.accept().await.unwrap();
    let received = conn.recv_text().await.unwrap();
    assert_eq!(received.as_deref(), Some("hello server"));

    conn.send_text("hello client").await.unwrap();

    // The client closes; recv reports a clean end of stream.
    let end = conn.recv_text().await.unwrap();
    assert_eq!(end, None);

    client.await.unwrap();
}

#[tokio::test]
async fn test_binary_json_frames_are_tolerated() {
    let (mut listener, addr) = bound_listener().await;

    let client = tokio::spawn(async move {
        let (mut ws, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .unwrap();
        ws.send(Message::Binary(b"{\"type\":\"Ready\"}".to_vec().into()))
            .await
            .unwrap();
        ws.close(None).await.unwrap();
    });

    let conn = listener.accept().await.unwrap();
    let received = conn.recv_text().await.unwrap();
    assert_eq!(received.as_deref(), Some("{\"type\":\"Ready\"}"));

    client.await.unwrap();
}
