//! End-to-end tests: real WebSocket clients against a running server.

use std::time::Duration;

use cardclash::ServerBuilder;
use cardclash_catalog::Card;
use cardclash_lobby::LobbyConfig;
use cardclash_protocol::{ClientIntent, LobbyCode, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn start() -> String {
    let server = ServerBuilder::new()
        .bind("127.0.0.1:0")
        .lobby_config(LobbyConfig {
            round_delay: Duration::from_millis(50),
            ..LobbyConfig::default()
        })
        .build()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn ws(addr: &str) -> Ws {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    ws
}

async fn send(ws: &mut Ws, intent: &ClientIntent) {
    let text = serde_json::to_string(intent).unwrap();
    ws.send(Message::Text(text.into())).await.unwrap();
}

async fn recv(ws: &mut Ws) -> ServerEvent {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timeout")
            .expect("stream ended")
            .expect("ws error");
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(&text).unwrap();
            }
            _ => continue,
        }
    }
}

async fn recv_until<F>(ws: &mut Ws, mut matches: F) -> ServerEvent
where
    F: FnMut(&ServerEvent) -> bool,
{
    loop {
        let event = recv(ws).await;
        if matches(&event) {
            return event;
        }
    }
}

async fn create_lobby(ws: &mut Ws, name: &str) -> LobbyCode {
    send(
        ws,
        &ClientIntent::CreateLobby {
            name: name.to_string(),
        },
    )
    .await;
    match recv_until(ws, |e| {
        matches!(e, ServerEvent::LobbyCreated { .. })
    })
    .await
    {
        ServerEvent::LobbyCreated { code } => code,
        _ => unreachable!(),
    }
}

/// Setup: ada hosts, bob joins, join traffic drained on both sides.
async fn setup_pair(addr: &str) -> (Ws, Ws) {
    let mut p1 = ws(addr).await;
    let mut p2 = ws(addr).await;
    let code = create_lobby(&mut p1, "ada").await;
    send(
        &mut p2,
        &ClientIntent::JoinLobby {
            name: "bob".to_string(),
            code,
        },
    )
    .await;
    recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::LobbyJoined { .. })
    })
    .await;
    recv_until(&mut p1, |e| {
        matches!(e, ServerEvent::PlayerJoined { .. })
    })
    .await;
    (p1, p2)
}

/// Starts the match and returns both private hands.
async fn start_match(p1: &mut Ws, p2: &mut Ws) -> (Vec<Card>, Vec<Card>) {
    send(p1, &ClientIntent::StartMatch).await;
    let mut hands = Vec::new();
    for ws in [p1, p2] {
        match recv_until(ws, |e| {
            matches!(e, ServerEvent::YourHand { .. })
        })
        .await
        {
            ServerEvent::YourHand { hand, .. } => hands.push(hand),
            _ => unreachable!(),
        }
    }
    let second = hands.pop().unwrap();
    (hands.pop().unwrap(), second)
}

fn first_main(hand: &[Card]) -> &Card {
    hand.iter().find(|c| !c.is_support()).expect("no main in hand")
}

// =========================================================================
// Lobby flow
// =========================================================================

#[tokio::test]
async fn test_create_lobby_returns_four_digit_code() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    let code = create_lobby(&mut p1, "ada").await;
    assert_eq!(code.as_str().len(), 4);
    assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_join_unknown_code_gets_error() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    send(
        &mut p1,
        &ClientIntent::JoinLobby {
            name: "zoe".to_string(),
            code: LobbyCode("0000".into()),
        },
    )
    .await;
    let event =
        recv_until(&mut p1, |e| matches!(e, ServerEvent::Error { .. }))
            .await;
    assert!(matches!(
        event,
        ServerEvent::Error { message } if message.contains("not found")
    ));
}

#[tokio::test]
async fn test_third_player_is_rejected_with_lobby_full() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    let mut p2 = ws(&addr).await;
    let mut p3 = ws(&addr).await;

    let code = create_lobby(&mut p1, "ada").await;
    send(
        &mut p2,
        &ClientIntent::JoinLobby {
            name: "bob".to_string(),
            code: code.clone(),
        },
    )
    .await;
    recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::LobbyJoined { .. })
    })
    .await;

    send(
        &mut p3,
        &ClientIntent::JoinLobby {
            name: "eve".to_string(),
            code,
        },
    )
    .await;
    let event =
        recv_until(&mut p3, |e| matches!(e, ServerEvent::Error { .. }))
            .await;
    assert!(matches!(
        event,
        ServerEvent::Error { message } if message.contains("full")
    ));
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    let mut p2 = ws(&addr).await;

    let code = create_lobby(&mut p1, "ada").await;
    send(
        &mut p2,
        &ClientIntent::JoinLobby {
            name: "ada".to_string(),
            code,
        },
    )
    .await;
    let event =
        recv_until(&mut p2, |e| matches!(e, ServerEvent::Error { .. }))
            .await;
    assert!(matches!(
        event,
        ServerEvent::Error { message } if message.contains("taken")
    ));
}

#[tokio::test]
async fn test_malformed_frame_gets_error_event() {
    let addr = start().await;
    let mut p1 = ws(&addr).await;
    p1.send(Message::Text("this is not an intent".into()))
        .await
        .unwrap();
    let event =
        recv_until(&mut p1, |e| matches!(e, ServerEvent::Error { .. }))
            .await;
    assert!(matches!(
        event,
        ServerEvent::Error { message } if message.contains("invalid")
    ));
}

#[tokio::test]
async fn test_disconnect_notifies_remaining_player() {
    let addr = start().await;
    let (p1, mut p2) = setup_pair(&addr).await;

    drop(p1);

    let event = recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::PlayerLeft { .. })
    })
    .await;
    assert!(matches!(
        event,
        ServerEvent::PlayerLeft { name } if name == "ada"
    ));
}

// =========================================================================
// Match flow
// =========================================================================

#[tokio::test]
async fn test_match_start_redacts_opponent_hand() {
    let addr = start().await;
    let (mut p1, mut p2) = setup_pair(&addr).await;

    send(&mut p1, &ClientIntent::StartMatch).await;
    let event = recv_until(&mut p2, |e| {
        matches!(e, ServerEvent::MatchStarted { .. })
    })
    .await;
    match event {
        ServerEvent::MatchStarted { state } => {
            for player in &state.players {
                if player.name == "bob" {
                    assert!(!player.hand.is_empty());
                } else {
                    assert!(
                        player.hand.is_empty(),
                        "opponent hand leaked to bob"
                    );
                }
            }
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_full_round_over_the_wire() {
    let addr = start().await;
    let (mut p1, mut p2) = setup_pair(&addr).await;
    let (hand1, hand2) = start_match(&mut p1, &mut p2).await;

    for (ws, hand) in [(&mut p1, &hand1), (&mut p2, &hand2)] {
        send(
            ws,
            &ClientIntent::SelectCard {
                card_id: first_main(hand).id(),
                is_support: false,
            },
        )
        .await;
        recv_until(ws, |e| {
            matches!(e, ServerEvent::SelectionAck { .. })
        })
        .await;
        send(ws, &ClientIntent::Ready).await;
    }

    for ws in [&mut p1, &mut p2] {
        let event = recv_until(ws, |e| {
            matches!(e, ServerEvent::RoundResult { .. })
        })
        .await;
        match event {
            ServerEvent::RoundResult { result } => {
                assert!((0..=100).contains(&result.player1.hp));
                assert!((0..=100).contains(&result.player2.hp));
                assert!(result.player1.damage_dealt > 0);
            }
            _ => unreachable!(),
        }
    }

    // Either the match ended on round 1 or the scheduler advances and
    // deals fresh hands.
    let event = recv_until(&mut p1, |e| {
        matches!(
            e,
            ServerEvent::NextRound { .. } | ServerEvent::MatchEnded { .. }
        )
    })
    .await;
    if let ServerEvent::NextRound { round, .. } = event {
        assert_eq!(round, 2);
        recv_until(&mut p1, |e| {
            matches!(e, ServerEvent::YourHand { round: 2, .. })
        })
        .await;
    }
}

#[tokio::test]
async fn test_ready_without_selection_resolves_nothing() {
    let addr = start().await;
    let (mut p1, mut p2) = setup_pair(&addr).await;
    start_match(&mut p1, &mut p2).await;

    send(&mut p1, &ClientIntent::Ready).await;
    send(&mut p2, &ClientIntent::Ready).await;

    // Neither player selected a main, so nothing may resolve. Probe with
    // a gamble: its ack must be the next match event, not a result.
    send(&mut p1, &ClientIntent::Gamble).await;
    let event = recv_until(&mut p1, |e| {
        matches!(
            e,
            ServerEvent::GambleResult { .. }
                | ServerEvent::RoundResult { .. }
        )
    })
    .await;
    assert!(matches!(event, ServerEvent::GambleResult { .. }));
}
