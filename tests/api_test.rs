//! Integration tests for the HTTP API.
//!
//! Each test serves the router in-process on an ephemeral port with the
//! built-in catalog and immediate opponent replies.

mod common;

use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a session on `index` and return (session_id, view).
async fn create_session(client: &reqwest::Client, base: &str, index: usize) -> (u64, Value) {
    let resp = client
        .post(common::url(base, "/api/sessions"))
        .json(&json!({ "puzzle_index": index }))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(resp.status(), 201, "create should return 201");

    let body: Value = resp.json().await.unwrap();
    (body["session_id"].as_u64().unwrap(), body["view"].clone())
}

async fn submit(
    client: &reqwest::Client,
    base: &str,
    id: u64,
    from: &str,
    to: &str,
) -> reqwest::Response {
    client
        .post(common::url(base, &format!("/api/sessions/{id}/move")))
        .json(&json!({ "from": from, "to": to }))
        .send()
        .await
        .expect("Failed to send move request")
}

// ---------------------------------------------------------------------------
// Health & catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health() {
    let base = common::spawn_server(common::test_config()).await;
    let resp = common::client()
        .get(common::url(&base, "/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_puzzles() {
    let base = common::spawn_server(common::test_config()).await;
    let resp = common::client()
        .get(common::url(&base, "/api/puzzles"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    let puzzles = body["puzzles"].as_array().unwrap();
    assert_eq!(body["total"].as_u64().unwrap() as usize, puzzles.len());
    assert_eq!(puzzles[0]["id"], "00008");
    assert!(body["daily_puzzle_id"].is_null());
    assert!(body["refreshed_at"].is_string());
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_solve_puzzle_over_http() {
    let base = common::spawn_server(common::test_config()).await;
    let client = common::client();

    // 0000D: d3d6 (computer) f8d8 (you) d6d8 (computer) f6d8 (you)
    let (id, view) = create_session(&client, &base, 1).await;
    assert_eq!(view["puzzle_id"], "0000D");
    assert_eq!(view["turn_owner"], "visitor");
    assert_eq!(view["history"][0]["text"], "Computer: d3-d6");

    let resp = submit(&client, &base, id, "f8", "d8").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "correct");
    assert_eq!(body["view"]["move_index"], 3);

    let resp = submit(&client, &base, id, "f6", "d8").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "solved");
    assert_eq!(body["view"]["status"], "Puzzle solved! Well done!");
    assert_eq!(body["view"]["phase"], "solved");
    assert_eq!(body["view"]["checkmate"], false);

    // Nothing more to play or hint.
    let resp = submit(&client, &base, id, "d8", "d1").await;
    assert_eq!(resp.status(), 409, "moves after solving should conflict");
    let resp = client
        .post(common::url(&base, &format!("/api/sessions/{id}/hint")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_incorrect_move_keeps_position() {
    let base = common::spawn_server(common::test_config()).await;
    let client = common::client();
    let (id, view) = create_session(&client, &base, 1).await;
    let fen = view["fen"].clone();

    // Legal but not the solution.
    let resp = submit(&client, &base, id, "g8", "h8").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "incorrect");
    assert_eq!(body["correct"], false);
    assert_eq!(body["fen"], fen);
    assert_eq!(body["view"]["status"], "Incorrect move. Try again!");
    assert_eq!(body["view"]["turn_owner"], "visitor");
}

#[tokio::test]
async fn test_promotion_field_on_rook_move_is_ignored() {
    let base = common::spawn_server(common::test_config()).await;
    let client = common::client();
    let (id, _) = create_session(&client, &base, 1).await;

    let resp = client
        .post(common::url(&base, &format!("/api/sessions/{id}/move")))
        .json(&json!({ "from": "f8", "to": "d8", "promotion": "q" }))
        .send()
        .await
        .expect("Failed to send move request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "correct");
    assert_eq!(body["played"], "f8d8");
}

#[tokio::test]
async fn test_illegal_move_is_bad_request() {
    let base = common::spawn_server(common::test_config()).await;
    let client = common::client();
    let (id, _) = create_session(&client, &base, 1).await;

    let resp = submit(&client, &base, id, "f8", "f1").await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("f8f1"));

    let resp = submit(&client, &base, id, "z9", "d8").await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_out_of_turn_move_conflicts() {
    let mut config = common::test_config();
    config.opponent_delay_ms = 60_000;
    let base = common::spawn_server(config).await;
    let client = common::client();

    let (id, view) = create_session(&client, &base, 1).await;
    assert_eq!(view["turn_owner"], "opponent");
    assert_eq!(view["task"], "Computer is thinking...");

    let resp = submit(&client, &base, id, "f8", "d8").await;
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_hint_reset_next_and_legal_moves() {
    let base = common::spawn_server(common::test_config()).await;
    let client = common::client();
    let (id, _) = create_session(&client, &base, 1).await;

    let resp = client
        .post(common::url(&base, &format!("/api/sessions/{id}/hint")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let hint: Value = resp.json().await.unwrap();
    assert_eq!(hint["from"], "f8");
    assert_eq!(hint["to"], "d8");
    assert_eq!(hint["expires_in_ms"], 2000);

    let resp = client
        .get(common::url(&base, &format!("/api/sessions/{id}/legal-moves?square=f8")))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let dests: Vec<&str> = body["destinations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert!(dests.contains(&"d8"));

    submit(&client, &base, id, "f8", "d8").await;
    let resp = client
        .post(common::url(&base, &format!("/api/sessions/{id}/reset")))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["view"]["move_index"], 1);
    assert_eq!(body["view"]["history"].as_array().unwrap().len(), 1);

    let resp = client
        .post(common::url(&base, &format!("/api/sessions/{id}/next")))
        .json(&json!({ "direction": "previous" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["view"]["puzzle_index"], 0);

    let resp = client
        .post(common::url(&base, &format!("/api/sessions/{id}/next")))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["view"]["puzzle_index"], 1);
}

#[tokio::test]
async fn test_unknown_and_deleted_sessions() {
    let base = common::spawn_server(common::test_config()).await;
    let client = common::client();

    let resp = client
        .get(common::url(&base, "/api/sessions/999999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("999999"));

    let (id, _) = create_session(&client, &base, 0).await;
    let resp = client
        .delete(common::url(&base, &format!("/api/sessions/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = submit(&client, &base, id, "e6", "e7").await;
    assert_eq!(resp.status(), 404);
}
