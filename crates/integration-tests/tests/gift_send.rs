//! Proxy passthrough and gift-send orchestration through the real router.

use axum::http::StatusCode;
use serde_json::json;

use avkn_gifts_integration_tests::{
    StubResponse, TestContext, spawn_stub_upstream, unreachable_upstream,
};

const RATE_LIMIT_SENDER: &str = "GiftResponseError_RateLimitSender";

fn active_balance() -> StubResponse {
    StubResponse::new(200, json!({"key": "ABC123", "saldo": 52_000, "ativa": true}))
}

fn unused_gift() -> StubResponse {
    StubResponse::new(500, json!({}))
}

/// Walk a session to the point where sending is permitted, with one cheap
/// item in the cart.
async fn arm_session(ctx: &mut TestContext) {
    let (status, body) = ctx.post("/api/session/key", json!({"key": "ABC123"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);

    let (status, body) = ctx
        .put("/api/session/friend-code", json!({"friend_code": "g14d1t"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["friend_code"], "G14-D1T");

    let (status, _) = ctx
        .post("/api/cart/items", json!({"item_id": "top_hair_0412"}))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn balance_proxy_relays_status_and_body() {
    let base = spawn_stub_upstream(active_balance(), unused_gift()).await;
    let mut ctx = TestContext::new(&base);

    let (status, body) = ctx.get("/api/balance/ABC123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"key": "ABC123", "saldo": 52_000, "ativa": true}));
}

#[tokio::test]
async fn balance_proxy_relays_upstream_errors_unchanged() {
    let base = spawn_stub_upstream(
        StubResponse::new(401, json!({"detail": "Chave invalida ou inativa"})),
        unused_gift(),
    )
    .await;
    let mut ctx = TestContext::new(&base);

    let (status, body) = ctx.get("/api/balance/WRONG").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Chave invalida ou inativa");
}

#[tokio::test]
async fn balance_proxy_synthesizes_500_on_transport_failure() {
    let base = unreachable_upstream().await;
    let mut ctx = TestContext::new(&base);

    let (status, body) = ctx.get("/api/balance/ABC123").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Erro ao consultar saldo");
}

#[tokio::test]
async fn gift_proxy_relays_verbatim() {
    let upstream_response = json!({
        "sucesso": true,
        "mensagem": "1 de 1 presentes enviados com sucesso",
        "detalhes": {"preco_total": 4_500},
    });
    let base =
        spawn_stub_upstream(unused_gift(), StubResponse::new(200, upstream_response.clone()))
            .await;
    let mut ctx = TestContext::new(&base);

    let (status, body) = ctx
        .post(
            "/api/gift",
            json!({"friend_code": "G14-D1T", "items": ["top_hair_0412"], "key": "ABC123"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, upstream_response);
}

#[tokio::test]
async fn gift_proxy_synthesizes_500_on_transport_failure() {
    let base = unreachable_upstream().await;
    let mut ctx = TestContext::new(&base);

    let (status, body) = ctx
        .post(
            "/api/gift",
            json!({"friend_code": "G14-D1T", "items": [], "key": "ABC123"}),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Erro ao enviar presentes");
}

#[tokio::test]
async fn inactive_key_sets_invalid_state_without_error() {
    let base = spawn_stub_upstream(
        StubResponse::new(200, json!({"key": "ABC123", "saldo": 0, "ativa": false})),
        unused_gift(),
    )
    .await;
    let mut ctx = TestContext::new(&base);

    let (status, body) = ctx.post("/api/session/key", json!({"key": "ABC123"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["saldo"], serde_json::Value::Null);

    let (_, body) = ctx.get("/api/session").await;
    assert_eq!(body["key_set"], true);
    assert_eq!(body["key_valid"], false);
    assert_eq!(body["saldo"], serde_json::Value::Null);
    assert_eq!(body["can_send"], false);
}

#[tokio::test]
async fn logout_clears_key_state() {
    let base = spawn_stub_upstream(active_balance(), unused_gift()).await;
    let mut ctx = TestContext::new(&base);

    ctx.post("/api/session/key", json!({"key": "ABC123"})).await;
    let (status, _) = ctx.post_empty("/api/session/logout").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = ctx.get("/api/session").await;
    assert_eq!(body["key_set"], false);
    assert_eq!(body["key_valid"], false);
}

#[tokio::test]
async fn send_guards_require_key_friend_code_and_items() {
    let base = spawn_stub_upstream(active_balance(), unused_gift()).await;
    let mut ctx = TestContext::new(&base);

    // No key yet.
    let (status, body) = ctx.post_empty("/api/cart/send").await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert!(body["error"].as_str().unwrap().contains("key"));

    // Valid key, no friend code.
    ctx.post("/api/session/key", json!({"key": "ABC123"})).await;
    let (status, body) = ctx.post_empty("/api/cart/send").await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert!(body["error"].as_str().unwrap().contains("friend code"));

    // Friend code set, cart still empty.
    ctx.put("/api/session/friend-code", json!({"friend_code": "g14d1t"}))
        .await;
    let (status, body) = ctx.post_empty("/api/cart/send").await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert!(body["error"].as_str().unwrap().contains("cart"));
}

#[tokio::test]
async fn malformed_friend_code_is_a_bad_request() {
    let base = spawn_stub_upstream(active_balance(), unused_gift()).await;
    let mut ctx = TestContext::new(&base);

    let (status, _) = ctx
        .put("/api/session/friend-code", json!({"friend_code": "AB-CD"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn successful_send_clears_cart_and_updates_balance() {
    let gift_response = json!({
        "sucesso": true,
        "mensagem": "1 de 1 presentes enviados com sucesso",
        "detalhes": {
            "preco_total": 4_500,
            "sucessos": 1,
            "total_itens": 1,
            "saldo_chave_restante": 47_500,
            "resultados": [{
                "item_id": "top_hair_0412",
                "item_nome": "Cabelo Ondas de Verao",
                "preco": 4_500,
                "status_code": 200,
                "sucesso": true,
            }],
        },
    });
    let base =
        spawn_stub_upstream(active_balance(), StubResponse::new(200, gift_response.clone())).await;
    let mut ctx = TestContext::new(&base);
    arm_session(&mut ctx).await;

    let (status, body) = ctx.post_empty("/api/cart/send").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, gift_response);

    // Cart cleared, balance refreshed, item now blocked as owned.
    let (_, body) = ctx.get("/api/session").await;
    assert_eq!(body["cart"]["count"], 0);
    assert_eq!(body["can_send"], false);
    assert_eq!(body["saldo"], 47_500);
    assert_eq!(body["blocked_items"][0]["item_id"], "top_hair_0412");
    assert_eq!(body["blocked_items"][0]["status"], "owned");

    // Re-adding a delivered item is blocked before any numeric check.
    let (status, body) = ctx
        .post("/api/cart/items", json!({"item_id": "top_hair_0412"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("owned"));
}

#[tokio::test]
async fn already_owned_result_blocks_item_without_clearing_cart() {
    let gift_response = json!({
        "sucesso": false,
        "mensagem": "0 de 1 presentes enviados com sucesso",
        "detalhes": {
            "resultados": [{
                "item_id": "top_hair_0412",
                "item_nome": "Cabelo Ondas de Verao",
                "preco": 4_500,
                "status_code": 409,
                "erro": "item is owned",
                "sucesso": false,
            }],
        },
    });
    let base =
        spawn_stub_upstream(active_balance(), StubResponse::new(200, gift_response)).await;
    let mut ctx = TestContext::new(&base);
    arm_session(&mut ctx).await;

    let (status, _) = ctx.post_empty("/api/cart/send").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx.get("/api/session").await;
    // Terminal outcome cached for pre-blocking; overall failure keeps the cart.
    assert_eq!(body["blocked_items"][0]["item_id"], "top_hair_0412");
    assert_eq!(body["cart"]["count"], 1);
}

#[tokio::test]
async fn rate_limited_response_blocks_nothing() {
    let gift_response = json!({
        "sucesso": false,
        "mensagem": "0 de 1 presentes enviados com sucesso",
        "error": RATE_LIMIT_SENDER,
        "detalhes": {
            "error": RATE_LIMIT_SENDER,
            "resultados": [{
                "item_id": "top_hair_0412",
                "item_nome": "Cabelo Ondas de Verao",
                "preco": 4_500,
                "status_code": 403,
                "erro": "item is owned",
                "sucesso": false,
            }],
        },
    });
    let base =
        spawn_stub_upstream(active_balance(), StubResponse::new(200, gift_response.clone())).await;
    let mut ctx = TestContext::new(&base);
    arm_session(&mut ctx).await;

    let (status, body) = ctx.post_empty("/api/cart/send").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], RATE_LIMIT_SENDER);

    // A rate-limited response must leave no trace: no blocked items, cart
    // intact, and the item stays addable in a fresh state.
    let (_, body) = ctx.get("/api/session").await;
    assert!(body["blocked_items"].as_array().unwrap().is_empty());
    assert_eq!(body["cart"]["count"], 1);
}

#[tokio::test]
async fn second_send_reapplies_the_guards() {
    let gift_response = json!({
        "sucesso": true,
        "mensagem": "1 de 1 presentes enviados com sucesso",
        "detalhes": {"resultados": []},
    });
    let base =
        spawn_stub_upstream(active_balance(), StubResponse::new(200, gift_response)).await;
    let mut ctx = TestContext::new(&base);
    arm_session(&mut ctx).await;

    let (status, _) = ctx.post_empty("/api/cart/send").await;
    assert_eq!(status, StatusCode::OK);

    // The busy flag is released, so the guards answer, not a 409: the cart
    // was cleared by the success, making a second send a precondition error.
    let (status, body) = ctx.post_empty("/api/cart/send").await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert!(body["error"].as_str().unwrap().contains("cart"));
}
