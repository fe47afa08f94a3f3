/// Integration tests for the Servitrack API
///
/// These tests drive the full router end-to-end against an in-memory store:
/// - Login and token handling, including the bootstrap admin path
/// - Ticket CRUD with ownership scoping
/// - Catalog (provider/location) CRUD and referenced-delete conflicts
/// - Admin-only user management
mod common;

use axum::http::StatusCode;
use common::{seed_catalog, ticket_payload, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.request("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_login_with_stored_credentials() {
    let ctx = TestContext::new().await.unwrap();
    ctx.create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({"email": "Tech@Example.com", "password": "hunter2hunter2"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "tech@example.com");
    assert_eq!(body["user"]["is_admin"], false);
    assert!(
        body["user"].get("password_hash").is_none(),
        "hash must never be serialized"
    );
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_uniformly() {
    let ctx = TestContext::new().await.unwrap();
    ctx.create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();

    let (status, wrong_password) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({"email": "tech@example.com", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Same message either way, so the endpoint does not leak which emails
    // are registered.
    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn test_bootstrap_admin_login() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({"email": "admin", "password": "mastuerzo"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["is_admin"], true);
    assert_eq!(body["user"]["email"], "admin");
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.request("GET", "/v1/tickets", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .request("GET", "/v1/tickets", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_reflects_stored_identity() {
    let ctx = TestContext::new().await.unwrap();
    let (user, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();

    let (status, body) = ctx.request("GET", "/v1/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id);
    assert_eq!(body["email"], "tech@example.com");
    assert_eq!(body["is_admin"], false);
}

#[tokio::test]
async fn test_ticket_create_and_fetch() {
    let ctx = TestContext::new().await.unwrap();
    let (user, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();
    let (provider_id, location_id) = seed_catalog(&ctx, &token).await.unwrap();

    let (status, created) = ctx
        .request(
            "POST",
            "/v1/tickets",
            Some(&token),
            Some(ticket_payload(provider_id, location_id)),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Ownership is stamped from the token's actor, not the payload.
    assert_eq!(created["user_id"], user.id);
    assert_eq!(created["user_email"], "tech@example.com");
    assert_eq!(created["case_number"], "CASE-1234");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = ctx
        .request("GET", &format!("/v1/tickets/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_ticket_create_rejects_unknown_references() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();
    let (provider_id, location_id) = seed_catalog(&ctx, &token).await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/tickets",
            Some(&token),
            Some(ticket_payload(provider_id + 999, location_id)),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "provider_id");

    let (status, body) = ctx
        .request(
            "POST",
            "/v1/tickets",
            Some(&token),
            Some(ticket_payload(provider_id, location_id + 999)),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "location_id");
}

#[tokio::test]
async fn test_ticket_visibility_scoping() {
    let ctx = TestContext::new().await.unwrap();
    let (_, alice_token) = ctx
        .create_user("alice@example.com", "password-alice", false)
        .await
        .unwrap();
    let (_, bob_token) = ctx
        .create_user("bob@example.com", "password-bob!!", false)
        .await
        .unwrap();
    let admin_token = ctx.admin_token().await.unwrap();
    let (provider_id, location_id) = seed_catalog(&ctx, &alice_token).await.unwrap();

    for token in [&alice_token, &alice_token, &bob_token] {
        let (status, _) = ctx
            .request(
                "POST",
                "/v1/tickets",
                Some(token),
                Some(ticket_payload(provider_id, location_id)),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, alice_list) = ctx
        .request("GET", "/v1/tickets", Some(&alice_token), None)
        .await;
    assert_eq!(alice_list.as_array().unwrap().len(), 2);
    for ticket in alice_list.as_array().unwrap() {
        assert_eq!(ticket["user_email"], "alice@example.com");
    }

    let (_, bob_list) = ctx
        .request("GET", "/v1/tickets", Some(&bob_token), None)
        .await;
    assert_eq!(bob_list.as_array().unwrap().len(), 1);

    // Admin sees everything, newest first.
    let (_, admin_list) = ctx
        .request("GET", "/v1/tickets", Some(&admin_token), None)
        .await;
    let all = admin_list.as_array().unwrap();
    assert_eq!(all.len(), 3);
    let ids: Vec<i64> = all.iter().map(|t| t["id"].as_i64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn test_non_owner_cannot_touch_ticket() {
    let ctx = TestContext::new().await.unwrap();
    let (_, alice_token) = ctx
        .create_user("alice@example.com", "password-alice", false)
        .await
        .unwrap();
    let (_, bob_token) = ctx
        .create_user("bob@example.com", "password-bob!!", false)
        .await
        .unwrap();
    let (provider_id, location_id) = seed_catalog(&ctx, &alice_token).await.unwrap();

    let (_, created) = ctx
        .request(
            "POST",
            "/v1/tickets",
            Some(&alice_token),
            Some(ticket_payload(provider_id, location_id)),
        )
        .await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/v1/tickets/{}", id);

    let (status, _) = ctx.request("GET", &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .request("PUT", &uri, Some(&bob_token), Some(json!({"client": "X"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.request("DELETE", &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin can act on anyone's ticket.
    let admin_token = ctx.admin_token().await.unwrap();
    let (status, updated) = ctx
        .request(
            "PUT",
            &uri,
            Some(&admin_token),
            Some(json!({"client": "Initech"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["client"], "Initech");
    // Ownership survives an admin edit.
    assert_eq!(updated["user_email"], "alice@example.com");
}

#[tokio::test]
async fn test_ticket_partial_update() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();
    let (provider_id, location_id) = seed_catalog(&ctx, &token).await.unwrap();

    let (_, created) = ctx
        .request(
            "POST",
            "/v1/tickets",
            Some(&token),
            Some(ticket_payload(provider_id, location_id)),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/v1/tickets/{}", id),
            Some(&token),
            Some(json!({"case_number": "CASE-9999"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["case_number"], "CASE-9999");
    // Untouched fields keep their values.
    assert_eq!(updated["client"], created["client"]);
    assert_eq!(updated["created_at"], created["created_at"]);
}

#[tokio::test]
async fn test_provider_delete_conflicts_while_referenced() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();
    let (provider_id, location_id) = seed_catalog(&ctx, &token).await.unwrap();

    let (_, ticket) = ctx
        .request(
            "POST",
            "/v1/tickets",
            Some(&token),
            Some(ticket_payload(provider_id, location_id)),
        )
        .await;

    let uri = format!("/v1/providers/{}", provider_id);
    let (status, _) = ctx.request("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let ticket_id = ticket["id"].as_i64().unwrap();
    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/v1/tickets/{}", ticket_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.request("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, _) = ctx.request("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_catalog_names_conflict() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();
    seed_catalog(&ctx, &token).await.unwrap();

    let (status, _) = ctx
        .request(
            "POST",
            "/v1/providers",
            Some(&token),
            Some(json!({"name": "Acme Networks"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let ctx = TestContext::new().await.unwrap();
    let (user, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();

    let (status, _) = ctx.request("GET", "/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A non-admin cannot grant themselves the role either.
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/v1/users/{}", user.id),
            Some(&token),
            Some(json!({"is_admin": true})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = ctx.admin_token().await.unwrap();
    let (status, users) = ctx
        .request("GET", "/v1/users", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2); // bootstrap admin + tech
}

#[tokio::test]
async fn test_admin_creates_and_updates_users() {
    let ctx = TestContext::new().await.unwrap();
    let admin_token = ctx.admin_token().await.unwrap();

    let (status, created) = ctx
        .request(
            "POST",
            "/v1/users",
            Some(&admin_token),
            Some(json!({
                "email": "New.Tech@Example.com",
                "name": "New Tech",
                "password": "long-enough-pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["email"], "new.tech@example.com");
    assert_eq!(created["is_admin"], false);
    assert!(created.get("password_hash").is_none());

    // Duplicate email, case-insensitively.
    let (status, _) = ctx
        .request(
            "POST",
            "/v1/users",
            Some(&admin_token),
            Some(json!({
                "email": "NEW.TECH@example.com",
                "name": "Imposter",
                "password": "long-enough-pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Malformed email and short password are field-level failures.
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/users",
            Some(&admin_token),
            Some(json!({
                "email": "not-an-email",
                "name": "Broken",
                "password": "short"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"].as_array().unwrap().len(), 2);

    // The new user can log in, and a password change takes effect.
    let id = created["id"].as_i64().unwrap();
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/v1/users/{}", id),
            Some(&admin_token),
            Some(json!({"password": "rotated-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .request(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({"email": "new.tech@example.com", "password": "rotated-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deleted_user_token_is_invalidated() {
    let ctx = TestContext::new().await.unwrap();
    let (user, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();
    let admin_token = ctx.admin_token().await.unwrap();

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/v1/users/{}", user.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The token is still cryptographically valid but names a missing row.
    let (status, _) = ctx.request("GET", "/v1/tickets", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deleting_user_keeps_their_tickets() {
    let ctx = TestContext::new().await.unwrap();
    let (user, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();
    let admin_token = ctx.admin_token().await.unwrap();
    let (provider_id, location_id) = seed_catalog(&ctx, &token).await.unwrap();

    let (_, created) = ctx
        .request(
            "POST",
            "/v1/tickets",
            Some(&token),
            Some(ticket_payload(provider_id, location_id)),
        )
        .await;
    let ticket_id = created["id"].as_i64().unwrap();

    let (status, _) = ctx
        .request(
            "DELETE",
            &format!("/v1/users/{}", user.id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The ticket survives with its creator snapshot intact.
    let (status, ticket) = ctx
        .request(
            "GET",
            &format!("/v1/tickets/{}", ticket_id),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["user_email"], "tech@example.com");
}

#[tokio::test]
async fn test_validation_rejects_empty_fields() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx
        .create_user("tech@example.com", "hunter2hunter2", false)
        .await
        .unwrap();
    let (provider_id, location_id) = seed_catalog(&ctx, &token).await.unwrap();

    let mut payload = ticket_payload(provider_id, location_id);
    payload["client"] = json!("");

    let (status, body) = ctx
        .request("POST", "/v1/tickets", Some(&token), Some(payload))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "client");
}
