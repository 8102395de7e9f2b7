use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use eventstay_api::{
    app,
    middleware::auth::{issue_token, Claims},
    AppState, AuthConfig,
};
use eventstay_core::{BookingService, BookingUpdateMode, InMemoryStore};
use eventstay_shared::{Room, TicketStatus};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

fn auth_config() -> AuthConfig {
    AuthConfig {
        secret: "test-secret".to_string(),
        expiration: 3600,
    }
}

fn test_app(store: &Arc<InMemoryStore>, mode: BookingUpdateMode) -> Router {
    let bookings = BookingService::new(store.clone(), store.clone(), store.clone())
        .with_update_mode(mode);
    app(AppState {
        bookings,
        sessions: store.clone(),
        auth: auth_config(),
    })
}

/// Signs a token for `user_id` and opens a session for it.
async fn login(store: &InMemoryStore, user_id: i32) -> String {
    let token = issue_token(&auth_config(), user_id).unwrap();
    store.add_session(user_id, &token).await;
    token
}

async fn eligible_user(store: &InMemoryStore, user_id: i32) {
    let enrollment = store.add_enrollment(user_id).await;
    let ticket_type = store.add_ticket_type(false, true).await;
    store
        .add_ticket(enrollment.id, &ticket_type, TicketStatus::Paid)
        .await;
}

async fn room(store: &InMemoryStore) -> Room {
    let hotel = store.add_hotel().await;
    store.add_room(hotel, 3).await
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_routes_reject_missing_token() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);

    for (method, uri) in [
        (Method::GET, "/booking"),
        (Method::POST, "/booking"),
        (Method::PUT, "/booking/1"),
    ] {
        let (status, _) = send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_routes_reject_garbage_token() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);

    let (status, _) = send(&app, Method::GET, "/booking", Some("lorem"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signed_token_without_session_is_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = issue_token(&auth_config(), 1).unwrap();

    let (status, _) = send(&app, Method::GET, "/booking", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn sign(claims: &Claims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(auth_config().secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_token_without_expiry_is_accepted_while_session_exists() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = sign(&Claims {
        user_id: 1,
        exp: None,
    });
    store.add_session(1, &token).await;

    // Past the middleware: the user simply has no booking yet.
    let (status, _) = send(&app, Method::GET, "/booking", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_token_is_rejected_even_with_session() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = sign(&Claims {
        user_id: 1,
        exp: Some(1_000_000),
    });
    store.add_session(1, &token).await;

    let (status, _) = send(&app, Method::GET, "/booking", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

// ============================================================================
// GET /booking
// ============================================================================

#[tokio::test]
async fn test_get_without_booking_is_404() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;

    let (status, _) = send(&app, Method::GET, "/booking", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_returns_booking_with_room() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    let room = room(&store).await;
    let booking = store.add_booking(1, room.id).await;

    let (status, body) = send(&app, Method::GET, "/booking", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": booking.id,
            "Room": {
                "id": room.id,
                "name": room.name,
                "capacity": room.capacity,
                "hotelId": room.hotel_id,
                "createdAt": room.created_at,
                "updatedAt": room.updated_at,
            }
        })
    );
}

// ============================================================================
// POST /booking
// ============================================================================

#[tokio::test]
async fn test_post_books_available_room() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;
    let room = room(&store).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/booking",
        Some(&token),
        Some(json!({ "roomId": room.id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["bookingId"].is_i64());
    assert_eq!(body.as_object().unwrap().len(), 1);

    let (status, summary) = send(&app, Method::GET, "/booking", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["id"], body["bookingId"]);
    assert_eq!(summary["Room"]["id"], room.id);
}

#[tokio::test]
async fn test_post_room_zero_is_403() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/booking",
        Some(&token),
        Some(json!({ "roomId": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_post_without_room_id_is_403() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;

    let (status, _) = send(&app, Method::POST, "/booking", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_post_without_enrollment_is_404() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    let room = room(&store).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/booking",
        Some(&token),
        Some(json!({ "roomId": room.id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_with_remote_ticket_is_403() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    let enrollment = store.add_enrollment(1).await;
    let remote = store.add_ticket_type(true, false).await;
    store
        .add_ticket(enrollment.id, &remote, TicketStatus::Paid)
        .await;
    let room = room(&store).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/booking",
        Some(&token),
        Some(json!({ "roomId": room.id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_post_room_already_booked_is_403() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;
    let room = room(&store).await;
    store.add_booking(2, room.id).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/booking",
        Some(&token),
        Some(json!({ "roomId": room.id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_post_unknown_room_is_404() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/booking",
        Some(&token),
        Some(json!({ "roomId": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// PUT /booking/{bookingId}
// ============================================================================

#[tokio::test]
async fn test_put_into_room_booked_by_another_user_is_403() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;
    let mine = room(&store).await;
    let theirs = room(&store).await;
    let booking = store.add_booking(1, mine.id).await;
    store.add_booking(2, theirs.id).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/booking/{}", booking.id),
        Some(&token),
        Some(json!({ "roomId": theirs.id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_put_room_zero_is_403() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/booking/1",
        Some(&token),
        Some(json!({ "roomId": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_put_not_found_has_no_dedicated_status() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/booking/1",
        Some(&token),
        Some(json!({ "roomId": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
}

#[tokio::test]
async fn test_put_moves_user_to_free_room() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;
    let old_room = room(&store).await;
    let new_room = room(&store).await;
    let booking = store.add_booking(1, old_room.id).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/booking/{}", booking.id),
        Some(&token),
        Some(json!({ "roomId": new_room.id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["bookingId"].is_i64());
    assert_ne!(body["bookingId"], booking.id);
    assert_eq!(store.booking_count().await, 2);
}

#[tokio::test]
async fn test_put_ignores_non_numeric_booking_id_in_insert_mode() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Insert);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;

    for uri in ["/booking/abc", "/booking/99999999999"] {
        let free = room(&store).await;
        let (status, body) = send(
            &app,
            Method::PUT,
            uri,
            Some(&token),
            Some(json!({ "roomId": free.id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body["bookingId"].is_i64());
    }
    assert_eq!(store.booking_count().await, 2);
}

#[tokio::test]
async fn test_put_with_unparsable_booking_id_in_replace_mode_is_500() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Replace);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;
    let old_room = room(&store).await;
    let new_room = room(&store).await;
    store.add_booking(1, old_room.id).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/booking/abc",
        Some(&token),
        Some(json!({ "roomId": new_room.id })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(store.booking_count().await, 1);
}

#[tokio::test]
async fn test_put_in_replace_mode_keeps_booking_id() {
    let store = Arc::new(InMemoryStore::new());
    let app = test_app(&store, BookingUpdateMode::Replace);
    let token = login(&store, 1).await;
    eligible_user(&store, 1).await;
    let old_room = room(&store).await;
    let new_room = room(&store).await;
    let booking = store.add_booking(1, old_room.id).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/booking/{}", booking.id),
        Some(&token),
        Some(json!({ "roomId": new_room.id })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookingId"], booking.id);
    assert_eq!(store.booking_count().await, 1);

    let (_, summary) = send(&app, Method::GET, "/booking", Some(&token), None).await;
    assert_eq!(summary["Room"]["id"], new_room.id);
}
