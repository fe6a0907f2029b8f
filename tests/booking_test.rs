mod common;

use rocket::http::Status;
use serde_json::{json, Value};

use common::{bearer, body, login, spawn_app};

fn booking(date: &str, time: &str) -> Value {
    json!({
        "booking_data": {
            "service_id": "audit",
            "service_name": "Security audit",
            "date": date,
            "time": time,
            "duration": "1h",
        },
        "contact_info": {
            "name": "Jordan",
            "email": "jordan@example.dev",
            "phone": null,
            "company": "Acme",
            "message": "Looking for a pentest",
        },
    })
}

fn slots(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|slot| slot.as_str().unwrap())
        .collect()
}

#[rocket::async_test]
async fn empty_day_offers_every_slot() {
    let app = spawn_app().await;
    let response = app.client.get("/api/bookings/availability/2026-11-02").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let availability = body(response).await;
    assert_eq!(availability["date"], "2026-11-02");
    assert_eq!(slots(&availability["available_slots"]).len(), 13);
    assert!(slots(&availability["booked_slots"]).is_empty());
}

#[rocket::async_test]
async fn cancelled_bookings_free_their_slot() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let response = app
        .client
        .post("/api/bookings")
        .json(&booking("2026-11-02", "10:00"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let kept = body(response).await;
    assert_eq!(kept["status"], "confirmed");

    let response = app
        .client
        .post("/api/bookings")
        .json(&booking("2026-11-02", "14:00"))
        .dispatch()
        .await;
    let cancelled = body(response).await;
    let cancelled_id = cancelled["id"].as_str().unwrap();

    // Bookings on other dates do not count.
    app.client
        .post("/api/bookings")
        .json(&booking("2026-11-03", "09:00"))
        .dispatch()
        .await;

    let response = app
        .client
        .put(format!("/api/admin/bookings/{cancelled_id}/status"))
        .header(bearer(&token))
        .json(&json!({ "status": "cancelled" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(body(response).await["status"], "cancelled");

    let availability = body(app.client.get("/api/bookings/availability/2026-11-02").dispatch().await).await;
    assert_eq!(slots(&availability["booked_slots"]), vec!["10:00"]);

    let available = slots(&availability["available_slots"]);
    assert_eq!(available.len(), 12);
    assert!(!available.contains(&"10:00"));
    assert!(available.contains(&"14:00"));
    assert!(available.contains(&"09:00"));
}

#[rocket::async_test]
async fn completed_bookings_still_hold_their_slot() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let created = body(
        app.client
            .post("/api/bookings")
            .json(&booking("2026-12-01", "16:30"))
            .dispatch()
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    app.client
        .put(format!("/api/admin/bookings/{id}/status"))
        .header(bearer(&token))
        .json(&json!({ "status": "completed" }))
        .dispatch()
        .await;

    let availability = body(app.client.get("/api/bookings/availability/2026-12-01").dispatch().await).await;
    assert_eq!(slots(&availability["booked_slots"]), vec!["16:30"]);
}

#[rocket::async_test]
async fn booking_without_a_content_type_is_accepted() {
    let app = spawn_app().await;
    let response = app
        .client
        .post("/api/bookings")
        .body(booking("2026-11-04", "13:00").to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    assert_eq!(body(response).await["booking_data"]["time"], "13:00");
}

#[rocket::async_test]
async fn unknown_status_is_rejected() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let created = body(
        app.client
            .post("/api/bookings")
            .json(&booking("2026-12-01", "09:30"))
            .dispatch()
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .client
        .put(format!("/api/admin/bookings/{id}/status"))
        .header(bearer(&token))
        .json(&json!({ "status": "postponed" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn booking_needs_a_valid_contact_email() {
    let app = spawn_app().await;
    let mut request = booking("2026-11-02", "11:00");
    request["contact_info"]["email"] = json!("not-an-email");

    let response = app.client.post("/api/bookings").json(&request).dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(body(response).await["detail"], "email is not a valid email address");
}

#[rocket::async_test]
async fn booking_and_quote_records_are_admin_only() {
    let app = spawn_app().await;

    let created = body(
        app.client
            .post("/api/bookings")
            .json(&booking("2026-11-05", "15:00"))
            .dispatch()
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = app.client.get("/api/admin/bookings").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
    let response = app.client.get(format!("/api/admin/bookings/{id}")).dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    let token = login(&app.client).await;
    let listed = body(
        app.client
            .get("/api/admin/bookings")
            .header(bearer(&token))
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["contact_info"]["company"], "Acme");

    let response = app.client.get("/api/admin/quotes").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);
}

fn quote(min_price: f64, max_price: f64) -> Value {
    json!({
        "quote_data": {
            "project_type": "web-app",
            "complexity": "medium",
            "timeline": "standard",
            "features": ["auth", "dashboard"],
            "maintenance": true,
            "base_price": 3000.0,
            "features_price": 1200.0,
            "extras_price": 300.0,
            "total_price": 4500.0,
            "min_price": min_price,
            "max_price": max_price,
        },
        "contact_info": {
            "name": "Morgan",
            "email": "morgan@example.dev",
            "company": null,
            "phone": null,
            "message": null,
        },
    })
}

#[rocket::async_test]
async fn quotes_start_as_drafts_and_can_be_revised() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let response = app.client.post("/api/quotes").json(&quote(4000.0, 5000.0)).dispatch().await;
    assert_eq!(response.status(), Status::Created);
    let created = body(response).await;
    assert_eq!(created["status"], "draft");
    assert_eq!(created["quote_data"]["training"], false);
    let id = created["id"].as_str().unwrap();

    let mut revision = quote(4200.0, 4800.0);
    revision["status"] = json!("sent");
    let response = app
        .client
        .put(format!("/api/admin/quotes/{id}"))
        .header(bearer(&token))
        .json(&revision)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let revised = body(response).await;
    assert_eq!(revised["status"], "sent");
    assert_eq!(revised["quote_data"]["min_price"], 4200.0);
}

#[rocket::async_test]
async fn inverted_price_range_is_rejected() {
    let app = spawn_app().await;
    let response = app.client.post("/api/quotes").json(&quote(6000.0, 5000.0)).dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);
}
