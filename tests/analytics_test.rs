mod common;

use rocket::http::Status;
use serde_json::{json, Value};

use common::{bearer, body, login, spawn_app};

fn titles(statistics: &Value) -> Vec<&str> {
    statistics
        .as_array()
        .unwrap()
        .iter()
        .map(|metric| metric["title"].as_str().unwrap())
        .collect()
}

#[rocket::async_test]
async fn analytics_needs_an_admin() {
    let app = spawn_app().await;
    for path in ["/api/analytics/dashboard", "/api/analytics/export"] {
        let response = app.client.get(path).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized, "{path}");
    }
}

#[rocket::async_test]
async fn dashboard_on_an_empty_portfolio() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let response = app
        .client
        .get("/api/analytics/dashboard")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let dashboard = body(response).await;

    let statistics = &dashboard["statistics"];
    assert_eq!(dashboard["total_stats"], statistics.as_array().unwrap().len());
    let titles = titles(statistics);
    assert!(titles.contains(&"Total projects"));
    assert!(!titles.contains(&"Completion rate"));
    assert!(!titles.contains(&"Average rating"));
    assert!(dashboard["last_updated"].is_string());
    assert!(dashboard["recommendations"].as_array().unwrap().len() <= 8);

    let projects = statistics
        .as_array()
        .unwrap()
        .iter()
        .find(|metric| metric["title"] == "Total projects")
        .unwrap();
    assert_eq!(projects["value"], "0");
    assert!(projects.get("magnitude").is_none());
}

#[rocket::async_test]
async fn dashboard_reflects_stored_content() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    for (title, status) in [("Lab", "Terminé"), ("Scanner", "En cours")] {
        app.client
            .post("/api/admin/projects")
            .header(bearer(&token))
            .json(&json!({
                "title": title,
                "category": "Security",
                "level": "Intermediate",
                "description": "Side project",
                "status": status,
                "duration": "1 month",
            }))
            .dispatch()
            .await;
    }
    app.client
        .post("/api/admin/testimonials")
        .header(bearer(&token))
        .json(&json!({
            "name": "Casey",
            "role": "CTO",
            "company": "Acme",
            "content": "Thorough work.",
            "rating": 4,
        }))
        .dispatch()
        .await;

    let dashboard = body(
        app.client
            .get("/api/analytics/dashboard")
            .header(bearer(&token))
            .dispatch()
            .await,
    )
    .await;
    let statistics = dashboard["statistics"].as_array().unwrap();
    let value_of = |title: &str| {
        statistics
            .iter()
            .find(|metric| metric["title"] == title)
            .map(|metric| metric["value"].clone())
    };

    assert_eq!(value_of("Total projects"), Some(json!("2")));
    assert_eq!(value_of("Completion rate"), Some(json!("50")));
    assert_eq!(value_of("Testimonials"), Some(json!("1")));
    assert_eq!(value_of("Average rating"), Some(json!("4.0")));
}

#[rocket::async_test]
async fn export_summarises_the_dashboard() {
    let app = spawn_app().await;
    let token = login(&app.client).await;

    let response = app
        .client
        .get("/api/analytics/export")
        .header(bearer(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let report = body(response).await;

    let statistics = report["statistics"].as_array().unwrap();
    let recommendations = report["recommendations"].as_array().unwrap();
    let high = recommendations
        .iter()
        .filter(|r| r["priority"] == "high")
        .count();

    assert!(report["generated_at"].is_string());
    assert_eq!(report["summary"]["total_statistics"], statistics.len());
    assert_eq!(report["summary"]["total_recommendations"], recommendations.len());
    assert_eq!(report["summary"]["high_priority_actions"], high);
    assert_eq!(report["insights"]["growth_opportunities"].as_array().unwrap().len(), 4);
    assert!(report["insights"]["strengths"].is_array());
    assert!(report["insights"]["areas_for_improvement"].is_array());
}
