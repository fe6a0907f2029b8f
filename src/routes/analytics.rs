use chrono::Utc;
use rocket::serde::json::Json;
use rocket::{Route, State};
use serde::Serialize;

use crate::models::timestamp;
use crate::services::analytics::{insights, Analytics, Insights, Metric, Priority, Recommendation};
use crate::services::auth_guard::AdminGuard;

#[derive(Serialize, Debug)]
pub struct Dashboard {
    pub statistics: Vec<Metric>,
    pub recommendations: Vec<Recommendation>,
    pub last_updated: String,
    pub total_stats: usize,
}

#[derive(Serialize, Debug)]
pub struct ReportSummary {
    pub total_statistics: usize,
    pub total_recommendations: usize,
    pub high_priority_actions: usize,
}

#[derive(Serialize, Debug)]
pub struct Report {
    pub generated_at: String,
    pub summary: ReportSummary,
    pub statistics: Vec<Metric>,
    pub recommendations: Vec<Recommendation>,
    pub insights: Insights,
}

async fn compute(analytics: &Analytics) -> Dashboard {
    let snapshot = analytics.snapshot().await;
    let statistics = snapshot.metrics();
    Dashboard {
        total_stats: statistics.len(),
        recommendations: snapshot.recommendations(),
        statistics,
        last_updated: timestamp::format(&Utc::now()),
    }
}

#[get("/dashboard")]
pub async fn dashboard(_admin: AdminGuard, analytics: &State<Analytics>) -> Json<Dashboard> {
    Json(compute(analytics).await)
}

#[get("/export")]
pub async fn export(_admin: AdminGuard, analytics: &State<Analytics>) -> Json<Report> {
    let dashboard = compute(analytics).await;
    let high_priority_actions = dashboard
        .recommendations
        .iter()
        .filter(|r| r.priority == Priority::High)
        .count();

    Json(Report {
        generated_at: timestamp::format(&Utc::now()),
        summary: ReportSummary {
            total_statistics: dashboard.statistics.len(),
            total_recommendations: dashboard.recommendations.len(),
            high_priority_actions,
        },
        insights: insights(&dashboard.statistics),
        statistics: dashboard.statistics,
        recommendations: dashboard.recommendations,
    })
}

pub fn routes() -> Vec<Route> {
    routes![dashboard, export]
}
