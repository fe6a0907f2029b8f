//! Read-only endpoints feeding the portfolio front end. No authentication.

use mongodb::bson::doc;
use rocket::serde::json::{json, Json, Value};
use rocket::{Route, State};

use crate::errors::{ApiError, ApiResult};
use crate::models::blog::BlogPost;
use crate::models::personal::PersonalInfo;
use crate::models::process_step::ProcessStep;
use crate::models::project::Project;
use crate::models::service::Service;
use crate::models::skill::SkillCategory;
use crate::models::social_link::SocialLink;
use crate::models::statistic::Statistic;
use crate::models::technology::Technology;
use crate::models::testimonial::Testimonial;
use crate::repository::{Record, Repository};
use crate::routes::admin::list_records;

/// `{}` until the personal information has been filled in.
#[get("/personal")]
pub async fn personal(repo: &State<Repository<PersonalInfo>>) -> ApiResult<Json<Value>> {
    let Some(info) = repo.find_one(doc! {}).await? else {
        return Ok(Json(json!({})));
    };
    serde_json::to_value(info)
        .map(Json)
        .map_err(|e| ApiError::Unexpected(format!("failed to encode personal info: {e}")))
}

#[get("/skills")]
pub async fn skills(repo: &State<Repository<SkillCategory>>) -> ApiResult<Json<Vec<SkillCategory>>> {
    list_records(repo).await
}

#[get("/technologies")]
pub async fn technologies(repo: &State<Repository<Technology>>) -> ApiResult<Json<Vec<Technology>>> {
    list_records(repo).await
}

#[get("/projects")]
pub async fn projects(repo: &State<Repository<Project>>) -> ApiResult<Json<Vec<Project>>> {
    list_records(repo).await
}

#[get("/services")]
pub async fn services(repo: &State<Repository<Service>>) -> ApiResult<Json<Vec<Service>>> {
    list_records(repo).await
}

#[get("/testimonials")]
pub async fn testimonials(repo: &State<Repository<Testimonial>>) -> ApiResult<Json<Vec<Testimonial>>> {
    list_records(repo).await
}

#[get("/statistics")]
pub async fn statistics(repo: &State<Repository<Statistic>>) -> ApiResult<Json<Vec<Statistic>>> {
    list_records(repo).await
}

#[get("/social-links")]
pub async fn social_links(repo: &State<Repository<SocialLink>>) -> ApiResult<Json<Vec<SocialLink>>> {
    list_records(repo).await
}

#[get("/process-steps")]
pub async fn process_steps(repo: &State<Repository<ProcessStep>>) -> ApiResult<Json<Vec<ProcessStep>>> {
    list_records(repo).await
}

/// Published posts only, newest first.
#[get("/blog")]
pub async fn blog(repo: &State<Repository<BlogPost>>) -> ApiResult<Json<Vec<BlogPost>>> {
    Ok(Json(repo.list(doc! { "published": true }).await?))
}

#[get("/blog/<slug>")]
pub async fn blog_post(slug: &str, repo: &State<Repository<BlogPost>>) -> ApiResult<Json<BlogPost>> {
    repo.find_one(doc! { "slug": slug, "published": true })
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(BlogPost::LABEL))
}

pub fn routes() -> Vec<Route> {
    routes![
        personal,
        skills,
        technologies,
        projects,
        services,
        testimonials,
        statistics,
        social_links,
        process_steps,
        blog,
        blog_post
    ]
}
