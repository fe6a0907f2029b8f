//! Dashboard figures derived from the stored content and a rule table of
//! recommendations over them.
//!
//! The four metric groups are read concurrently. A group whose queries fail
//! is logged and left out of the snapshot; the rest of the dashboard is still
//! served.

use std::fmt::Display;
use std::sync::Arc;

use chrono::{Duration, Utc};
use mongodb::bson::doc;
use serde::Serialize;

use crate::models::blog::BlogPost;
use crate::models::booking::Booking;
use crate::models::newsletter::NewsletterSubscription;
use crate::models::project::{Project, COMPLETED_STATUS};
use crate::models::quote::Quote;
use crate::models::resource::Resource;
use crate::models::service::Service;
use crate::models::skill::SkillCategory;
use crate::models::technology::Technology;
use crate::models::testimonial::{PendingTestimonial, ReviewStatus, Testimonial};
use crate::models::timestamp;
use crate::repository::{RecordStore, Repository, StoreResult};

const RECOMMENDATION_LIMIT: usize = 8;
const RECENT_DAYS: i64 = 30;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// One computed dashboard figure.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Metric {
    pub title: &'static str,
    pub value: String,
    pub suffix: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub trend: Trend,
    #[serde(skip)]
    magnitude: f64,
}

impl Metric {
    fn new(title: &'static str, value: impl Display, magnitude: f64) -> Self {
        Metric {
            title,
            value: value.to_string(),
            suffix: "",
            description: "",
            icon: "BarChart3",
            color: "#3b82f6",
            trend: Trend::Neutral,
            magnitude,
        }
    }

    fn count(title: &'static str, value: u64) -> Self {
        Metric::new(title, value, value as f64)
    }

    fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }

    fn described(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn icon(mut self, icon: &'static str, color: &'static str) -> Self {
        self.icon = icon;
        self.color = color;
        self
    }

    fn trend(mut self, trend: Trend) -> Self {
        self.trend = trend;
        self
    }
}

fn grows(positive: bool) -> Trend {
    if positive {
        Trend::Positive
    } else {
        Trend::Neutral
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub title: &'static str,
    pub priority: Priority,
    pub description: String,
    pub action: &'static str,
    pub impact: &'static str,
    pub category: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentCounts {
    pub projects: u64,
    pub completed_projects: u64,
    pub published_posts: u64,
    pub technologies: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngagementCounts {
    pub testimonials: u64,
    pub pending_testimonials: u64,
    pub average_rating: Option<f64>,
    pub downloads: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnicalCounts {
    pub skills: u64,
    pub services: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessCounts {
    pub bookings: u64,
    pub quotes: u64,
    pub newsletter_subscribers: u64,
    pub recent_activity: u64,
}

/// Counts per group; `None` marks a group that could not be read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub content: Option<ContentCounts>,
    pub engagement: Option<EngagementCounts>,
    pub technical: Option<TechnicalCounts>,
    pub business: Option<BusinessCounts>,
}

impl ContentCounts {
    fn completion_rate(&self) -> Option<u64> {
        (self.projects > 0).then(|| self.completed_projects * 100 / self.projects)
    }

    fn metrics(&self) -> Vec<Metric> {
        let mut metrics = vec![Metric::count("Total projects", self.projects)
            .described("Projects in the portfolio")
            .icon("FolderOpen", "#10b981")
            .trend(grows(self.projects > 5))];

        if let Some(rate) = self.completion_rate() {
            let healthy = rate >= 80;
            metrics.push(
                Metric::count("Completion rate", rate)
                    .suffix("%")
                    .described("Share of projects marked completed")
                    .icon("CheckCircle", if healthy { "#10b981" } else { "#f59e0b" })
                    .trend(if healthy { Trend::Positive } else { Trend::Negative }),
            );
        }

        metrics.push(
            Metric::count("Published articles", self.published_posts)
                .described("Published technical blog posts")
                .icon("FileText", "#6366f1")
                .trend(grows(self.published_posts > 0)),
        );
        metrics.push(
            Metric::count("Technologies", self.technologies)
                .described("Technologies in use")
                .icon("Code", "#8b5cf6"),
        );
        metrics
    }
}

impl EngagementCounts {
    fn metrics(&self) -> Vec<Metric> {
        let mut metrics = vec![Metric::count("Testimonials", self.testimonials)
            .described("Approved client testimonials")
            .icon("Star", "#f59e0b")
            .trend(grows(self.testimonials > 0))];

        if self.pending_testimonials > 0 {
            metrics.push(
                Metric::count("Pending review", self.pending_testimonials)
                    .described("Testimonials waiting for moderation")
                    .icon("Clock", "#f97316"),
            );
        }

        if let Some(rating) = self.average_rating {
            let satisfied = rating >= 4.0;
            metrics.push(
                Metric::new("Average rating", format!("{rating:.1}"), rating)
                    .suffix("/5")
                    .described("Average client satisfaction")
                    .icon("Award", if satisfied { "#10b981" } else { "#f59e0b" })
                    .trend(grows(satisfied)),
            );
        }

        metrics.push(
            Metric::new("Downloads", self.downloads, self.downloads as f64)
                .described("Total resource downloads")
                .icon("Download", "#06b6d4")
                .trend(grows(self.downloads > 100)),
        );
        metrics
    }
}

impl TechnicalCounts {
    fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::count("Skills", self.skills)
                .described("Skills listed across all categories")
                .icon("Zap", "#8b5cf6"),
            Metric::count("Services", self.services)
                .described("Professional services offered")
                .icon("Briefcase", "#059669"),
        ]
    }
}

impl BusinessCounts {
    fn metrics(&self) -> Vec<Metric> {
        let mut metrics = vec![Metric::count("Bookings", self.bookings)
            .described("Bookings received")
            .icon("Calendar", "#0ea5e9")
            .trend(grows(self.bookings > 0))];

        if self.quotes > 0 {
            metrics.push(
                Metric::count("Quote requests", self.quotes)
                    .described("Quote requests received")
                    .icon("FileText", "#7c3aed")
                    .trend(Trend::Positive),
            );
        }

        metrics.push(
            Metric::count("Newsletter subscribers", self.newsletter_subscribers)
                .described("Active newsletter subscribers")
                .icon("Mail", "#0891b2")
                .trend(grows(self.newsletter_subscribers > 10)),
        );

        let busy = self.recent_activity > 5;
        metrics.push(
            Metric::count("Activity (30d)", self.recent_activity)
                .described("Client interactions over the last 30 days")
                .icon("TrendingUp", if busy { "#10b981" } else { "#f59e0b" })
                .trend(grows(busy)),
        );
        metrics
    }
}

impl Snapshot {
    pub fn metrics(&self) -> Vec<Metric> {
        let mut metrics = Vec::new();
        if let Some(content) = &self.content {
            metrics.extend(content.metrics());
        }
        if let Some(engagement) = &self.engagement {
            metrics.extend(engagement.metrics());
        }
        if let Some(technical) = &self.technical {
            metrics.extend(technical.metrics());
        }
        if let Some(business) = &self.business {
            metrics.extend(business.metrics());
        }
        metrics
    }

    /// Rules fire only for groups present in the snapshot. Output is ordered
    /// high to low priority, keeping rule order within a priority.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if let Some(content) = &self.content {
            if content.projects < 5 {
                recommendations.push(Recommendation {
                    title: "Grow the project portfolio",
                    priority: Priority::High,
                    description: format!(
                        "Only {} projects are listed. A portfolio of 8 to 12 projects shows your range.",
                        content.projects
                    ),
                    action: "Add 3 to 5 projects that represent your skills",
                    impact: "More credibility with prospective clients",
                    category: "content",
                });
            }
        }

        if let Some(engagement) = &self.engagement {
            if engagement.testimonials < 3 {
                recommendations.push(Recommendation {
                    title: "Collect more testimonials",
                    priority: Priority::High,
                    description: format!(
                        "Only {} testimonials are visible. Aim for at least 5 to 8.",
                        engagement.testimonials
                    ),
                    action: "Ask satisfied past clients for a testimonial",
                    impact: "Higher trust and conversion rate",
                    category: "engagement",
                });
            }
        }

        if let Some(content) = &self.content {
            if let Some(rate) = content.completion_rate().filter(|rate| *rate < 80) {
                recommendations.push(Recommendation {
                    title: "Raise the project completion rate",
                    priority: Priority::Medium,
                    description: format!("Your completion rate is {rate}%. Aim for 85% or more."),
                    action: "Finish in-progress projects or mark them as completed",
                    impact: "Shows stronger project delivery",
                    category: "technical",
                });
            }
            if content.published_posts < 5 {
                recommendations.push(Recommendation {
                    title: "Grow the technical blog",
                    priority: Priority::Medium,
                    description: format!(
                        "{} articles are published. 8 to 12 articles noticeably improve search ranking.",
                        content.published_posts
                    ),
                    action: "Publish one or two technical articles a month",
                    impact: "Better search ranking and expert positioning",
                    category: "content",
                });
            }
        }

        if let Some(engagement) = &self.engagement {
            if engagement.downloads < 50 {
                recommendations.push(Recommendation {
                    title: "Promote the free resources",
                    priority: Priority::Low,
                    description: format!(
                        "Only {} downloads so far. Free resources bring in qualified leads.",
                        engagement.downloads
                    ),
                    action: "Share your resources on social networks",
                    impact: "Lead generation and a growing mailing list",
                    category: "business",
                });
            }
        }

        if let Some(business) = &self.business {
            if business.recent_activity < 3 {
                recommendations.push(Recommendation {
                    title: "Stimulate client engagement",
                    priority: Priority::High,
                    description: format!(
                        "Low recent activity ({} interactions this month).",
                        business.recent_activity
                    ),
                    action: "Run a marketing campaign or promote your services on LinkedIn",
                    impact: "More business opportunities",
                    category: "business",
                });
            }
            if business.newsletter_subscribers < 20 {
                recommendations.push(Recommendation {
                    title: "Grow the mailing list",
                    priority: Priority::Medium,
                    description: format!(
                        "You have {} subscribers. A list of 100 or more creates recurring opportunities.",
                        business.newsletter_subscribers
                    ),
                    action: "Offer a lead magnet and streamline the newsletter signup",
                    impact: "A direct channel to qualified prospects",
                    category: "business",
                });
            }
        }

        recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
        recommendations.truncate(RECOMMENDATION_LIMIT);
        recommendations
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Insights {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub growth_opportunities: Vec<&'static str>,
}

pub fn insights(metrics: &[Metric]) -> Insights {
    let strengths = metrics
        .iter()
        .filter(|m| m.trend == Trend::Positive && m.magnitude > 5.0)
        .map(|m| format!("Strong {}: {}{}", m.title.to_lowercase(), m.value, m.suffix))
        .collect();

    let areas_for_improvement = metrics
        .iter()
        .filter(|m| m.trend == Trend::Negative || (m.trend == Trend::Neutral && m.magnitude < 3.0))
        .map(|m| format!("{}: {}", m.title, m.description))
        .collect();

    Insights {
        strengths,
        areas_for_improvement,
        growth_opportunities: vec![
            "Improve search ranking with more technical content",
            "Build strategic partnerships",
            "Create online training courses",
            "Automate lead generation",
        ],
    }
}

/// Read access to every collection the dashboard aggregates.
pub struct Analytics {
    projects: Repository<Project>,
    posts: Repository<BlogPost>,
    technologies: Repository<Technology>,
    testimonials: Repository<Testimonial>,
    pending: Repository<PendingTestimonial>,
    resources: Repository<Resource>,
    skills: Repository<SkillCategory>,
    services: Repository<Service>,
    bookings: Repository<Booking>,
    quotes: Repository<Quote>,
    subscriptions: Repository<NewsletterSubscription>,
}

impl Analytics {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Analytics {
            projects: Repository::new(store.clone()),
            posts: Repository::new(store.clone()),
            technologies: Repository::new(store.clone()),
            testimonials: Repository::new(store.clone()),
            pending: Repository::new(store.clone()),
            resources: Repository::new(store.clone()),
            skills: Repository::new(store.clone()),
            services: Repository::new(store.clone()),
            bookings: Repository::new(store.clone()),
            quotes: Repository::new(store.clone()),
            subscriptions: Repository::new(store),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        let (content, engagement, technical, business) = futures::join!(
            self.content(),
            self.engagement(),
            self.technical(),
            self.business()
        );

        Snapshot {
            content: settle("content", content),
            engagement: settle("engagement", engagement),
            technical: settle("technical", technical),
            business: settle("business", business),
        }
    }

    async fn content(&self) -> StoreResult<ContentCounts> {
        let (projects, completed_projects, published_posts, technologies) = futures::try_join!(
            self.projects.count(doc! {}),
            self.projects.count(doc! { "status": COMPLETED_STATUS }),
            self.posts.count(doc! { "published": true }),
            self.technologies.count(doc! {}),
        )?;
        Ok(ContentCounts {
            projects,
            completed_projects,
            published_posts,
            technologies,
        })
    }

    async fn engagement(&self) -> StoreResult<EngagementCounts> {
        let (testimonials, pending_testimonials, resources) = futures::try_join!(
            self.testimonials.list(doc! {}),
            self.pending.count(doc! { "status": ReviewStatus::Pending.as_str() }),
            self.resources.list(doc! {}),
        )?;

        let average_rating = (!testimonials.is_empty()).then(|| {
            let total: i64 = testimonials.iter().map(|t| i64::from(t.rating)).sum();
            total as f64 / testimonials.len() as f64
        });

        Ok(EngagementCounts {
            testimonials: testimonials.len() as u64,
            pending_testimonials,
            average_rating,
            downloads: resources.iter().map(|r| r.downloads).sum(),
        })
    }

    async fn technical(&self) -> StoreResult<TechnicalCounts> {
        let (skills, services) =
            futures::try_join!(self.skills.list(doc! {}), self.services.count(doc! {}))?;
        Ok(TechnicalCounts {
            skills: skills.iter().map(|category| category.items.len() as u64).sum(),
            services,
        })
    }

    async fn business(&self) -> StoreResult<BusinessCounts> {
        let since = timestamp::format(&(Utc::now() - Duration::days(RECENT_DAYS)));
        let (bookings, quotes, newsletter_subscribers, recent_bookings, recent_submissions, recent_quotes) =
            futures::try_join!(
                self.bookings.count(doc! {}),
                self.quotes.count(doc! {}),
                self.subscriptions.count(doc! { "status": "active" }),
                self.bookings.count(doc! { "created_at": { "$gte": since.as_str() } }),
                self.pending.count(doc! { "submitted_at": { "$gte": since.as_str() } }),
                self.quotes.count(doc! { "created_at": { "$gte": since.as_str() } }),
            )?;

        Ok(BusinessCounts {
            bookings,
            quotes,
            newsletter_subscribers,
            recent_activity: recent_bookings + recent_submissions + recent_quotes,
        })
    }
}

fn settle<T>(group: &'static str, result: StoreResult<T>) -> Option<T> {
    match result {
        Ok(counts) => Some(counts),
        Err(e) => {
            tracing::warn!(group, error = %e, "analytics group failed, leaving it out");
            None
        }
    }
}
