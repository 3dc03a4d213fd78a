// Admin dashboard types

use super::Article;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub stats: StatTotals,
    pub recent_articles: Vec<Article>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTotals {
    pub total_articles: u64,
    pub published_articles: u64,
    pub draft_articles: u64,
    pub total_users: u64,
    pub total_views: u64,
}
