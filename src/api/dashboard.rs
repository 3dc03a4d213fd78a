// Admin dashboard endpoint

use super::CmsApi;
use crate::error::Result;
use crate::models::DashboardStats;

impl CmsApi {
    /// `GET /admin/dashboard` — aggregate counters plus recent articles
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let key = Self::cache_key::<()>("/admin/dashboard", None);
        if let Some(stats) = self.cache.get::<DashboardStats>(&key) {
            return Ok(stats);
        }

        let stats: DashboardStats = self.client.get("/admin/dashboard", None::<&()>).await?;
        self.cache.insert(&key, &stats);
        Ok(stats)
    }
}
