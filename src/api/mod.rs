// Typed resource APIs over the authenticated client
// One impl block per resource, mirroring the backend's route groups

mod articles;
mod dashboard;
mod settings;
mod uploads;
mod users;

pub use uploads::UploadKind;

use serde::Serialize;

use crate::cache::QueryCache;
use crate::client::ApiClient;

/// Facade bundling the authenticated client with the query cache
pub struct CmsApi {
    client: ApiClient,
    cache: QueryCache,
}

impl CmsApi {
    pub fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub(crate) fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Cache key for a GET: the path plus the serialized query, so the
    /// same path with different filters never collides
    pub(crate) fn cache_key<Q: Serialize>(path: &str, query: Option<&Q>) -> String {
        match query.and_then(|q| serde_json::to_string(q).ok()) {
            Some(query) => format!("{}?{}", path, query),
            None => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleFilters;

    #[test]
    fn test_cache_key_without_query() {
        assert_eq!(
            CmsApi::cache_key::<()>("/settings/public", None),
            "/settings/public"
        );
    }

    #[test]
    fn test_cache_key_distinguishes_filters() {
        let a = CmsApi::cache_key(
            "/articles/public",
            Some(&ArticleFilters {
                limit: Some(6),
                ..Default::default()
            }),
        );
        let b = CmsApi::cache_key(
            "/articles/public",
            Some(&ArticleFilters {
                limit: Some(12),
                ..Default::default()
            }),
        );
        assert_ne!(a, b);
        assert!(a.starts_with("/articles/public?"));
    }
}
