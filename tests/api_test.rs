// Integration tests for the typed resource APIs
//
// Covers envelope unwrapping into domain types, session operations that
// maintain the token store, and query cache invalidation on mutation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use cms_console::api::CmsApi;
use cms_console::auth::{MemoryTokenStore, TokenStore};
use cms_console::cache::QueryCache;
use cms_console::client::ApiClient;
use cms_console::error::ApiError;
use cms_console::models::{ArticleFilters, ArticleStatus, UserRole};

fn api_for(server: &mockito::ServerGuard, store: Arc<MemoryTokenStore>) -> CmsApi {
    let client = ApiClient::new(&server.url(), store, 5, 10).unwrap();
    CmsApi::new(client, QueryCache::new(Duration::from_secs(60)))
}

fn success_body(data: serde_json::Value) -> String {
    json!({"success": true, "message": "OK", "data": data}).to_string()
}

fn sample_article(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "content": "<p>Body</p>",
        "excerpt": null,
        "thumbnailUrl": null,
        "status": "PUBLISHED",
        "visibility": "PUBLIC",
        "metaTitle": null,
        "metaDescription": null,
        "publishedAt": "2025-05-01T08:00:00Z",
        "viewCount": 7,
        "createdAt": "2025-04-30T08:00:00Z",
        "updatedAt": "2025-05-01T08:00:00Z",
        "author": {"name": "Ayu", "avatarUrl": null}
    })
}

fn sample_user(id: &str, email: &str, role: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email": email,
        "name": "Someone",
        "role": role,
        "avatarUrl": null,
        "isActive": true,
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
    })
}

fn sample_setting(key: &str, value: &str) -> serde_json::Value {
    json!({
        "id": format!("setting-{}", key),
        "key": key,
        "value": value,
        "description": null,
        "isPublic": true,
        "updatedAt": "2025-05-01T08:00:00Z",
        "updatedBy": null
    })
}

// ==================================================================================================
// Session operations
// ==================================================================================================

#[tokio::test]
async fn test_login_persists_token() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());

    let login = server
        .mock("POST", "/auth/login")
        .match_body(mockito::Matcher::PartialJson(json!({
            "email": "admin@example.org",
            "password": "secret"
        })))
        .with_status(200)
        .with_body(success_body(json!({
            "user": sample_user("u1", "admin@example.org", "ADMIN"),
            "accessToken": "tok-login"
        })))
        .create_async()
        .await;

    let api = api_for(&server, store.clone());
    let session = api.login("admin@example.org", "secret").await.unwrap();

    assert_eq!(session.user.role, UserRole::Admin);
    assert_eq!(store.get().unwrap().as_deref(), Some("tok-login"));
    login.assert_async().await;
}

#[tokio::test]
async fn test_logout_clears_token() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    store.put("tok1").unwrap();

    server
        .mock("POST", "/auth/logout")
        .match_header("authorization", "Bearer tok1")
        .with_status(200)
        .with_body(json!({"success": true, "message": "Logged out"}).to_string())
        .create_async()
        .await;

    let api = api_for(&server, store.clone());
    api.logout().await.unwrap();
    assert!(store.get().unwrap().is_none());
}

#[tokio::test]
async fn test_logout_keeps_token_when_server_rejects() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    store.put("tok1").unwrap();

    server
        .mock("POST", "/auth/logout")
        .with_status(500)
        .with_body(json!({"success": false, "message": "Server error"}).to_string())
        .create_async()
        .await;

    let api = api_for(&server, store.clone());
    let result = api.logout().await;
    assert!(matches!(result, Err(ApiError::Api { status: 500, .. })));
    assert_eq!(store.get().unwrap().as_deref(), Some("tok1"));
}

// ==================================================================================================
// Articles
// ==================================================================================================

#[tokio::test]
async fn test_list_public_articles_decodes_page() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());

    server
        .mock("GET", "/articles/public")
        .match_query(mockito::Matcher::UrlEncoded("limit".into(), "6".into()))
        .with_status(200)
        .with_body(success_body(json!({
            "articles": [sample_article("a1", "Hello World")],
            "meta": {"page": 1, "limit": 6, "total": 1, "totalPages": 1}
        })))
        .create_async()
        .await;

    let api = api_for(&server, store);
    let filters = ArticleFilters {
        limit: Some(6),
        ..Default::default()
    };
    let page = api.list_public_articles(&filters).await.unwrap();

    assert_eq!(page.articles.len(), 1);
    assert_eq!(page.articles[0].status, ArticleStatus::Published);
    assert_eq!(page.meta.limit, 6);
}

#[tokio::test]
async fn test_public_article_list_is_cached() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());

    let listing = server
        .mock("GET", "/articles/public")
        .with_status(200)
        .with_body(success_body(json!({
            "articles": [sample_article("a1", "Hello World")],
            "meta": {"page": 1, "limit": 10, "total": 1, "totalPages": 1}
        })))
        .expect(1)
        .create_async()
        .await;

    let api = api_for(&server, store);
    let filters = ArticleFilters::default();

    let first = api.list_public_articles(&filters).await.unwrap();
    let second = api.list_public_articles(&filters).await.unwrap();
    assert_eq!(first.articles[0].id, second.articles[0].id);

    // Second read came from the cache
    listing.assert_async().await;
}

#[tokio::test]
async fn test_article_mutation_invalidates_cached_listing() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    store.put("tok1").unwrap();

    let listing = server
        .mock("GET", "/articles/public")
        .with_status(200)
        .with_body(success_body(json!({
            "articles": [sample_article("a1", "Hello World")],
            "meta": {"page": 1, "limit": 10, "total": 1, "totalPages": 1}
        })))
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", "/articles")
        .with_status(201)
        .with_body(success_body(sample_article("a2", "Brand New")))
        .create_async()
        .await;

    let api = api_for(&server, store);
    let filters = ArticleFilters::default();

    api.list_public_articles(&filters).await.unwrap();

    let input = cms_console::models::CreateArticleInput {
        title: "Brand New".to_string(),
        slug: "brand-new".to_string(),
        content: "<p>Body</p>".to_string(),
        excerpt: None,
        thumbnail_url: None,
        status: ArticleStatus::Draft,
        visibility: cms_console::models::ArticleVisibility::Public,
        meta_title: None,
        meta_description: None,
        published_at: None,
    };
    api.create_article(&input).await.unwrap();

    // The cached page was dropped by the mutation, so this hits the wire
    api.list_public_articles(&filters).await.unwrap();
    listing.assert_async().await;
}

#[tokio::test]
async fn test_delete_article_returns_unit() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    store.put("tok1").unwrap();

    server
        .mock("DELETE", "/articles/a1")
        .with_status(200)
        .with_body(json!({"success": true, "message": "Deleted"}).to_string())
        .create_async()
        .await;

    let api = api_for(&server, store);
    api.delete_article("a1").await.unwrap();
}

// ==================================================================================================
// Users
// ==================================================================================================

#[tokio::test]
async fn test_set_user_active_sends_status_body() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    store.put("tok1").unwrap();

    let status = server
        .mock("PATCH", "/users/u2/status")
        .match_body(mockito::Matcher::Json(json!({"isActive": false})))
        .with_status(200)
        .with_body(success_body(sample_user("u2", "editor@example.org", "EDITOR")))
        .create_async()
        .await;

    let api = api_for(&server, store);
    let user = api.set_user_active("u2", false).await.unwrap();
    assert_eq!(user.email, "editor@example.org");
    status.assert_async().await;
}

#[tokio::test]
async fn test_list_users_with_filters() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    store.put("tok1").unwrap();

    server
        .mock("GET", "/users")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("role".into(), "EDITOR".into()),
            mockito::Matcher::UrlEncoded("isActive".into(), "true".into()),
        ]))
        .with_status(200)
        .with_body(success_body(json!([
            sample_user("u2", "editor@example.org", "EDITOR")
        ])))
        .create_async()
        .await;

    let api = api_for(&server, store);
    let users = api
        .list_users(&cms_console::models::UserFilters {
            role: Some(UserRole::Editor),
            is_active: Some(true),
            search: None,
        })
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, UserRole::Editor);
}

// ==================================================================================================
// Settings
// ==================================================================================================

#[tokio::test]
async fn test_update_setting_invalidates_public_listing() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    store.put("tok1").unwrap();

    let listing = server
        .mock("GET", "/settings/public")
        .with_status(200)
        .with_body(success_body(json!([sample_setting("site_title", "Old")])))
        .expect(2)
        .create_async()
        .await;
    server
        .mock("PATCH", "/settings/site_title")
        .match_body(mockito::Matcher::Json(json!({"value": "New"})))
        .with_status(200)
        .with_body(success_body(sample_setting("site_title", "New")))
        .create_async()
        .await;

    let api = api_for(&server, store);

    api.list_public_settings().await.unwrap();
    let updated = api.update_setting("site_title", "New").await.unwrap();
    assert_eq!(updated.value, "New");

    // Mutation dropped the cached listing
    api.list_public_settings().await.unwrap();
    listing.assert_async().await;
}

#[tokio::test]
async fn test_bulk_settings_update() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    store.put("tok1").unwrap();

    server
        .mock("PATCH", "/settings")
        .match_body(mockito::Matcher::PartialJson(json!({
            "settings": {"site_title": "New", "tagline": "Better"}
        })))
        .with_status(200)
        .with_body(success_body(json!([
            sample_setting("site_title", "New"),
            sample_setting("tagline", "Better")
        ])))
        .create_async()
        .await;

    let api = api_for(&server, store);
    let mut settings = HashMap::new();
    settings.insert("site_title".to_string(), "New".to_string());
    settings.insert("tagline".to_string(), "Better".to_string());

    let updated = api.update_settings(settings).await.unwrap();
    assert_eq!(updated.len(), 2);
}

// ==================================================================================================
// Dashboard
// ==================================================================================================

#[tokio::test]
async fn test_dashboard_stats_decode() {
    let mut server = mockito::Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    store.put("tok1").unwrap();

    server
        .mock("GET", "/admin/dashboard")
        .with_status(200)
        .with_body(success_body(json!({
            "stats": {
                "totalArticles": 12,
                "publishedArticles": 8,
                "draftArticles": 4,
                "totalUsers": 3,
                "totalViews": 901
            },
            "recentArticles": [sample_article("a1", "Hello World")]
        })))
        .create_async()
        .await;

    let api = api_for(&server, store);
    let dashboard = api.dashboard_stats().await.unwrap();
    assert_eq!(dashboard.stats.total_articles, 12);
    assert_eq!(dashboard.recent_articles.len(), 1);
}
