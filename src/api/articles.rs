// Article endpoints

use super::CmsApi;
use crate::error::Result;
use crate::models::{Article, ArticleFilters, ArticlesPage, CreateArticleInput, UpdateArticleInput};

impl CmsApi {
    /// `GET /articles/public` — published public articles for the site
    pub async fn list_public_articles(&self, filters: &ArticleFilters) -> Result<ArticlesPage> {
        let key = Self::cache_key("/articles/public", Some(filters));
        if let Some(page) = self.cache.get::<ArticlesPage>(&key) {
            tracing::debug!(key = %key, "Query cache hit");
            return Ok(page);
        }

        let page: ArticlesPage = self.client.get("/articles/public", Some(filters)).await?;
        self.cache.insert(&key, &page);
        Ok(page)
    }

    /// `GET /articles/public/{slug}`
    pub async fn get_public_article(&self, slug: &str) -> Result<Article> {
        let path = format!("/articles/public/{}", slug);
        let key = Self::cache_key::<()>(&path, None);
        if let Some(article) = self.cache.get::<Article>(&key) {
            return Ok(article);
        }

        let article: Article = self.client.get(&path, None::<&()>).await?;
        self.cache.insert(&key, &article);
        Ok(article)
    }

    /// `GET /articles` — admin listing, includes drafts and archived
    pub async fn list_articles(&self, filters: &ArticleFilters) -> Result<ArticlesPage> {
        self.client.get("/articles", Some(filters)).await
    }

    /// `GET /articles/{id}`
    pub async fn get_article(&self, id: &str) -> Result<Article> {
        self.client
            .get(&format!("/articles/{}", id), None::<&()>)
            .await
    }

    /// `POST /articles`
    pub async fn create_article(&self, input: &CreateArticleInput) -> Result<Article> {
        let article = self.client.post("/articles", Some(input)).await?;
        self.cache.invalidate_prefix("/articles");
        Ok(article)
    }

    /// `PATCH /articles/{id}`
    pub async fn update_article(&self, id: &str, input: &UpdateArticleInput) -> Result<Article> {
        let article = self
            .client
            .patch(&format!("/articles/{}", id), Some(input))
            .await?;
        self.cache.invalidate_prefix("/articles");
        Ok(article)
    }

    /// `DELETE /articles/{id}`
    pub async fn delete_article(&self, id: &str) -> Result<()> {
        self.client
            .delete::<()>(&format!("/articles/{}", id))
            .await?;
        self.cache.invalidate_prefix("/articles");
        Ok(())
    }
}
