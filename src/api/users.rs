// User account endpoints (admin only)

use serde_json::json;

use super::CmsApi;
use crate::error::Result;
use crate::models::{CreateUserInput, UpdateUserInput, User, UserFilters};

impl CmsApi {
    /// `GET /users`
    pub async fn list_users(&self, filters: &UserFilters) -> Result<Vec<User>> {
        self.client.get("/users", Some(filters)).await
    }

    /// `POST /users`
    pub async fn create_user(&self, input: &CreateUserInput) -> Result<User> {
        self.client.post("/users", Some(input)).await
    }

    /// `PATCH /users/{id}`
    pub async fn update_user(&self, id: &str, input: &UpdateUserInput) -> Result<User> {
        self.client
            .patch(&format!("/users/{}", id), Some(input))
            .await
    }

    /// `PATCH /users/{id}/status` — activate or deactivate an account
    pub async fn set_user_active(&self, id: &str, is_active: bool) -> Result<User> {
        self.client
            .patch(
                &format!("/users/{}/status", id),
                Some(&json!({ "isActive": is_active })),
            )
            .await
    }

    /// `DELETE /users/{id}`
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.client.delete::<()>(&format!("/users/{}", id)).await
    }
}
