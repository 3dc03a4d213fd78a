// Site settings endpoints

use std::collections::HashMap;

use super::CmsApi;
use crate::error::Result;
use crate::models::{BulkSettingsInput, Setting, SettingValueInput};

impl CmsApi {
    /// `GET /settings` — all settings, admin only
    pub async fn list_settings(&self) -> Result<Vec<Setting>> {
        self.client.get("/settings", None::<&()>).await
    }

    /// `GET /settings/public` — public settings for the site shell
    pub async fn list_public_settings(&self) -> Result<Vec<Setting>> {
        let key = Self::cache_key::<()>("/settings/public", None);
        if let Some(settings) = self.cache.get::<Vec<Setting>>(&key) {
            return Ok(settings);
        }

        let settings: Vec<Setting> = self.client.get("/settings/public", None::<&()>).await?;
        self.cache.insert(&key, &settings);
        Ok(settings)
    }

    /// `PATCH /settings/{key}`
    pub async fn update_setting(&self, key: &str, value: &str) -> Result<Setting> {
        let setting = self
            .client
            .patch(
                &format!("/settings/{}", key),
                Some(&SettingValueInput {
                    value: value.to_string(),
                }),
            )
            .await?;
        self.cache.invalidate_prefix("/settings");
        Ok(setting)
    }

    /// `PATCH /settings` — update several settings in one call
    pub async fn update_settings(&self, settings: HashMap<String, String>) -> Result<Vec<Setting>> {
        let updated = self
            .client
            .patch("/settings", Some(&BulkSettingsInput { settings }))
            .await?;
        self.cache.invalidate_prefix("/settings");
        Ok(updated)
    }
}
