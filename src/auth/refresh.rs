// Token refresh call
// Deliberately outside the client pipeline so a refresh can never trigger
// another refresh

use reqwest::Client;

use super::types::RefreshedToken;
use crate::error::ApiError;
use crate::models::Envelope;

/// Exchange the ambient session cookie for a new access token.
///
/// Posts to `/auth/refresh` with no body; the session cookie rides in the
/// shared cookie jar. Never consults the token store.
pub async fn refresh_access_token(http: &Client, base_url: &str) -> Result<String, ApiError> {
    let url = format!("{}/auth/refresh", base_url);
    tracing::debug!(url = %url, "Refreshing access token");

    let response = http.post(&url).send().await?;
    let status = response.status();
    let body = response.text().await?;

    let envelope: Envelope<RefreshedToken> = serde_json::from_str(&body).map_err(|err| {
        if status.is_success() {
            ApiError::Decode(format!("Invalid refresh response: {}", err))
        } else {
            ApiError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
                code: None,
                details: None,
            }
        }
    })?;

    if !status.is_success() || !envelope.success {
        let (code, details) = envelope
            .error
            .map(|e| (Some(e.code), e.details))
            .unwrap_or((None, None));
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: envelope.message,
            code,
            details,
        });
    }

    let token = envelope
        .data
        .ok_or_else(|| ApiError::Decode("Refresh response has no data".to_string()))?;
    if token.access_token.is_empty() {
        return Err(ApiError::Decode(
            "Refresh response does not contain accessToken".to_string(),
        ));
    }

    tracing::info!("Access token refreshed");
    Ok(token.access_token)
}
