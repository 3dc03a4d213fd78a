// Image upload types

use serde::{Deserialize, Serialize};

/// Result of a successful image upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub public_id: String,
    pub url: String,
    pub secure_url: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_result_parses() {
        let body = json!({
            "publicId": "cms/abc123",
            "url": "http://img.example.org/abc123.webp",
            "secureUrl": "https://img.example.org/abc123.webp",
            "format": "webp",
            "width": 1280,
            "height": 720,
            "bytes": 48123
        })
        .to_string();

        let result: UploadResult = serde_json::from_str(&body).unwrap();
        assert_eq!(result.format, "webp");
        assert_eq!(result.width, 1280);
    }
}
