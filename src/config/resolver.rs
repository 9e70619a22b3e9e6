use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Media source resolution configuration
///
/// Source paths under `cdn_prefix` are served from `cdn_host`, paths under
/// `uploads_prefix` from `uploads_host`, and everything else that is not
/// already absolute is resolved against `app_origin`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Path prefix marking CDN-hosted uploads (stripped on rewrite).
    pub cdn_prefix: String,

    /// Base URL of the CDN.
    pub cdn_host: String,

    /// Path prefix marking generic uploads (stripped on rewrite).
    pub uploads_prefix: String,

    /// Base URL of the uploads host.
    pub uploads_host: String,

    /// Origin the application is served from.
    pub app_origin: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cdn_prefix: "/cdn-uploads/".to_string(),
            cdn_host: "https://cdn.listenparty.app".to_string(),
            uploads_prefix: "/uploads/".to_string(),
            uploads_host: "https://uploads.listenparty.app".to_string(),
            app_origin: "http://localhost:3000".to_string(),
        }
    }
}
