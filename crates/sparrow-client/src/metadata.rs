//! Metadata endpoints (`/api/v1/metadata`).

use sparrow_core::backend::LinkPreview;
use sparrow_core::error::Result;

use crate::http::ApiClient;

/// Typed client for the metadata API.
#[derive(Clone)]
pub struct MetadataApi {
    client: ApiClient,
}

impl MetadataApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches link preview metadata for a URL.
    pub async fn link_preview(&self, url: &str) -> Result<LinkPreview> {
        self.client
            .get_json_with_query("/metadata/link-preview", &[("url", url)])
            .await
    }
}
