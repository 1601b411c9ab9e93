//! Connection metadata used for dialect detection

use sr_core::{CoreError, CoreResult, DatabaseConnection};

/// Metadata captured when a connection is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    product_name: Option<String>,
    url: Option<String>,
    /// `Err` holds the reason the version probe failed
    version: Result<Option<String>, String>,
}

impl ConnectionInfo {
    pub fn new(
        product_name: Option<String>,
        url: Option<String>,
        version: Result<Option<String>, String>,
    ) -> Self {
        Self {
            product_name,
            url,
            version,
        }
    }

    /// Metadata for a connection known only by its URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new(None, Some(url.into()), Ok(None))
    }
}

impl DatabaseConnection for ConnectionInfo {
    fn product_name(&self) -> Option<String> {
        self.product_name.clone()
    }

    fn url(&self) -> Option<String> {
        self.url.clone()
    }

    fn product_version(&self) -> CoreResult<Option<String>> {
        self.version
            .clone()
            .map_err(CoreError::VersionUnavailable)
    }
}
