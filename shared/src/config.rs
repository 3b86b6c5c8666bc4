use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{
    DEFAULT_EMPTY_MESSAGE, DEFAULT_IMAGE_ASSET_PREFIX, DEFAULT_IMAGE_POOL_SIZE,
    DEFAULT_LOADING_MESSAGE, DEFAULT_PAGE_TITLE,
};

/// Shell-provided settings for the page. Sent once through
/// `Event::Configure` before the view mounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Number of decorative images bundled by the shell, addressed `1..=n`.
    pub image_pool_size: u8,
    pub image_asset_prefix: String,
    pub page_title: String,
    pub loading_message: String,
    pub empty_message: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            image_pool_size: DEFAULT_IMAGE_POOL_SIZE,
            image_asset_prefix: DEFAULT_IMAGE_ASSET_PREFIX.into(),
            page_title: DEFAULT_PAGE_TITLE.into(),
            loading_message: DEFAULT_LOADING_MESSAGE.into(),
            empty_message: DEFAULT_EMPTY_MESSAGE.into(),
        }
    }
}

impl BrowserConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty image pool or a blank prefix or
    /// title.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_pool_size == 0 {
            return Err(ConfigError::EmptyImagePool);
        }
        if self.image_asset_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "image_asset_prefix",
            });
        }
        if self.page_title.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "page_title" });
        }
        Ok(())
    }

    #[must_use]
    pub fn asset_name(&self, index: u8) -> String {
        format!("{}{}", self.image_asset_prefix, index)
    }
}
