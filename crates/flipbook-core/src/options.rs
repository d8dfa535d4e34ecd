use crate::catalog::CatalogConfig;
use crate::policy::WindowStrategy;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewerOptions {
    pub catalog: CatalogConfig,
    pub strategy: WindowStrategy,
    pub device_class: DeviceClass,
    /// Mirror the current page into the location hash
    pub deep_linking: bool,
    /// Unload pages that leave the window; when off, every visited page
    /// stays loaded
    pub evict_pages: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            strategy: WindowStrategy::default(),
            device_class: DeviceClass::Standard,
            deep_linking: true,
            evict_pages: true,
        }
    }
}

impl ViewerOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| FlipbookError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| FlipbookError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        self.catalog.validate()?;

        if let WindowStrategy::FixedRadius {
            radius,
            constrained_radius,
        } = self.strategy
        {
            if constrained_radius > radius {
                return Err(FlipbookError::Config(format!(
                    "Constrained radius ({constrained_radius}) must not exceed radius ({radius})"
                )));
            }
        }

        Ok(())
    }
}
