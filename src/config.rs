use anyhow::{ensure, Context, Result};
use reqwest::Url;
use std::time::Duration;

use crate::camera::CameraSettings;
use crate::viewer::LightingRig;

/// Catalog the stock viewer talks to
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/models";

/// World-units per model-unit; models are authored in meters
pub const DEFAULT_MODEL_SCALE: f32 = 1000.0;

/// Share of the window width taken by the 3D viewport
pub const VIEWPORT_FRACTION: f32 = 0.8;

/// Runtime configuration of the viewer
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub base_url: Url,
    pub model_scale: f32,
    pub request_timeout: Duration,
    pub workers: usize,
    pub show_ui: bool,
    pub camera: CameraSettings,
    pub lighting: LightingRig,
}

impl ViewerConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid catalog URL: {}", base_url))?;

        ensure!(
            matches!(base_url.scheme(), "http" | "https"),
            "Catalog URL must be http or https, got {}",
            base_url.scheme()
        );
        ensure!(
            !base_url.cannot_be_a_base(),
            "Catalog URL cannot have path segments appended: {}",
            base_url
        );

        Ok(Self {
            base_url,
            model_scale: DEFAULT_MODEL_SCALE,
            request_timeout: Duration::from_secs(30),
            workers: 4,
            show_ui: true,
            camera: CameraSettings::default(),
            lighting: LightingRig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_catalog() {
        let config = ViewerConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.model_scale, 1000.0);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(ViewerConfig::new("ftp://example.com/models").is_err());
        assert!(ViewerConfig::new("mailto:someone@example.com").is_err());
        assert!(ViewerConfig::new("not a url").is_err());
    }
}
