//! Iframe sizing.

use crate::config::AppConfig;
use crate::view::ResultsView;
use healthcheck_host::{FrameSize, HostClient};
use tracing::{debug, warn};

/// The pixel band the hosting iframe is kept within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBand {
    min: u32,
    max: u32,
}

impl FrameBand {
    /// A band from `min` to `max`; the bounds are swapped if reversed.
    #[must_use]
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.frame_min_height, config.frame_max_height)
    }

    #[must_use]
    pub fn min(&self) -> u32 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Size applied before anything is rendered.
    #[must_use]
    pub fn initial(&self) -> FrameSize {
        FrameSize::full_width(self.max)
    }

    /// `clamp(max(heights, min), min, max)`.
    #[must_use]
    pub fn fit(&self, content_heights: &[u32]) -> u32 {
        content_heights
            .iter()
            .copied()
            .fold(self.min, u32::max)
            .clamp(self.min, self.max)
    }

    /// Resizes the frame to fit the view. Failures are logged only.
    pub async fn resize_to_fit(&self, client: &dyn HostClient, view: &dyn ResultsView) {
        let height = self.fit(&view.content_heights());
        debug!("Resizing frame to {height}px");
        if let Err(e) = client.invoke_resize(FrameSize::full_width(height)).await {
            warn!("Frame resize failed: {e}");
        }
    }
}

impl Default for FrameBand {
    fn default() -> Self {
        Self::new(600, 800)
    }
}
