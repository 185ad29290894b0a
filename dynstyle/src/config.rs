// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render scheduler configuration.

use serde::{Deserialize, Serialize};

/// Name given to the background render thread unless configured otherwise.
pub const DEFAULT_QUEUE_NAME: &str = "dynstyle-render";

/// Settings for a [`RenderScheduler`](crate::RenderScheduler).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Device pixels per logical unit for every raster.
    pub scale: f64,
    /// Name of the background render thread.
    pub queue_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            queue_name: DEFAULT_QUEUE_NAME.to_owned(),
        }
    }
}

impl RenderConfig {
    /// Default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render at `scale` device pixels per logical unit.
    ///
    /// Non-finite or non-positive scales fall back to `1.0`.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        self
    }

    /// Name the background render thread.
    #[must_use]
    pub fn with_queue_name(mut self, name: impl Into<String>) -> Self {
        self.queue_name = name.into();
        self
    }
}
