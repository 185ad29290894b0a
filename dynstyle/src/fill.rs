// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background fills.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::context::RenderContext;
use crate::gradient::Gradient;

/// How a background is painted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// A single color.
    Solid(Color),
    /// A linear gradient.
    Gradient(Gradient),
}

impl Fill {
    /// Paint the context's rectangle.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        match self {
            Self::Solid(color) => color.render(ctx),
            Self::Gradient(gradient) => gradient.render(ctx),
        }
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl From<Gradient> for Fill {
    fn from(gradient: Gradient) -> Self {
        Self::Gradient(gradient)
    }
}
