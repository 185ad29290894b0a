// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear gradients in unit-square coordinates.

use kurbo::{Point, Rect};
use peniko::{Brush, ColorStop, Extend, GradientKind, LinearGradientPosition};
use serde::{Deserialize, Serialize};

use crate::color::{Color, Palette};
use crate::context::RenderContext;
use crate::name::StyleName;

/// One color stop of a [`Gradient`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Stop color.
    pub color: Color,
    /// Position along the gradient line, `0..=1`.
    pub location: f32,
}

impl GradientStop {
    /// A stop of `color` at `location`.
    pub fn new(color: Color, location: f32) -> Self {
        Self { color, location }
    }
}

/// A linear gradient.
///
/// `start` and `end` are expressed in the unit square and scaled to the
/// target rectangle when rendered, so `(0.5, 0.0)` to `(0.5, 1.0)` is a
/// top-to-bottom gradient for any size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// Identity when registered or referenced by name.
    #[serde(default, skip_serializing_if = "StyleName::is_none")]
    pub name: StyleName,
    /// Stops in order.
    pub stops: Vec<GradientStop>,
    /// Start of the gradient line in unit-square space.
    #[serde(default = "default_start")]
    pub start: Point,
    /// End of the gradient line in unit-square space.
    #[serde(default = "default_end")]
    pub end: Point,
}

fn default_start() -> Point {
    Point::new(0.5, 0.0)
}

fn default_end() -> Point {
    Point::new(0.5, 1.0)
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            name: StyleName::NONE,
            stops: Vec::new(),
            start: default_start(),
            end: default_end(),
        }
    }
}

impl Gradient {
    /// A vertical gradient through `stops`.
    pub fn new(stops: impl IntoIterator<Item = GradientStop>) -> Self {
        Self {
            stops: stops.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A vertical gradient with `colors` spread evenly from top to bottom.
    pub fn evenly(colors: impl IntoIterator<Item = Color>) -> Self {
        let colors: Vec<Color> = colors.into_iter().collect();
        let last = colors.len().saturating_sub(1).max(1) as f32;
        Self::new(
            colors
                .into_iter()
                .enumerate()
                .map(|(i, color)| GradientStop::new(color, i as f32 / last)),
        )
    }

    /// This gradient between `start` and `end` in unit-square space.
    #[must_use]
    pub fn with_points(mut self, start: Point, end: Point) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// The gradient's start and end points scaled into `rect`.
    pub fn line_in(&self, rect: Rect) -> (Point, Point) {
        let scale = |p: Point| {
            Point::new(
                rect.x0 + p.x * rect.width(),
                rect.y0 + p.y * rect.height(),
            )
        };
        (scale(self.start), scale(self.end))
    }

    /// A paint brush for `rect` with colors resolved against `palette`.
    ///
    /// A single stop paints solid; no stops paints transparent.
    pub fn to_brush(&self, rect: Rect, palette: &dyn Palette) -> Brush {
        match self.stops.as_slice() {
            [] => return Brush::Solid(peniko::Color::TRANSPARENT),
            [only] => return Brush::Solid(only.color.resolve(palette)),
            _ => {}
        }
        let stops: Vec<ColorStop> = self
            .stops
            .iter()
            .map(|stop| ColorStop::from((stop.location.clamp(0.0, 1.0), stop.color.resolve(palette))))
            .collect();
        let (p0, p1) = self.line_in(rect);
        Brush::Gradient(peniko::Gradient {
            kind: GradientKind::Linear(LinearGradientPosition::new(p0, p1)),
            extend: Extend::Pad,
            stops: stops.as_slice().into(),
            ..peniko::Gradient::default()
        })
    }

    /// Paint the context's rectangle with this gradient.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        let rect = ctx.rect;
        let brush = self.to_brush(rect, ctx.palette);
        ctx.fill_rect(rect, brush);
    }
}
