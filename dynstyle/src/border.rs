// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borders.
//!
//! Inner borders draw within the view's content by clipping to the outline
//! and painting either a doubled-width stroke (half of which is clipped
//! away) or the difference between the outline and a shifted copy of it.
//! Outer strokes cannot be drawn into clipped content, so they go to the
//! overlay surface instead.

use dynstyle_surface::{
    BlendMode, ClipPath, DrawOp, FillRule, LayerOp, RecordingSurface, StrokeStyle, Surface,
    SurfaceExt,
};
use kurbo::{Affine, BezPath, Shape, Vec2};
use peniko::{Brush, Compose, Mix};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::context::RenderContext;
use crate::geometry::{Corners, frame_path};

/// Where a [`Border`] is drawn relative to the outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderType {
    /// Centred outside the outline, in the overlay above the view.
    OuterStroke,
    /// Just inside the outline, all the way round.
    #[default]
    InnerStroke,
    /// Inside the outline, along the top edge.
    InnerTop,
    /// Inside the outline, along the left edge.
    InnerLeft,
    /// Inside the outline, along the bottom edge.
    InnerBottom,
    /// Inside the outline, along the right edge.
    InnerRight,
}

impl BorderType {
    /// Shift of the outline copy whose difference forms an inner edge.
    fn edge_offset(self, width: f64) -> Option<Vec2> {
        match self {
            Self::InnerTop => Some(Vec2::new(0.0, width)),
            Self::InnerLeft => Some(Vec2::new(width, 0.0)),
            Self::InnerBottom => Some(Vec2::new(0.0, -width)),
            Self::InnerRight => Some(Vec2::new(-width, 0.0)),
            Self::OuterStroke | Self::InnerStroke => None,
        }
    }
}

/// Blend mode for compositing a border onto what is beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[expect(missing_docs, reason = "variants are the standard separable and non-separable blend modes")]
pub enum BorderBlend {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BorderBlend {
    /// The equivalent source-over blend mode.
    pub fn to_blend_mode(self) -> BlendMode {
        let mix = match self {
            Self::Normal => Mix::Normal,
            Self::Multiply => Mix::Multiply,
            Self::Screen => Mix::Screen,
            Self::Overlay => Mix::Overlay,
            Self::Darken => Mix::Darken,
            Self::Lighten => Mix::Lighten,
            Self::ColorDodge => Mix::ColorDodge,
            Self::ColorBurn => Mix::ColorBurn,
            Self::HardLight => Mix::HardLight,
            Self::SoftLight => Mix::SoftLight,
            Self::Difference => Mix::Difference,
            Self::Exclusion => Mix::Exclusion,
            Self::Hue => Mix::Hue,
            Self::Saturation => Mix::Saturation,
            Self::Color => Mix::Color,
            Self::Luminosity => Mix::Luminosity,
        };
        BlendMode::new(mix, Compose::SrcOver)
    }
}

/// A border attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Border width.
    pub width: f64,
    /// Border color.
    pub color: Color,
    /// Placement relative to the outline.
    #[serde(default)]
    pub border_type: BorderType,
    /// Optional blend mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend: Option<BorderBlend>,
}

impl Border {
    /// A border of `width` and `color` placed as `border_type`.
    pub fn new(width: f64, color: Color, border_type: BorderType) -> Self {
        Self {
            width,
            color,
            border_type,
            blend: None,
        }
    }

    /// This border composited with `blend`.
    #[must_use]
    pub fn with_blend(mut self, blend: BorderBlend) -> Self {
        self.blend = Some(blend);
        self
    }

    /// Draw this border around the context's outline.
    ///
    /// Without a context path the outline is the context rectangle.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        if self.width <= 0.0 {
            return;
        }
        let outline = ctx.outline(Corners::empty(), 0.0);
        let brush = Brush::Solid(self.color.resolve(ctx.palette));
        let width = self.width;
        let blend = LayerOp {
            blend: self.blend.map(BorderBlend::to_blend_mode),
            ..LayerOp::default()
        };

        match self.border_type {
            BorderType::OuterStroke => {
                let reach = 2.0 * width + 1.0;
                let outside = frame_path(
                    outline.bounding_box().union(ctx.rect).inflate(reach, reach),
                    &outline,
                );
                let surface = ctx.overlay(width);
                surface.with_layer(blend, |s| {
                    s.with_layer(
                        LayerOp {
                            clip: Some(ClipPath {
                                path: outside,
                                fill_rule: FillRule::EvenOdd,
                            }),
                            ..LayerOp::default()
                        },
                        |s| stroke(s, outline, width, brush),
                    );
                });
            }
            BorderType::InnerStroke => {
                ctx.surface().with_layer(blend, |s| {
                    s.with_layer(LayerOp::clip(outline.clone()), |s| {
                        stroke(s, outline, width, brush);
                    });
                });
            }
            inner => {
                let Some(offset) = inner.edge_offset(width) else {
                    return;
                };
                let mut band = outline.clone();
                band.extend((Affine::translate(offset) * outline.clone()).iter());
                ctx.surface().with_layer(blend, |s| {
                    s.with_layer(LayerOp::clip(outline), |s| {
                        s.draw(DrawOp::FillPath {
                            path: band,
                            brush,
                            fill_rule: FillRule::EvenOdd,
                        });
                    });
                });
            }
        }
    }
}

/// Stroke `path` at twice `width`, so that clipping to either side of the
/// path leaves a band of `width`.
fn stroke(surface: &mut RecordingSurface, path: BezPath, width: f64, brush: Brush) {
    surface.draw(DrawOp::StrokePath {
        path,
        stroke: StrokeStyle::new(2.0 * width),
        brush,
    });
}
