// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shadows.

use dynstyle_surface::{DrawOp, FillRule, FilterDesc, LayerOp, Surface, SurfaceExt};
use kurbo::{Shape, Vec2};
use peniko::Brush;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::context::{LayerShadow, RenderContext};
use crate::geometry::{Corners, frame_path};

/// A shadow attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Shadow color.
    pub color: Color,
    /// Offset of the shadow from the outline.
    #[serde(default)]
    pub offset: Vec2,
    /// Blur radius.
    #[serde(default)]
    pub radius: f64,
}

impl Shadow {
    /// A shadow of `color` offset by `offset` and blurred by `radius`.
    pub fn new(color: Color, offset: Vec2, radius: f64) -> Self {
        Self {
            color,
            offset,
            radius,
        }
    }

    /// Describe this shadow on the host's backing layer.
    ///
    /// Nothing is drawn: the host casts the shadow from the context outline.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        let shadow = LayerShadow {
            path: ctx.outline(Corners::empty(), 0.0),
            color: self.color.resolve(ctx.palette),
            offset: self.offset,
            radius: self.radius,
        };
        ctx.set_shadow(shadow);
    }

    /// Draw this shadow inside the context outline.
    ///
    /// The area outside the outline is filled and given a drop shadow, and
    /// everything but the part of that shadow falling inside the outline is
    /// clipped away.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "filter parameters are single precision"
    )]
    pub fn render_inner(&self, ctx: &mut RenderContext<'_>) {
        let outline = ctx.outline(Corners::empty(), 0.0);
        let color = self.color.resolve(ctx.palette);
        let reach = self.radius.abs() * 3.0 + self.offset.hypot() + 1.0;
        let surround = frame_path(
            outline.bounding_box().union(ctx.rect).inflate(reach, reach),
            &outline,
        );
        // A blur radius is roughly twice the Gaussian standard deviation.
        let filter = FilterDesc::DropShadow {
            dx: self.offset.x as f32,
            dy: self.offset.y as f32,
            std_deviation: (self.radius / 2.0) as f32,
            color,
        };
        ctx.surface().with_layer(LayerOp::clip(outline), |s| {
            s.with_layer(
                LayerOp {
                    filter: Some(filter),
                    ..LayerOp::default()
                },
                |s| {
                    s.draw(DrawOp::FillPath {
                        path: surround,
                        brush: Brush::Solid(color),
                        fill_rule: FillRule::EvenOdd,
                    });
                },
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::EmptyPalette;
    use crate::context::Canvas;
    use dynstyle_surface::{StateOp, SurfaceOp};
    use kurbo::Size;

    fn shadow() -> Shadow {
        Shadow::new(Color::rgba8(0, 0, 0, 128), Vec2::new(0.0, 2.0), 4.0)
    }

    #[test]
    fn outer_shadow_is_declarative() {
        let rendering = Canvas::paint(Size::new(30.0, 30.0), &EmptyPalette, |ctx| {
            shadow().render(ctx);
        });
        assert!(rendering.content.is_empty(), "layer shadows draw nothing");
        let layer = rendering.shadow.unwrap();
        assert_eq!(layer.offset, Vec2::new(0.0, 2.0));
        assert_eq!(layer.radius, 4.0);
        assert_eq!(layer.color.to_rgba8().to_u8_array(), [0, 0, 0, 128]);
    }

    #[test]
    fn inner_shadow_draws_filtered_layer_inside_clip() {
        let rendering = Canvas::paint(Size::new(30.0, 30.0), &EmptyPalette, |ctx| {
            shadow().render_inner(ctx);
        });
        let ops = rendering.content.ops();
        assert_eq!(ops.len(), 5);
        assert!(matches!(
            &ops[1],
            SurfaceOp::State(StateOp::PushLayer(LayerOp {
                filter: Some(FilterDesc::DropShadow { .. }),
                ..
            }))
        ));
        assert!(rendering.shadow.is_none());
    }
}
