// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing context handed to attributes while a style renders.
//!
//! A [`Canvas`] collects everything a render produces:
//!
//! - the view's own content, recorded into a [`RecordingSurface`];
//! - an optional overlay for decoration that extends past the view's bounds
//!   (outer strokes);
//! - declarative layer effects for the host (shape mask, layer shadow).
//!
//! Attributes never see the canvas directly. They draw through a
//! [`RenderContext`], which also carries the target rectangle, the clip path
//! when one is in effect, and the palette used to resolve named colors.

use core::fmt;

use dynstyle_surface::{
    DrawOp, FillRule, PATH_TOLERANCE, Recording, RecordingSurface, StateOp, Surface, SurfaceOp,
};
use kurbo::{Affine, BezPath, Rect, Shape, Size, Vec2};
use peniko::Brush;

use crate::color::Palette;
use crate::geometry::{Corners, rounded_rect_path};

/// Shadow parameters for the host's backing layer.
///
/// Layer shadows are declarative: the host draws them, the style engine only
/// describes them.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerShadow {
    /// Outline casting the shadow, in view coordinates.
    pub path: BezPath,
    /// Resolved shadow color.
    pub color: peniko::Color,
    /// Shadow offset.
    pub offset: Vec2,
    /// Blur radius.
    pub radius: f64,
}

/// Decoration drawn above the view, outside its clipped content.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    /// Frame of the overlay relative to the view's bounds origin.
    ///
    /// The overlay tracks the view: it is centred on it and grown by the
    /// widest outer decoration on every side.
    pub frame: Rect,
    /// Overlay drawing in overlay-local coordinates.
    pub content: Recording,
}

/// Everything produced by rendering a style for one view size.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendering {
    /// The view's display content.
    pub content: Recording,
    /// Outer decoration, if any attribute drew outside the bounds.
    pub overlay: Option<Overlay>,
    /// Shape mask for the view's backing layer.
    pub mask: Option<BezPath>,
    /// Declarative shadow for the view's backing layer.
    pub shadow: Option<LayerShadow>,
}

/// Render target shared by all attributes of a single render pass.
#[derive(Default)]
pub struct Canvas {
    content: RecordingSurface,
    overlay: RecordingSurface,
    overlay_outset: f64,
    mask: Option<BezPath>,
    shadow: Option<LayerShadow>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("content_ops", &self.content.ops().len())
            .field("overlay_ops", &self.overlay.ops().len())
            .field("overlay_outset", &self.overlay_outset)
            .field("mask", &self.mask.is_some())
            .field("shadow", &self.shadow.is_some())
            .finish()
    }
}

impl Canvas {
    /// Create an empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with a context covering a view of `size`, then finish.
    pub fn paint(
        size: Size,
        palette: &dyn Palette,
        f: impl FnOnce(&mut RenderContext<'_>),
    ) -> Rendering {
        let mut canvas = Self::new();
        {
            let mut ctx = RenderContext::new(&mut canvas, size.to_rect(), palette);
            f(&mut ctx);
        }
        canvas.finish(size)
    }

    /// Close the canvas into a [`Rendering`] for a view of `size`.
    pub fn finish(self, size: Size) -> Rendering {
        let overlay = if self.overlay.ops().is_empty() {
            None
        } else {
            let outset = self.overlay_outset;
            let frame = size.to_rect().inflate(outset, outset);
            let shift = Affine::translate((outset, outset));
            let mut shifted = RecordingSurface::new();
            shifted.state(StateOp::SetTransform(shift));
            for op in self.overlay.ops() {
                match op {
                    SurfaceOp::State(StateOp::SetTransform(xf)) => {
                        shifted.state(StateOp::SetTransform(shift * *xf));
                    }
                    SurfaceOp::State(state) => shifted.state(state.clone()),
                    SurfaceOp::Draw(draw) => shifted.draw(draw.clone()),
                }
            }
            Some(Overlay {
                frame,
                content: shifted.finish(frame.size()),
            })
        };
        Rendering {
            content: self.content.finish(size),
            overlay,
            mask: self.mask,
            shadow: self.shadow,
        }
    }
}

/// What an attribute draws with.
pub struct RenderContext<'a> {
    /// The rectangle being decorated, in view coordinates.
    pub rect: Rect,
    /// The outline in effect, when a style or caller supplied one.
    ///
    /// Borders follow this path instead of recomputing a rounded rectangle.
    pub path: Option<BezPath>,
    /// Palette for named colors.
    pub palette: &'a dyn Palette,
    canvas: &'a mut Canvas,
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("rect", &self.rect)
            .field("path", &self.path.is_some())
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl<'a> RenderContext<'a> {
    /// A context drawing `rect` into `canvas`.
    pub fn new(canvas: &'a mut Canvas, rect: Rect, palette: &'a dyn Palette) -> Self {
        Self {
            rect,
            path: None,
            palette,
            canvas,
        }
    }

    /// This context, constrained to `path`.
    #[must_use]
    pub fn with_path(mut self, path: BezPath) -> Self {
        self.path = Some(path);
        self
    }

    /// A context sharing this canvas, for a different rectangle and outline.
    pub fn child(&mut self, rect: Rect, path: Option<BezPath>) -> RenderContext<'_> {
        RenderContext {
            rect,
            path,
            palette: self.palette,
            canvas: &mut *self.canvas,
        }
    }

    /// The context's outline, or a rounded rectangle over [`Self::rect`].
    pub fn outline(&self, corners: Corners, radius: f64) -> BezPath {
        match &self.path {
            Some(path) => path.clone(),
            None => rounded_rect_path(self.rect, corners, radius),
        }
    }

    /// The surface for the view's own content.
    pub fn surface(&mut self) -> &mut RecordingSurface {
        &mut self.canvas.content
    }

    /// The overlay surface, in view coordinates, for drawing that reaches
    /// `outset` past the view's bounds.
    pub fn overlay(&mut self, outset: f64) -> &mut RecordingSurface {
        if outset > self.canvas.overlay_outset {
            self.canvas.overlay_outset = outset;
        }
        &mut self.canvas.overlay
    }

    /// Fill `rect` with `brush` on the content surface.
    pub fn fill_rect(&mut self, rect: Rect, brush: Brush) {
        self.fill_path(rect.to_path(PATH_TOLERANCE), brush, FillRule::NonZero);
    }

    /// Fill `path` with `brush` on the content surface.
    pub fn fill_path(&mut self, path: BezPath, brush: Brush, fill_rule: FillRule) {
        self.canvas.content.draw(DrawOp::FillPath {
            path,
            brush,
            fill_rule,
        });
    }

    /// Ask the host to clip the view's backing layer to `path`.
    pub fn set_mask(&mut self, path: BezPath) {
        self.canvas.mask = Some(path);
    }

    /// Ask the host to cast `shadow` from the view's backing layer.
    pub fn set_shadow(&mut self, shadow: LayerShadow) {
        self.canvas.shadow = Some(shadow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::EmptyPalette;
    use dynstyle_surface::StrokeStyle;

    #[test]
    fn overlay_is_shifted_and_grown_by_outset() {
        let size = Size::new(100.0, 50.0);
        let rendering = Canvas::paint(size, &EmptyPalette, |ctx| {
            let rect = ctx.rect;
            ctx.overlay(4.0).draw(DrawOp::StrokePath {
                path: rect.to_path(PATH_TOLERANCE),
                stroke: StrokeStyle::new(8.0),
                brush: Brush::Solid(peniko::Color::BLACK),
            });
        });
        let overlay = rendering.overlay.unwrap();
        assert_eq!(overlay.frame, Rect::new(-4.0, -4.0, 104.0, 54.0));
        assert_eq!(overlay.content.size(), Size::new(108.0, 58.0));
        assert_eq!(
            overlay.content.ops()[0],
            SurfaceOp::State(StateOp::SetTransform(Affine::translate((4.0, 4.0)))),
            "overlay drawing should be moved into overlay-local space"
        );
        assert!(rendering.content.is_empty());
    }

    #[test]
    fn no_overlay_without_outer_drawing() {
        let rendering = Canvas::paint(Size::new(10.0, 10.0), &EmptyPalette, |ctx| {
            let rect = ctx.rect;
            ctx.fill_rect(rect, Brush::Solid(peniko::Color::WHITE));
        });
        assert!(rendering.overlay.is_none());
        assert_eq!(rendering.content.draws().count(), 1);
    }

    #[test]
    fn outline_prefers_context_path() {
        let mut canvas = Canvas::new();
        let rect = Rect::new(0.0, 0.0, 20.0, 20.0);
        let custom = Rect::new(5.0, 5.0, 6.0, 6.0).to_path(PATH_TOLERANCE);
        let ctx = RenderContext::new(&mut canvas, rect, &EmptyPalette).with_path(custom.clone());
        assert_eq!(ctx.outline(Corners::ALL, 4.0), custom);
    }

    #[test]
    fn mask_and_shadow_are_carried_through() {
        let path = Rect::new(0.0, 0.0, 10.0, 10.0).to_path(PATH_TOLERANCE);
        let rendering = Canvas::paint(Size::new(10.0, 10.0), &EmptyPalette, |ctx| {
            ctx.set_mask(path.clone());
            ctx.set_shadow(LayerShadow {
                path: path.clone(),
                color: peniko::Color::BLACK,
                offset: Vec2::new(0.0, 2.0),
                radius: 3.0,
            });
        });
        assert_eq!(rendering.mask, Some(path));
        assert_eq!(rendering.shadow.map(|s| s.radius), Some(3.0));
    }
}
