// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning resolved styles into drawing.
//!
//! Two composition rules exist:
//!
//! - A view style always draws in the same order: clip to the outline,
//!   install the mask, background, borders in order, inner shadow, outer
//!   shadow.
//! - A [`DrawingStyle`] is a free-form bag of attributes and draws them by
//!   descending render priority, keeping declaration order among equals,
//!   after running every prep callback once in declaration order.

use std::cmp::Reverse;
use std::sync::Arc;

use dynstyle_surface::{LayerOp, Raster, Rasterizer, StateOp, Surface};
use kurbo::{BezPath, Rect, Size};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::attribute::StyleAttribute;
use crate::color::Palette;
use crate::context::{Canvas, LayerShadow, RenderContext, Rendering};
use crate::geometry::rounded_rect_path;
use crate::name::StyleName;
use crate::resolve::ResolvedViewStyle;

/// A named collection of prioritized drawing attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawingStyle {
    /// Style identity.
    #[serde(default)]
    pub name: StyleName,
    /// Attributes in declaration order.
    #[serde(default)]
    pub attributes: Vec<StyleAttribute>,
}

impl DrawingStyle {
    /// An empty drawing style called `name`.
    pub fn new(name: impl Into<StyleName>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// This style with `attribute` appended.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<StyleAttribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Attributes in the order they render.
    pub fn render_order(&self) -> Vec<&StyleAttribute> {
        let mut order: Vec<&StyleAttribute> = self.attributes.iter().collect();
        // `sort_by_key` is stable, which keeps declaration order among equals.
        order.sort_by_key(|attr| Reverse(attr.render_priority));
        order
    }

    /// Run every prep callback, in declaration order.
    pub fn prepare(&self, ctx: &mut RenderContext<'_>) {
        for prep in self.attributes.iter().filter_map(|attr| attr.prep.as_ref()) {
            prep(ctx);
        }
    }

    /// Draw the style.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        self.prepare(ctx);
        for attr in self.render_order() {
            attr.attribute.render(ctx);
        }
    }
}

impl ResolvedViewStyle {
    /// Draw the style into the context.
    ///
    /// The outline is the context path when one is set (a popover's arrow
    /// outline, say), otherwise the rounded rectangle over the inset context
    /// rectangle.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        let rect = self.content_rect(ctx.rect);
        let outline = match &ctx.path {
            Some(path) => path.clone(),
            None => rounded_rect_path(rect, self.rounded_corners, self.corner_radius),
        };
        let mut inner = ctx.child(rect, Some(outline.clone()));

        inner
            .surface()
            .state(StateOp::PushLayer(LayerOp::clip(outline.clone())));
        if self.mask {
            inner.set_mask(outline);
        }
        if let Some(background) = &self.background {
            background.render(&mut inner);
        }
        for border in &self.borders {
            border.render(&mut inner);
        }
        if let Some(shadow) = &self.inner_shadow {
            shadow.render_inner(&mut inner);
        }
        inner.surface().state(StateOp::PopLayer);

        if let Some(shadow) = &self.outer_shadow {
            shadow.render(&mut inner);
        }
    }
}

/// A style ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedStyle {
    /// A resolved view style.
    View(ResolvedViewStyle),
    /// A drawing style.
    Drawing(DrawingStyle),
}

impl ResolvedStyle {
    /// Whether rasterization should happen off the calling thread.
    pub fn render_asynchronously(&self) -> bool {
        match self {
            Self::View(style) => style.render_asynchronously,
            Self::Drawing(_) => false,
        }
    }

    /// Draw the style.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        match self {
            Self::View(style) => style.render(ctx),
            Self::Drawing(style) => style.render(ctx),
        }
    }
}

/// Draw `style` for a view of `size`.
pub fn compose(style: &ResolvedStyle, size: Size, palette: &dyn Palette) -> Rendering {
    Canvas::paint(size, palette, |ctx| style.render(ctx))
}

/// A rasterized overlay and where it sits relative to the view.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterOverlay {
    /// Frame relative to the view's bounds origin.
    pub frame: Rect,
    /// Overlay pixels.
    pub raster: Arc<Raster>,
}

/// Everything the host applies to a view after a render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedContent {
    /// Display content.
    pub contents: Arc<Raster>,
    /// Overlay above the view, if any.
    pub overlay: Option<RasterOverlay>,
    /// Shape mask for the backing layer.
    pub mask: Option<BezPath>,
    /// Shadow for the backing layer.
    pub shadow: Option<LayerShadow>,
}

/// Rasterize a rendering's content and overlay.
pub fn rasterize_rendering(
    rendering: &Rendering,
    rasterizer: &dyn Rasterizer,
    scale: f64,
) -> RenderedContent {
    let contents = Arc::new(rasterizer.rasterize(&rendering.content, scale));
    let overlay = rendering.overlay.as_ref().map(|overlay| RasterOverlay {
        frame: overlay.frame,
        raster: Arc::new(rasterizer.rasterize(&overlay.content, scale)),
    });
    trace!(
        width = contents.width(),
        height = contents.height(),
        overlay = overlay.is_some(),
        "rasterized rendering"
    );
    RenderedContent {
        contents,
        overlay,
        mask: rendering.mask.clone(),
        shadow: rendering.shadow.clone(),
    }
}
