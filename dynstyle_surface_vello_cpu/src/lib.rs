// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vello CPU–backed rasterizer for dynstyle surface recordings.
//!
//! [`VelloCpuSurface`] implements [`Surface`] on top of the sparse-strips
//! [`vello_cpu::RenderContext`], and [`VelloCpuRasterizer`] wraps it into a
//! [`Rasterizer`] that replays a [`Recording`] into a fresh pixmap.

#![deny(unsafe_code)]
#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use dynstyle_surface::{
    ClipPath, DrawOp, FillRule, FilterDesc, LayerOp, Raster, Rasterizer, Recording, StateOp,
    StrokeStyle, Surface, device_size,
};
use kurbo::{Affine, Cap, Join};
use peniko::{Brush, Fill};
use vello_common::filter_effects::{EdgeMode, Filter, FilterPrimitive};
use vello_cpu::kurbo::{Affine as CpuAffine, Cap as CpuCap, Join as CpuJoin, Stroke};
use vello_cpu::{Pixmap, RenderContext, RenderMode, RenderSettings};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StackEntry {
    Noop,
    Pushed,
}

fn fill_for(rule: FillRule) -> Fill {
    match rule {
        FillRule::NonZero => Fill::NonZero,
        FillRule::EvenOdd => Fill::EvenOdd,
    }
}

fn affine_to_cpu(xf: Affine) -> CpuAffine {
    CpuAffine::new(xf.as_coeffs())
}

fn stroke_to_cpu(style: &StrokeStyle) -> Stroke {
    let mut stroke = Stroke::new(style.width);
    stroke.miter_limit = style.miter_limit;
    stroke.join = match style.join {
        Join::Bevel => CpuJoin::Bevel,
        Join::Miter => CpuJoin::Miter,
        Join::Round => CpuJoin::Round,
    };
    stroke.start_cap = match style.start_cap {
        Cap::Butt => CpuCap::Butt,
        Cap::Round => CpuCap::Round,
        Cap::Square => CpuCap::Square,
    };
    stroke.end_cap = match style.end_cap {
        Cap::Butt => CpuCap::Butt,
        Cap::Round => CpuCap::Round,
        Cap::Square => CpuCap::Square,
    };
    stroke
}

fn filter_to_vello(filter: FilterDesc) -> Filter {
    // `vello_cpu` scales filter parameters using the layer's transform internally,
    // so user-space values pass straight through.
    match filter {
        FilterDesc::Blur { std_deviation } => {
            Filter::from_primitive(FilterPrimitive::GaussianBlur {
                std_deviation,
                edge_mode: EdgeMode::None,
            })
        }
        FilterDesc::DropShadow {
            dx,
            dy,
            std_deviation,
            color,
        } => Filter::from_primitive(FilterPrimitive::DropShadow {
            dx,
            dy,
            std_deviation,
            color,
            edge_mode: EdgeMode::None,
        }),
    }
}

/// A [`Surface`] that draws directly into a `vello_cpu` render context.
pub struct VelloCpuSurface<'ctx> {
    /// Underlying Vello CPU render context to draw into.
    pub ctx: &'ctx mut RenderContext,
    /// Device transform applied underneath every `SetTransform`.
    base: Affine,
    stack: Vec<StackEntry>,
}

impl fmt::Debug for VelloCpuSurface<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VelloCpuSurface")
            .field("base", &self.base)
            .field("depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<'ctx> VelloCpuSurface<'ctx> {
    /// Create a surface drawing into `ctx` with logical units scaled by `scale`.
    pub fn new(ctx: &'ctx mut RenderContext, scale: f64) -> Self {
        let base = Affine::scale(scale);
        ctx.set_transform(affine_to_cpu(base));
        Self {
            ctx,
            base,
            stack: Vec::new(),
        }
    }

    fn set_brush(&mut self, brush: Brush) {
        match brush {
            Brush::Solid(color) => self.ctx.set_paint(color),
            Brush::Gradient(gradient) => self.ctx.set_paint(gradient),
            // Style rendering never emits image brushes.
            Brush::Image(_) => self.ctx.set_paint(peniko::Color::TRANSPARENT),
        }
    }

    /// Pop any layers still open, so the context can be flushed.
    pub fn close_layers(&mut self) {
        while let Some(entry) = self.stack.pop() {
            if entry == StackEntry::Pushed {
                self.ctx.pop_layer();
            }
        }
    }
}

impl Surface for VelloCpuSurface<'_> {
    fn state(&mut self, op: StateOp) {
        match op {
            StateOp::SetTransform(xf) => {
                self.ctx.set_transform(affine_to_cpu(self.base * xf));
            }
            StateOp::PushLayer(layer) => {
                if layer.is_noop() {
                    self.stack.push(StackEntry::Noop);
                    return;
                }
                let LayerOp {
                    clip,
                    blend,
                    opacity,
                    filter,
                } = layer;
                let filter = filter.map(filter_to_vello);
                match clip {
                    Some(ClipPath { path, fill_rule }) => {
                        self.ctx.set_fill_rule(fill_for(fill_rule));
                        self.ctx.push_layer(Some(&path), blend, opacity, None, filter);
                        self.ctx.set_fill_rule(Fill::NonZero);
                    }
                    None => self.ctx.push_layer(None, blend, opacity, None, filter),
                }
                self.stack.push(StackEntry::Pushed);
            }
            StateOp::PopLayer => match self.stack.pop() {
                Some(StackEntry::Pushed) => self.ctx.pop_layer(),
                Some(StackEntry::Noop) | None => {}
            },
        }
    }

    fn draw(&mut self, op: DrawOp) {
        match op {
            DrawOp::FillPath {
                path,
                brush,
                fill_rule,
            } => {
                self.set_brush(brush);
                self.ctx.set_fill_rule(fill_for(fill_rule));
                self.ctx.fill_path(&path);
                self.ctx.set_fill_rule(Fill::NonZero);
            }
            DrawOp::StrokePath {
                path,
                stroke,
                brush,
            } => {
                self.set_brush(brush);
                self.ctx.set_stroke(stroke_to_cpu(&stroke));
                self.ctx.stroke_path(&path);
            }
        }
    }
}

/// A [`Rasterizer`] that renders recordings with `vello_cpu`.
///
/// Each call creates its own render context, so one rasterizer can be shared
/// between the UI thread and a background render queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct VelloCpuRasterizer;

impl VelloCpuRasterizer {
    /// Create a new rasterizer.
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for VelloCpuRasterizer {
    fn rasterize(&self, recording: &Recording, scale: f64) -> Raster {
        let (width, height) = device_size(recording.size(), scale);
        if width == 0 || height == 0 {
            return Raster::transparent(u32::from(width), u32::from(height));
        }

        let settings = RenderSettings {
            // Keep the u8 pipeline so output is stable across feature sets.
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        let mut ctx = RenderContext::new_with(width, height, settings);
        {
            let mut surface = VelloCpuSurface::new(&mut ctx, scale);
            recording.replay(&mut surface);
            surface.close_layers();
        }

        let mut pixmap = Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let unpremul = pixmap.take_unpremultiplied();
        let mut bytes = Vec::with_capacity(unpremul.len() * 4);
        for p in unpremul {
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        Raster::from_rgba8(u32::from(width), u32::from(height), bytes)
            .unwrap_or_else(|| Raster::transparent(u32::from(width), u32::from(height)))
    }
}
