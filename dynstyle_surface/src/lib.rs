// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DynStyle Surface: the host drawing boundary for the styling engine.
//!
//! The styling engine never talks to a platform drawing API. Instead it
//! emits a small, plain‑old‑data (POD) program of [`StateOp`]s and
//! [`DrawOp`]s into a [`Surface`]. A [`RecordingSurface`] captures that
//! program as a [`Recording`], and a [`Rasterizer`] turns a recording into a
//! [`Raster`] of pixels that the host assigns as a view's display content.
//!
//! # Position in the stack
//!
//! - **Styles** (the `dynstyle` crate): named styles, resolution, and the
//!   compositor that decides what to draw and in which order.
//! - **Surface IR (this crate)**: paths, brushes and layers expressed as POD
//!   operations, plus the recording and rasterizer traits.
//! - **Rasterizers**: concrete pixel producers such as
//!   `dynstyle_surface_vello_cpu`.
//!
//! Unlike a general imaging IR, ops carry their geometry and paint inline.
//! Style rendering produces short, single-use programs, so there is no
//! resource table to manage.
//!
//! # Example
//!
//! ```
//! use dynstyle_surface::{DrawOp, FillRule, Surface, record};
//! use kurbo::{Rect, Shape, Size};
//! use peniko::{Brush, Color};
//!
//! let recording = record(Size::new(40.0, 20.0), |surface| {
//!     surface.draw(DrawOp::FillPath {
//!         path: Rect::new(0.0, 0.0, 40.0, 20.0).to_path(0.1),
//!         brush: Brush::Solid(Color::from_rgba8(255, 0, 0, 255)),
//!         fill_rule: FillRule::NonZero,
//!     });
//! });
//! assert_eq!(recording.ops().len(), 1);
//! ```

#![no_std]

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, BezPath, Size};
pub use peniko::{BlendMode, Brush, Fill as FillRule};

/// Stroke parameters used by [`DrawOp::StrokePath`].
///
/// This is a re-export of [`kurbo::Stroke`], which captures width, joins,
/// caps and dashes.
pub type StrokeStyle = kurbo::Stroke;

/// Flattening tolerance used when turning shapes into paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Image filter applied when a layer is composited into its parent.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterDesc {
    /// Gaussian blur of the layer contents.
    Blur {
        /// Standard deviation in user space units.
        std_deviation: f32,
    },
    /// Drop shadow under the layer contents.
    DropShadow {
        /// Shadow offset along the X axis (in user space units).
        dx: f32,
        /// Shadow offset along the Y axis (in user space units).
        dy: f32,
        /// Blur standard deviation (in user space units).
        std_deviation: f32,
        /// Shadow color.
        color: peniko::Color,
    },
}

/// A path-based clip attached to a pushed layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPath {
    /// Outline of the clip region in local coordinates.
    pub path: BezPath,
    /// Fill rule deciding the inside of `path`.
    pub fill_rule: FillRule,
}

impl ClipPath {
    /// Clip to the non-zero interior of `path`.
    #[inline]
    pub fn new(path: BezPath) -> Self {
        Self {
            path,
            fill_rule: FillRule::NonZero,
        }
    }
}

/// Parameters for a pushed compositing layer.
///
/// Layers are the only scoping mechanism: clipping, blending, opacity and
/// filters all apply to the contents drawn between a [`StateOp::PushLayer`]
/// and its matching [`StateOp::PopLayer`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerOp {
    /// Optional clip applied to this layer's contents.
    pub clip: Option<ClipPath>,
    /// Optional blend mode used when compositing this layer into its parent.
    pub blend: Option<BlendMode>,
    /// Optional opacity (0–1) applied when compositing this layer into its parent.
    pub opacity: Option<f32>,
    /// Optional filter applied when compositing this layer into its parent.
    pub filter: Option<FilterDesc>,
}

impl LayerOp {
    /// A layer that only clips to `path`.
    #[inline]
    pub fn clip(path: BezPath) -> Self {
        Self {
            clip: Some(ClipPath::new(path)),
            ..Self::default()
        }
    }

    /// A layer that composites its contents with `blend`.
    #[inline]
    pub fn blend(blend: BlendMode) -> Self {
        Self {
            blend: Some(blend),
            ..Self::default()
        }
    }

    /// Returns true if this layer changes how its contents are composited into its parent.
    #[inline]
    pub fn has_compositing_effects(&self) -> bool {
        self.filter.is_some() || self.blend.is_some() || self.opacity.is_some()
    }

    /// Returns true if this layer has no effect at all.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.clip.is_none() && !self.has_compositing_effects()
    }
}

/// State operations that mutate the current surface state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Set the current transform matrix.
    SetTransform(Affine),
    /// Push a new layer onto the layer stack.
    ///
    /// Layers must be well-nested: every `PushLayer` must eventually be
    /// matched by a [`StateOp::PopLayer`].
    PushLayer(LayerOp),
    /// Pop the most recently pushed layer.
    PopLayer,
}

/// Draw operations that produce pixels given the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill a path with a brush.
    FillPath {
        /// Path to fill.
        path: BezPath,
        /// Paint used for the interior.
        brush: Brush,
        /// Rule deciding the interior of `path`.
        fill_rule: FillRule,
    },
    /// Stroke a path with a brush.
    StrokePath {
        /// Path to stroke.
        path: BezPath,
        /// Stroke parameters.
        stroke: StrokeStyle,
        /// Paint used for the stroke.
        brush: Brush,
    },
}

/// A single recorded surface operation.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// State-changing operation.
    State(StateOp),
    /// Drawing operation.
    Draw(DrawOp),
}

/// A drawing target that accepts surface operations.
pub trait Surface {
    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);
}

/// Convenience helpers layered on top of [`Surface`].
pub trait SurfaceExt: Surface {
    /// Run `f` inside a layer, popping it afterwards.
    ///
    /// No-op layers are elided entirely.
    fn with_layer(&mut self, layer: LayerOp, f: impl FnOnce(&mut Self)) {
        if layer.is_noop() {
            f(self);
            return;
        }
        self.state(StateOp::PushLayer(layer));
        f(self);
        self.state(StateOp::PopLayer);
    }
}

impl<S: Surface + ?Sized> SurfaceExt for S {}

/// A [`Surface`] that records every operation it receives.
///
/// The recorder also tracks the layer depth so tests and debugging tools can
/// assert that programs are well-nested.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    depth: u32,
    max_depth: u32,
}

impl RecordingSurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations recorded so far.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Current layer stack depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Deepest layer nesting observed.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Finish recording, producing a [`Recording`] for a surface of `size`.
    ///
    /// Any layers left open are closed so the recording stays well-nested.
    pub fn finish(mut self, size: Size) -> Recording {
        while self.depth > 0 {
            self.state(StateOp::PopLayer);
        }
        Recording {
            ops: Arc::from(self.ops),
            size,
        }
    }
}

impl Surface for RecordingSurface {
    fn state(&mut self, op: StateOp) {
        match &op {
            StateOp::PushLayer(_) => {
                self.depth += 1;
                self.max_depth = self.max_depth.max(self.depth);
            }
            StateOp::PopLayer => {
                // An unmatched pop is dropped rather than recorded.
                if self.depth == 0 {
                    return;
                }
                self.depth -= 1;
            }
            StateOp::SetTransform(_) => {}
        }
        self.ops.push(SurfaceOp::State(op));
    }

    fn draw(&mut self, op: DrawOp) {
        self.ops.push(SurfaceOp::Draw(op));
    }
}

/// A finished, immutable program of surface operations.
///
/// Recordings are cheap to clone and can be sent to a background thread for
/// rasterization.
#[derive(Clone, PartialEq)]
pub struct Recording {
    ops: Arc<[SurfaceOp]>,
    size: Size,
}

impl fmt::Debug for Recording {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recording")
            .field("ops", &self.ops.len())
            .field("size", &self.size)
            .finish()
    }
}

impl Recording {
    /// Recorded operations in order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Logical size of the surface this recording was made for.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over the draw operations only.
    pub fn draws(&self) -> impl Iterator<Item = &DrawOp> + '_ {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Draw(draw) => Some(draw),
            SurfaceOp::State(_) => None,
        })
    }

    /// Replay this recording into another surface.
    pub fn replay(&self, surface: &mut dyn Surface) {
        for op in self.ops.iter() {
            match op {
                SurfaceOp::State(state) => surface.state(state.clone()),
                SurfaceOp::Draw(draw) => surface.draw(draw.clone()),
            }
        }
    }
}

/// Record the operations issued by `f` into a [`Recording`] of `size`.
pub fn record(size: Size, f: impl FnOnce(&mut RecordingSurface)) -> Recording {
    let mut surface = RecordingSurface::new();
    f(&mut surface);
    surface.finish(size)
}

/// Rasterized pixels: straight-alpha RGBA8, row-major, tightly packed.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Raster {
    /// Wrap an RGBA8 pixel buffer.
    ///
    /// Returns `None` if `pixels` is not exactly `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 4;
        Self {
            width,
            height,
            pixels: alloc::vec![0; len],
        }
    }

    /// Width in device pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in device pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The raw RGBA8 buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// The `[r, g, b, a]` value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Turns recordings into pixels.
///
/// Implementations must be shareable across threads: the render scheduler
/// hands the same rasterizer to its background queue.
pub trait Rasterizer: Send + Sync {
    /// Rasterize `recording` at `scale` device pixels per logical unit.
    fn rasterize(&self, recording: &Recording, scale: f64) -> Raster;
}

/// Device pixel dimensions for a logical `size` at `scale`.
///
/// Dimensions are rounded up and clamped into `u16`, which is the largest
/// target the CPU rasterizer accepts.
pub fn device_size(size: Size, scale: f64) -> (u16, u16) {
    fn dim(v: f64) -> u16 {
        let v = v.ceil();
        if v.is_nan() || v <= 0.0 {
            0
        } else if v >= f64::from(u16::MAX) {
            u16::MAX
        } else {
            // Range checked above.
            #[expect(clippy::cast_possible_truncation, reason = "clamped into u16 range")]
            let d = v as u16;
            d
        }
    }
    (dim(size.width * scale), dim(size.height * scale))
}
