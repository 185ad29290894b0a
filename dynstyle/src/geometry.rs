// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Corner flags and outline construction.

use bitflags::bitflags;
use dynstyle_surface::PATH_TOLERANCE;
use kurbo::{BezPath, Insets, Rect, RoundedRect, RoundedRectRadii, Shape};
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which corners of a rectangle are rounded.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Corners: u8 {
        /// The top-left corner.
        const TOP_LEFT = 1 << 0;
        /// The top-right corner.
        const TOP_RIGHT = 1 << 1;
        /// The bottom-left corner.
        const BOTTOM_LEFT = 1 << 2;
        /// The bottom-right corner.
        const BOTTOM_RIGHT = 1 << 3;
        /// All four corners.
        const ALL = Self::TOP_LEFT.bits()
            | Self::TOP_RIGHT.bits()
            | Self::BOTTOM_LEFT.bits()
            | Self::BOTTOM_RIGHT.bits();
    }
}

impl Default for Corners {
    fn default() -> Self {
        Self::ALL
    }
}

impl Corners {
    /// Per-corner radii, with unrounded corners set to zero.
    ///
    /// The radius is clamped so that opposite corners never overlap.
    pub fn radii(self, rect: Rect, radius: f64) -> RoundedRectRadii {
        let limit = (rect.width().min(rect.height()) / 2.0).max(0.0);
        let r = radius.clamp(0.0, limit);
        let pick = |corner: Self| if self.contains(corner) { r } else { 0.0 };
        RoundedRectRadii::new(
            pick(Self::TOP_LEFT),
            pick(Self::TOP_RIGHT),
            pick(Self::BOTTOM_RIGHT),
            pick(Self::BOTTOM_LEFT),
        )
    }
}

/// The outline of `rect` with `corners` rounded at `radius`.
pub fn rounded_rect_path(rect: Rect, corners: Corners, radius: f64) -> BezPath {
    RoundedRect::from_rect(rect, corners.radii(rect, radius)).to_path(PATH_TOLERANCE)
}

/// Shrink `rect` by `insets`, collapsing to a zero-area rect at the centre
/// instead of inverting.
pub fn inset_rect(rect: Rect, insets: Insets) -> Rect {
    let x0 = rect.x0 + insets.x0;
    let y0 = rect.y0 + insets.y0;
    let x1 = rect.x1 - insets.x1;
    let y1 = rect.y1 - insets.y1;
    let (x0, x1) = if x1 < x0 {
        let mid = (x0 + x1) / 2.0;
        (mid, mid)
    } else {
        (x0, x1)
    };
    let (y0, y1) = if y1 < y0 {
        let mid = (y0 + y1) / 2.0;
        (mid, mid)
    } else {
        (y0, y1)
    };
    Rect::new(x0, y0, x1, y1)
}

/// A path covering `outer` with `hole` cut out, for use with the even-odd rule.
pub fn frame_path(outer: Rect, hole: &BezPath) -> BezPath {
    let mut path = outer.to_path(PATH_TOLERANCE);
    path.extend(hole.iter());
    path
}
