// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover backgrounds: a rounded panel with an arrow on one edge.
//!
//! [`PopoverLayout`] splits a popover's bounds into the arrow and the panel
//! behind the content, and builds the combined outline. The view style is
//! then rendered with that outline as its context path, so backgrounds,
//! borders and shadows all follow the arrow.

use core::f64::consts::{FRAC_PI_2, PI};

use kurbo::{Arc, BezPath, Insets, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::color::Palette;
use crate::context::{Canvas, Rendering};
use crate::geometry::{Corners, inset_rect};
use crate::registry::Catalog;
use crate::resolve::{ResolvedViewStyle, resolve_view_style};
use crate::style::ViewStyle;

/// Width of the arrow where it meets the panel.
pub const ARROW_BASE: f64 = 38.0;

/// Distance from the arrow's base to its tip.
pub const ARROW_HEIGHT: f64 = 20.0;

/// Insets of the content within the panel unless configured otherwise.
pub const DEFAULT_CONTENT_INSETS: Insets = Insets {
    x0: 10.0,
    y0: 10.0,
    x1: 10.0,
    y1: 10.0,
};

const TOLERANCE: f64 = 0.1;

/// Which edge the arrow sits on, named by where it points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowDirection {
    /// Arrow on the top edge.
    #[default]
    Up,
    /// Arrow on the bottom edge.
    Down,
    /// Arrow on the left edge.
    Left,
    /// Arrow on the right edge.
    Right,
}

/// Arrow and panel geometry for a popover of a given size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopoverLayout {
    /// Size of the whole popover.
    pub size: Size,
    /// Edge carrying the arrow.
    pub direction: ArrowDirection,
    /// Bounding box of the arrow.
    pub arrow_rect: Rect,
    /// The panel, one unit in from the edges left after the arrow.
    ///
    /// Collapses to an empty rect when the popover is too small for the arrow.
    pub background_rect: Rect,
}

impl PopoverLayout {
    /// Lay out a popover of `size`.
    ///
    /// `arrow_offset` moves the arrow along its edge, away from center.
    pub fn new(size: Size, direction: ArrowDirection, arrow_offset: f64) -> Self {
        let (mut left, mut top) = (0.0, 0.0);
        let (mut width, mut height) = (size.width, size.height);
        let along_x = size.width / 2.0 + arrow_offset - ARROW_BASE / 2.0;
        let along_y = size.height / 2.0 + arrow_offset - ARROW_BASE / 2.0;

        let arrow_rect = match direction {
            ArrowDirection::Up => {
                top += ARROW_HEIGHT;
                height -= ARROW_HEIGHT;
                Rect::from_origin_size((along_x, 0.0), (ARROW_BASE, ARROW_HEIGHT))
            }
            ArrowDirection::Down => {
                height -= ARROW_HEIGHT;
                Rect::from_origin_size((along_x, height), (ARROW_BASE, ARROW_HEIGHT))
            }
            ArrowDirection::Left => {
                left += ARROW_HEIGHT;
                width -= ARROW_HEIGHT;
                Rect::from_origin_size((0.0, along_y), (ARROW_HEIGHT, ARROW_BASE))
            }
            ArrowDirection::Right => {
                width -= ARROW_HEIGHT;
                Rect::from_origin_size((width, along_y), (ARROW_HEIGHT, ARROW_BASE))
            }
        };
        let panel = Rect::new(left, top, left + width, top + height);
        let background_rect = inset_rect(panel, Insets::uniform(1.0));

        Self {
            size,
            direction,
            arrow_rect,
            background_rect,
        }
    }

    /// Where the popover's content goes, given its insets within the panel.
    pub fn content_rect(&self, insets: Insets) -> Rect {
        inset_rect(self.background_rect, insets)
    }

    /// The panel outline with the arrow spliced into its edge.
    ///
    /// Corners not in `corners` stay square; `radius` is clamped to half the
    /// panel's shorter side.
    pub fn outline(&self, corners: Corners, radius: f64) -> BezPath {
        let bg = self.background_rect;
        let arrow = self.arrow_rect;
        let limit = (bg.width().min(bg.height()) / 2.0).max(0.0);
        let r = radius.clamp(0.0, limit);
        let mut path = BezPath::new();

        path.move_to((bg.x0, bg.y0 + r));
        corner(&mut path, corners.contains(Corners::TOP_LEFT), (bg.x0 + r, bg.y0 + r), PI, r, (bg.x0, bg.y0));
        if self.direction == ArrowDirection::Up {
            path.line_to((arrow.x0, bg.y0));
            path.line_to((arrow.center().x, arrow.y0 + 1.0));
            path.line_to((arrow.x1, bg.y0));
        }

        path.line_to((bg.x1 - r, bg.y0));
        corner(&mut path, corners.contains(Corners::TOP_RIGHT), (bg.x1 - r, bg.y0 + r), 1.5 * PI, r, (bg.x1, bg.y0));
        if self.direction == ArrowDirection::Right {
            path.line_to((bg.x1, arrow.y0));
            path.line_to((arrow.x1 - 1.0, arrow.center().y));
            path.line_to((bg.x1, arrow.y1));
        }

        path.line_to((bg.x1, bg.y1 - r));
        corner(&mut path, corners.contains(Corners::BOTTOM_RIGHT), (bg.x1 - r, bg.y1 - r), 0.0, r, (bg.x1, bg.y1));
        if self.direction == ArrowDirection::Down {
            path.line_to((arrow.x1, bg.y1));
            path.line_to((arrow.center().x, arrow.y1 - 1.0));
            path.line_to((arrow.x0, bg.y1));
        }

        path.line_to((bg.x0 + r, bg.y1));
        corner(&mut path, corners.contains(Corners::BOTTOM_LEFT), (bg.x0 + r, bg.y1 - r), FRAC_PI_2, r, (bg.x0, bg.y1));
        if self.direction == ArrowDirection::Left {
            path.line_to((bg.x0, arrow.y1));
            path.line_to((arrow.x0 + 1.0, arrow.center().y));
            path.line_to((bg.x0, arrow.y0));
        }

        path.close_path();
        path
    }
}

/// A quarter turn clockwise around `center`, or a square corner at `square`.
fn corner(
    path: &mut BezPath,
    rounded: bool,
    center: impl Into<Point>,
    start_angle: f64,
    radius: f64,
    square: impl Into<Point>,
) {
    if rounded && radius > 0.0 {
        let arc = Arc::new(center, Vec2::new(radius, radius), start_angle, FRAC_PI_2, 0.0);
        path.extend(arc.append_iter(TOLERANCE));
    } else {
        path.line_to(square);
    }
}

/// Render `style` as the background of a popover laid out as `layout`.
pub fn render_popover(
    style: &ResolvedViewStyle,
    layout: &PopoverLayout,
    palette: &dyn Palette,
) -> Rendering {
    let outline = layout.outline(style.rounded_corners, style.corner_radius);
    Canvas::paint(layout.size, palette, |ctx| {
        let rect = ctx.rect;
        style.render(&mut ctx.child(rect, Some(outline)));
    })
}

/// The look shared by an application's popovers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopoverStyle {
    /// Style of the panel and arrow.
    pub view_style: ViewStyle,
    /// Content insets within the panel.
    #[serde(default = "default_content_insets")]
    pub content_insets: Insets,
}

fn default_content_insets() -> Insets {
    DEFAULT_CONTENT_INSETS
}

impl PopoverStyle {
    /// Popovers drawn with `view_style` and the default content insets.
    pub fn new(view_style: ViewStyle) -> Self {
        Self {
            view_style,
            content_insets: DEFAULT_CONTENT_INSETS,
        }
    }

    /// This style with other content insets.
    #[must_use]
    pub fn with_content_insets(mut self, insets: Insets) -> Self {
        self.content_insets = insets;
        self
    }

    /// Where content goes in a popover laid out as `layout`.
    pub fn content_rect(&self, layout: &PopoverLayout) -> Rect {
        layout.content_rect(self.content_insets)
    }

    /// Resolve the view style against `catalog` and render the background.
    pub fn render(&self, layout: &PopoverLayout, catalog: &Catalog) -> Rendering {
        let style = resolve_view_style(&self.view_style, catalog);
        render_popover(&style, layout, catalog)
    }
}
