// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DynStyle: declarative, named visual styles for views.
//!
//! Applications describe how views look (fills, gradients, borders, shadows,
//! corner rounding, masks and text attributes) as plain style values. Styles
//! are registered under names once at startup and applied to views by name.
//! The engine resolves a style through its registry and turns it into a
//! drawing program that a [`Rasterizer`](dynstyle_surface::Rasterizer)
//! renders into the view's display content.
//!
//! ## Core concepts
//!
//! ### Styles and names
//!
//! [`ViewStyle`], [`ButtonStyle`] and [`TextStyle`] hold optional fields. A
//! style built with `new` carries its own values; one built with `saved` is a
//! reference to the registered style of the same name, and unset fields fall
//! back along that chain to engine defaults. The empty [`StyleName`] never
//! matches a registered style.
//!
//! ### Registry
//!
//! [`StyleRegistry`] holds the registered colors, styles and drawing styles.
//! Reads take a cheap [`Catalog`] snapshot; re-initialization swaps the whole
//! catalog, so a resolution never observes a half-updated registry.
//!
//! ```
//! use dynstyle::{Color, StyleName, StyleRegistry, ViewStyle, resolve_view_style};
//!
//! let registry = StyleRegistry::new();
//! registry.register_colors([Color::rgba8(20, 120, 220, 255).named("accent")]);
//! registry.register([ViewStyle::new("Card")
//!     .with_corner_radius(4.0)
//!     .with_background(Color::reference("accent"))]);
//!
//! // A saved reference picks up every field of the registered style.
//! let catalog = registry.snapshot();
//! let resolved = resolve_view_style(&ViewStyle::saved("Card"), &catalog);
//! assert_eq!(resolved.corner_radius, 4.0);
//! assert!(registry.find_view_style(&StyleName::new("Missing")).is_none());
//! ```
//!
//! ### Composition
//!
//! A resolved view style draws in a fixed order: outline clip, mask,
//! background, borders, inner shadow, outer shadow. A [`DrawingStyle`] draws
//! its attributes by descending render priority, stable among equals. Outer
//! strokes land on an overlay drawn above the view so they are not clipped
//! by its bounds.
//!
//! ### Scheduling
//!
//! [`RenderScheduler`] rasterizes a [`StyledView`] whenever its bounds
//! change to something new and non-empty. Styles that ask for it are
//! rasterized on a serial background thread; stale results are discarded by
//! generation.
//!
//! ### Persistence
//!
//! Every style value serializes with `serde`. The [`codec`] module adds the
//! tagged envelope used to persist values of any registered type.

mod attribute;
mod border;
pub mod codec;
mod color;
mod compositor;
mod config;
mod context;
mod fill;
mod geometry;
mod gradient;
mod label;
mod name;
mod popover;
mod registry;
mod resolve;
mod scheduler;
mod shadow;
mod style;
mod text;

pub use attribute::{DrawingStyleAttribute, PrepFn, StyleAttribute};
pub use border::{Border, BorderBlend, BorderType};
pub use codec::{AnyStyleValue, CodecError, StyleValue};
pub use color::{Color, ColorSource, EmptyPalette, FALLBACK_COLOR, Palette};
pub use compositor::{
    DrawingStyle, RasterOverlay, RenderedContent, ResolvedStyle, compose, rasterize_rendering,
};
pub use config::{DEFAULT_QUEUE_NAME, RenderConfig};
pub use context::{Canvas, LayerShadow, Overlay, RenderContext, Rendering};
pub use fill::Fill;
pub use geometry::{Corners, frame_path, inset_rect, rounded_rect_path};
pub use gradient::{Gradient, GradientStop};
pub use label::{AttributedText, StyledLabel};
pub use name::StyleName;
pub use popover::{
    ARROW_BASE, ARROW_HEIGHT, ArrowDirection, DEFAULT_CONTENT_INSETS, PopoverLayout, PopoverStyle,
    render_popover,
};
pub use registry::{Catalog, StyleRegistry, StyleSheet};
pub use resolve::{
    ResolvedButtonStyle, ResolvedTextStyle, ResolvedViewStyle, resolve_button_style,
    resolve_text_style, resolve_view_style,
};
pub use scheduler::{
    CompletedRender, RenderOutcome, RenderScheduler, RenderState, SkipReason, StyleBinding,
    StyledView, ViewHost, ViewId,
};
pub use shadow::Shadow;
pub use style::{ButtonState, ButtonStyle, Originality, Style, ViewStyle};
pub use text::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, FontDescription, TextAlignment, TextAttributes,
    TextShadow, TextStyle,
};
