// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Literal and palette-referenced colors.

use kurbo::Rect;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::context::RenderContext;
use crate::name::StyleName;

/// The color a resolution falls back to when a palette reference is missing.
pub const FALLBACK_COLOR: peniko::Color = peniko::Color::TRANSPARENT;

/// Palette references deeper than this resolve to [`FALLBACK_COLOR`].
const MAX_REFERENCE_DEPTH: usize = 8;

/// Lookup of named colors.
///
/// The style registry's catalog is the usual palette; tests and tools can
/// supply their own.
pub trait Palette {
    /// Find the color registered under `name`.
    fn find_color(&self, name: &StyleName) -> Option<&Color>;
}

/// A palette with no colors.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyPalette;

impl Palette for EmptyPalette {
    fn find_color(&self, _name: &StyleName) -> Option<&Color> {
        None
    }
}

/// Where a [`Color`] gets its base value from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSource {
    /// A literal color.
    Rgba(#[serde(with = "components")] peniko::Color),
    /// A reference to a palette entry.
    Named(StyleName),
}

/// A color attribute.
///
/// A color is either a literal or a reference into the palette, adjusted by
/// an alpha multiplier and a signed brightness adjustment (positive lightens,
/// negative darkens, applied multiplicatively to HSB brightness).
///
/// A color registered in the palette carries its own `name`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Identity of this color when registered in a palette.
    #[serde(default, skip_serializing_if = "StyleName::is_none")]
    pub name: StyleName,
    /// Base value.
    pub source: ColorSource,
    /// Alpha multiplier in `0..=1`.
    #[serde(default = "one")]
    pub alpha: f32,
    /// Brightness adjustment in `-1..=1`.
    #[serde(default)]
    pub brightness: f32,
}

fn one() -> f32 {
    1.0
}

impl Color {
    /// A literal color.
    pub fn new(color: peniko::Color) -> Self {
        Self {
            name: StyleName::NONE,
            source: ColorSource::Rgba(color),
            alpha: 1.0,
            brightness: 0.0,
        }
    }

    /// A literal color from 8-bit components.
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(peniko::Color::from_rgba8(r, g, b, a))
    }

    /// A reference to the palette entry called `name`.
    pub fn reference(name: impl Into<StyleName>) -> Self {
        Self {
            name: StyleName::NONE,
            source: ColorSource::Named(name.into()),
            alpha: 1.0,
            brightness: 0.0,
        }
    }

    /// This color, registered under `name`.
    #[must_use]
    pub fn named(mut self, name: impl Into<StyleName>) -> Self {
        self.name = name.into();
        self
    }

    /// This color with an alpha multiplier.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// This color with a brightness adjustment.
    #[must_use]
    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    /// The concrete color after palette lookup, brightness and alpha.
    ///
    /// Missing palette entries resolve to [`FALLBACK_COLOR`]; this never fails.
    pub fn resolve(&self, palette: &dyn Palette) -> peniko::Color {
        self.resolve_at(palette, 0)
    }

    fn resolve_at(&self, palette: &dyn Palette, depth: usize) -> peniko::Color {
        let base = match &self.source {
            ColorSource::Rgba(color) => *color,
            ColorSource::Named(name) => {
                if depth >= MAX_REFERENCE_DEPTH {
                    trace!(%name, "palette reference chain too deep");
                    return FALLBACK_COLOR;
                }
                match palette.find_color(name) {
                    Some(entry) => entry.resolve_at(palette, depth + 1),
                    None => {
                        trace!(%name, "palette color not found");
                        return FALLBACK_COLOR;
                    }
                }
            }
        };
        let adjusted = adjust_brightness(base, self.brightness);
        adjusted.multiply_alpha(self.alpha.clamp(0.0, 1.0))
    }

    /// Fill the context's rectangle with this color.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        let rect: Rect = ctx.rect;
        let color = self.resolve(ctx.palette);
        ctx.fill_rect(rect, peniko::Brush::Solid(color));
    }
}

/// Scale HSB brightness by `1 + amount`, keeping hue and saturation.
///
/// With hue and saturation fixed, HSB brightness is the largest RGB
/// component, so scaling it is a uniform scale of all three channels.
fn adjust_brightness(color: peniko::Color, amount: f32) -> peniko::Color {
    if amount == 0.0 {
        return color;
    }
    let [r, g, b, a] = color.components;
    let value = r.max(g).max(b);
    if value <= 0.0 {
        return color;
    }
    let target = (value * (1.0 + amount)).clamp(0.0, 1.0);
    let factor = target / value;
    peniko::Color::new([
        (r * factor).clamp(0.0, 1.0),
        (g * factor).clamp(0.0, 1.0),
        (b * factor).clamp(0.0, 1.0),
        a,
    ])
}

/// Serde adapter storing a color as its four float components.
mod components {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S: Serializer>(
        color: &peniko::Color,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        color.components.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<peniko::Color, D::Error> {
        let components = <[f32; 4]>::deserialize(deserializer)?;
        Ok(peniko::Color::new(components))
    }
}
