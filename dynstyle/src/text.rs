// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text styles and the attributes they produce.

use core::fmt::{self, Write as _};

use kurbo::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::{Color, Palette};
use crate::name::StyleName;
use crate::shadow::Shadow;
use crate::style::Originality;

/// Family used when no text style in the chain names one.
pub const DEFAULT_FONT_FAMILY: &str = "System";

/// Point size used when no text style in the chain sets one.
pub const DEFAULT_FONT_SIZE: f64 = 17.0;

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    /// Leading edge for the script's direction.
    #[default]
    Natural,
    /// Left.
    Left,
    /// Centered.
    Center,
    /// Right.
    Right,
    /// Justified.
    Justified,
}

impl TextAlignment {
    /// The CSS `text-align` keyword.
    pub fn css_keyword(self) -> &'static str {
        match self {
            Self::Natural => "start",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justified => "justify",
        }
    }
}

/// A font family at a point size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontDescription {
    /// Family name.
    pub family: String,
    /// Point size.
    pub size: f64,
}

impl Default for FontDescription {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_owned(),
            size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Typography for labels, buttons and text fields.
///
/// Family and size fall back independently, so a style may override only the
/// size of an inherited family.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Style identity.
    #[serde(default)]
    pub name: StyleName,
    /// Whether unset fields fall back to the registered style.
    #[serde(default)]
    pub originality: Originality,
    /// Font family. Default: [`DEFAULT_FONT_FAMILY`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Point size. Default: [`DEFAULT_FONT_SIZE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Alignment. Default: natural.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<TextAlignment>,
    /// Foreground color. Default: opaque black.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Text shadow. Default: none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Foreground color while highlighted. Default: none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_text_color: Option<Color>,
}

impl TextStyle {
    /// A new text style called `name`, with nothing set.
    pub fn new(name: impl Into<StyleName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A text style called `name` that falls back to the registered one.
    pub fn saved(name: impl Into<StyleName>) -> Self {
        Self {
            name: name.into(),
            originality: Originality::Saved,
            ..Self::default()
        }
    }

    /// Set the font family.
    #[must_use]
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Set the point size.
    #[must_use]
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the alignment.
    #[must_use]
    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set the foreground color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the text shadow.
    #[must_use]
    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Set the highlighted foreground color.
    #[must_use]
    pub fn with_highlighted_text_color(mut self, color: Color) -> Self {
        self.highlighted_text_color = Some(color);
        self
    }
}

/// A resolved text shadow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextShadow {
    /// Shadow color.
    pub color: peniko::Color,
    /// Offset.
    pub offset: Vec2,
    /// Blur radius.
    pub radius: f64,
}

/// Concrete attributes for laying out and drawing a run of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextAttributes {
    /// Font.
    pub font: FontDescription,
    /// Alignment.
    pub alignment: TextAlignment,
    /// Foreground color.
    pub foreground: peniko::Color,
    /// Shadow, if any.
    pub shadow: Option<TextShadow>,
}

impl TextAttributes {
    /// The attributes as CSS declarations.
    ///
    /// ```
    /// use dynstyle::{FontDescription, TextAlignment, TextAttributes};
    ///
    /// let attrs = TextAttributes {
    ///     font: FontDescription { family: "Helvetica".into(), size: 14.0 },
    ///     alignment: TextAlignment::Center,
    ///     foreground: peniko::Color::from_rgba8(255, 0, 0, 255),
    ///     shadow: None,
    /// };
    /// assert_eq!(
    ///     attrs.to_css(),
    ///     "font-family: \"Helvetica\"; font-size: 14px; color: rgba(255, 0, 0, 1); text-align: center;"
    /// );
    /// ```
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_css(&mut css);
        css
    }

    fn write_css(&self, out: &mut String) -> fmt::Result {
        write!(
            out,
            "font-family: \"{}\"; font-size: {}px; color: {}; text-align: {};",
            self.font.family,
            self.font.size,
            CssColor(self.foreground),
            self.alignment.css_keyword(),
        )?;
        if let Some(shadow) = &self.shadow {
            write!(
                out,
                " text-shadow: {}px {}px {}px {};",
                shadow.offset.x,
                shadow.offset.y,
                shadow.radius,
                CssColor(shadow.color),
            )?;
        }
        Ok(())
    }
}

struct CssColor(peniko::Color);

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0.to_rgba8().to_u8_array();
        let alpha = (f64::from(a) / 255.0 * 1000.0).round() / 1000.0;
        write!(f, "rgba({r}, {g}, {b}, {alpha})")
    }
}

impl Shadow {
    /// This shadow as a text shadow, with its color resolved.
    pub fn to_text_shadow(&self, palette: &dyn Palette) -> TextShadow {
        TextShadow {
            color: self.color.resolve(palette),
            offset: self.offset,
            radius: self.radius,
        }
    }
}
