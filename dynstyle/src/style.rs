// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View, button and text style values.
//!
//! Style values are immutable: every `with_*` builder returns a new value.
//! Each field is an explicit override; unset fields are filled in during
//! resolution, either from the registered backing style (for
//! [`Originality::Saved`] styles) or from the documented default.

use kurbo::Insets;
use serde::{Deserialize, Serialize};

use crate::border::Border;
use crate::fill::Fill;
use crate::geometry::Corners;
use crate::name::StyleName;
use crate::shadow::Shadow;
use crate::text::TextStyle;

/// Whether a style falls back to the registered style of the same name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Originality {
    /// Only explicitly set fields; everything else is a default.
    #[default]
    New,
    /// Unset fields come from the registered style with the same name.
    Saved,
}

/// Decoration of a plain view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewStyle {
    /// Style identity.
    #[serde(default)]
    pub name: StyleName,
    /// Whether unset fields fall back to the registered style.
    #[serde(default)]
    pub originality: Originality,
    /// Background paint. Default: none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Fill>,
    /// Borders, drawn in order. Default: none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borders: Option<Vec<Border>>,
    /// Corners rounded by `corner_radius`. Default: all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounded_corners: Option<Corners>,
    /// Corner radius. Default: `0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    /// Shadow drawn inside the outline. Default: none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_shadow: Option<Shadow>,
    /// Shadow cast by the backing layer. Default: none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_shadow: Option<Shadow>,
    /// Whether the host clips its backing layer to the outline. Default: `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<bool>,
    /// Insets applied to the bounds before deriving the outline. Default: zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_inset: Option<Insets>,
    /// Whether rasterization happens on the background queue. Default: `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_asynchronously: Option<bool>,
}

impl ViewStyle {
    /// A new style called `name`, with nothing set.
    pub fn new(name: impl Into<StyleName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A style called `name` that falls back to the registered style of
    /// that name.
    pub fn saved(name: impl Into<StyleName>) -> Self {
        Self {
            name: name.into(),
            originality: Originality::Saved,
            ..Self::default()
        }
    }

    /// Set the background.
    #[must_use]
    pub fn with_background(mut self, background: impl Into<Fill>) -> Self {
        self.background = Some(background.into());
        self
    }

    /// Replace the borders.
    #[must_use]
    pub fn with_borders(mut self, borders: impl IntoIterator<Item = Border>) -> Self {
        self.borders = Some(borders.into_iter().collect());
        self
    }

    /// Append one border.
    #[must_use]
    pub fn with_border(mut self, border: Border) -> Self {
        self.borders.get_or_insert_with(Vec::new).push(border);
        self
    }

    /// Set which corners are rounded.
    #[must_use]
    pub fn with_rounded_corners(mut self, corners: Corners) -> Self {
        self.rounded_corners = Some(corners);
        self
    }

    /// Set the corner radius.
    #[must_use]
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    /// Set the inner shadow.
    #[must_use]
    pub fn with_inner_shadow(mut self, shadow: Shadow) -> Self {
        self.inner_shadow = Some(shadow);
        self
    }

    /// Set the outer shadow.
    #[must_use]
    pub fn with_outer_shadow(mut self, shadow: Shadow) -> Self {
        self.outer_shadow = Some(shadow);
        self
    }

    /// Set whether the backing layer is masked to the outline.
    #[must_use]
    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Set the render inset.
    #[must_use]
    pub fn with_render_inset(mut self, inset: Insets) -> Self {
        self.render_inset = Some(inset);
        self
    }

    /// Set whether rasterization runs on the background queue.
    #[must_use]
    pub fn with_render_asynchronously(mut self, asynchronously: bool) -> Self {
        self.render_asynchronously = Some(asynchronously);
        self
    }
}

/// Interaction state of a button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    /// Idle.
    #[default]
    Normal,
    /// Pressed.
    Highlighted,
    /// Not interactive.
    Disabled,
}

/// Decoration of a button: a view style per state and a title style.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonStyle {
    /// Style identity.
    #[serde(default)]
    pub name: StyleName,
    /// Whether unset fields fall back to the registered style.
    #[serde(default)]
    pub originality: Originality,
    /// View style in the normal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_style: Option<ViewStyle>,
    /// View style while highlighted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_view_style: Option<ViewStyle>,
    /// View style while disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_view_style: Option<ViewStyle>,
    /// Title style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

impl ButtonStyle {
    /// A new button style called `name`, with nothing set.
    pub fn new(name: impl Into<StyleName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A button style called `name` that falls back to the registered one.
    pub fn saved(name: impl Into<StyleName>) -> Self {
        Self {
            name: name.into(),
            originality: Originality::Saved,
            ..Self::default()
        }
    }

    /// Set the normal view style.
    #[must_use]
    pub fn with_view_style(mut self, style: ViewStyle) -> Self {
        self.view_style = Some(style);
        self
    }

    /// Set the highlighted view style.
    #[must_use]
    pub fn with_highlighted_view_style(mut self, style: ViewStyle) -> Self {
        self.highlighted_view_style = Some(style);
        self
    }

    /// Set the disabled view style.
    #[must_use]
    pub fn with_disabled_view_style(mut self, style: ViewStyle) -> Self {
        self.disabled_view_style = Some(style);
        self
    }

    /// Set the title style.
    #[must_use]
    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = Some(style);
        self
    }
}

/// Any registrable style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Style {
    /// A view style.
    View(ViewStyle),
    /// A button style.
    Button(ButtonStyle),
    /// A text style.
    Text(TextStyle),
}

impl Style {
    /// The style's name.
    pub fn name(&self) -> &StyleName {
        match self {
            Self::View(style) => &style.name,
            Self::Button(style) => &style.name,
            Self::Text(style) => &style.name,
        }
    }

    /// The style's originality.
    pub fn originality(&self) -> Originality {
        match self {
            Self::View(style) => style.originality,
            Self::Button(style) => style.originality,
            Self::Text(style) => style.originality,
        }
    }
}

impl From<ViewStyle> for Style {
    fn from(style: ViewStyle) -> Self {
        Self::View(style)
    }
}

impl From<ButtonStyle> for Style {
    fn from(style: ButtonStyle) -> Self {
        Self::Button(style)
    }
}

impl From<TextStyle> for Style {
    fn from(style: TextStyle) -> Self {
        Self::Text(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderType;
    use crate::color::Color;

    #[test]
    fn builders_produce_new_values() {
        let base = ViewStyle::new("Card");
        let rounded = base.clone().with_corner_radius(4.0);
        assert_eq!(base.corner_radius, None);
        assert_eq!(rounded.corner_radius, Some(4.0));
        assert_eq!(rounded.name, StyleName::new("Card"));
    }

    #[test]
    fn with_border_appends() {
        let border = Border::new(1.0, Color::rgba8(0, 0, 0, 255), BorderType::InnerStroke);
        let style = ViewStyle::new("x").with_border(border.clone()).with_border(border);
        assert_eq!(style.borders.map(|b| b.len()), Some(2));
    }

    #[test]
    fn unset_fields_are_absent_when_serialized() {
        let json = serde_json::to_value(ViewStyle::new("Card").with_corner_radius(4.0)).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("corner_radius"));
        assert!(!object.contains_key("background"));
        assert!(!object.contains_key("mask"));
    }

    #[test]
    fn style_enum_is_tagged_by_kind() {
        let json = serde_json::to_value(Style::from(ButtonStyle::saved("Primary"))).unwrap();
        assert_eq!(json["kind"], "button");
        assert_eq!(json["originality"], "saved");
        let back: Style = serde_json::from_value(json).unwrap();
        assert_eq!(back.originality(), Originality::Saved);
        assert_eq!(back.name(), &StyleName::new("Primary"));
    }
}
