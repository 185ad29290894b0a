// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution of saved styles into fully materialized values.
//!
//! A [`Saved`](Originality::Saved) style defers each unset field to the
//! registered style of the same name. That registered style ends the chain,
//! even when it is itself saved, since its backing style would be itself.
//! Resolution works against one catalog snapshot and picks every field from
//! the first style in the chain that sets it. Fields nobody sets take the
//! variant's default.
//!
//! Nothing here fails: a missing backing style just ends the chain.

use core::ptr;

use kurbo::{BezPath, Insets, Rect};
use smallvec::SmallVec;
use tracing::trace;

use crate::border::Border;
use crate::color::{Color, Palette};
use crate::fill::Fill;
use crate::geometry::{Corners, inset_rect, rounded_rect_path};
use crate::name::StyleName;
use crate::registry::Catalog;
use crate::shadow::Shadow;
use crate::style::{ButtonState, ButtonStyle, Originality, ViewStyle};
use crate::text::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, FontDescription, TextAlignment, TextAttributes,
    TextStyle,
};

/// Styles that can defer to a registered style of the same name.
trait Backed {
    const KIND: &'static str;
    fn name(&self) -> &StyleName;
    fn originality(&self) -> Originality;
}

impl Backed for ViewStyle {
    const KIND: &'static str = "view";
    fn name(&self) -> &StyleName {
        &self.name
    }
    fn originality(&self) -> Originality {
        self.originality
    }
}

impl Backed for ButtonStyle {
    const KIND: &'static str = "button";
    fn name(&self) -> &StyleName {
        &self.name
    }
    fn originality(&self) -> Originality {
        self.originality
    }
}

impl Backed for TextStyle {
    const KIND: &'static str = "text";
    fn name(&self) -> &StyleName {
        &self.name
    }
    fn originality(&self) -> Originality {
        self.originality
    }
}

type Chain<'a, S> = SmallVec<[&'a S; 2]>;

/// `style` followed by the registered style it defers to, if any.
///
/// Backing lookups go by the style's own name, so a registered style is its
/// own backing style and the chain never grows past two entries.
fn backing_chain<'a, S: Backed>(
    style: &'a S,
    find: impl Fn(&StyleName) -> Option<&'a S>,
) -> Chain<'a, S> {
    let mut chain: Chain<'a, S> = SmallVec::new();
    chain.push(style);
    let name = style.name();
    if style.originality() != Originality::Saved || name.is_none() {
        return chain;
    }
    match find(name) {
        Some(backing) if !ptr::eq(backing, style) => chain.push(backing),
        Some(_) => {}
        None => trace!(kind = S::KIND, %name, "no backing style registered"),
    }
    chain
}

/// The first value set along `chain`.
fn pick<'a, S, T: ?Sized>(chain: &[&'a S], field: impl Fn(&'a S) -> Option<&'a T>) -> Option<&'a T> {
    chain.iter().find_map(|style| field(style))
}

/// A view style with every field decided.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedViewStyle {
    /// Name of the style this was resolved from.
    pub name: StyleName,
    /// Background paint.
    pub background: Option<Fill>,
    /// Borders, in drawing order.
    pub borders: Vec<Border>,
    /// Rounded corners.
    pub rounded_corners: Corners,
    /// Corner radius.
    pub corner_radius: f64,
    /// Shadow drawn inside the outline.
    pub inner_shadow: Option<Shadow>,
    /// Shadow cast by the backing layer.
    pub outer_shadow: Option<Shadow>,
    /// Whether the backing layer is masked to the outline.
    pub mask: bool,
    /// Insets applied to the bounds before deriving the outline.
    pub render_inset: Insets,
    /// Whether rasterization runs on the background queue.
    pub render_asynchronously: bool,
}

impl Default for ResolvedViewStyle {
    fn default() -> Self {
        Self {
            name: StyleName::NONE,
            background: None,
            borders: Vec::new(),
            rounded_corners: Corners::ALL,
            corner_radius: 0.0,
            inner_shadow: None,
            outer_shadow: None,
            mask: false,
            render_inset: Insets::ZERO,
            render_asynchronously: false,
        }
    }
}

impl ResolvedViewStyle {
    /// The rectangle decorated within `bounds`.
    pub fn content_rect(&self, bounds: Rect) -> Rect {
        inset_rect(bounds, self.render_inset)
    }

    /// The rounded outline within `bounds`.
    pub fn outline(&self, bounds: Rect) -> BezPath {
        rounded_rect_path(self.content_rect(bounds), self.rounded_corners, self.corner_radius)
    }
}

/// Resolve a view style against `catalog`.
pub fn resolve_view_style(style: &ViewStyle, catalog: &Catalog) -> ResolvedViewStyle {
    let chain = backing_chain(style, |name| catalog.find_view_style(name));
    let defaults = ResolvedViewStyle::default();
    ResolvedViewStyle {
        name: style.name.clone(),
        background: pick(&chain[..], |s| s.background.as_ref()).cloned(),
        borders: pick(&chain[..], |s| s.borders.as_ref())
            .cloned()
            .unwrap_or_default(),
        rounded_corners: pick(&chain[..], |s| s.rounded_corners.as_ref())
            .copied()
            .unwrap_or(defaults.rounded_corners),
        corner_radius: pick(&chain[..], |s| s.corner_radius.as_ref())
            .copied()
            .unwrap_or(defaults.corner_radius),
        inner_shadow: pick(&chain[..], |s| s.inner_shadow.as_ref()).cloned(),
        outer_shadow: pick(&chain[..], |s| s.outer_shadow.as_ref()).cloned(),
        mask: pick(&chain[..], |s| s.mask.as_ref())
            .copied()
            .unwrap_or(defaults.mask),
        render_inset: pick(&chain[..], |s| s.render_inset.as_ref())
            .copied()
            .unwrap_or(defaults.render_inset),
        render_asynchronously: pick(&chain[..], |s| s.render_asynchronously.as_ref())
            .copied()
            .unwrap_or(defaults.render_asynchronously),
    }
}

/// A text style with every field decided.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTextStyle {
    /// Name of the style this was resolved from.
    pub name: StyleName,
    /// Font.
    pub font: FontDescription,
    /// Alignment.
    pub alignment: TextAlignment,
    /// Foreground color.
    pub color: Color,
    /// Shadow.
    pub shadow: Option<Shadow>,
    /// Foreground color while highlighted.
    pub highlighted_text_color: Option<Color>,
}

impl Default for ResolvedTextStyle {
    fn default() -> Self {
        Self {
            name: StyleName::NONE,
            font: FontDescription::default(),
            alignment: TextAlignment::default(),
            color: Color::new(peniko::Color::BLACK),
            shadow: None,
            highlighted_text_color: None,
        }
    }
}

impl ResolvedTextStyle {
    /// Concrete text attributes, with colors resolved against `palette`.
    pub fn attributes(&self, palette: &dyn Palette) -> TextAttributes {
        TextAttributes {
            font: self.font.clone(),
            alignment: self.alignment,
            foreground: self.color.resolve(palette),
            shadow: self.shadow.as_ref().map(|s| s.to_text_shadow(palette)),
        }
    }

    /// The attributes as CSS declarations.
    pub fn to_css(&self, palette: &dyn Palette) -> String {
        self.attributes(palette).to_css()
    }
}

/// Resolve a text style against `catalog`.
pub fn resolve_text_style(style: &TextStyle, catalog: &Catalog) -> ResolvedTextStyle {
    let chain = backing_chain(style, |name| catalog.text_style(name));
    let defaults = ResolvedTextStyle::default();
    ResolvedTextStyle {
        name: style.name.clone(),
        font: FontDescription {
            family: pick(&chain[..], |s| s.font_family.as_deref())
                .unwrap_or(DEFAULT_FONT_FAMILY)
                .to_owned(),
            size: pick(&chain[..], |s| s.font_size.as_ref())
                .copied()
                .unwrap_or(DEFAULT_FONT_SIZE),
        },
        alignment: pick(&chain[..], |s| s.alignment.as_ref())
            .copied()
            .unwrap_or(defaults.alignment),
        color: pick(&chain[..], |s| s.color.as_ref())
            .cloned()
            .unwrap_or(defaults.color),
        shadow: pick(&chain[..], |s| s.shadow.as_ref()).cloned(),
        highlighted_text_color: pick(&chain[..], |s| s.highlighted_text_color.as_ref()).cloned(),
    }
}

/// A button style with every field decided.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedButtonStyle {
    /// Name of the style this was resolved from.
    pub name: StyleName,
    /// View style in the normal state.
    pub view_style: Option<ResolvedViewStyle>,
    /// View style while highlighted.
    pub highlighted_view_style: Option<ResolvedViewStyle>,
    /// View style while disabled.
    pub disabled_view_style: Option<ResolvedViewStyle>,
    /// Title style.
    pub text_style: Option<ResolvedTextStyle>,
}

impl ResolvedButtonStyle {
    /// The view style for `state`, falling back to the normal one.
    pub fn view_style_for(&self, state: ButtonState) -> Option<&ResolvedViewStyle> {
        let specific = match state {
            ButtonState::Normal => None,
            ButtonState::Highlighted => self.highlighted_view_style.as_ref(),
            ButtonState::Disabled => self.disabled_view_style.as_ref(),
        };
        specific.or(self.view_style.as_ref())
    }

    /// Title attributes for `state`, or `None` without a title style.
    ///
    /// A highlighted button draws its title in the highlighted text color
    /// when the title style has one.
    pub fn title_attributes(
        &self,
        state: ButtonState,
        palette: &dyn Palette,
    ) -> Option<TextAttributes> {
        let text = self.text_style.as_ref()?;
        let mut attributes = text.attributes(palette);
        if state == ButtonState::Highlighted {
            if let Some(color) = &text.highlighted_text_color {
                attributes.foreground = color.resolve(palette);
            }
        }
        Some(attributes)
    }
}

/// Resolve a button style against `catalog`.
///
/// The per-state view styles and the title style are resolved in turn, so
/// they may themselves be saved styles.
pub fn resolve_button_style(style: &ButtonStyle, catalog: &Catalog) -> ResolvedButtonStyle {
    let chain = backing_chain(style, |name| catalog.find_button_style(name));
    let view = |field: fn(&ButtonStyle) -> Option<&ViewStyle>| {
        pick(&chain[..], field).map(|v| resolve_view_style(v, catalog))
    };
    ResolvedButtonStyle {
        name: style.name.clone(),
        view_style: view(|s| s.view_style.as_ref()),
        highlighted_view_style: view(|s| s.highlighted_view_style.as_ref()),
        disabled_view_style: view(|s| s.disabled_view_style.as_ref()),
        text_style: pick(&chain[..], |s| s.text_style.as_ref()).map(|t| resolve_text_style(t, catalog)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderType;

    fn red() -> Color {
        Color::rgba8(255, 0, 0, 255)
    }

    fn catalog_with(styles: impl IntoIterator<Item = crate::Style>) -> Catalog {
        let mut catalog = Catalog::new();
        for style in styles {
            catalog.push_style(style);
        }
        catalog
    }

    #[test]
    fn saved_style_without_backing_is_all_defaults() {
        let resolved = resolve_view_style(&ViewStyle::saved("Nope"), &Catalog::new());
        assert_eq!(
            resolved,
            ResolvedViewStyle {
                name: StyleName::new("Nope"),
                ..ResolvedViewStyle::default()
            }
        );
    }

    #[test]
    fn saved_style_inherits_unset_fields_and_overrides_set_ones() {
        let catalog = catalog_with([ViewStyle::new("Card")
            .with_corner_radius(4.0)
            .with_background(red())
            .with_mask(true)
            .into()]);
        let local = ViewStyle::saved("Card").with_corner_radius(10.0);
        let resolved = resolve_view_style(&local, &catalog);
        assert_eq!(resolved.corner_radius, 10.0);
        assert_eq!(resolved.background, Some(Fill::Solid(red())));
        assert!(resolved.mask);
    }

    #[test]
    fn new_style_ignores_registry() {
        let catalog = catalog_with([ViewStyle::new("Card").with_corner_radius(4.0).into()]);
        let resolved = resolve_view_style(&ViewStyle::new("Card"), &catalog);
        assert_eq!(resolved.corner_radius, 0.0);
    }

    #[test]
    fn none_named_saved_style_never_looks_up() {
        // A style registered without a name must not be found by a nameless saved style.
        let catalog = catalog_with([ViewStyle::default().with_corner_radius(9.0).into()]);
        let resolved = resolve_view_style(&ViewStyle::saved(StyleName::NONE), &catalog);
        assert_eq!(resolved, ResolvedViewStyle::default());
    }

    #[test]
    fn registered_saved_style_terminates() {
        let catalog = catalog_with([ViewStyle::saved("Loop").with_corner_radius(3.0).into()]);
        let resolved = resolve_view_style(&ViewStyle::saved("Loop"), &catalog);
        assert_eq!(resolved.corner_radius, 3.0);
    }

    #[test]
    fn borders_fall_back_as_a_whole() {
        let border = Border::new(8.0, Color::rgba8(0, 0, 255, 255), BorderType::OuterStroke);
        let catalog = catalog_with([ViewStyle::new("Card").with_border(border.clone()).into()]);
        let resolved = resolve_view_style(&ViewStyle::saved("Card"), &catalog);
        assert_eq!(resolved.borders, vec![border]);
    }

    #[test]
    fn text_size_overrides_independently_of_family() {
        let catalog = catalog_with([TextStyle::new("Body")
            .with_font_family("Avenir")
            .with_font_size(14.0)
            .into()]);
        let resolved = resolve_text_style(&TextStyle::saved("Body").with_font_size(22.0), &catalog);
        assert_eq!(resolved.font.family, "Avenir");
        assert_eq!(resolved.font.size, 22.0);
    }

    #[test]
    fn text_defaults() {
        let resolved = resolve_text_style(&TextStyle::saved("Missing"), &Catalog::new());
        assert_eq!(resolved.font, FontDescription::default());
        assert_eq!(resolved.alignment, TextAlignment::Natural);
        assert_eq!(
            resolved.attributes(&crate::EmptyPalette).foreground,
            peniko::Color::BLACK
        );
    }

    #[test]
    fn button_state_falls_back_to_normal_view_style() {
        let catalog = catalog_with([
            ViewStyle::new("Base").with_corner_radius(6.0).into(),
            ButtonStyle::new("Primary")
                .with_view_style(ViewStyle::saved("Base"))
                .with_highlighted_view_style(ViewStyle::new("Pressed").with_corner_radius(2.0))
                .into(),
        ]);
        let resolved = resolve_button_style(&ButtonStyle::saved("Primary"), &catalog);
        let normal = resolved.view_style_for(ButtonState::Normal).unwrap();
        assert_eq!(normal.corner_radius, 6.0, "nested saved view style resolves too");
        let pressed = resolved.view_style_for(ButtonState::Highlighted).unwrap();
        assert_eq!(pressed.corner_radius, 2.0);
        let disabled = resolved.view_style_for(ButtonState::Disabled).unwrap();
        assert_eq!(disabled.corner_radius, 6.0);
    }

    #[test]
    fn saved_lookup_stops_at_the_registered_style() {
        let local = ViewStyle::saved("Card").with_mask(true);
        let catalog = catalog_with([ViewStyle::saved("Card").with_corner_radius(5.0).into()]);
        let chain = backing_chain(&local, |name| catalog.find_view_style(name));
        assert_eq!(chain.len(), 2);
        assert!(ptr::eq(chain[0], &local));
        assert_eq!(chain[1].corner_radius, Some(5.0));
    }

    #[test]
    fn title_attributes_follow_button_state() {
        let catalog = catalog_with([ButtonStyle::new("Primary")
            .with_text_style(
                TextStyle::new("Title")
                    .with_font_size(17.0)
                    .with_color(red())
                    .with_highlighted_text_color(Color::rgba8(0, 0, 255, 255)),
            )
            .into()]);
        let resolved = resolve_button_style(&ButtonStyle::saved("Primary"), &catalog);
        let normal = resolved
            .title_attributes(ButtonState::Normal, &catalog)
            .unwrap();
        assert_eq!(normal.font.size, 17.0);
        assert_eq!(normal.foreground.to_rgba8().to_u8_array(), [255, 0, 0, 255]);
        let highlighted = resolved
            .title_attributes(ButtonState::Highlighted, &catalog)
            .unwrap();
        assert_eq!(
            highlighted.foreground.to_rgba8().to_u8_array(),
            [0, 0, 255, 255]
        );
        let disabled = resolved
            .title_attributes(ButtonState::Disabled, &catalog)
            .unwrap();
        assert_eq!(disabled, normal);

        let untitled = resolve_button_style(&ButtonStyle::new("Plain"), &catalog);
        assert!(untitled.title_attributes(ButtonState::Normal, &catalog).is_none());
    }
}
