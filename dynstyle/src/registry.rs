// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The style registry.
//!
//! A [`Catalog`] is an immutable snapshot of registered colors and styles.
//! The [`StyleRegistry`] owns the current catalog behind a read-mostly lock:
//! writers build a new catalog and swap it in, readers take an [`Arc`]
//! snapshot and resolve against it without holding the lock. Resolution of
//! one render therefore never observes a half-applied re-initialization.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::CodecError;
use crate::color::{Color, Palette};
use crate::compositor::DrawingStyle;
use crate::name::StyleName;
use crate::style::{ButtonStyle, Style, ViewStyle};
use crate::text::TextStyle;

/// Registered colors and styles.
///
/// Lookups compare names exactly. When several entries share a name, the
/// first one registered wins. [`StyleName::NONE`] never matches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    colors: Vec<Color>,
    styles: Vec<Style>,
    drawing_styles: Vec<DrawingStyle>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered palette colors, in registration order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Registered view, button and text styles, in registration order.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    /// Registered drawing styles, in registration order.
    pub fn drawing_styles(&self) -> &[DrawingStyle] {
        &self.drawing_styles
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.styles.is_empty() && self.drawing_styles.is_empty()
    }

    /// Add a style.
    pub fn push_style(&mut self, style: impl Into<Style>) {
        self.styles.push(style.into());
    }

    /// Add a palette color.
    pub fn push_color(&mut self, color: Color) {
        self.colors.push(color);
    }

    /// Add a drawing style.
    pub fn push_drawing_style(&mut self, style: DrawingStyle) {
        self.drawing_styles.push(style);
    }

    /// The first view style called `name`.
    pub fn find_view_style(&self, name: &StyleName) -> Option<&ViewStyle> {
        if name.is_none() {
            return None;
        }
        self.styles.iter().find_map(|style| match style {
            Style::View(view) if view.name == *name => Some(view),
            _ => None,
        })
    }

    /// The first button style called `name`.
    pub fn find_button_style(&self, name: &StyleName) -> Option<&ButtonStyle> {
        if name.is_none() {
            return None;
        }
        self.styles.iter().find_map(|style| match style {
            Style::Button(button) if button.name == *name => Some(button),
            _ => None,
        })
    }

    /// The first text style called `name`, as registered.
    pub fn text_style(&self, name: &StyleName) -> Option<&TextStyle> {
        if name.is_none() {
            return None;
        }
        self.styles.iter().find_map(|style| match style {
            Style::Text(text) if text.name == *name => Some(text),
            _ => None,
        })
    }

    /// The first text style called `name`, at `size` points when given.
    ///
    /// The size override applies to the returned value only; the registered
    /// style is untouched.
    pub fn find_text_style(&self, name: &StyleName, size: Option<f64>) -> Option<TextStyle> {
        let style = self.text_style(name)?.clone();
        Some(match size {
            Some(size) => style.with_font_size(size),
            None => style,
        })
    }

    /// The first palette color called `name`.
    pub fn find_color(&self, name: &StyleName) -> Option<&Color> {
        if name.is_none() {
            return None;
        }
        self.colors.iter().find(|color| color.name == *name)
    }

    /// The first drawing style called `name`.
    pub fn find_drawing_style(&self, name: &StyleName) -> Option<&DrawingStyle> {
        if name.is_none() {
            return None;
        }
        self.drawing_styles.iter().find(|style| style.name == *name)
    }
}

impl Palette for Catalog {
    fn find_color(&self, name: &StyleName) -> Option<&Color> {
        Self::find_color(self, name)
    }
}

/// A bootstrap document for a [`StyleRegistry`].
///
/// ```
/// use dynstyle::{StyleName, StyleRegistry, StyleSheet};
///
/// let sheet = StyleSheet::from_json(r#"{
///     "colors": [{ "name": "accent", "source": { "rgba": [1.0, 0.0, 0.0, 1.0] } }],
///     "view_styles": [{ "kind": "view", "name": "Card", "corner_radius": 4.0 }]
/// }"#).unwrap();
///
/// let registry = StyleRegistry::new();
/// registry.initialize_with(sheet);
/// let card = registry.find_view_style(&StyleName::new("Card")).unwrap();
/// assert_eq!(card.corner_radius, Some(4.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    /// Palette colors.
    #[serde(default)]
    pub colors: Vec<Color>,
    /// View and button styles.
    #[serde(default)]
    pub view_styles: Vec<Style>,
    /// Text styles.
    #[serde(default)]
    pub text_styles: Vec<TextStyle>,
    /// Drawing styles.
    #[serde(default)]
    pub drawing_styles: Vec<DrawingStyle>,
}

impl StyleSheet {
    /// Parse a style sheet from JSON.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        serde_json::from_str(json).map_err(CodecError::Decode)
    }

    /// The style sheet as JSON.
    pub fn to_json(&self) -> Result<String, CodecError> {
        serde_json::to_string_pretty(self).map_err(CodecError::Encode)
    }

    fn into_catalog(self) -> Catalog {
        let mut catalog = Catalog {
            colors: self.colors,
            styles: self.view_styles,
            drawing_styles: self.drawing_styles,
        };
        catalog
            .styles
            .extend(self.text_styles.into_iter().map(Style::Text));
        catalog
    }
}

/// The application's store of named styles.
///
/// Share one registry (usually in an [`Arc`]) between everything that
/// resolves styles. Mutation replaces the whole catalog; there is no
/// per-entry removal.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    catalog: RwLock<Arc<Catalog>>,
}

impl StyleRegistry {
    /// An empty registry. Every lookup misses until it is initialized.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `catalog`.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Replace the registry contents.
    ///
    /// `view_styles` holds view and button styles.
    pub fn initialize(
        &self,
        colors: impl IntoIterator<Item = Color>,
        view_styles: impl IntoIterator<Item = Style>,
        text_styles: impl IntoIterator<Item = TextStyle>,
    ) {
        self.initialize_with(StyleSheet {
            colors: colors.into_iter().collect(),
            view_styles: view_styles.into_iter().collect(),
            text_styles: text_styles.into_iter().collect(),
            drawing_styles: Vec::new(),
        });
    }

    /// Replace the registry contents with a style sheet.
    pub fn initialize_with(&self, sheet: StyleSheet) {
        self.replace(sheet.into_catalog());
    }

    /// Replace the registry contents with `catalog`.
    pub fn replace(&self, catalog: Catalog) {
        debug!(
            colors = catalog.colors.len(),
            styles = catalog.styles.len(),
            drawing_styles = catalog.drawing_styles.len(),
            "style registry replaced"
        );
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }

    /// Append styles to the current contents.
    pub fn register<S: Into<Style>>(&self, styles: impl IntoIterator<Item = S>) {
        self.update(|catalog| {
            catalog.styles.extend(styles.into_iter().map(Into::into));
        });
    }

    /// Append palette colors to the current contents.
    pub fn register_colors(&self, colors: impl IntoIterator<Item = Color>) {
        self.update(|catalog| catalog.colors.extend(colors));
    }

    /// Append drawing styles to the current contents.
    pub fn register_drawing_styles(&self, styles: impl IntoIterator<Item = DrawingStyle>) {
        self.update(|catalog| catalog.drawing_styles.extend(styles));
    }

    fn update(&self, f: impl FnOnce(&mut Catalog)) {
        let mut guard = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        f(Arc::make_mut(&mut guard));
    }

    /// The current contents.
    ///
    /// The snapshot is unaffected by later registry changes.
    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// The first view style called `name`.
    pub fn find_view_style(&self, name: &StyleName) -> Option<ViewStyle> {
        self.snapshot().find_view_style(name).cloned()
    }

    /// The first button style called `name`.
    pub fn find_button_style(&self, name: &StyleName) -> Option<ButtonStyle> {
        self.snapshot().find_button_style(name).cloned()
    }

    /// The first text style called `name`, at `size` points when given.
    pub fn find_text_style(&self, name: &StyleName, size: Option<f64>) -> Option<TextStyle> {
        self.snapshot().find_text_style(name, size)
    }

    /// The first palette color called `name`.
    pub fn find_color(&self, name: &StyleName) -> Option<Color> {
        self.snapshot().find_color(name).cloned()
    }

    /// The first drawing style called `name`.
    pub fn find_drawing_style(&self, name: &StyleName) -> Option<DrawingStyle> {
        self.snapshot().find_drawing_style(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(radius: f64) -> Style {
        ViewStyle::new("Card").with_corner_radius(radius).into()
    }

    #[test]
    fn lookups_miss_before_initialization() {
        let registry = StyleRegistry::new();
        assert!(registry.find_view_style(&StyleName::new("Card")).is_none());
        assert!(registry.find_color(&StyleName::new("accent")).is_none());
    }

    #[test]
    fn first_registered_duplicate_wins() {
        let registry = StyleRegistry::new();
        registry.register([card(4.0), card(9.0)]);
        let found = registry.find_view_style(&StyleName::new("Card")).unwrap();
        assert_eq!(found.corner_radius, Some(4.0));
    }

    #[test]
    fn initialize_replaces_contents() {
        let registry = StyleRegistry::new();
        registry.register([card(4.0)]);
        registry.initialize([], [], [TextStyle::new("Body")]);
        assert!(registry.find_view_style(&StyleName::new("Card")).is_none());
        assert!(registry.find_text_style(&StyleName::new("Body"), None).is_some());
    }

    #[test]
    fn text_lookup_threads_size_without_mutating_registry() {
        let registry = StyleRegistry::new();
        registry.register([TextStyle::new("Body").with_font_size(12.0)]);
        let large = registry.find_text_style(&StyleName::new("Body"), Some(30.0)).unwrap();
        assert_eq!(large.font_size, Some(30.0));
        let plain = registry.find_text_style(&StyleName::new("Body"), None).unwrap();
        assert_eq!(plain.font_size, Some(12.0));
    }

    #[test]
    fn kinds_do_not_shadow_each_other() {
        let registry = StyleRegistry::new();
        registry.register::<Style>([
            TextStyle::new("Primary").into(),
            ButtonStyle::new("Primary").into(),
        ]);
        assert!(registry.find_view_style(&StyleName::new("Primary")).is_none());
        assert!(registry.find_button_style(&StyleName::new("Primary")).is_some());
    }

    #[test]
    fn snapshots_are_isolated_from_later_writes() {
        let registry = StyleRegistry::new();
        registry.register([card(4.0)]);
        let before = registry.snapshot();
        registry.initialize([], [], []);
        assert!(before.find_view_style(&StyleName::new("Card")).is_some());
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn none_name_never_matches() {
        let mut catalog = Catalog::new();
        catalog.push_style(ViewStyle::default());
        catalog.push_color(Color::rgba8(0, 0, 0, 255));
        assert!(catalog.find_view_style(&StyleName::NONE).is_none());
        assert!(catalog.find_color(&StyleName::NONE).is_none());
    }
}
