// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Labels whose attributed text follows a text style.

use tracing::trace;

use crate::registry::Catalog;
use crate::resolve::{ResolvedTextStyle, resolve_text_style};
use crate::text::{TextAttributes, TextStyle};

/// Text together with the attributes it is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributedText {
    /// The text.
    pub text: String,
    /// How to draw it.
    pub attributes: TextAttributes,
}

/// A label's text, text style and highlight state.
///
/// The attributed text is re-derived whenever any of the three changes.
/// Without a style the label has plain text only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledLabel {
    text: String,
    style: Option<TextStyle>,
    highlighted: bool,
    attributed: Option<AttributedText>,
}

impl StyledLabel {
    /// An unstyled label showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The plain text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text style, if any.
    pub fn style(&self) -> Option<&TextStyle> {
        self.style.as_ref()
    }

    /// Whether the label is highlighted.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// The current attributed text, if the label is styled.
    pub fn attributed(&self) -> Option<&AttributedText> {
        self.attributed.as_ref()
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>, catalog: &Catalog) {
        self.text = text.into();
        self.refresh(catalog);
    }

    /// Replace the text style.
    pub fn set_style(&mut self, style: Option<TextStyle>, catalog: &Catalog) {
        self.style = style;
        self.refresh(catalog);
    }

    /// Change the highlight state.
    pub fn set_highlighted(&mut self, highlighted: bool, catalog: &Catalog) {
        self.highlighted = highlighted;
        self.refresh(catalog);
    }

    /// The style as it applies right now, highlight color included.
    pub fn effective_style(&self, catalog: &Catalog) -> Option<ResolvedTextStyle> {
        let mut resolved = resolve_text_style(self.style.as_ref()?, catalog);
        if self.highlighted {
            if let Some(color) = resolved.highlighted_text_color.clone() {
                resolved.color = color;
            }
        }
        Some(resolved)
    }

    /// Re-derive the attributed text, e.g. after the registry changed.
    pub fn refresh(&mut self, catalog: &Catalog) {
        self.attributed = self.effective_style(catalog).map(|style| AttributedText {
            text: self.text.clone(),
            attributes: style.attributes(catalog),
        });
        trace!(
            styled = self.attributed.is_some(),
            highlighted = self.highlighted,
            "label attributes refreshed"
        );
    }
}
