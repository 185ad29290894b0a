// Copyright 2026 the DynStyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Free-form drawing attributes and their render priorities.

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::border::Border;
use crate::color::Color;
use crate::context::RenderContext;
use crate::fill::Fill;
use crate::gradient::Gradient;
use crate::shadow::Shadow;

/// A drawing directive that can appear in a [`DrawingStyle`](crate::DrawingStyle).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawingStyleAttribute {
    /// A background fill.
    Fill(Fill),
    /// A border around the outline.
    Border(Border),
    /// A layer shadow.
    Shadow(Shadow),
    /// A gradient over the rectangle.
    Gradient(Gradient),
    /// A solid color over the rectangle.
    Color(Color),
}

impl DrawingStyleAttribute {
    /// The priority this kind of attribute renders at unless overridden.
    ///
    /// Paint goes down first, then borders on top of it; shadows are
    /// declarative and come last.
    pub fn default_priority(&self) -> i32 {
        match self {
            Self::Fill(_) | Self::Gradient(_) | Self::Color(_) => 2,
            Self::Border(_) => 1,
            Self::Shadow(_) => 0,
        }
    }

    /// Draw this attribute.
    pub fn render(&self, ctx: &mut RenderContext<'_>) {
        match self {
            Self::Fill(fill) => fill.render(ctx),
            Self::Border(border) => border.render(ctx),
            Self::Shadow(shadow) => shadow.render(ctx),
            Self::Gradient(gradient) => gradient.render(ctx),
            Self::Color(color) => color.render(ctx),
        }
    }
}

/// Callback run once before any attribute of a drawing style renders.
pub type PrepFn = Arc<dyn Fn(&mut RenderContext<'_>) + Send + Sync>;

/// An attribute with its render priority and optional prep callback.
///
/// Higher priorities render first.
#[derive(Clone, Serialize, Deserialize)]
pub struct StyleAttribute {
    /// The directive itself.
    pub attribute: DrawingStyleAttribute,
    /// Render priority.
    pub render_priority: i32,
    /// Prep callback, not persisted.
    #[serde(skip)]
    pub prep: Option<PrepFn>,
}

impl StyleAttribute {
    /// Wrap `attribute` at its default priority.
    pub fn new(attribute: DrawingStyleAttribute) -> Self {
        Self {
            render_priority: attribute.default_priority(),
            attribute,
            prep: None,
        }
    }

    /// This attribute at `priority`.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.render_priority = priority;
        self
    }

    /// This attribute with a prep callback.
    #[must_use]
    pub fn with_prep(mut self, prep: impl Fn(&mut RenderContext<'_>) + Send + Sync + 'static) -> Self {
        let prep: PrepFn = Arc::new(prep);
        self.prep = Some(prep);
        self
    }
}

impl From<DrawingStyleAttribute> for StyleAttribute {
    fn from(attribute: DrawingStyleAttribute) -> Self {
        Self::new(attribute)
    }
}

impl fmt::Debug for StyleAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleAttribute")
            .field("attribute", &self.attribute)
            .field("render_priority", &self.render_priority)
            .field("prep", &self.prep.is_some())
            .finish()
    }
}

/// Prep callbacks compare by identity.
impl PartialEq for StyleAttribute {
    fn eq(&self, other: &Self) -> bool {
        let same_prep = match (&self.prep, &other.prep) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.attribute == other.attribute && self.render_priority == other.render_priority && same_prep
    }
}
