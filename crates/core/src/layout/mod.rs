//! Element identity and document geometry.
//!
//! The orchestration layer never measures a real display surface; it asks a
//! [`Layout`] for document rects by [`ElementKey`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::geometry::{Rect, Viewport};
use crate::{FolioError, Result};

/// Stable identity of a tracked element, e.g. `projects/card/Alpha`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementKey(String);

impl ElementKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Nested key: `self/part`.
    pub fn child(&self, part: impl fmt::Display) -> Self {
        Self(format!("{}/{}", self.0, part))
    }

    pub fn is_within(&self, parent: &ElementKey) -> bool {
        self.0
            .strip_prefix(parent.as_str())
            .map_or(false, |rest| rest.starts_with('/'))
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Top-level page regions in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Navigation,
    Hero,
    Projects,
    About,
    Contact,
    Footer,
}

impl SectionId {
    pub const ORDER: [SectionId; 6] = [
        SectionId::Navigation,
        SectionId::Hero,
        SectionId::Projects,
        SectionId::About,
        SectionId::Contact,
        SectionId::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Navigation => "navigation",
            SectionId::Hero => "hero",
            SectionId::Projects => "projects",
            SectionId::About => "about",
            SectionId::Contact => "contact",
            SectionId::Footer => "footer",
        }
    }

    /// In-page anchor for sections reachable from the navigation links.
    pub fn anchor(&self) -> Option<&'static str> {
        match self {
            SectionId::Projects => Some("#work"),
            SectionId::About => Some("#about"),
            SectionId::Contact => Some("#contact"),
            _ => None,
        }
    }

    pub fn key(&self) -> ElementKey {
        ElementKey::new(self.as_str())
    }
}

/// Key of the project card named `name`.
pub fn card_key(name: &str) -> ElementKey {
    SectionId::Projects.key().child("card").child(name)
}

/// Source of document-space rects.
pub trait Layout {
    fn rect(&self, key: &ElementKey) -> Option<Rect>;

    fn document_height(&self) -> f32;

    fn require(&self, key: &ElementKey) -> Result<Rect> {
        self.rect(key)
            .ok_or_else(|| FolioError::UnknownElement(key.to_string()))
    }
}

/// Deterministic vertical stack: full-height hero, project grid, about,
/// contact, footer.
#[derive(Debug, Clone, Default)]
pub struct StackLayout {
    rects: HashMap<ElementKey, Rect>,
    height: f32,
}

impl StackLayout {
    /// Lays out the page for `viewport`. `cards` is `None` while the project
    /// list is still loading, which reserves a placeholder block instead of
    /// a grid.
    pub fn build(config: &LayoutConfig, viewport: &Viewport, cards: Option<&[String]>) -> Self {
        let mut layout = Self::default();
        let width = viewport.width;
        let inner_width = (width - 2.0 * config.side_padding).max(0.0);
        let mut y = 0.0;

        layout.insert(SectionId::Navigation.key(), Rect::new(0.0, 0.0, width, config.nav_height));

        let hero_height = viewport.height.max(config.nav_height);
        layout.insert(SectionId::Hero.key(), Rect::new(0.0, y, width, hero_height));
        y += hero_height;

        let projects_top = y;
        y += config.section_padding;
        layout.insert(
            SectionId::Projects.key().child("header"),
            Rect::new(config.side_padding, y, inner_width, config.header_height),
        );
        y += config.header_height + config.card_gap;

        match cards {
            None => {
                layout.insert(
                    SectionId::Projects.key().child("placeholder"),
                    Rect::new(config.side_padding, y, inner_width, config.placeholder_height),
                );
                y += config.placeholder_height;
            }
            Some(names) => {
                let columns = config.grid_columns.max(1);
                let gaps = config.card_gap * (columns as f32 - 1.0);
                let card_width = ((inner_width - gaps) / columns as f32).max(0.0);
                for (index, name) in names.iter().enumerate() {
                    let row = (index / columns) as f32;
                    let column = (index % columns) as f32;
                    layout.insert(
                        card_key(name),
                        Rect::new(
                            config.side_padding + column * (card_width + config.card_gap),
                            y + row * (config.card_height + config.card_gap),
                            card_width,
                            config.card_height,
                        ),
                    );
                }
                let rows = (names.len() + columns - 1) / columns;
                if rows > 0 {
                    y += rows as f32 * (config.card_height + config.card_gap) - config.card_gap;
                }
            }
        }
        y += config.section_padding;
        layout.insert(SectionId::Projects.key(), Rect::new(0.0, projects_top, width, y - projects_top));

        for (section, height) in [
            (SectionId::About, config.about_height),
            (SectionId::Contact, config.contact_height),
        ] {
            layout.insert(section.key(), Rect::new(0.0, y, width, height));
            layout.insert(
                section.key().child("content"),
                Rect::new(config.side_padding, y, inner_width, height).inset(config.section_padding.min(height / 2.0)),
            );
            y += height;
        }

        layout.insert(SectionId::Footer.key(), Rect::new(0.0, y, width, config.footer_height));
        y += config.footer_height;

        layout.height = y;
        layout
    }

    fn insert(&mut self, key: ElementKey, rect: Rect) {
        self.rects.insert(key, rect);
    }
}

impl Layout for StackLayout {
    fn rect(&self, key: &ElementKey) -> Option<Rect> {
        self.rects.get(key).copied()
    }

    fn document_height(&self) -> f32 {
        self.height
    }
}
