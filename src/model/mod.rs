//! # Document Model
//!
//! The input representation handed to the exporter. A document is a fixed
//! top block plus a set of keyed content lists, and a block layout that says
//! which lists sit side by side and in what order. The rules engine that
//! produces this data is not part of this crate; anything able to emit the
//! JSON shape below can drive an export.

pub mod block_layout;

pub use block_layout::BlockLayout;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::style::Align;

/// Section keys understood by the standard registry.
pub mod keys {
    pub const REACTIONS: &str = "reactions";
    pub const CONDITIONAL_MODIFIERS: &str = "conditional_modifiers";
    pub const MELEE: &str = "melee";
    pub const RANGED: &str = "ranged";
    pub const TRAITS: &str = "traits";
    pub const SKILLS: &str = "skills";
    pub const SPELLS: &str = "spells";
    pub const EQUIPMENT: &str = "equipment";
    pub const OTHER_EQUIPMENT: &str = "other_equipment";
    pub const NOTES: &str = "notes";

    /// Every key, in default layout order.
    pub const ALL: [&str; 10] = [
        REACTIONS,
        CONDITIONAL_MODIFIERS,
        MELEE,
        RANGED,
        TRAITS,
        SKILLS,
        SPELLS,
        EQUIPMENT,
        OTHER_EQUIPMENT,
        NOTES,
    ];
}

/// A complete document ready for pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub kind: DocumentKind,

    #[serde(default)]
    pub metadata: Metadata,

    /// Block shown once, at the top of the first page.
    #[serde(default)]
    pub top: TopBlock,

    /// Content lists by section key.
    #[serde(default)]
    pub lists: HashMap<String, ListData>,

    /// Column-set plan. Falls back to the kind's default when absent.
    #[serde(default)]
    pub layout: Option<BlockLayout>,

    /// Text centred in every page footer, e.g. a modification date.
    #[serde(default)]
    pub footer: Option<String>,
}

impl Document {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            metadata: Metadata::default(),
            top: TopBlock::default(),
            lists: HashMap::new(),
            layout: None,
            footer: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// The list stored under `key`, if any.
    pub fn list(&self, key: &str) -> Option<&ListData> {
        self.lists.get(key)
    }

    /// The effective block layout.
    pub fn block_layout(&self) -> BlockLayout {
        self.layout
            .clone()
            .unwrap_or_else(|| BlockLayout::default_for(self.kind))
    }

    /// Title used for PDF metadata and page footers.
    pub fn title(&self) -> &str {
        self.metadata
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.top.title)
    }
}

/// Which of the two sheet flavours a document is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A character sheet: carries combat, trait, skill and spell lists.
    #[default]
    Sheet,
    /// A loot sheet: equipment and notes only.
    Loot,
}

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

/// A titled panel of label/value fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopBlock {
    #[serde(default)]
    pub title: String,

    /// How many label/value pairs share one line.
    #[serde(default = "default_top_columns")]
    pub columns: usize,

    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Default for TopBlock {
    fn default() -> Self {
        Self {
            title: String::new(),
            columns: default_top_columns(),
            fields: Vec::new(),
        }
    }
}

fn default_top_columns() -> usize {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The rows of one content list, plus its header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub title: String,

    /// Relative share of the table width.
    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default)]
    pub align: Align,
}

fn default_weight() -> f64 {
    1.0
}

impl Column {
    pub fn new(title: impl Into<String>, weight: f64) -> Self {
        Self {
            title: title.into(),
            weight,
            align: Align::Start,
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<String>,

    /// Nesting level for rows inside containers.
    #[serde(default)]
    pub depth: usize,
}

impl Row {
    pub fn new<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            depth: 0,
        }
    }

    pub fn nested(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }
}
