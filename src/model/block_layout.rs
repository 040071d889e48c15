//! The column-set plan: which section keys sit side by side, and in what
//! order the resulting rows run down the document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{keys, DocumentKind};

/// Ordered lines, each a whitespace-separated list of section keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockLayout {
    pub lines: Vec<String>,
}

impl BlockLayout {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn default_for(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Sheet => Self::new([
                format!("{} {}", keys::REACTIONS, keys::CONDITIONAL_MODIFIERS),
                keys::MELEE.to_string(),
                keys::RANGED.to_string(),
                format!("{} {}", keys::TRAITS, keys::SKILLS),
                keys::SPELLS.to_string(),
                keys::EQUIPMENT.to_string(),
                keys::OTHER_EQUIPMENT.to_string(),
                keys::NOTES.to_string(),
            ]),
            DocumentKind::Loot => Self::new([keys::EQUIPMENT, keys::NOTES]),
        }
    }

    /// Normalise into column sets.
    ///
    /// Keys not in `known` and repeats of an earlier key are dropped, empty
    /// lines vanish, and every known key that never appeared is appended on
    /// a line of its own so each list is exported exactly once.
    pub fn by_row(&self, known: &[&str]) -> Vec<Vec<String>> {
        let known_set: HashSet<&str> = known.iter().copied().collect();
        let mut seen: HashSet<String> = HashSet::new();
        let mut rows = Vec::new();

        for line in &self.lines {
            let row: Vec<String> = line
                .split_whitespace()
                .map(str::to_lowercase)
                .filter(|key| known_set.contains(key.as_str()) && seen.insert(key.clone()))
                .collect();
            if !row.is_empty() {
                rows.push(row);
            }
        }

        for key in known {
            if !seen.contains(*key) {
                seen.insert(key.to_string());
                rows.push(vec![key.to_string()]);
            }
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sheet_layout_covers_every_key_once() {
        let rows = BlockLayout::default_for(DocumentKind::Sheet).by_row(&keys::ALL);
        let flat: Vec<&str> = rows.iter().flatten().map(String::as_str).collect();
        assert_eq!(flat, keys::ALL.to_vec());
        assert_eq!(rows[0], vec!["reactions", "conditional_modifiers"]);
        assert_eq!(rows[3], vec!["traits", "skills"]);
    }

    #[test]
    fn unknown_and_duplicate_keys_are_dropped() {
        let layout = BlockLayout::new(["skills bogus skills", "NOTES", "   "]);
        let rows = layout.by_row(&[keys::SKILLS, keys::NOTES]);
        assert_eq!(rows, vec![vec!["skills".to_string()], vec!["notes".to_string()]]);
    }

    #[test]
    fn missing_keys_are_appended() {
        let layout = BlockLayout::new(["notes"]);
        let rows = layout.by_row(&[keys::SKILLS, keys::NOTES, keys::SPELLS]);
        assert_eq!(
            rows,
            vec![
                vec!["notes".to_string()],
                vec!["skills".to_string()],
                vec!["spells".to_string()],
            ]
        );
    }

    #[test]
    fn serializes_as_plain_list() {
        let layout: BlockLayout = serde_json::from_str(r#"["melee ranged", "notes"]"#).unwrap();
        assert_eq!(layout.lines.len(), 2);
    }
}
