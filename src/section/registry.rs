//! Maps section keys to the factories that build them.

use super::{Section, TableSection};
use crate::error::Error;
use crate::model::{keys, Document, DocumentKind};

/// Builds a fresh section for a document, or `None` when the section kind
/// has nothing to show for it.
pub type SectionFactory = Box<dyn Fn(&Document) -> Option<Box<dyn Section>>>;

/// Key -> factory lookup, in registration order.
#[derive(Default)]
pub struct SectionRegistry {
    factories: Vec<(String, SectionFactory)>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in list kind. Combat and reaction
    /// lists only apply to character sheets.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for key in keys::ALL {
            let sheet_only = matches!(
                key,
                keys::REACTIONS | keys::CONDITIONAL_MODIFIERS | keys::MELEE | keys::RANGED
            );
            registry.register(key, move |doc: &Document| {
                if sheet_only && doc.kind != DocumentKind::Sheet {
                    return None;
                }
                doc.list(key)
                    .map(|data| Box::new(TableSection::new(key, data.clone())) as Box<dyn Section>)
            });
        }
        registry
    }

    /// Register a factory, replacing any earlier one for the same key.
    pub fn register<F>(&mut self, key: &str, factory: F)
    where
        F: Fn(&Document) -> Option<Box<dyn Section>> + 'static,
    {
        let factory: SectionFactory = Box::new(factory);
        match self.factories.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = factory,
            None => self.factories.push((key.to_string(), factory)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.factories.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Build the section for `key`.
    ///
    /// A key with no registered factory is a configuration error.
    pub fn create(&self, key: &str, doc: &Document) -> Result<Option<Box<dyn Section>>, Error> {
        let (_, factory) = self
            .factories
            .iter()
            .find(|(k, _)| k == key)
            .ok_or_else(|| Error::Config(format!("no section is registered for key '{}'", key)))?;
        Ok(factory(doc))
    }
}
