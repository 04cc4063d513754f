//! Spell catalog.
//!
//! The engine needs two facts about spells: each spell's tier (0 for
//! cantrips) and the contents of named spell lists. Both live in a
//! `SpellCatalog` populated by the host from its content database.

use crate::ids::{SpellId, SpellListId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Spell tiers and spell list contents.
///
/// # Examples
///
/// ```rust
/// use zzcast::{SpellCatalog, SpellId, SpellListId};
///
/// let mut catalog = SpellCatalog::new();
/// catalog.insert_spell("FireBolt", 0);
/// catalog.insert_spell("Shield", 1);
/// catalog.insert_list("WizardList", ["FireBolt", "Shield"]);
///
/// assert_eq!(catalog.tier(&SpellId::from_str("Shield")), Some(1));
/// assert_eq!(catalog.list(&SpellListId::from_str("WizardList")).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellCatalog {
    #[serde(default)]
    tiers: HashMap<SpellId, u8>,
    #[serde(default)]
    lists: HashMap<SpellListId, Vec<SpellId>>,
}

impl SpellCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spell and its tier.
    pub fn insert_spell(&mut self, spell: impl Into<SpellId>, tier: u8) {
        self.tiers.insert(spell.into(), tier);
    }

    /// Register a spell list, replacing any previous list with the same id.
    pub fn insert_list<I>(&mut self, list: impl Into<SpellListId>, spells: I)
    where
        I: IntoIterator,
        I::Item: Into<SpellId>,
    {
        self.lists
            .insert(list.into(), spells.into_iter().map(Into::into).collect());
    }

    /// Tier of `spell`, or `None` if the catalog doesn't know it.
    pub fn tier(&self, spell: &SpellId) -> Option<u8> {
        self.tiers.get(spell).copied()
    }

    /// Every spell in `list`, or `None` if the list is unknown.
    pub fn list(&self, list: &SpellListId) -> Option<&[SpellId]> {
        self.lists.get(list).map(Vec::as_slice)
    }

    /// Number of registered spells.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether no spells are registered.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
