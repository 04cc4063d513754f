//! Feature definitions.
//!
//! Characters gain capabilities through features: some grant spells
//! directly, some are sets of other features. Sets are either unions (all
//! children granted together) or exclusive choices (exactly one child
//! granted, picked at runtime). Definitions are shared between classes,
//! subclasses and feats, so sets reference their children by id.

use crate::ids::{FeatureId, SpellId, SpellListId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A feature that puts spells within a character's reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellGrant {
    /// Spells that are always prepared.
    AutoPrepared(Vec<SpellId>),
    /// Extra cantrips known.
    BonusCantrips(Vec<SpellId>),
    /// Adds an entire spell list to the character's options.
    ExtendedSpellList(Option<SpellListId>),
    /// A nested spellcasting feature casting from an entire spell list.
    CastSpell(Option<SpellListId>),
}

/// One node of the feature graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureNode {
    Grantor(SpellGrant),
    /// Every child is active.
    Union(Vec<FeatureId>),
    /// Exactly one child is active; which one is a runtime choice.
    Exclusive(Vec<FeatureId>),
    /// No spell content.
    Opaque,
}

impl FeatureNode {
    /// Child references of a set node; empty for everything else.
    pub fn children(&self) -> &[FeatureId] {
        match self {
            FeatureNode::Union(children) | FeatureNode::Exclusive(children) => children,
            FeatureNode::Grantor(_) | FeatureNode::Opaque => &[],
        }
    }
}

/// All feature definitions, keyed by id.
///
/// # Examples
///
/// ```rust
/// use zzcast::{FeatureCatalog, FeatureNode, FeatureId, SpellGrant, SpellId};
///
/// let mut features = FeatureCatalog::new();
/// features.insert(
///     "DomainLifeSpells",
///     FeatureNode::Grantor(SpellGrant::AutoPrepared(vec![SpellId::from_str("Bless")])),
/// );
/// features.insert(
///     "DomainLife",
///     FeatureNode::Union(vec![FeatureId::from_str("DomainLifeSpells")]),
/// );
///
/// assert_eq!(features.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureCatalog {
    nodes: HashMap<FeatureId, FeatureNode>,
}

impl FeatureCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature, replacing any previous definition with the same id.
    pub fn insert(&mut self, id: impl Into<FeatureId>, node: FeatureNode) {
        self.nodes.insert(id.into(), node);
    }

    /// Look up a feature definition.
    pub fn get(&self, id: &FeatureId) -> Option<&FeatureNode> {
        self.nodes.get(id)
    }

    /// Iterate over every definition.
    pub fn iter(&self) -> impl Iterator<Item = (&FeatureId, &FeatureNode)> {
        self.nodes.iter()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
