//! Static content consumed by the engine.
//!
//! The `Compendium` bundles the spell catalog and the feature catalog the
//! host exports from its content database.

use crate::error::CastError;
use crate::feature::FeatureCatalog;
use crate::graph::FeatureGraph;
use crate::spell::SpellCatalog;
use serde::{Deserialize, Serialize};

/// Spell and feature content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compendium {
    #[serde(default)]
    pub spells: SpellCatalog,
    #[serde(default)]
    pub features: FeatureCatalog,
}

impl Compendium {
    /// Create an empty compendium.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a compendium from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, CastError> {
        let compendium: Compendium =
            serde_json::from_str(json).map_err(|e| CastError::InvalidConfig(e.to_string()))?;
        compendium.validate()?;
        Ok(compendium)
    }

    /// Check the feature graph for cycles.
    ///
    /// Dangling references (a set naming an unknown feature, a grant naming
    /// an unknown spell list) are tolerated at query time and only logged.
    pub fn validate(&self) -> Result<(), CastError> {
        for (id, node) in self.features.iter() {
            for child in node.children() {
                if self.features.get(child).is_none() {
                    tracing::warn!(feature = %id, child = %child, "feature set references an unknown feature");
                }
            }
        }

        FeatureGraph::from_catalog(&self.features).detect_cycles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureNode;
    use crate::ids::FeatureId;

    #[test]
    fn test_from_json() {
        let json = r#"{
            "spells": {
                "tiers": { "Bless": 1, "SacredFlame": 0 },
                "lists": { "ClericList": ["Bless", "SacredFlame"] }
            },
            "features": {
                "ClericSpellcasting": { "Grantor": { "CastSpell": "ClericList" } }
            }
        }"#;
        let compendium = Compendium::from_json(json).unwrap();

        assert_eq!(compendium.spells.len(), 2);
        assert_eq!(compendium.features.len(), 1);
    }

    #[test]
    fn test_dangling_reference_is_not_fatal() {
        let mut compendium = Compendium::new();
        compendium.features.insert(
            "Set",
            FeatureNode::Union(vec![FeatureId::from_str("Missing")]),
        );
        assert!(compendium.validate().is_ok());
    }

    #[test]
    fn test_cycle_is_rejected() {
        let json = r#"{
            "features": {
                "A": { "Union": ["B"] },
                "B": { "Union": ["A"] }
            }
        }"#;
        let err = Compendium::from_json(json).unwrap_err();
        assert!(matches!(err, CastError::FeatureCycle { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = Compendium::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CastError::InvalidConfig(_)));
    }
}
