//! Feature graph scanning.
//!
//! Collects the spells a set of features puts within reach. Union sets
//! are expanded; exclusive sets are never entered, because which of their
//! children is granted is a runtime choice.

use crate::compendium::Compendium;
use crate::feature::{FeatureNode, SpellGrant};
use crate::ids::{FeatureId, SpellId, SpellListId};
use std::collections::HashSet;

/// Which grants a scan collects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanMode {
    /// Auto-prepared spell groups only.
    Prepared,
    /// Auto-prepared spells, bonus cantrips, extended spell lists and
    /// nested cast-spell lists.
    Allowed,
}

/// Walks feature graphs in a compendium.
///
/// # Examples
///
/// ```rust
/// use zzcast::{Compendium, FeatureGraphScanner, FeatureId, FeatureNode, ScanMode, SpellGrant, SpellId};
///
/// let mut compendium = Compendium::new();
/// compendium.features.insert(
///     "A",
///     FeatureNode::Grantor(SpellGrant::AutoPrepared(vec![SpellId::from_str("Bless")])),
/// );
/// compendium.features.insert(
///     "B",
///     FeatureNode::Grantor(SpellGrant::AutoPrepared(vec![SpellId::from_str("CureWounds")])),
/// );
/// compendium.features.insert(
///     "Domain",
///     FeatureNode::Union(vec![FeatureId::from_str("A"), FeatureId::from_str("B")]),
/// );
///
/// let scanner = FeatureGraphScanner::new(&compendium);
/// let spells = scanner.scan(&[FeatureId::from_str("Domain")], ScanMode::Prepared);
/// assert_eq!(spells.len(), 2);
/// ```
pub struct FeatureGraphScanner<'a> {
    compendium: &'a Compendium,
}

impl<'a> FeatureGraphScanner<'a> {
    pub fn new(compendium: &'a Compendium) -> Self {
        Self { compendium }
    }

    /// Collect every spell reachable from `roots` in the given mode.
    pub fn scan<'r, I>(&self, roots: I, mode: ScanMode) -> HashSet<SpellId>
    where
        I: IntoIterator<Item = &'r FeatureId>,
    {
        let mut spells = HashSet::new();
        let mut visited = HashSet::new();
        for root in roots {
            self.visit(root, mode, &mut visited, &mut spells);
        }
        spells
    }

    fn visit(
        &self,
        feature: &FeatureId,
        mode: ScanMode,
        visited: &mut HashSet<FeatureId>,
        spells: &mut HashSet<SpellId>,
    ) {
        // Also stops accidental cycles.
        if !visited.insert(feature.clone()) {
            return;
        }

        let Some(node) = self.compendium.features.get(feature) else {
            tracing::debug!(feature = %feature, "skipping unknown feature");
            return;
        };

        match node {
            FeatureNode::Union(children) => {
                for child in children {
                    self.visit(child, mode, visited, spells);
                }
            }
            FeatureNode::Grantor(grant) => self.collect(feature, grant, mode, spells),
            FeatureNode::Exclusive(_) | FeatureNode::Opaque => {}
        }
    }

    fn collect(
        &self,
        feature: &FeatureId,
        grant: &SpellGrant,
        mode: ScanMode,
        spells: &mut HashSet<SpellId>,
    ) {
        match (grant, mode) {
            (SpellGrant::AutoPrepared(granted), _) => spells.extend(granted.iter().cloned()),
            (SpellGrant::BonusCantrips(granted), ScanMode::Allowed) => {
                spells.extend(granted.iter().cloned())
            }
            (SpellGrant::ExtendedSpellList(list), ScanMode::Allowed)
            | (SpellGrant::CastSpell(list), ScanMode::Allowed) => {
                self.collect_list(feature, list.as_ref(), spells)
            }
            (_, ScanMode::Prepared) => {}
        }
    }

    fn collect_list(
        &self,
        feature: &FeatureId,
        list: Option<&SpellListId>,
        spells: &mut HashSet<SpellId>,
    ) {
        let Some(list) = list else {
            tracing::debug!(feature = %feature, "skipping grant without a spell list");
            return;
        };
        match self.compendium.spells.list(list) {
            Some(listed) => spells.extend(listed.iter().cloned()),
            None => tracing::debug!(feature = %feature, list = %list, "skipping unknown spell list"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(s: &str) -> SpellId {
        SpellId::from_str(s)
    }

    fn feature(s: &str) -> FeatureId {
        FeatureId::from_str(s)
    }

    fn names(spells: &HashSet<SpellId>) -> Vec<&str> {
        let mut names: Vec<_> = spells.iter().map(SpellId::as_str).collect();
        names.sort();
        names
    }

    fn fixture() -> Compendium {
        let mut compendium = Compendium::new();
        compendium.spells.insert_list("NatureList", ["Entangle", "Goodberry"]);
        compendium.spells.insert_list("WizardList", ["MagicMissile", "Shield"]);

        let features = &mut compendium.features;
        features.insert(
            "PreparedX",
            FeatureNode::Grantor(SpellGrant::AutoPrepared(vec![spell("SpellX")])),
        );
        features.insert(
            "PreparedY",
            FeatureNode::Grantor(SpellGrant::AutoPrepared(vec![spell("SpellY")])),
        );
        features.insert(
            "Cantrips",
            FeatureNode::Grantor(SpellGrant::BonusCantrips(vec![spell("Druidcraft")])),
        );
        features.insert(
            "Expanded",
            FeatureNode::Grantor(SpellGrant::ExtendedSpellList(Some(SpellListId::from_str(
                "NatureList",
            )))),
        );
        features.insert(
            "Casting",
            FeatureNode::Grantor(SpellGrant::CastSpell(Some(SpellListId::from_str(
                "WizardList",
            )))),
        );
        features.insert(
            "Choice",
            FeatureNode::Exclusive(vec![feature("PreparedX"), feature("PreparedY")]),
        );
        features.insert("Sense", FeatureNode::Opaque);
        compendium
    }

    #[test]
    fn test_union_collects_both_grantors() {
        let mut compendium = fixture();
        compendium.features.insert(
            "Both",
            FeatureNode::Union(vec![feature("PreparedX"), feature("PreparedY")]),
        );

        let scanner = FeatureGraphScanner::new(&compendium);
        let spells = scanner.scan(&[feature("Both")], ScanMode::Allowed);
        assert_eq!(names(&spells), vec!["SpellX", "SpellY"]);
    }

    #[test]
    fn test_exclusive_set_is_never_entered() {
        let mut compendium = fixture();
        compendium
            .features
            .insert("Root", FeatureNode::Union(vec![feature("Choice"), feature("Sense")]));

        let scanner = FeatureGraphScanner::new(&compendium);
        assert!(scanner.scan(&[feature("Root")], ScanMode::Allowed).is_empty());
        assert!(scanner.scan(&[feature("Choice")], ScanMode::Prepared).is_empty());
    }

    #[test]
    fn test_prepared_mode_ignores_other_grants() {
        let compendium = fixture();
        let scanner = FeatureGraphScanner::new(&compendium);
        let roots = [
            feature("PreparedX"),
            feature("Cantrips"),
            feature("Expanded"),
            feature("Casting"),
        ];

        let prepared = scanner.scan(&roots, ScanMode::Prepared);
        assert_eq!(names(&prepared), vec!["SpellX"]);

        let allowed = scanner.scan(&roots, ScanMode::Allowed);
        assert_eq!(
            names(&allowed),
            vec!["Druidcraft", "Entangle", "Goodberry", "MagicMissile", "Shield", "SpellX"]
        );
    }

    #[test]
    fn test_malformed_nodes_are_skipped() {
        let mut compendium = fixture();
        compendium.features.insert(
            "NoList",
            FeatureNode::Grantor(SpellGrant::ExtendedSpellList(None)),
        );
        compendium.features.insert(
            "BadList",
            FeatureNode::Grantor(SpellGrant::CastSpell(Some(SpellListId::from_str("Gone")))),
        );
        compendium.features.insert(
            "Root",
            FeatureNode::Union(vec![
                feature("NoList"),
                feature("BadList"),
                feature("Unknown"),
                feature("PreparedY"),
            ]),
        );

        let scanner = FeatureGraphScanner::new(&compendium);
        let spells = scanner.scan(&[feature("Root")], ScanMode::Allowed);
        assert_eq!(names(&spells), vec!["SpellY"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut compendium = fixture();
        compendium
            .features
            .insert("A", FeatureNode::Union(vec![feature("B"), feature("PreparedX")]));
        compendium
            .features
            .insert("B", FeatureNode::Union(vec![feature("A"), feature("PreparedY")]));

        let scanner = FeatureGraphScanner::new(&compendium);
        let spells = scanner.scan(&[feature("A")], ScanMode::Prepared);
        assert_eq!(names(&spells), vec!["SpellX", "SpellY"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut compendium = fixture();
        compendium.features.insert(
            "Again",
            FeatureNode::Grantor(SpellGrant::BonusCantrips(vec![
                spell("SpellX"),
                spell("SpellX"),
            ])),
        );

        let scanner = FeatureGraphScanner::new(&compendium);
        let spells = scanner.scan(
            &[feature("PreparedX"), feature("Again")],
            ScanMode::Allowed,
        );
        assert_eq!(spells.len(), 1);
    }
}
