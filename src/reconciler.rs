//! Known spells reconciliation.
//!
//! When a character casts from several repertoires, spells learned under
//! one of them affect what the repertoire being edited may learn. The
//! reconciler tags every spell known elsewhere with where it came from,
//! then filters the candidate list for the selected repertoire.

use crate::character::Character;
use crate::compendium::Compendium;
use crate::ids::{ClassId, SpellId, SubclassId};
use std::collections::{HashMap, HashSet};

/// Decides which spells stay legal across a character's repertoires.
pub struct KnownSpellsReconciler<'a> {
    compendium: &'a Compendium,
}

impl<'a> KnownSpellsReconciler<'a> {
    pub fn new(compendium: &'a Compendium) -> Self {
        Self { compendium }
    }

    /// Spells known through repertoires other than the selected one, each
    /// tagged with the label of the repertoire that knows it.
    ///
    /// Spells above the owning repertoire's castable tier are left out, as
    /// are spells the catalog doesn't know. The first repertoire to tag a
    /// spell keeps it.
    pub fn other_known_spells(
        &self,
        character: &Character,
        class: &ClassId,
        subclass: Option<&SubclassId>,
    ) -> HashMap<SpellId, String> {
        let mut provenance = HashMap::new();

        for repertoire in &character.repertoires {
            if repertoire.belongs_to(class, subclass) {
                continue;
            }

            let label = repertoire.origin.provenance_label();
            for spell in repertoire.all_spells() {
                let Some(tier) = self.compendium.spells.tier(spell) else {
                    tracing::debug!(spell = %spell, "skipping spell missing from the catalog");
                    continue;
                };
                if tier > repertoire.max_spell_tier {
                    continue;
                }
                provenance
                    .entry(spell.clone())
                    .or_insert_with(|| label.clone());
            }
        }

        provenance
    }

    /// Filter the candidate spells of the selected repertoire.
    ///
    /// With `allow_relearning`, anything already known elsewhere is
    /// removed. Without it, only spells in `allowed` survive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::{HashMap, HashSet};
    /// use zzcast::{Compendium, KnownSpellsReconciler, SpellId};
    ///
    /// let compendium = Compendium::new();
    /// let reconciler = KnownSpellsReconciler::new(&compendium);
    ///
    /// let shield = SpellId::from_str("Shield");
    /// let sleep = SpellId::from_str("Sleep");
    /// let mut elsewhere = HashMap::new();
    /// elsewhere.insert(shield.clone(), String::from("Sorcerer"));
    /// let allowed: HashSet<_> = [shield.clone()].into_iter().collect();
    ///
    /// let candidates = vec![shield.clone(), sleep.clone()];
    /// assert_eq!(reconciler.reconcile(candidates.clone(), &elsewhere, &allowed, true), vec![sleep]);
    /// assert_eq!(reconciler.reconcile(candidates, &elsewhere, &allowed, false), vec![shield]);
    /// ```
    pub fn reconcile(
        &self,
        candidates: Vec<SpellId>,
        known_elsewhere: &HashMap<SpellId, String>,
        allowed: &HashSet<SpellId>,
        allow_relearning: bool,
    ) -> Vec<SpellId> {
        if allow_relearning {
            candidates
                .into_iter()
                .filter(|spell| !known_elsewhere.contains_key(spell))
                .collect()
        } else {
            candidates
                .into_iter()
                .filter(|spell| allowed.contains(spell))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{KnowledgeMode, RepertoireOrigin, SpellRepertoire};

    fn spell(s: &str) -> SpellId {
        SpellId::from_str(s)
    }

    fn compendium() -> Compendium {
        let mut compendium = Compendium::new();
        for (name, tier) in [
            ("FireBolt", 0),
            ("Shield", 1),
            ("Sleep", 1),
            ("Bless", 1),
            ("MistyStep", 2),
            ("Fireball", 3),
        ] {
            compendium.spells.insert_spell(name, tier);
        }
        compendium
    }

    fn hero() -> Character {
        let mut hero = Character::new("Aria");
        for class in ["Wizard", "Sorcerer", "Cleric"] {
            hero.add_level(class);
        }

        let mut wizard = SpellRepertoire::new(
            RepertoireOrigin::Class(ClassId::from_str("Wizard")),
            KnowledgeMode::Spellbook,
            1,
        );
        wizard.known_cantrips.push(spell("FireBolt"));
        wizard.scribed_spells.extend([spell("Shield"), spell("MistyStep")]);

        let mut sorcerer = SpellRepertoire::new(
            RepertoireOrigin::Class(ClassId::from_str("Sorcerer")),
            KnowledgeMode::Selection,
            1,
        );
        sorcerer.known_cantrips.push(spell("FireBolt"));
        sorcerer.known_spells.extend([spell("Sleep"), spell("Homebrew")]);

        let mut racial = SpellRepertoire::new(
            RepertoireOrigin::Race(String::from("Tiefling")),
            KnowledgeMode::Selection,
            3,
        );
        racial.known_spells.push(spell("Fireball"));

        hero.repertoires = vec![wizard, sorcerer, racial];
        hero
    }

    #[test]
    fn test_other_known_spells_tags_provenance() {
        let compendium = compendium();
        let reconciler = KnownSpellsReconciler::new(&compendium);
        let hero = hero();

        let tags = reconciler.other_known_spells(&hero, &ClassId::from_str("Cleric"), None);

        assert_eq!(tags.get(&spell("FireBolt")).map(String::as_str), Some("Wizard"));
        assert_eq!(tags.get(&spell("Shield")).map(String::as_str), Some("Wizard"));
        assert_eq!(tags.get(&spell("Sleep")).map(String::as_str), Some("Sorcerer"));
        assert_eq!(tags.get(&spell("Fireball")).map(String::as_str), Some("Tiefling"));
        // Tier 2 is above the wizard repertoire's reach.
        assert!(!tags.contains_key(&spell("MistyStep")));
        assert!(!tags.contains_key(&spell("Homebrew")));
    }

    #[test]
    fn test_selected_repertoire_is_excluded() {
        let compendium = compendium();
        let reconciler = KnownSpellsReconciler::new(&compendium);
        let hero = hero();

        let tags = reconciler.other_known_spells(&hero, &ClassId::from_str("Wizard"), None);

        assert!(!tags.contains_key(&spell("Shield")));
        // Still known by the sorcerer.
        assert_eq!(tags.get(&spell("FireBolt")).map(String::as_str), Some("Sorcerer"));
    }

    #[test]
    fn test_subclass_repertoire_is_selected_with_its_subclass() {
        let compendium = compendium();
        let reconciler = KnownSpellsReconciler::new(&compendium);
        let mut hero = Character::new("Brom");
        hero.add_level("Fighter");

        let blade = SubclassId::from_str("MartialSpellblade");
        let mut repertoire =
            SpellRepertoire::new(RepertoireOrigin::Subclass(blade.clone()), KnowledgeMode::Selection, 1);
        repertoire.known_spells.push(spell("Shield"));
        hero.repertoires.push(repertoire);

        let fighter = ClassId::from_str("Fighter");
        assert!(reconciler
            .other_known_spells(&hero, &fighter, Some(&blade))
            .is_empty());
        assert_eq!(
            reconciler
                .other_known_spells(&hero, &fighter, None)
                .get(&spell("Shield"))
                .map(String::as_str),
            Some("MartialSpellblade")
        );
    }

    #[test]
    fn test_whitelist_never_leaks() {
        let compendium = compendium();
        let reconciler = KnownSpellsReconciler::new(&compendium);
        let hero = hero();

        let tags = reconciler.other_known_spells(&hero, &ClassId::from_str("Cleric"), None);
        let allowed: HashSet<_> = [spell("Bless"), spell("Shield")].into_iter().collect();
        let candidates = vec![
            spell("Bless"),
            spell("Shield"),
            spell("Sleep"),
            spell("Fireball"),
            spell("MistyStep"),
        ];

        let kept = reconciler.reconcile(candidates, &tags, &allowed, false);
        assert!(kept.iter().all(|s| allowed.contains(s)));
        assert_eq!(kept, vec![spell("Bless"), spell("Shield")]);
    }

    #[test]
    fn test_relearning_excludes_known_elsewhere() {
        let compendium = compendium();
        let reconciler = KnownSpellsReconciler::new(&compendium);
        let hero = hero();

        let tags = reconciler.other_known_spells(&hero, &ClassId::from_str("Cleric"), None);
        let candidates = vec![spell("Bless"), spell("Shield"), spell("MistyStep")];

        let kept = reconciler.reconcile(candidates, &tags, &HashSet::new(), true);
        assert_eq!(kept, vec![spell("Bless"), spell("MistyStep")]);
    }
}
