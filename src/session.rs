//! Level-up sessions.
//!
//! A `LevelUpSession` tracks one build or level-up interaction for one
//! character: the class and subclass being considered, the stage of the
//! wizard, and values derived from the selection. Sessions live in a
//! `SessionStore` keyed by character identity.
//!
//! Every store query answers with a neutral default (empty set, `false`,
//! level 1) when the character has no session, so hosts may query freely
//! outside a level-up. Sessions are not collected automatically: every
//! `begin` must be paired with an `end`.
//!
//! Spell queries are recomputed from the record and the session on every
//! call; nothing derived from spells is cached across selections.

use crate::character::Character;
use crate::compendium::Compendium;
use crate::config::{CasterConfig, StarterItem};
use crate::error::CastError;
use crate::ids::{CharacterId, ClassId, FeatureId, SpellId, SubclassId};
use crate::reconciler::KnownSpellsReconciler;
use crate::scanner::{FeatureGraphScanner, ScanMode};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Transient state of one level-up interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpSession {
    character: CharacterId,
    leveling_up: bool,
    class_selection_stage: bool,
    selected_class: Option<ClassId>,
    selected_subclass: Option<SubclassId>,
    requires_deity: bool,
    granted_items: Vec<StarterItem>,
}

impl LevelUpSession {
    fn new(character: CharacterId, leveling_up: bool) -> Self {
        Self {
            character,
            leveling_up,
            class_selection_stage: true,
            selected_class: None,
            selected_subclass: None,
            requires_deity: false,
            granted_items: Vec::new(),
        }
    }

    /// Select the class to take a level in, recomputing everything that
    /// depends on it.
    ///
    /// The subclass resets to whatever the record already associates with
    /// the class.
    pub fn select_class(
        &mut self,
        class: impl Into<ClassId>,
        character: &Character,
        config: &CasterConfig,
    ) {
        let class = class.into();
        let held = character.classes_and_levels();

        self.requires_deity = config.requires_deity(&class)
            && !held.iter().any(|entry| config.requires_deity(&entry.class));

        self.granted_items.clear();
        for rule in &config.starter_items {
            let first_in_category =
                rule.covers(&class) && !held.iter().any(|entry| rule.covers(&entry.class));
            if !first_in_category {
                continue;
            }
            for &item in &rule.items {
                if !self.granted_items.contains(&item) {
                    self.granted_items.push(item);
                }
            }
        }

        self.selected_subclass = character.subclass_for(&class).cloned();
        self.selected_class = Some(class);
    }

    /// Select (or clear) the subclass.
    pub fn select_subclass(&mut self, subclass: Option<SubclassId>) {
        self.selected_subclass = subclass;
    }

    /// Flag which wizard step is active.
    pub fn set_class_selection_stage(&mut self, class_selection_stage: bool) {
        self.class_selection_stage = class_selection_stage;
    }

    pub fn character(&self) -> &CharacterId {
        &self.character
    }

    /// Whether the session levels up an existing character (as opposed to
    /// building a new one).
    pub fn is_leveling_up(&self) -> bool {
        self.leveling_up
    }

    pub fn is_class_selection_stage(&self) -> bool {
        self.class_selection_stage
    }

    pub fn selected_class(&self) -> Option<&ClassId> {
        self.selected_class.as_ref()
    }

    pub fn selected_subclass(&self) -> Option<&SubclassId> {
        self.selected_subclass.as_ref()
    }

    /// Whether a deity must be chosen for the selected class.
    pub fn requires_deity(&self) -> bool {
        self.requires_deity
    }

    /// Starter items the selected class grants.
    pub fn granted_items(&self) -> &[StarterItem] {
        &self.granted_items
    }

    /// Write the selection onto the permanent record: one level in the
    /// selected class, its subclass, and any granted starter items.
    ///
    /// Once the record holds the class, a repeat selection of it grants no
    /// items and needs no deity, so both are cleared here. Committing
    /// again adds another level without re-granting anything.
    pub fn commit(&mut self, character: &mut Character) -> Result<(), CastError> {
        let class = self
            .selected_class
            .clone()
            .ok_or_else(|| CastError::NoClassSelected(character.id.clone()))?;

        if character.level() >= character.max_level {
            return Err(CastError::LevelCeilingReached {
                character: character.id.clone(),
                max_level: character.max_level,
            });
        }

        character.add_level(class.clone());
        if let Some(subclass) = &self.selected_subclass {
            character.subclasses.insert(class, subclass.clone());
        }
        character.inventory.extend(self.granted_items.drain(..));
        self.requires_deity = false;

        tracing::debug!(
            character = %character.id,
            level = character.level(),
            "committed level-up"
        );
        Ok(())
    }
}

/// All active level-up sessions.
///
/// # Examples
///
/// ```rust
/// use zzcast::{CasterConfig, Character, SessionStore};
///
/// let config = CasterConfig::default();
/// let mut hero = Character::new("Aria");
/// hero.add_level("Wizard");
///
/// let mut store = SessionStore::new();
/// store.begin(&mut hero, true, &config);
/// assert_eq!(store.query(&hero.id).unwrap().selected_class().unwrap().as_str(), "Wizard");
///
/// store.end(&hero.id);
/// assert!(store.query(&hero.id).is_none());
/// assert!(!store.is_multiclass(&hero));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: HashMap<CharacterId, LevelUpSession>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `character`, replacing any existing one.
    ///
    /// Refreshes the record's level and experience ceilings from the house
    /// rules. When leveling up, the most recently taken class and its
    /// subclass become the initial selection.
    pub fn begin(
        &mut self,
        character: &mut Character,
        leveling_up: bool,
        config: &CasterConfig,
    ) -> &mut LevelUpSession {
        let ceiling = config.level_ceiling();
        character.max_level = ceiling.max_level;
        character.max_experience = ceiling.max_experience;

        let mut session = LevelUpSession::new(character.id.clone(), leveling_up);
        if leveling_up {
            if let Some(class) = character.latest_class() {
                session.selected_subclass = character.subclass_for(class).cloned();
                session.selected_class = Some(class.clone());
            }
        }

        tracing::debug!(character = %character.id, leveling_up, "began level-up session");

        match self.sessions.entry(character.id.clone()) {
            Entry::Occupied(mut entry) => {
                tracing::debug!(character = %character.id, "replaced existing level-up session");
                entry.insert(session);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(session),
        }
    }

    /// Tear down the session of `character`, returning it if there was one.
    pub fn end(&mut self, character: &CharacterId) -> Option<LevelUpSession> {
        let session = self.sessions.remove(character);
        if session.is_some() {
            tracing::debug!(character = %character, "ended level-up session");
        }
        session
    }

    /// The session of `character`, if one is active.
    pub fn query(&self, character: &CharacterId) -> Option<&LevelUpSession> {
        self.sessions.get(character)
    }

    /// Mutable access to the session of `character`, if one is active.
    pub fn query_mut(&mut self, character: &CharacterId) -> Option<&mut LevelUpSession> {
        self.sessions.get_mut(character)
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is active.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The active session with a selected class, if any.
    fn selection<'s>(&'s self, character: &Character) -> Option<(&'s LevelUpSession, &'s ClassId)> {
        let session = self.sessions.get(&character.id)?;
        let class = session.selected_class.as_ref()?;
        Some((session, class))
    }

    /// Features granted by the selected class plus feats trained this build.
    fn scoped_features<'c>(character: &'c Character, class: &'c ClassId) -> Vec<&'c FeatureId> {
        character
            .features_tagged(class.as_str())
            .chain(character.trained_feats.iter())
            .collect()
    }

    fn scan(&self, character: &Character, compendium: &Compendium, mode: ScanMode) -> HashSet<SpellId> {
        match self.selection(character) {
            Some((_, class)) => FeatureGraphScanner::new(compendium)
                .scan(Self::scoped_features(character, class), mode),
            None => HashSet::new(),
        }
    }

    /// Spells the selected class's active features put within reach.
    pub fn allowed_spells(&self, character: &Character, compendium: &Compendium) -> HashSet<SpellId> {
        self.scan(character, compendium, ScanMode::Allowed)
    }

    /// Spells the selected class's active features auto-prepare.
    pub fn allowed_auto_prepared_spells(
        &self,
        character: &Character,
        compendium: &Compendium,
    ) -> HashSet<SpellId> {
        self.scan(character, compendium, ScanMode::Prepared)
    }

    /// Spells known through repertoires other than the selected one.
    pub fn other_classes_known_spells(
        &self,
        character: &Character,
        compendium: &Compendium,
    ) -> HashMap<SpellId, String> {
        match self.selection(character) {
            Some((session, class)) => KnownSpellsReconciler::new(compendium).other_known_spells(
                character,
                class,
                session.selected_subclass(),
            ),
            None => HashMap::new(),
        }
    }

    /// Filter the candidate spells of the selected repertoire according to
    /// the configured learning policy.
    ///
    /// Without a session the candidates come back untouched.
    pub fn reconcile_candidates(
        &self,
        character: &Character,
        compendium: &Compendium,
        config: &CasterConfig,
        candidates: Vec<SpellId>,
    ) -> Vec<SpellId> {
        if self.selection(character).is_none() {
            return candidates;
        }

        let known_elsewhere = self.other_classes_known_spells(character, compendium);
        let allowed = if config.allow_relearning {
            HashSet::new()
        } else {
            self.allowed_spells(character, compendium)
        };

        KnownSpellsReconciler::new(compendium).reconcile(
            candidates,
            &known_elsewhere,
            &allowed,
            config.allow_relearning,
        )
    }

    /// Whether the character is multiclassed during its session.
    ///
    /// True when the record already holds more than one class, whatever is
    /// selected, or when it holds at least one class and the selected class
    /// is not among them. A first class picked on a classless character is
    /// not multiclassing. Without a session the answer is `false`.
    pub fn is_multiclass(&self, character: &Character) -> bool {
        let Some(session) = self.sessions.get(&character.id) else {
            return false;
        };

        let held = character.classes_and_levels().len();
        let new_class = session
            .selected_class
            .as_ref()
            .is_some_and(|class| !character.has_class(class));

        held > 1 || (held > 0 && new_class)
    }

    /// Current level of the selected class on the record; 1 for a class the
    /// character doesn't have yet.
    pub fn selected_class_level(&self, character: &Character) -> u8 {
        match self.selection(character) {
            Some((_, class)) => character.class_level(class).max(1),
            None => 1,
        }
    }

    /// Whether a deity must be chosen.
    pub fn requires_deity(&self, character: &Character) -> bool {
        self.sessions
            .get(&character.id)
            .is_some_and(LevelUpSession::requires_deity)
    }

    /// Starter items granted by the current selection.
    pub fn granted_items(&self, character: &Character) -> &[StarterItem] {
        self.sessions
            .get(&character.id)
            .map(LevelUpSession::granted_items)
            .unwrap_or(&[])
    }

    /// Whether the class selection step is active.
    pub fn is_class_selection_stage(&self, character: &Character) -> bool {
        self.sessions
            .get(&character.id)
            .is_some_and(LevelUpSession::is_class_selection_stage)
    }

    /// Commit the session of `character` onto its record.
    ///
    /// The session stays open with its selection; call [`SessionStore::end`]
    /// to tear it down.
    pub fn commit(&mut self, character: &mut Character) -> Result<(), CastError> {
        let session = self
            .sessions
            .get_mut(&character.id)
            .ok_or_else(|| CastError::SessionNotFound(character.id.clone()))?;
        session.commit(character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero_with(classes: &[&str]) -> Character {
        let mut hero = Character::new("Aria");
        for class in classes {
            hero.add_level(*class);
        }
        hero
    }

    #[test]
    fn test_begin_new_character_has_no_selection() {
        let config = CasterConfig::default();
        let mut hero = hero_with(&[]);
        let mut store = SessionStore::new();

        let session = store.begin(&mut hero, false, &config);
        assert!(session.selected_class().is_none());
        assert!(session.is_class_selection_stage());
        assert!(!session.is_leveling_up());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_begin_leveling_up_captures_latest_class() {
        let config = CasterConfig::default();
        let mut hero = hero_with(&["Fighter", "Fighter", "Wizard", "Fighter"]);
        hero.subclasses.insert(
            ClassId::from_str("Fighter"),
            SubclassId::from_str("MartialSpellblade"),
        );
        let mut store = SessionStore::new();

        let session = store.begin(&mut hero, true, &config);
        assert_eq!(session.selected_class().map(ClassId::as_str), Some("Fighter"));
        assert_eq!(
            session.selected_subclass().map(SubclassId::as_str),
            Some("MartialSpellblade")
        );
    }

    #[test]
    fn test_begin_refreshes_level_ceiling() {
        let mut config = CasterConfig::default();
        let mut hero = hero_with(&["Wizard"]);
        let mut store = SessionStore::new();

        store.begin(&mut hero, true, &config);
        assert_eq!(hero.max_level, 16);
        assert_eq!(hero.max_experience, 195_000);

        config.level_20 = true;
        store.begin(&mut hero, true, &config);
        assert_eq!(hero.max_level, 20);
        assert_eq!(hero.max_experience, 355_000);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_select_class_resets_subclass_from_record() {
        let config = CasterConfig::default();
        let mut hero = hero_with(&["Fighter", "Wizard"]);
        hero.subclasses.insert(
            ClassId::from_str("Wizard"),
            SubclassId::from_str("WizardEvoker"),
        );
        let mut store = SessionStore::new();
        let session = store.begin(&mut hero, true, &config);

        session.select_subclass(Some(SubclassId::from_str("Temporary")));
        session.select_class("Fighter", &hero, &config);
        assert!(session.selected_subclass().is_none());

        session.select_class("Wizard", &hero, &config);
        assert_eq!(
            session.selected_subclass().map(SubclassId::as_str),
            Some("WizardEvoker")
        );
    }

    #[test]
    fn test_deity_requirement() {
        let config = CasterConfig::default();
        let mut store = SessionStore::new();

        let mut fighter = hero_with(&["Fighter"]);
        store.begin(&mut fighter, true, &config);
        let session = store.query_mut(&fighter.id).unwrap();
        session.select_class("Cleric", &fighter, &config);
        assert!(session.requires_deity());
        session.select_class("Wizard", &fighter, &config);
        assert!(!session.requires_deity());

        // A paladin already chose a deity.
        let mut paladin = hero_with(&["Paladin"]);
        store.begin(&mut paladin, true, &config);
        let session = store.query_mut(&paladin.id).unwrap();
        session.select_class("Cleric", &paladin, &config);
        assert!(!session.requires_deity());
    }

    #[test]
    fn test_starter_items_only_on_first_level_in_category() {
        let config = CasterConfig::default();
        let mut store = SessionStore::new();

        let mut hero = hero_with(&["Fighter"]);
        store.begin(&mut hero, true, &config);
        let session = store.query_mut(&hero.id).unwrap();

        session.select_class("Wizard", &hero, &config);
        assert_eq!(
            session.granted_items(),
            &[StarterItem::Spellbook, StarterItem::Robe]
        );

        session.select_class("Fighter", &hero, &config);
        assert!(session.granted_items().is_empty());

        let mut sorcerer = hero_with(&["Sorcerer"]);
        store.begin(&mut sorcerer, true, &config);
        let session = store.query_mut(&sorcerer.id).unwrap();
        // Same category as the sorcerer's pouch.
        session.select_class("Warlock", &sorcerer, &config);
        assert!(session.granted_items().is_empty());
    }

    #[test]
    fn test_stage_flag() {
        let config = CasterConfig::default();
        let mut hero = hero_with(&["Wizard"]);
        let mut store = SessionStore::new();
        store.begin(&mut hero, true, &config);

        assert!(store.is_class_selection_stage(&hero));
        store
            .query_mut(&hero.id)
            .unwrap()
            .set_class_selection_stage(false);
        assert!(!store.is_class_selection_stage(&hero));
    }

    #[test]
    fn test_is_multiclass() {
        let config = CasterConfig::default();
        let mut store = SessionStore::new();

        let mut fresh = Character::new("Fresh");
        store.begin(&mut fresh, false, &config);
        store
            .query_mut(&fresh.id)
            .unwrap()
            .select_class("Wizard", &fresh, &config);
        assert!(!store.is_multiclass(&fresh));

        let mut wizard = Character::new("Wiz");
        wizard.add_level("Wizard");
        store.begin(&mut wizard, true, &config);
        assert!(!store.is_multiclass(&wizard));
        store
            .query_mut(&wizard.id)
            .unwrap()
            .select_class("Cleric", &wizard, &config);
        assert!(store.is_multiclass(&wizard));

        let mut dual = Character::new("Dual");
        dual.add_level("Wizard");
        dual.add_level("Cleric");
        store.begin(&mut dual, true, &config);
        assert!(store.is_multiclass(&dual));
    }

    #[test]
    fn test_selected_class_level() {
        let config = CasterConfig::default();
        let mut hero = hero_with(&["Wizard", "Wizard", "Wizard"]);
        let mut store = SessionStore::new();

        assert_eq!(store.selected_class_level(&hero), 1);
        store.begin(&mut hero, true, &config);
        assert_eq!(store.selected_class_level(&hero), 3);

        store
            .query_mut(&hero.id)
            .unwrap()
            .select_class("Cleric", &hero, &config);
        assert_eq!(store.selected_class_level(&hero), 1);
    }

    #[test]
    fn test_commit_writes_record() {
        let config = CasterConfig::default();
        let mut hero = hero_with(&["Fighter"]);
        let mut store = SessionStore::new();
        store.begin(&mut hero, true, &config);
        {
            let session = store.query_mut(&hero.id).unwrap();
            session.select_class("Cleric", &hero, &config);
            session.select_subclass(Some(SubclassId::from_str("DomainLife")));
        }

        store.commit(&mut hero).unwrap();
        assert_eq!(hero.level(), 2);
        assert_eq!(hero.class_level(&ClassId::from_str("Cleric")), 1);
        assert_eq!(
            hero.subclass_for(&ClassId::from_str("Cleric")).map(SubclassId::as_str),
            Some("DomainLife")
        );
        assert_eq!(hero.inventory, vec![StarterItem::HolySymbol]);
    }

    #[test]
    fn test_second_commit_grants_nothing_new() {
        let config = CasterConfig::default();
        let mut hero = hero_with(&["Fighter"]);
        let mut store = SessionStore::new();
        store.begin(&mut hero, true, &config);
        store
            .query_mut(&hero.id)
            .unwrap()
            .select_class("Cleric", &hero, &config);

        store.commit(&mut hero).unwrap();
        assert!(store.granted_items(&hero).is_empty());
        assert!(!store.requires_deity(&hero));

        store.commit(&mut hero).unwrap();
        assert_eq!(hero.inventory, vec![StarterItem::HolySymbol]);
        assert_eq!(hero.class_level(&ClassId::from_str("Cleric")), 2);

        // A fresh selection against the updated record agrees.
        let session = store.query_mut(&hero.id).unwrap();
        session.select_class("Cleric", &hero, &config);
        assert!(session.granted_items().is_empty());
        assert!(!session.requires_deity());
    }

    #[test]
    fn test_commit_errors() {
        let config = CasterConfig::default();
        let mut store = SessionStore::new();

        let mut stranger = Character::new("Stranger");
        assert_eq!(
            store.commit(&mut stranger),
            Err(CastError::SessionNotFound(stranger.id.clone()))
        );

        let mut fresh = Character::new("Fresh");
        store.begin(&mut fresh, false, &config);
        assert_eq!(
            store.commit(&mut fresh),
            Err(CastError::NoClassSelected(fresh.id.clone()))
        );

        let mut veteran = hero_with(&["Wizard"; 16]);
        store.begin(&mut veteran, true, &config);
        assert_eq!(
            store.commit(&mut veteran),
            Err(CastError::LevelCeilingReached {
                character: veteran.id.clone(),
                max_level: 16,
            })
        );
        assert_eq!(veteran.level(), 16);
    }

    #[test]
    fn test_end_returns_session_once() {
        let config = CasterConfig::default();
        let mut hero = hero_with(&["Wizard"]);
        let mut store = SessionStore::new();
        store.begin(&mut hero, true, &config);

        assert!(store.end(&hero.id).is_some());
        assert!(store.end(&hero.id).is_none());
        assert!(store.is_empty());
    }
}
