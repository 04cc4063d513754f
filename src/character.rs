//! Character record.
//!
//! The persistent character as the engine sees it: class history,
//! subclass choices, experience ceilings, spell repertoires and the
//! features currently granted. The host owns persistence; the engine only
//! reads these fields and writes level-up results back.

use crate::config::StarterItem;
use crate::ids::{CharacterId, ClassId, FeatureId, SpellId, SubclassId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Levels held in one class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassLevelEntry {
    pub class: ClassId,
    pub level: u8,
}

/// Where a repertoire's spells come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepertoireOrigin {
    Race(String),
    Class(ClassId),
    Subclass(SubclassId),
    Monster,
}

impl RepertoireOrigin {
    /// Label shown next to a spell known through this origin.
    pub fn provenance_label(&self) -> String {
        match self {
            RepertoireOrigin::Race(race) => race.clone(),
            RepertoireOrigin::Class(class) => class.to_string(),
            RepertoireOrigin::Subclass(subclass) => subclass.to_string(),
            RepertoireOrigin::Monster => String::from("Multiclass"),
        }
    }
}

/// How a repertoire acquires spells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnowledgeMode {
    /// Picks a fixed number of spells.
    Selection,
    /// Scribes spells into a spellbook and prepares from it.
    Spellbook,
    /// Prepares from the whole class list.
    WholeList,
}

/// One pool of known and prepared spells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellRepertoire {
    pub origin: RepertoireOrigin,
    pub mode: KnowledgeMode,
    /// Highest tier this repertoire can cast at its own current level.
    pub max_spell_tier: u8,
    #[serde(default)]
    pub known_cantrips: Vec<SpellId>,
    #[serde(default)]
    pub known_spells: Vec<SpellId>,
    #[serde(default)]
    pub prepared_spells: Vec<SpellId>,
    #[serde(default)]
    pub scribed_spells: Vec<SpellId>,
}

impl SpellRepertoire {
    /// An empty repertoire.
    pub fn new(origin: RepertoireOrigin, mode: KnowledgeMode, max_spell_tier: u8) -> Self {
        Self {
            origin,
            mode,
            max_spell_tier,
            known_cantrips: Vec::new(),
            known_spells: Vec::new(),
            prepared_spells: Vec::new(),
            scribed_spells: Vec::new(),
        }
    }

    /// Every spell this repertoire holds, cantrips first.
    pub fn all_spells(&self) -> impl Iterator<Item = &SpellId> {
        self.known_cantrips
            .iter()
            .chain(&self.known_spells)
            .chain(&self.prepared_spells)
            .chain(&self.scribed_spells)
    }

    /// Whether this repertoire belongs to the given class or subclass.
    pub fn belongs_to(&self, class: &ClassId, subclass: Option<&SubclassId>) -> bool {
        match &self.origin {
            RepertoireOrigin::Class(c) => c == class,
            RepertoireOrigin::Subclass(s) => Some(s) == subclass,
            RepertoireOrigin::Race(_) | RepertoireOrigin::Monster => false,
        }
    }
}

/// The persistent character record.
///
/// # Examples
///
/// ```rust
/// use zzcast::{Character, ClassId};
///
/// let mut hero = Character::new("Aria");
/// hero.add_level("Wizard");
/// hero.add_level("Wizard");
/// hero.add_level("Cleric");
///
/// assert_eq!(hero.level(), 3);
/// assert_eq!(hero.class_level(&ClassId::from_str("Wizard")), 2);
/// assert_eq!(hero.classes_and_levels()[1].class.as_str(), "Cleric");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    #[serde(default)]
    pub race: Option<String>,
    /// One entry per level taken, oldest first.
    #[serde(default)]
    pub class_history: Vec<ClassId>,
    #[serde(default)]
    pub subclasses: HashMap<ClassId, SubclassId>,
    #[serde(default)]
    pub experience: u32,
    pub max_level: u8,
    pub max_experience: u32,
    #[serde(default)]
    pub repertoires: Vec<SpellRepertoire>,
    /// Granted features, keyed by a tag naming the granting class or subclass.
    #[serde(default)]
    pub active_features: HashMap<String, Vec<FeatureId>>,
    /// Feats trained during the current build.
    #[serde(default)]
    pub trained_feats: Vec<FeatureId>,
    #[serde(default)]
    pub deity: Option<String>,
    #[serde(default)]
    pub inventory: Vec<StarterItem>,
}

impl Character {
    /// A level-0 character with no classes.
    pub fn new(id: impl Into<CharacterId>) -> Self {
        Self {
            id: id.into(),
            race: None,
            class_history: Vec::new(),
            subclasses: HashMap::new(),
            experience: 0,
            max_level: 1,
            max_experience: 0,
            repertoires: Vec::new(),
            active_features: HashMap::new(),
            trained_feats: Vec::new(),
            deity: None,
            inventory: Vec::new(),
        }
    }

    /// Record one more level in `class`.
    pub fn add_level(&mut self, class: impl Into<ClassId>) {
        self.class_history.push(class.into());
    }

    /// Total character level.
    pub fn level(&self) -> u8 {
        self.class_history.len().min(u8::MAX as usize) as u8
    }

    /// Levels per class, in the order classes were first taken.
    pub fn classes_and_levels(&self) -> Vec<ClassLevelEntry> {
        let mut entries: Vec<ClassLevelEntry> = Vec::new();
        for class in &self.class_history {
            match entries.iter_mut().find(|e| &e.class == class) {
                Some(entry) => entry.level = entry.level.saturating_add(1),
                None => entries.push(ClassLevelEntry {
                    class: class.clone(),
                    level: 1,
                }),
            }
        }
        entries
    }

    /// Levels held in `class` (0 if never taken).
    pub fn class_level(&self, class: &ClassId) -> u8 {
        let count = self.class_history.iter().filter(|c| *c == class).count();
        count.min(u8::MAX as usize) as u8
    }

    /// Whether the character has at least one level in `class`.
    pub fn has_class(&self, class: &ClassId) -> bool {
        self.class_history.contains(class)
    }

    /// The class of the most recently taken level.
    pub fn latest_class(&self) -> Option<&ClassId> {
        self.class_history.last()
    }

    /// The subclass chosen for `class`, if any.
    pub fn subclass_for(&self, class: &ClassId) -> Option<&SubclassId> {
        self.subclasses.get(class)
    }

    /// Active features whose tag mentions `name`.
    pub fn features_tagged<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FeatureId> {
        self.active_features
            .iter()
            .filter(move |(tag, _)| tag.contains(name))
            .flat_map(|(_, features)| features.iter())
    }

    /// Grant features under `tag`.
    pub fn grant_features<I>(&mut self, tag: impl Into<String>, features: I)
    where
        I: IntoIterator,
        I::Item: Into<FeatureId>,
    {
        self.active_features
            .entry(tag.into())
            .or_default()
            .extend(features.into_iter().map(Into::into));
    }
}
