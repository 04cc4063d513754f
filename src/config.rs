//! Static configuration.
//!
//! `CasterConfig` holds the tables the engine reads but never owns: which
//! archetype each class or subclass casts with, which classes use the
//! pact table, which classes need a deity, which starter items a first
//! level in a class grants, and the house-rule level ceilings.
//!
//! Configuration can be built in code or loaded from JSON. Every field is
//! optional in JSON and defaults to empty.

use crate::error::CastError;
use crate::ids::{ClassId, SubclassId};
use crate::progression::{experience_for_level, ProgressionArchetype, MAX_LEVEL};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Items a class may hand out on the character's first level in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StarterItem {
    HolySymbol,
    ComponentPouch,
    Instrument,
    Focus,
    Spellbook,
    Robe,
}

/// Grants `items` when the selected class is in `classes` and no class the
/// character already holds is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarterItemRule {
    pub classes: Vec<ClassId>,
    pub items: Vec<StarterItem>,
}

impl StarterItemRule {
    /// Create a rule granting `items` to the first class taken from `classes`.
    pub fn new<C, I>(classes: C, items: I) -> Self
    where
        C: IntoIterator,
        C::Item: Into<ClassId>,
        I: IntoIterator<Item = StarterItem>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            items: items.into_iter().collect(),
        }
    }

    /// Whether `class` belongs to this rule's category.
    pub fn covers(&self, class: &ClassId) -> bool {
        self.classes.contains(class)
    }
}

/// Maximum level and experience a character may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCeiling {
    pub max_level: u8,
    pub max_experience: u32,
}

impl LevelCeiling {
    /// A ceiling at `max_level`, with the matching experience threshold.
    pub fn at_level(max_level: u8) -> Self {
        let max_level = max_level.clamp(1, MAX_LEVEL);
        Self {
            max_level,
            max_experience: experience_for_level(max_level),
        }
    }
}

/// The two ceilings toggled by the `level_20` house rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCeilings {
    pub standard: LevelCeiling,
    pub extended: LevelCeiling,
}

impl Default for LevelCeilings {
    fn default() -> Self {
        Self {
            standard: LevelCeiling::at_level(16),
            extended: LevelCeiling::at_level(MAX_LEVEL),
        }
    }
}

/// Static configuration consumed by the engine.
///
/// # Examples
///
/// ```rust
/// use zzcast::{CasterConfig, ClassId, ProgressionArchetype};
///
/// let config = CasterConfig::from_json(r#"{
///     "class_archetypes": { "Cleric": "Full", "Paladin": "Half" },
///     "deity_classes": ["Cleric", "Paladin"]
/// }"#).unwrap();
///
/// assert_eq!(
///     config.archetype_for(&ClassId::from_str("Paladin"), None),
///     ProgressionArchetype::Half
/// );
/// assert!(config.requires_deity(&ClassId::from_str("Cleric")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasterConfig {
    #[serde(default)]
    pub class_archetypes: HashMap<ClassId, ProgressionArchetype>,
    #[serde(default)]
    pub subclass_archetypes: HashMap<SubclassId, ProgressionArchetype>,
    /// Classes whose slots come from the pact table instead of the shared one.
    #[serde(default)]
    pub pact_classes: HashSet<ClassId>,
    #[serde(default)]
    pub deity_classes: HashSet<ClassId>,
    #[serde(default)]
    pub starter_items: Vec<StarterItemRule>,
    #[serde(default)]
    pub level_ceilings: LevelCeilings,
    /// House rule: raise the level ceiling to 20.
    #[serde(default)]
    pub level_20: bool,
    /// Spell learning policy; see [`crate::reconciler::KnownSpellsReconciler::reconcile`].
    #[serde(default)]
    pub allow_relearning: bool,
}

impl CasterConfig {
    /// An empty configuration: every class is a non-caster.
    pub fn empty() -> Self {
        Self {
            class_archetypes: HashMap::new(),
            subclass_archetypes: HashMap::new(),
            pact_classes: HashSet::new(),
            deity_classes: HashSet::new(),
            starter_items: Vec::new(),
            level_ceilings: LevelCeilings::default(),
            level_20: false,
            allow_relearning: false,
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, CastError> {
        serde_json::from_str(json).map_err(|e| CastError::InvalidConfig(e.to_string()))
    }

    /// Serialize this configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, CastError> {
        serde_json::to_string_pretty(self).map_err(|e| CastError::InvalidConfig(e.to_string()))
    }

    /// Set the archetype of a class.
    pub fn with_class(mut self, class: impl Into<ClassId>, archetype: ProgressionArchetype) -> Self {
        self.class_archetypes.insert(class.into(), archetype);
        self
    }

    /// Set the archetype of a subclass.
    pub fn with_subclass(
        mut self,
        subclass: impl Into<SubclassId>,
        archetype: ProgressionArchetype,
    ) -> Self {
        self.subclass_archetypes.insert(subclass.into(), archetype);
        self
    }

    /// Register a pact caster. Pact classes never feed the shared caster level.
    pub fn with_pact_class(mut self, class: impl Into<ClassId>) -> Self {
        let class = class.into();
        self.class_archetypes
            .insert(class.clone(), ProgressionArchetype::None);
        self.pact_classes.insert(class);
        self
    }

    /// Mark a class as requiring a deity.
    pub fn with_deity_class(mut self, class: impl Into<ClassId>) -> Self {
        self.deity_classes.insert(class.into());
        self
    }

    /// Add a starter item rule.
    pub fn with_starter_items(mut self, rule: StarterItemRule) -> Self {
        self.starter_items.push(rule);
        self
    }

    /// Resolve the archetype a class entry casts with.
    ///
    /// A subclass archetype other than `None` wins over the class archetype.
    /// A class missing from the table is malformed configuration: it is
    /// logged and treated as a non-caster.
    pub fn archetype_for(
        &self,
        class: &ClassId,
        subclass: Option<&SubclassId>,
    ) -> ProgressionArchetype {
        if let Some(archetype) = subclass
            .and_then(|s| self.subclass_archetypes.get(s))
            .copied()
            .filter(|&a| a != ProgressionArchetype::None)
        {
            return archetype;
        }

        match self.class_archetypes.get(class) {
            Some(&archetype) => archetype,
            None => {
                tracing::warn!(class = %class, "class has no casting archetype configured");
                ProgressionArchetype::None
            }
        }
    }

    /// Whether `class` casts from the pact table.
    pub fn is_pact_class(&self, class: &ClassId) -> bool {
        self.pact_classes.contains(class)
    }

    /// Whether taking `class` requires choosing a deity.
    pub fn requires_deity(&self, class: &ClassId) -> bool {
        self.deity_classes.contains(class)
    }

    /// The ceiling selected by the `level_20` house rule.
    pub fn level_ceiling(&self) -> LevelCeiling {
        if self.level_20 {
            self.level_ceilings.extended
        } else {
            self.level_ceilings.standard
        }
    }
}

impl Default for CasterConfig {
    /// The built-in class roster.
    fn default() -> Self {
        use ProgressionArchetype::{Full, Half, HalfRoundUp, OneThird};

        Self::empty()
            .with_class("Barbarian", ProgressionArchetype::None)
            .with_class("Bard", Full)
            .with_class("Cleric", Full)
            .with_class("Druid", Full)
            .with_class("Fighter", ProgressionArchetype::None)
            .with_class("Inventor", HalfRoundUp)
            .with_class("Monk", ProgressionArchetype::None)
            .with_class("Paladin", Half)
            .with_class("Ranger", Half)
            .with_class("Rogue", ProgressionArchetype::None)
            .with_class("Sorcerer", Full)
            .with_class("Wizard", Full)
            .with_pact_class("Warlock")
            .with_subclass("MartialSpellblade", OneThird)
            .with_subclass("RoguishShadowcaster", OneThird)
            .with_deity_class("Cleric")
            .with_deity_class("Paladin")
            .with_starter_items(StarterItemRule::new(
                ["Cleric", "Paladin"],
                [StarterItem::HolySymbol],
            ))
            .with_starter_items(StarterItemRule::new(
                ["Inventor", "Ranger", "Sorcerer", "Warlock"],
                [StarterItem::ComponentPouch],
            ))
            .with_starter_items(StarterItemRule::new(["Bard"], [StarterItem::Instrument]))
            .with_starter_items(StarterItemRule::new(["Druid"], [StarterItem::Focus]))
            .with_starter_items(StarterItemRule::new(
                ["Wizard"],
                [StarterItem::Spellbook, StarterItem::Robe],
            ))
    }
}
