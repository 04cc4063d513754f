//! # zzcast - Deterministic Multiclass Spellcasting Engine
//!
//! A rules engine for tactical RPG character builders that provides:
//! - **Deterministic** caster level aggregation across multiple classes
//! - **Data-driven** class rosters, feature graphs and spell catalogs (no
//!   hardcoded class lists in the algorithms)
//! - **Session-scoped** level-up state with neutral defaults outside a session
//! - **Cycle-safe** feature graph traversal
//!
//! ## Core Concepts
//!
//! ### Caster Level Pipeline
//!
//! ```text
//! [Character] → [CasterLevelAggregator] → [CasterLevelBreakdown] → [SlotResolver]
//! ```
//!
//! 1. **Class levels** are grouped by progression archetype and summed per bucket
//! 2. **Buckets** are remapped to full-caster-equivalent levels and added up
//! 3. **Slot rows** are looked up from the shared (or pact) table
//!
//! ### Spell Availability
//!
//! Active features form a graph of grantors and sets. The
//! [`FeatureGraphScanner`] collects the spells they put within reach, and
//! the [`KnownSpellsReconciler`] filters candidates against spells already
//! known through other repertoires.
//!
//! ## Example
//!
//! ```rust
//! use zzcast::*;
//!
//! let config = CasterConfig::default();
//! let mut hero = Character::new("Aria");
//! for _ in 0..5 {
//!     hero.add_level("Cleric");
//! }
//! for _ in 0..3 {
//!     hero.add_level("Paladin");
//! }
//!
//! let caster_level = CasterLevelAggregator::new(&config).caster_level(&hero);
//! assert_eq!(caster_level, 7);
//!
//! let resolver = SlotResolver::standard().unwrap();
//! assert_eq!(resolver.max_tier(SlotTableId::Shared, caster_level), 4);
//! ```
//!
//! ## Modules
//!
//! - [`ids`] - Interned identifiers
//! - [`progression`] - Archetypes, remap tables and slot tables
//! - [`config`] - Class roster and house rules
//! - [`character`] - The persistent character record
//! - [`spell`], [`feature`], [`compendium`] - Game data catalogs
//! - [`graph`] - Feature graph validation
//! - [`scanner`] - Spell collection over the feature graph
//! - [`aggregator`] - Multiclass caster level
//! - [`resolved`] - Caster level breakdowns
//! - [`slots`] - Spell slot resolution
//! - [`reconciler`] - Known spells across repertoires
//! - [`session`] - Level-up sessions
//! - [`error`] - Error types

pub mod aggregator;
pub mod character;
pub mod compendium;
pub mod config;
pub mod error;
pub mod feature;
pub mod graph;
pub mod ids;
pub mod progression;
pub mod reconciler;
pub mod resolved;
pub mod scanner;
pub mod session;
pub mod slots;
pub mod spell;

// Re-export main types for convenience
pub use aggregator::CasterLevelAggregator;
pub use character::{Character, ClassLevelEntry, KnowledgeMode, RepertoireOrigin, SpellRepertoire};
pub use compendium::Compendium;
pub use config::{CasterConfig, LevelCeiling, LevelCeilings, StarterItem, StarterItemRule};
pub use error::CastError;
pub use feature::{FeatureCatalog, FeatureNode, SpellGrant};
pub use graph::FeatureGraph;
pub use ids::{CharacterId, ClassId, FeatureId, SpellId, SpellListId, SubclassId};
pub use progression::{ProgressionArchetype, SlotRow, SlotTable};
pub use reconciler::KnownSpellsReconciler;
pub use resolved::{BucketContribution, CasterLevelBreakdown};
pub use scanner::{FeatureGraphScanner, ScanMode};
pub use session::{LevelUpSession, SessionStore};
pub use slots::{CharacterSlots, SlotResolver, SlotTableId};
pub use spell::SpellCatalog;
