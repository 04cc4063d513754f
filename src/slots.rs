//! Spell slot resolution.
//!
//! Maps an effective caster level (or a pact caster's own level) to slot
//! counts per tier. Tables are validated and built once, then shared.

use crate::aggregator::CasterLevelAggregator;
use crate::character::Character;
use crate::config::CasterConfig;
use crate::error::CastError;
use crate::progression::{
    SlotRow, SlotTable, FULL_CASTER_SLOTS, MAX_LEVEL, MAX_SPELL_TIER, PACT_CASTER_SLOTS,
};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Which slot table a lookup uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotTableId {
    /// The multiclass table, indexed by effective caster level.
    Shared,
    /// The pact table, indexed by the pact caster's own level.
    Pact,
}

/// Highest tier a mystic-arcanum style caster can theoretically reach at
/// `level`. Informational only; it never feeds slot counts.
///
/// # Examples
///
/// ```rust
/// use zzcast::slots::arcanum_tier;
///
/// assert_eq!(arcanum_tier(1), 1);
/// assert_eq!(arcanum_tier(11), 6);
/// assert_eq!(arcanum_tier(17), 9);
/// ```
pub fn arcanum_tier(level: u8) -> u8 {
    ((level.min(MAX_LEVEL) + 1) / 2).min(MAX_SPELL_TIER)
}

/// Slots available to one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSlots {
    pub caster_level: u8,
    pub shared: SlotRow,
    /// Summed levels of every pact class.
    pub pact_level: u8,
    pub pact: SlotRow,
    /// 0 when the character has no pact levels.
    pub arcanum_tier: u8,
}

impl CharacterSlots {
    /// Highest tier castable from either pool.
    pub fn max_tier(&self) -> u8 {
        self.shared.max_tier().max(self.pact.max_tier())
    }
}

/// Looks up slot rows in the shared and pact tables.
///
/// # Examples
///
/// ```rust
/// use zzcast::{SlotResolver, SlotTableId};
///
/// let resolver = SlotResolver::standard().unwrap();
/// assert_eq!(resolver.row(SlotTableId::Shared, 7).slots(), &[4, 3, 3, 1]);
/// assert_eq!(resolver.max_tier(SlotTableId::Shared, 7), 4);
/// assert_eq!(resolver.max_tier(SlotTableId::Pact, 5), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotResolver {
    shared: SlotTable,
    pact: SlotTable,
}

static STANDARD: OnceLock<Result<SlotResolver, CastError>> = OnceLock::new();

impl SlotResolver {
    /// A resolver over custom tables.
    pub fn new(shared: SlotTable, pact: SlotTable) -> Self {
        Self { shared, pact }
    }

    /// The built-in tables, built on first use and shared afterwards.
    pub fn standard() -> Result<&'static SlotResolver, CastError> {
        STANDARD
            .get_or_init(|| {
                Ok(Self::new(
                    SlotTable::from_sentinel_rows(&FULL_CASTER_SLOTS)?,
                    SlotTable::from_sentinel_rows(&PACT_CASTER_SLOTS)?,
                ))
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    fn table(&self, table: SlotTableId) -> &SlotTable {
        match table {
            SlotTableId::Shared => &self.shared,
            SlotTableId::Pact => &self.pact,
        }
    }

    /// Slot row at `level`. Levels below 1 are empty; levels above 20 use row 20.
    pub fn row(&self, table: SlotTableId, level: u8) -> &SlotRow {
        self.table(table).row(level)
    }

    /// Highest tier with at least one slot at `level`.
    pub fn max_tier(&self, table: SlotTableId, level: u8) -> u8 {
        self.row(table, level).max_tier()
    }

    /// Number of slots of `tier` at `level`.
    pub fn slot_count(&self, table: SlotTableId, level: u8, tier: u8) -> u8 {
        self.row(table, level).count(tier)
    }

    /// Shared and pact slots of `character`.
    pub fn character_slots(&self, character: &Character, config: &CasterConfig) -> CharacterSlots {
        let caster_level = CasterLevelAggregator::new(config).caster_level(character);
        let pact_level: u8 = character
            .classes_and_levels()
            .iter()
            .filter(|entry| config.is_pact_class(&entry.class))
            .map(|entry| entry.level)
            .sum();

        CharacterSlots {
            caster_level,
            shared: self.row(SlotTableId::Shared, caster_level).clone(),
            pact_level,
            pact: self.row(SlotTableId::Pact, pact_level).clone(),
            arcanum_tier: arcanum_tier(pact_level),
        }
    }
}
