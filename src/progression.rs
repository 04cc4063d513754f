//! Progression tables.
//!
//! Static game-balance constants: how each casting archetype converts
//! summed class levels into full-caster-equivalent levels, how many spell
//! slots each level grants, and the experience needed per character level.
//!
//! Raw slot rows use a trailing-zero sentinel: the first zero in a row
//! marks one past the highest usable tier. [`SlotTable`] validates the
//! sentinel once at construction and stores each row with an explicit
//! `max_tier`, so consumers never scan for it.

use crate::error::CastError;
use serde::{Deserialize, Serialize};

/// Highest character level (and highest effective caster level).
pub const MAX_LEVEL: u8 = 20;

/// Highest spell tier a slot can have.
pub const MAX_SPELL_TIER: u8 = 9;

/// Rate at which a class or subclass advances its spellcasting.
///
/// # Examples
///
/// ```rust
/// use zzcast::ProgressionArchetype;
///
/// assert_eq!(ProgressionArchetype::Full.remap(7), 7);
/// assert_eq!(ProgressionArchetype::Half.remap(3), 2);
/// assert_eq!(ProgressionArchetype::OneThird.remap(3), 1);
/// assert_eq!(ProgressionArchetype::None.remap(20), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProgressionArchetype {
    /// No spellcasting.
    #[default]
    None,
    /// One caster level per class level.
    Full,
    /// Half casters that start casting at their second level.
    Half,
    /// Half casters that already cast at their first level.
    HalfRoundUp,
    /// Third casters, starting at their third level.
    OneThird,
}

impl ProgressionArchetype {
    /// All archetypes in bucket order.
    pub const ALL: [ProgressionArchetype; 5] = [
        ProgressionArchetype::None,
        ProgressionArchetype::Full,
        ProgressionArchetype::Half,
        ProgressionArchetype::HalfRoundUp,
        ProgressionArchetype::OneThird,
    ];

    /// Convert a summed bucket level into full-caster-equivalent levels.
    ///
    /// The bucket level is the sum over every class sharing this archetype.
    /// Bucket levels above [`MAX_LEVEL`] use the last table entry.
    pub fn remap(self, bucket_level: u32) -> u8 {
        let index = bucket_level.min(MAX_LEVEL as u32) as usize;
        match self {
            ProgressionArchetype::None => 0,
            ProgressionArchetype::Full => index as u8,
            ProgressionArchetype::Half => FROM_HALF_CASTER[index],
            ProgressionArchetype::HalfRoundUp => FROM_HALF_ROUND_UP_CASTER[index],
            ProgressionArchetype::OneThird => FROM_ONE_THIRD_CASTER[index],
        }
    }

    /// Position of this archetype in [`ProgressionArchetype::ALL`].
    pub(crate) fn bucket(self) -> usize {
        match self {
            ProgressionArchetype::None => 0,
            ProgressionArchetype::Full => 1,
            ProgressionArchetype::Half => 2,
            ProgressionArchetype::HalfRoundUp => 3,
            ProgressionArchetype::OneThird => 4,
        }
    }
}

/// Half-caster remap, indexed by summed half-caster levels 0..=20.
pub const FROM_HALF_CASTER: [u8; 21] = [
    0, 0, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10,
];

/// Round-up half-caster remap, indexed by summed levels 0..=20.
pub const FROM_HALF_ROUND_UP_CASTER: [u8; 21] = [
    0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10,
];

/// Third-caster remap, indexed by summed levels 0..=20.
pub const FROM_ONE_THIRD_CASTER: [u8; 21] = [
    0, 0, 0, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 7, 7,
];

/// Shared spell slots per effective caster level 1..=20, tiers 1..=9 plus sentinel.
pub const FULL_CASTER_SLOTS: [[u8; 10]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1, 0],
    [4, 3, 3, 3, 3, 1, 1, 1, 1, 0],
    [4, 3, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 3, 2, 2, 1, 1, 0],
];

/// Pact slots per pact-caster level 1..=20.
///
/// Pact slots are cast at the pact tier but may be spent on any lower
/// tier, so each row repeats the pact slot count up to the pact tier.
pub const PACT_CASTER_SLOTS: [[u8; 6]; 20] = [
    [1, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0],
    [2, 2, 0, 0, 0, 0],
    [2, 2, 0, 0, 0, 0],
    [2, 2, 2, 0, 0, 0],
    [2, 2, 2, 0, 0, 0],
    [2, 2, 2, 2, 0, 0],
    [2, 2, 2, 2, 0, 0],
    [2, 2, 2, 2, 2, 0],
    [2, 2, 2, 2, 2, 0],
    [3, 3, 3, 3, 3, 0],
    [3, 3, 3, 3, 3, 0],
    [3, 3, 3, 3, 3, 0],
    [3, 3, 3, 3, 3, 0],
    [3, 3, 3, 3, 3, 0],
    [3, 3, 3, 3, 3, 0],
    [4, 4, 4, 4, 4, 0],
    [4, 4, 4, 4, 4, 0],
    [4, 4, 4, 4, 4, 0],
    [4, 4, 4, 4, 4, 0],
];

/// Experience required to reach each character level 1..=20.
pub const EXPERIENCE_THRESHOLDS: [u32; 20] = [
    0, 300, 900, 2_700, 6_500, 14_000, 23_000, 34_000, 48_000, 64_000, 85_000, 100_000,
    120_000, 140_000, 165_000, 195_000, 225_000, 265_000, 305_000, 355_000,
];

/// Experience required to reach `level`, clamped to 1..=20.
pub fn experience_for_level(level: u8) -> u32 {
    let index = level.clamp(1, MAX_LEVEL) as usize - 1;
    EXPERIENCE_THRESHOLDS[index]
}

/// Slot counts for one level, with the highest usable tier made explicit.
///
/// `slots[0]` is the count for tier 1. Every entry is positive;
/// `max_tier == slots.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotRow {
    slots: Vec<u8>,
    max_tier: u8,
}

impl SlotRow {
    /// A row with no slots at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a row from a raw sentinel-terminated row.
    ///
    /// `level` is only used for error reporting.
    pub fn from_sentinel(level: u8, raw: &[u8]) -> Result<Self, CastError> {
        let first_zero = raw
            .iter()
            .position(|&count| count == 0)
            .ok_or_else(|| CastError::MalformedSlotRow {
                level,
                reason: String::from("missing trailing zero"),
            })?;

        if raw[first_zero..].iter().any(|&count| count != 0) {
            return Err(CastError::MalformedSlotRow {
                level,
                reason: String::from("non-zero slot count after the first zero"),
            });
        }

        if first_zero > MAX_SPELL_TIER as usize {
            return Err(CastError::MalformedSlotRow {
                level,
                reason: format!("more than {} tiers", MAX_SPELL_TIER),
            });
        }

        Ok(Self {
            slots: raw[..first_zero].to_vec(),
            max_tier: first_zero as u8,
        })
    }

    /// Slot counts, tier 1 first.
    pub fn slots(&self) -> &[u8] {
        &self.slots
    }

    /// Highest tier with at least one slot (0 when the row is empty).
    pub fn max_tier(&self) -> u8 {
        self.max_tier
    }

    /// Number of slots at `tier` (1-based). Tier 0 and unreachable tiers give 0.
    pub fn count(&self, tier: u8) -> u8 {
        if tier == 0 {
            return 0;
        }
        self.slots.get(tier as usize - 1).copied().unwrap_or(0)
    }

    /// Total number of slots across all tiers.
    pub fn total(&self) -> u32 {
        self.slots.iter().map(|&count| count as u32).sum()
    }

    /// Whether the row grants no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// An immutable slot table with one row per level 1..=20.
///
/// # Examples
///
/// ```rust
/// use zzcast::progression::{SlotTable, FULL_CASTER_SLOTS};
///
/// let table = SlotTable::from_sentinel_rows(&FULL_CASTER_SLOTS).unwrap();
/// assert_eq!(table.row(5).max_tier(), 3);
/// assert_eq!(table.row(0).max_tier(), 0);
/// assert_eq!(table.row(25), table.row(20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTable {
    /// Index 0 is the empty row used for levels below 1.
    rows: Vec<SlotRow>,
}

impl SlotTable {
    /// Build a table from raw sentinel-terminated rows for levels 1..=20.
    pub fn from_sentinel_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, CastError> {
        if rows.len() != MAX_LEVEL as usize {
            return Err(CastError::SlotTableRowCount {
                expected: MAX_LEVEL as usize,
                found: rows.len(),
            });
        }

        let mut built = Vec::with_capacity(rows.len() + 1);
        built.push(SlotRow::empty());
        for (idx, raw) in rows.iter().enumerate() {
            built.push(SlotRow::from_sentinel(idx as u8 + 1, raw.as_ref())?);
        }

        Ok(Self { rows: built })
    }

    /// Row for `level`. Levels below 1 give the empty row; levels above 20
    /// give row 20.
    pub fn row(&self, level: u8) -> &SlotRow {
        &self.rows[level.min(MAX_LEVEL) as usize]
    }
}
