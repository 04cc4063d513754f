//! Multiclass caster level aggregation.
//!
//! Class levels are summed per archetype bucket first and only then
//! remapped, so three half-caster classes at level 1 count as one
//! half-caster at level 3, not as three rounded-down zeros.

use crate::character::Character;
use crate::config::CasterConfig;
use crate::ids::{ClassId, SubclassId};
use crate::progression::{ProgressionArchetype, MAX_LEVEL};
use crate::resolved::CasterLevelBreakdown;

/// Combines class levels into one effective caster level.
///
/// # Examples
///
/// ```rust
/// use zzcast::{CasterConfig, CasterLevelAggregator, Character};
///
/// let config = CasterConfig::default();
/// let mut hero = Character::new("Aria");
/// for _ in 0..5 {
///     hero.add_level("Cleric");
/// }
/// for _ in 0..3 {
///     hero.add_level("Paladin");
/// }
///
/// let aggregator = CasterLevelAggregator::new(&config);
/// assert_eq!(aggregator.caster_level(&hero), 7);
/// ```
pub struct CasterLevelAggregator<'a> {
    config: &'a CasterConfig,
}

impl<'a> CasterLevelAggregator<'a> {
    pub fn new(config: &'a CasterConfig) -> Self {
        Self { config }
    }

    /// Effective caster level of `character`.
    pub fn caster_level(&self, character: &Character) -> u8 {
        self.resolve_character(character).caster_level
    }

    /// Effective caster level of `character`, with breakdown.
    pub fn resolve_character(&self, character: &Character) -> CasterLevelBreakdown {
        let entries = character.classes_and_levels();
        self.resolve(entries.iter().map(|entry| {
            (
                &entry.class,
                character.subclass_for(&entry.class),
                entry.level,
            )
        }))
    }

    /// Aggregate `(class, subclass, level)` entries.
    pub fn resolve<'e, I>(&self, entries: I) -> CasterLevelBreakdown
    where
        I: IntoIterator<Item = (&'e ClassId, Option<&'e SubclassId>, u8)>,
    {
        let mut bucket_levels = [0u32; 5];
        for (class, subclass, level) in entries {
            let archetype = self.config.archetype_for(class, subclass);
            bucket_levels[archetype.bucket()] += level as u32;
        }

        let mut breakdown = CasterLevelBreakdown::new();
        for archetype in ProgressionArchetype::ALL {
            let bucket_level = bucket_levels[archetype.bucket()];
            if archetype == ProgressionArchetype::None || bucket_level == 0 {
                continue;
            }
            breakdown.add_bucket(archetype, bucket_level, archetype.remap(bucket_level));
        }

        breakdown.caster_level = breakdown.caster_level.min(MAX_LEVEL);
        breakdown
    }
}
