//! Resolved caster level results.
//!
//! Contains the `CasterLevelBreakdown` type: an effective caster level
//! together with what each archetype bucket contributed to it.

use crate::progression::ProgressionArchetype;
use serde::{Deserialize, Serialize};

/// One archetype bucket's share of the effective caster level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketContribution {
    pub archetype: ProgressionArchetype,
    /// Summed class levels of every class in this bucket.
    pub bucket_level: u32,
    /// Full-caster-equivalent levels after remapping.
    pub contribution: u8,
}

/// An effective caster level with full breakdown.
///
/// # Examples
///
/// ```rust
/// use zzcast::{CasterLevelBreakdown, ProgressionArchetype};
///
/// let mut breakdown = CasterLevelBreakdown::new();
/// breakdown.add_bucket(ProgressionArchetype::Full, 5, 5);
/// breakdown.add_bucket(ProgressionArchetype::Half, 3, 2);
///
/// assert_eq!(breakdown.caster_level, 7);
/// assert_eq!(breakdown.contribution_of(ProgressionArchetype::Half), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasterLevelBreakdown {
    /// The effective caster level.
    pub caster_level: u8,

    /// Non-empty buckets, in archetype order.
    pub buckets: Vec<BucketContribution>,
}

impl CasterLevelBreakdown {
    /// An empty breakdown (caster level 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a bucket and add its contribution to the caster level.
    pub fn add_bucket(&mut self, archetype: ProgressionArchetype, bucket_level: u32, contribution: u8) {
        self.buckets.push(BucketContribution {
            archetype,
            bucket_level,
            contribution,
        });
        self.caster_level = self.caster_level.saturating_add(contribution);
    }

    /// What `archetype` contributed (0 if it has no bucket).
    pub fn contribution_of(&self, archetype: ProgressionArchetype) -> u8 {
        self.buckets
            .iter()
            .filter(|b| b.archetype == archetype)
            .map(|b| b.contribution)
            .sum()
    }
}
