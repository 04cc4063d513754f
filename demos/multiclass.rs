//! Multiclass example: effective caster level and spell slots
//!
//! This example shows:
//! - How class levels are bucketed by progression archetype
//! - How the breakdown explains the effective caster level
//! - How pact levels use their own slot table

use zzcast::*;

fn build(name: &str, levels: &[(&str, u8)]) -> Character {
    let mut hero = Character::new(name);
    for &(class, count) in levels {
        for _ in 0..count {
            hero.add_level(class);
        }
    }
    hero
}

fn main() -> Result<(), CastError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CasterConfig::default();
    let aggregator = CasterLevelAggregator::new(&config);
    let resolver = SlotResolver::standard()?;

    let mut spellblade = build("Kestrel", &[("Fighter", 7), ("Wizard", 2)]);
    spellblade.subclasses.insert(
        ClassId::from_str("Fighter"),
        SubclassId::from_str("MartialSpellblade"),
    );

    let party = vec![
        build("Aria", &[("Cleric", 5), ("Paladin", 3)]),
        build("Brom", &[("Paladin", 1), ("Ranger", 1), ("Inventor", 1)]),
        build("Cael", &[("Sorcerer", 3), ("Warlock", 5)]),
        spellblade,
    ];

    for hero in &party {
        println!("=== {} (level {}) ===", hero.id, hero.level());
        for entry in hero.classes_and_levels() {
            println!("  {} {}", entry.class, entry.level);
        }

        let breakdown = aggregator.resolve_character(hero);
        for bucket in &breakdown.buckets {
            println!(
                "  {:?}: {} levels -> {}",
                bucket.archetype, bucket.bucket_level, bucket.contribution
            );
        }

        let slots = resolver.character_slots(hero, &config);
        println!("  Caster level: {}", slots.caster_level);
        println!("  Shared slots: {:?}", slots.shared.slots());
        if slots.pact_level > 0 {
            println!(
                "  Pact slots (level {}): {:?}, arcanum tier {}",
                slots.pact_level,
                slots.pact.slots(),
                slots.arcanum_tier
            );
        }
        println!("  Highest castable tier: {}\n", slots.max_tier());
    }

    Ok(())
}
