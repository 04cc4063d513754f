//! Level-up example: a session from class selection to commit
//!
//! This example shows:
//! - Loading a compendium from JSON
//! - Beginning a session and selecting a new class
//! - Querying allowed spells and spells known elsewhere
//! - Committing the level and ending the session

use zzcast::*;

const COMPENDIUM: &str = r#"{
    "spells": {
        "tiers": {
            "SacredFlame": 0, "FireBolt": 0,
            "Bless": 1, "CureWounds": 1, "Shield": 1, "Sleep": 1,
            "MistyStep": 2, "HoldPerson": 2
        },
        "lists": {
            "ClericList": ["SacredFlame", "Bless", "CureWounds", "HoldPerson"],
            "WizardList": ["FireBolt", "Shield", "Sleep", "MistyStep", "HoldPerson"]
        }
    },
    "features": {
        "ClericSpellcasting": { "Grantor": { "CastSpell": "ClericList" } },
        "WizardSpellcasting": { "Grantor": { "CastSpell": "WizardList" } },
        "LifeDomainSpells": { "Grantor": { "AutoPrepared": ["Bless", "CureWounds"] } },
        "LifeDomain": { "Union": ["LifeDomainSpells"] }
    }
}"#;

fn main() -> Result<(), CastError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let compendium = Compendium::from_json(COMPENDIUM)?;
    let config = CasterConfig::default();
    let mut store = SessionStore::new();

    let mut hero = Character::new("Aria");
    for _ in 0..3 {
        hero.add_level("Wizard");
    }
    hero.grant_features("03Class<Wizard>", ["WizardSpellcasting"]);
    let mut wizard = SpellRepertoire::new(
        RepertoireOrigin::Class(ClassId::from_str("Wizard")),
        KnowledgeMode::Spellbook,
        2,
    );
    wizard.known_cantrips.push(SpellId::from_str("FireBolt"));
    wizard.scribed_spells = vec![SpellId::from_str("Shield"), SpellId::from_str("HoldPerson")];
    hero.repertoires.push(wizard);

    println!("=== Beginning level-up for {} ===\n", hero.id);
    store.begin(&mut hero, true, &config);

    if let Some(session) = store.query_mut(&hero.id) {
        session.select_class("Cleric", &hero, &config);
        session.select_subclass(Some(SubclassId::from_str("LifeDomain")));
        session.set_class_selection_stage(false);
    }
    hero.grant_features("01Class<Cleric>", ["ClericSpellcasting"]);
    hero.grant_features("01Subclass<Cleric LifeDomain>", ["LifeDomain"]);

    println!("Multiclass: {}", store.is_multiclass(&hero));
    println!("Requires deity: {}", store.requires_deity(&hero));
    println!("Granted items: {:?}", store.granted_items(&hero));

    let mut allowed: Vec<_> = store.allowed_spells(&hero, &compendium).into_iter().collect();
    allowed.sort();
    println!("Allowed spells: {:?}", allowed);

    let mut elsewhere: Vec<_> = store
        .other_classes_known_spells(&hero, &compendium)
        .into_iter()
        .collect();
    elsewhere.sort();
    for (spell, origin) in &elsewhere {
        println!("  {} already known ({})", spell, origin);
    }

    let candidates = vec![
        SpellId::from_str("Bless"),
        SpellId::from_str("HoldPerson"),
        SpellId::from_str("Shield"),
    ];
    let kept = store.reconcile_candidates(&hero, &compendium, &config, candidates);
    println!("Learnable now: {:?}", kept);

    store.commit(&mut hero)?;
    store.end(&hero.id);

    println!("\n=== Committed ===");
    for entry in hero.classes_and_levels() {
        println!("  {} {}", entry.class, entry.level);
    }
    println!("Inventory: {:?}", hero.inventory);

    let slots = SlotResolver::standard()?.character_slots(&hero, &config);
    println!("Caster level {}: {:?}", slots.caster_level, slots.shared.slots());

    Ok(())
}
