//! CLI `personality` command: show, and optionally seed, an owner's traits.

use anyhow::Result;
use chrono::Utc;

use anima::config::AnimaConfig;
use anima::engine::Anima;

/// Print the owner's personality. With `preset`, a new owner is seeded from it first;
/// an owner that already has traits is left as is.
pub fn personality(
    config: &AnimaConfig,
    user_id: &str,
    character: Option<&str>,
    preset: Option<&str>,
) -> Result<()> {
    let db_path = config.resolved_db_path();
    let mut conn = anima::db::open_database(&db_path)?;
    let anima = Anima::new(config);
    let owner = super::owner(config, user_id, character);
    let now = Utc::now();

    if let Some(preset) = preset {
        let seeded = anima
            .personality()
            .initialize_with_preset(&mut conn, &owner, preset, now)?;
        if !seeded {
            println!("{owner} already has a personality; preset '{preset}' not applied.\n");
        }
    }

    let summary = anima.personality_summary(&mut conn, &owner, now)?;

    println!("Personality of {owner}");
    println!("{}", "=".repeat(40));
    println!("  Archetype: {}", summary.archetype.as_str());
    println!("  {}", summary.summary);
    println!();
    if !summary.dominant_traits.is_empty() {
        println!("Dominant: {}", summary.dominant_traits.join(", "));
        println!();
    }
    println!("Traits:");
    for (name, value) in &summary.traits {
        let bar = "#".repeat((value * 20.0).round() as usize);
        println!("  {:<14} {:.2} {}", name, value, bar);
    }

    Ok(())
}
