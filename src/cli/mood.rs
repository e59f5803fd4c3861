//! CLI `mood` command: current emotion, its effect on traits, and recent
//! emotional history for one owner.

use anyhow::Result;
use chrono::Utc;

use anima::config::AnimaConfig;
use anima::engine::Anima;

pub fn mood(
    config: &AnimaConfig,
    user_id: &str,
    character: Option<&str>,
    hours: Option<u32>,
    target: Option<&str>,
) -> Result<()> {
    let db_path = config.resolved_db_path();
    let mut conn = anima::db::open_database(&db_path)?;
    let anima = Anima::new(config);
    let owner = super::owner(config, user_id, character);
    let now = Utc::now();

    let current = anima.current_emotion(&conn, &owner, now)?;
    println!("Mood of {owner}");
    println!("{}", "=".repeat(40));
    if current.is_default() {
        println!("  Current:   {} {:.2} (nothing active)", current.emotion, current.intensity);
    } else {
        println!(
            "  Current:   {} {:.2} ({}s remaining)",
            current.emotion,
            current.intensity,
            current.remaining_duration(now)
        );
        if let Some(ref context) = current.context {
            println!("  Context:   {context}");
        }
    }

    if let Some(target) = target {
        let report = anima.emotion_compatibility(&conn, &owner, target, now)?;
        println!(
            "  Toward {}: {:.2}, start at {:.2} ({})",
            report.target_emotion,
            report.compatibility_score,
            report.suggested_intensity,
            report.recommendation
        );
    }

    let base = anima.personality().traits(&mut conn, &owner, now)?;
    let shifted = anima.mood_traits(&mut conn, &owner, now)?;
    let changes: Vec<_> = shifted
        .values()
        .into_iter()
        .filter(|(name, value)| base.value(name).is_some_and(|b| (b - value).abs() > f64::EPSILON))
        .collect();
    if !changes.is_empty() {
        println!();
        println!("Traits shifted by this mood:");
        for (name, value) in changes {
            let before = base.value(&name).unwrap_or_default();
            println!("  {name:<16} {before:.2} -> {value:.2}");
        }
    }

    let history = anima.emotion_history(&conn, &owner, hours, None, now)?;
    println!();
    println!("Last {} hours:", history.period_hours);
    let Some(patterns) = history.patterns else {
        println!("  No emotions recorded.");
        return Ok(());
    };

    println!("  Entries:           {}", patterns.total_emotions);
    println!("  Average intensity: {:.2}", patterns.average_intensity);
    println!("  Dominant category: {}", patterns.dominant_category);
    println!("  Stability:         {:.2}", patterns.mood_stability);
    println!();
    for state in &history.emotions {
        println!(
            "  {}  {:<12} {:.2}  {}",
            state.created_at.format("%Y-%m-%d %H:%M"),
            state.emotion,
            state.intensity,
            state.context.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
