mod helpers;

use anima::memory::retrieve::RetrieveRequest;
use anima::memory::types::{MemoryType, OwnerKey};
use anima::personality::Archetype;
use helpers::{anima, count, owner, t0, test_db};

#[test]
fn repeated_adjustments_accumulate() {
    let mut conn = test_db();
    let anima = anima();

    let first = anima
        .adjust_trait(&mut conn, &owner(), "cheerfulness", 0.05, None, t0())
        .unwrap();
    assert!((first.old_value - 0.7).abs() < 1e-9);
    assert!((first.new_value - 0.75).abs() < 1e-9);

    let second = anima
        .adjust_trait(&mut conn, &owner(), "cheerfulness", 0.05, None, t0())
        .unwrap();
    assert!((second.new_value - 0.80).abs() < 1e-9);
}

#[test]
fn adjustments_clamp_to_bounds() {
    let mut conn = test_db();
    let anima = anima();

    let up = anima
        .adjust_trait(&mut conn, &owner(), "loyalty", 10.0, None, t0())
        .unwrap();
    assert_eq!(up.new_value, 1.0);

    let down = anima
        .adjust_trait(&mut conn, &owner(), "loyalty", -10.0, None, t0())
        .unwrap();
    assert_eq!(down.new_value, 0.0);
}

#[test]
fn first_adjustment_seeds_full_default_vector() {
    let mut conn = test_db();
    let anima = anima();

    anima
        .adjust_trait(&mut conn, &owner(), "curiosity", 0.1, None, t0())
        .unwrap();
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM personality_traits"), 14);
}

#[test]
fn initialize_is_idempotent() {
    let mut conn = test_db();
    let anima = anima();

    assert!(anima.personality().initialize(&mut conn, &owner(), t0()).unwrap());
    anima
        .adjust_trait(&mut conn, &owner(), "shyness", 0.2, None, t0())
        .unwrap();
    assert!(!anima.personality().initialize(&mut conn, &owner(), t0()).unwrap());

    let traits = anima.personality().traits(&mut conn, &owner(), t0()).unwrap();
    assert!((traits.value("shyness").unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn reasoned_adjustment_writes_journal_memory() {
    let mut conn = test_db();
    let anima = anima();

    anima
        .adjust_trait(&mut conn, &owner(), "patience", 0.1, Some("waited calmly for a late reply"), t0())
        .unwrap();

    let req = RetrieveRequest {
        memory_type: Some(MemoryType::PersonalityChange),
        ..RetrieveRequest::new(owner())
    };
    let journal = anima.retrieve(&mut conn, &req, t0()).unwrap();
    assert_eq!(journal.len(), 1);
    assert_eq!(
        journal[0].content,
        "Personality trait 'patience' adjusted from 0.60 to 0.70. Reason: waited calmly for a late reply"
    );
    assert_eq!(journal[0].importance, 0.6);
    let metadata = journal[0].metadata.as_ref().unwrap();
    assert_eq!(metadata["trait_name"], "patience");
}

#[test]
fn punctuation_heavy_reason_still_adjusts_and_journals() {
    let mut conn = test_db();
    let anima = anima();
    let reason = "why???????????? so many questions";

    let adjusted = anima
        .adjust_trait(&mut conn, &owner(), "cheerfulness", 0.05, Some(reason), t0())
        .unwrap();
    assert!((adjusted.new_value - 0.75).abs() < 1e-9);

    let req = RetrieveRequest {
        memory_type: Some(MemoryType::PersonalityChange),
        ..RetrieveRequest::new(owner())
    };
    let journal = anima.retrieve(&mut conn, &req, t0()).unwrap();
    assert_eq!(journal.len(), 1);
    assert!(journal[0].content.ends_with(reason));
}

#[test]
fn emotion_feedback_is_journaled_with_reason() {
    let mut conn = test_db();
    let anima = anima();

    anima
        .update_emotion(&mut conn, &owner(), "happy", 0.6, None, None, t0())
        .unwrap();

    let req = RetrieveRequest {
        memory_type: Some(MemoryType::PersonalityChange),
        ..RetrieveRequest::new(owner())
    };
    let journal = anima.retrieve(&mut conn, &req, t0()).unwrap();
    assert_eq!(journal.len(), 2);
    assert!(journal
        .iter()
        .all(|m| m.content.ends_with("Reason: Emotional influence from happy (intensity: 0.6)")));
}

#[test]
fn invalid_adjustment_writes_nothing() {
    let mut conn = test_db();
    let anima = anima();

    let err = anima
        .adjust_trait(&mut conn, &owner(), "", 0.1, None, t0())
        .unwrap_err();
    assert!(err.is_validation());

    let err = anima
        .adjust_trait(&mut conn, &owner(), "cheerfulness", 0.1, Some(&"x".repeat(301)), t0())
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM personality_traits"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM memories"), 0);
}

#[test]
fn defaults_and_presets_classify() {
    let mut conn = test_db();
    let anima = anima();

    let summary = anima.personality_summary(&mut conn, &owner(), t0()).unwrap();
    assert_eq!(summary.archetype, Archetype::EmpatheticNurturing);
    assert_eq!(summary.traits.len(), 14);
    assert!(!summary.summary.contains("Particularly"));

    let genki = OwnerKey::new("user-2", "hina");
    anima
        .personality()
        .initialize_with_preset(&mut conn, &genki, "genki", t0())
        .unwrap();
    let summary = anima.personality_summary(&mut conn, &genki, t0()).unwrap();
    assert_eq!(summary.archetype, Archetype::CheerfulPlayful);
    assert!(summary.dominant_traits.contains(&"cheerfulness".to_string()));
}

#[test]
fn unknown_preset_is_rejected() {
    let mut conn = test_db();
    let err = anima()
        .personality()
        .initialize_with_preset(&mut conn, &owner(), "pirate", t0())
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("genki"));
}
