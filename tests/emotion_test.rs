mod helpers;

use anima::emotion::EmotionalState;
use anima::memory::types::OwnerKey;
use chrono::Duration;
use helpers::{anima, count, owner, t0, test_db};

fn logged(emotion: &str, intensity: f64) -> EmotionalState {
    EmotionalState {
        id: None,
        owner: owner(),
        emotion: emotion.to_string(),
        intensity,
        context: None,
        created_at: t0(),
        duration_secs: 3600,
    }
}

#[test]
fn emotion_expires_back_to_neutral() {
    let mut conn = test_db();
    let anima = anima();

    anima
        .update_emotion(&mut conn, &owner(), "happy", 0.6, Some("got a compliment"), Some(3600), t0())
        .unwrap();

    let during = anima
        .current_emotion(&conn, &owner(), t0() + Duration::minutes(30))
        .unwrap();
    assert_eq!(during.emotion, "happy");
    assert_eq!(during.intensity, 0.6);
    assert_eq!(during.remaining_duration(t0() + Duration::minutes(30)), 1800);

    let after = anima
        .current_emotion(&conn, &owner(), t0() + Duration::seconds(7200))
        .unwrap();
    assert!(after.is_default());
    assert_eq!(after.emotion, "neutral");
    assert_eq!(after.intensity, 0.5);
}

#[test]
fn expiry_beyond_year_9999_is_rejected_without_writes() {
    let mut conn = test_db();
    let anima = anima();
    let ten_thousand_years = 10_000 * 365 * 24 * 3600;

    let err = anima
        .update_emotion(&mut conn, &owner(), "happy", 0.5, None, Some(ten_thousand_years), t0())
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM emotional_states"), 0);

    let thousand_years = 1_000 * 365 * 24 * 3600;
    anima
        .update_emotion(&mut conn, &owner(), "happy", 0.5, None, Some(thousand_years), t0())
        .unwrap();
    let current = anima
        .current_emotion(&conn, &owner(), t0() + Duration::minutes(1))
        .unwrap();
    assert_eq!(current.emotion, "happy");
    assert!(!current.is_default());
}

#[test]
fn most_recent_live_emotion_wins() {
    let mut conn = test_db();
    let anima = anima();

    anima
        .update_emotion(&mut conn, &owner(), "calm", 0.4, None, None, t0())
        .unwrap();
    anima
        .update_emotion(&mut conn, &owner(), "excited", 0.8, None, None, t0() + Duration::minutes(1))
        .unwrap();
    anima
        .update_emotion(&mut conn, &owner(), "sad", 0.3, None, None, t0() + Duration::minutes(2))
        .unwrap();

    let current = anima
        .current_emotion(&conn, &owner(), t0() + Duration::minutes(3))
        .unwrap();
    assert_eq!(current.emotion, "sad");
    assert_eq!(current.intensity, 0.3);
}

#[test]
fn emotions_are_kept_per_owner() {
    let mut conn = test_db();
    let anima = anima();

    anima
        .update_emotion(&mut conn, &owner(), "love", 0.9, None, None, t0())
        .unwrap();

    let other = OwnerKey::new("user-2", "airi");
    let current = anima.current_emotion(&conn, &other, t0()).unwrap();
    assert!(current.is_default());
}

#[test]
fn transition_scores_against_previous_state() {
    let mut conn = test_db();
    let anima = anima();

    anima
        .update_emotion(&mut conn, &owner(), "happy", 0.6, None, None, t0())
        .unwrap();
    let transition = anima
        .transition_emotion(
            &mut conn,
            &owner(),
            "excited",
            0.7,
            Some("heard good news"),
            None,
            t0() + Duration::minutes(5),
        )
        .unwrap();

    assert_eq!(transition.previous.emotion, "happy");
    assert_eq!(transition.state.emotion, "excited");
    assert!(transition.transition_score > 0.0 && transition.transition_score <= 1.0);
    let context = transition.state.context.unwrap();
    assert!(context.starts_with("Transitioned from happy(0.6) to excited(0.7)"));
    assert!(context.ends_with("heard good news"));
}

#[test]
fn history_is_newest_first_with_patterns() {
    let mut conn = test_db();
    let anima = anima();

    for (i, (emotion, intensity)) in [("happy", 0.5), ("happy", 0.6), ("sad", 0.5)].into_iter().enumerate() {
        anima
            .update_emotion(&mut conn, &owner(), emotion, intensity, None, None, t0() + Duration::minutes(i as i64))
            .unwrap();
    }

    let history = anima
        .emotion_history(&conn, &owner(), None, None, t0() + Duration::hours(1))
        .unwrap();
    assert_eq!(history.period_hours, 24);
    let labels: Vec<&str> = history.emotions.iter().map(|s| s.emotion.as_str()).collect();
    assert_eq!(labels, vec!["sad", "happy", "happy"]);

    let patterns = history.patterns.unwrap();
    assert_eq!(patterns.total_emotions, 3);
    assert!((patterns.mood_stability - 0.89).abs() < 0.01);

    let limited = anima
        .emotion_history(&conn, &owner(), None, Some(1), t0() + Duration::hours(1))
        .unwrap();
    assert_eq!(limited.emotions.len(), 1);
}

#[test]
fn empty_history_has_no_patterns() {
    let conn = test_db();
    let history = anima()
        .emotion_history(&conn, &owner(), Some(6), None, t0())
        .unwrap();
    assert!(history.emotions.is_empty());
    assert!(history.patterns.is_none());
}

#[test]
fn mood_stability_of_mixed_log() {
    let anima = anima();
    let log = vec![logged("happy", 0.5), logged("happy", 0.6), logged("sad", 0.5)];
    let stability = anima.emotions().mood_stability(&log);
    assert!((stability - 0.89).abs() < 0.01, "got {stability}");
}

#[test]
fn invalid_emotion_input_is_rejected_without_writes() {
    let mut conn = test_db();
    let anima = anima();

    let err = anima
        .update_emotion(&mut conn, &owner(), "happy", 1.5, None, None, t0())
        .unwrap_err();
    assert!(err.is_validation());

    let err = anima
        .update_emotion(&mut conn, &owner(), "   ", 0.5, None, None, t0())
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM emotional_states"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM personality_traits"), 0);
}

#[test]
fn emotion_feedback_nudges_personality() {
    let mut conn = test_db();
    let anima = anima();

    anima
        .update_emotion(&mut conn, &owner(), "happy", 1.0, None, None, t0())
        .unwrap();

    let traits = anima.personality().traits(&mut conn, &owner(), t0()).unwrap();
    assert!((traits.value("cheerfulness").unwrap() - 0.71).abs() < 1e-9);
    assert!((traits.value("confidence").unwrap() - 0.505).abs() < 1e-9);
}
