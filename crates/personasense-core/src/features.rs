//! Behavioral feature derivation
//!
//! The first stage of the prediction pipeline: a pure function from a
//! raw survey record to the record extended with ten computed features.
//! The arithmetic and bucket boundaries are part of the trained model's
//! input contract and must not drift; see [`crate::record::FEATURE_ORDER`].

use crate::record::{ActivityLevel, DerivedRecord, NetworkCategory, RawRecord};

/// Epsilon added to the online/offline ratio denominator so a zero
/// event attendance yields a large finite ratio rather than infinity.
const RATIO_EPSILON: f64 = 1e-6;

/// Derive the ten computed behavioral features from a raw record.
///
/// Deterministic, total for well-typed input, and side-effect free.
/// All arithmetic is unguarded apart from the epsilon in
/// `Online_vs_Offline_Ratio`; out-of-range numeric values pass through.
pub fn derive(raw: &RawRecord) -> DerivedRecord {
    let social_events = raw.social_event_attendance as f64;
    let going_outside = raw.going_outside as f64;
    let friends = raw.friends_circle_size as f64;
    let posts = raw.post_frequency as f64;
    let alone = raw.time_spent_alone as f64;

    let stage_fear = raw.stage_fear.is_yes() as u8 as f64;
    let drained = raw.drained_after_socializing.is_yes() as u8 as f64;

    let social_activity_score = (social_events + going_outside + friends + posts) / 4.0;
    let social_energy_drain = (stage_fear + drained) / 2.0;

    DerivedRecord {
        social_event_attendance: raw.social_event_attendance,
        going_outside: raw.going_outside,
        friends_circle_size: raw.friends_circle_size,
        post_frequency: raw.post_frequency,
        stage_fear: raw.stage_fear.clone(),
        drained_after_socializing: raw.drained_after_socializing.clone(),
        time_spent_alone: raw.time_spent_alone,

        social_activity_score,
        solitude_preference: alone / 10.0,
        social_energy_drain,
        social_confidence: 1.0 - stage_fear,
        digital_social_activity: posts / 10.0,
        physical_social_activity: (social_events + going_outside) / 2.0,
        social_network_category: network_category(friends),
        activity_level: activity_level(social_activity_score),
        online_vs_offline_ratio: posts / (social_events + RATIO_EPSILON),
        social_comfort_zone: social_activity_score * (1.0 - social_energy_drain),
    }
}

/// Bucket a friends-circle size into (-inf, 5], (5, 10], (10, 15], (15, inf).
fn network_category(size: f64) -> NetworkCategory {
    if size <= 5.0 {
        NetworkCategory::VerySmall
    } else if size <= 10.0 {
        NetworkCategory::Small
    } else if size <= 15.0 {
        NetworkCategory::Medium
    } else {
        NetworkCategory::Large
    }
}

/// Bucket a social activity score into (-inf, 3], (3, 6], (6, 9], (9, inf).
fn activity_level(score: f64) -> ActivityLevel {
    if score <= 3.0 {
        ActivityLevel::Low
    } else if score <= 6.0 {
        ActivityLevel::Medium
    } else if score <= 9.0 {
        ActivityLevel::High
    } else {
        ActivityLevel::VeryHigh
    }
}
