//! Survey record types
//!
//! `RawRecord` is the seven-field survey payload a client submits;
//! `DerivedRecord` extends it with the ten computed behavioral features.
//! Wire field names keep the original survey column spelling via serde
//! renames, so the JSON contract matches what the classifier pipeline
//! was fit against.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Every column the pipeline may reference, in derivation order:
/// the seven raw survey fields followed by the ten computed features.
pub const FEATURE_ORDER: [&str; 17] = [
    "Social_event_attendance",
    "Going_outside",
    "Friends_circle_size",
    "Post_frequency",
    "Stage_fear",
    "Drained_after_socializing",
    "Time_spent_Alone",
    "Social_Activity_Score",
    "Solitude_Preference",
    "Social_Energy_Drain",
    "Social_Confidence",
    "Digital_Social_Activity",
    "Physical_Social_Activity",
    "Social_Network_Category",
    "Activity_Level",
    "Online_vs_Offline_Ratio",
    "Social_Comfort_Zone",
];

/// A categorical survey answer, compared against the literal `"Yes"`.
///
/// Non-string JSON scalars are coerced to their string form before the
/// comparison, so a boolean `true` becomes `"true"` and never matches.
/// This mirrors the trained pipeline's stringify-then-compare behavior
/// and is deliberately preserved, not tightened to strings only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Categorical(String);

impl Categorical {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Case-sensitive exact match against `"Yes"`.
    pub fn is_yes(&self) -> bool {
        self.0 == "Yes"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Categorical {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let coerced = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(de::Error::custom(format!(
                    "expected a scalar survey answer, got {other}"
                )))
            }
        };
        Ok(Categorical(coerced))
    }
}

/// The seven raw survey fields. All required, no defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Social_event_attendance")]
    pub social_event_attendance: i64,
    #[serde(rename = "Going_outside")]
    pub going_outside: i64,
    #[serde(rename = "Friends_circle_size")]
    pub friends_circle_size: i64,
    #[serde(rename = "Post_frequency")]
    pub post_frequency: i64,
    #[serde(rename = "Stage_fear")]
    pub stage_fear: Categorical,
    #[serde(rename = "Drained_after_socializing")]
    pub drained_after_socializing: Categorical,
    #[serde(rename = "Time_spent_Alone")]
    pub time_spent_alone: i64,
}

/// Friends-circle size bucket
///
/// Boundaries are (-inf, 5], (5, 10], (10, 15], (15, inf): right-inclusive,
/// left-exclusive, so a size of exactly 5 is still "Very Small".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkCategory {
    #[serde(rename = "Very Small")]
    VerySmall,
    Small,
    Medium,
    Large,
}

impl NetworkCategory {
    pub fn label(self) -> &'static str {
        match self {
            NetworkCategory::VerySmall => "Very Small",
            NetworkCategory::Small => "Small",
            NetworkCategory::Medium => "Medium",
            NetworkCategory::Large => "Large",
        }
    }

    /// Ordinal position, used when the pipeline encodes this column numerically.
    pub fn ordinal(self) -> usize {
        match self {
            NetworkCategory::VerySmall => 0,
            NetworkCategory::Small => 1,
            NetworkCategory::Medium => 2,
            NetworkCategory::Large => 3,
        }
    }
}

/// Social activity score bucket, boundaries (-inf, 3], (3, 6], (6, 9], (9, inf).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ActivityLevel {
    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Low => "Low",
            ActivityLevel::Medium => "Medium",
            ActivityLevel::High => "High",
            ActivityLevel::VeryHigh => "Very High",
        }
    }

    /// Ordinal position, used when the pipeline encodes this column numerically.
    pub fn ordinal(self) -> usize {
        match self {
            ActivityLevel::Low => 0,
            ActivityLevel::Medium => 1,
            ActivityLevel::High => 2,
            ActivityLevel::VeryHigh => 3,
        }
    }
}

/// The raw record extended with the ten computed behavioral features.
///
/// Field declaration order matches [`FEATURE_ORDER`]; serialization
/// preserves it. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    #[serde(rename = "Social_event_attendance")]
    pub social_event_attendance: i64,
    #[serde(rename = "Going_outside")]
    pub going_outside: i64,
    #[serde(rename = "Friends_circle_size")]
    pub friends_circle_size: i64,
    #[serde(rename = "Post_frequency")]
    pub post_frequency: i64,
    #[serde(rename = "Stage_fear")]
    pub stage_fear: Categorical,
    #[serde(rename = "Drained_after_socializing")]
    pub drained_after_socializing: Categorical,
    #[serde(rename = "Time_spent_Alone")]
    pub time_spent_alone: i64,

    #[serde(rename = "Social_Activity_Score")]
    pub social_activity_score: f64,
    #[serde(rename = "Solitude_Preference")]
    pub solitude_preference: f64,
    #[serde(rename = "Social_Energy_Drain")]
    pub social_energy_drain: f64,
    #[serde(rename = "Social_Confidence")]
    pub social_confidence: f64,
    #[serde(rename = "Digital_Social_Activity")]
    pub digital_social_activity: f64,
    #[serde(rename = "Physical_Social_Activity")]
    pub physical_social_activity: f64,
    #[serde(rename = "Social_Network_Category")]
    pub social_network_category: NetworkCategory,
    #[serde(rename = "Activity_Level")]
    pub activity_level: ActivityLevel,
    #[serde(rename = "Online_vs_Offline_Ratio")]
    pub online_vs_offline_ratio: f64,
    #[serde(rename = "Social_Comfort_Zone")]
    pub social_comfort_zone: f64,
}

impl DerivedRecord {
    /// Numeric value of a named column for model input.
    ///
    /// Yes/No categoricals encode as 1/0; the bucketed categoricals
    /// encode as their ordinal level index. Returns `None` for a column
    /// name outside [`FEATURE_ORDER`].
    pub fn feature_value(&self, name: &str) -> Option<f64> {
        let value = match name {
            "Social_event_attendance" => self.social_event_attendance as f64,
            "Going_outside" => self.going_outside as f64,
            "Friends_circle_size" => self.friends_circle_size as f64,
            "Post_frequency" => self.post_frequency as f64,
            "Stage_fear" => self.stage_fear.is_yes() as u8 as f64,
            "Drained_after_socializing" => self.drained_after_socializing.is_yes() as u8 as f64,
            "Time_spent_Alone" => self.time_spent_alone as f64,
            "Social_Activity_Score" => self.social_activity_score,
            "Solitude_Preference" => self.solitude_preference,
            "Social_Energy_Drain" => self.social_energy_drain,
            "Social_Confidence" => self.social_confidence,
            "Digital_Social_Activity" => self.digital_social_activity,
            "Physical_Social_Activity" => self.physical_social_activity,
            "Social_Network_Category" => self.social_network_category.ordinal() as f64,
            "Activity_Level" => self.activity_level.ordinal() as f64,
            "Online_vs_Offline_Ratio" => self.online_vs_offline_ratio,
            "Social_Comfort_Zone" => self.social_comfort_zone,
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "Social_event_attendance": 5,
            "Going_outside": 3,
            "Friends_circle_size": 10,
            "Post_frequency": 2,
            "Stage_fear": "No",
            "Drained_after_socializing": "Yes",
            "Time_spent_Alone": 4
        })
    }

    #[test]
    fn test_raw_record_round_trip() {
        let record: RawRecord = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(record.social_event_attendance, 5);
        assert_eq!(record.stage_fear.as_str(), "No");
        assert!(record.drained_after_socializing.is_yes());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, sample_json());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let mut json = sample_json();
        json.as_object_mut().unwrap().remove("Stage_fear");
        assert!(serde_json::from_value::<RawRecord>(json).is_err());
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        let mut json = sample_json();
        json["Going_outside"] = serde_json::json!("often");
        assert!(serde_json::from_value::<RawRecord>(json).is_err());
    }

    // Preserved behavior: categorical answers are stringified before the
    // "Yes" comparison, so boolean true coerces to "true" and is not a yes.
    #[test]
    fn test_boolean_true_is_not_yes() {
        let mut json = sample_json();
        json["Stage_fear"] = serde_json::json!(true);
        let record: RawRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.stage_fear.as_str(), "true");
        assert!(!record.stage_fear.is_yes());
    }

    #[test]
    fn test_numeric_categorical_coerces_to_string() {
        let mut json = sample_json();
        json["Drained_after_socializing"] = serde_json::json!(1);
        let record: RawRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.drained_after_socializing.as_str(), "1");
        assert!(!record.drained_after_socializing.is_yes());
    }

    #[test]
    fn test_yes_comparison_is_case_sensitive() {
        assert!(Categorical::new("Yes").is_yes());
        assert!(!Categorical::new("yes").is_yes());
        assert!(!Categorical::new("YES").is_yes());
    }

    #[test]
    fn test_feature_order_covers_feature_values() {
        let raw: RawRecord = serde_json::from_value(sample_json()).unwrap();
        let derived = crate::features::derive(&raw);
        for name in FEATURE_ORDER {
            assert!(
                derived.feature_value(name).is_some(),
                "no value for column {name}"
            );
        }
        assert!(derived.feature_value("Unknown_Column").is_none());
    }
}
