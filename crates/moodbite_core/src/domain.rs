//! crates/moodbite_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! Most of these types double as the wire contract: the request bodies the
//! API accepts, the JSON shape the model is instructed to produce, and the
//! persisted store state all use the same camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The user's typical meal budget in whole currency units.
///
/// Invariant: `0 <= min <= max`. The store mutators enforce this; the type
/// itself stays a plain data carrier so partial/persisted JSON can load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

/// Everything the onboarding flow collects about a user.
///
/// Created with empty defaults and mutated field-by-field as the user
/// answers onboarding steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferences {
    pub dietary_preferences: Vec<String>,
    pub health_restrictions: Vec<String>,
    pub mood_tracking: Vec<String>,
    pub nationality: String,
    pub cuisine_preference: String,
    pub budget_range: BudgetRange,
}

/// A partial update to [`UserPreferences`] with shallow-merge semantics:
/// present fields replace the stored value, absent fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_restrictions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_tracking: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<BudgetRange>,
}

/// Optional situational context a client may attach to a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// One recommendation request, constructed fresh per submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub mood: String,
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<RequestContext>,
}

/// The situational fields inside the model's mood analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisContext {
    pub time_of_day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
}

/// The model's reading of the user's mood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodAnalysis {
    pub dominant_emotion: String,
    /// Emotional intensity on a 1-10 scale.
    pub intensity: f64,
    pub context: AnalysisContext,
    pub food_associations: Vec<String>,
}

/// A single recommended dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub name: String,
    pub cuisine: String,
    pub description: String,
    /// Mood fit on a 1-10 scale, as judged by the model.
    pub match_score: f64,
    pub mood_alignment: String,
    pub dietary_tags: Vec<String>,
    pub nutritional_benefits: Vec<String>,
}

/// The full payload the model is instructed to return for a mood request.
///
/// Transient: lives for one request/response cycle. The prompt demands
/// exactly 3 recommendations but the count is deliberately not re-checked
/// here; provider non-compliance propagates to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub analysis: MoodAnalysis,
    pub recommendations: Vec<Recommendation>,
    pub explanation: String,
}

/// A recommendation the user explicitly chose to keep, together with the
/// mood text that produced it. Append-only: entries are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRecommendation {
    pub recommendation: Recommendation,
    pub mood: String,
    pub selected_at: DateTime<Utc>,
}

/// The situational snapshot stored alongside a saved meal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MealContext {
    pub weather: String,
    pub time_of_day: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A meal the user saved for later, independent of any one recommendation
/// cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedMeal {
    pub id: Uuid,
    pub name: String,
    pub mood: String,
    pub context: MealContext,
    pub saved_at: DateTime<Utc>,
}

//=========================================================================================
// Fitness Variant
//=========================================================================================
// The fitness endpoint takes a free-text query instead of the preference
// snapshot and asks the model for meals with macros, so its response shape
// is a separate family of types.

/// Macro targets or contents, kept as free-form strings ("30g", "~450 kcal").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MacroTargets {
    pub protein: String,
    pub carbs: String,
    pub fats: String,
    pub calories: String,
}

/// The dietary situation the model inferred from the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DietaryContext {
    pub meal_type: String,
    pub timing: String,
    pub restrictions: Vec<String>,
}

/// The model's reading of the user's fitness needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FitnessAnalysis {
    pub fitness_goals: Vec<String>,
    pub nutritional_needs: MacroTargets,
    pub dietary_context: DietaryContext,
}

/// A single recommended meal for the fitness variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FitnessRecommendation {
    pub name: String,
    pub description: String,
    pub macros: MacroTargets,
    pub ingredients: Vec<String>,
    pub preparation: String,
    pub meal_timing: String,
    pub fitness_benefits: Vec<String>,
}

/// The full payload the model is instructed to return for a fitness query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FitnessResponse {
    pub analysis: FitnessAnalysis,
    pub recommendations: Vec<FitnessRecommendation>,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_response_round_trips_through_json() {
        let raw = r#"{
            "analysis": {
                "dominantEmotion": "stressed",
                "intensity": 7,
                "context": { "timeOfDay": "evening", "weather": "rainy" },
                "foodAssociations": ["comfort food", "warm dishes"]
            },
            "recommendations": [
                {
                    "name": "Mac and cheese",
                    "cuisine": "American",
                    "description": "Baked with a crispy crust",
                    "matchScore": 9,
                    "moodAlignment": "Warm and familiar",
                    "dietaryTags": ["vegetarian"],
                    "nutritionalBenefits": ["calcium", "protein"]
                }
            ],
            "explanation": "Comfort-leaning picks for a stressful evening."
        }"#;

        let parsed: RecommendationResponse = serde_json::from_str(raw).unwrap();
        let reserialized = serde_json::to_string(&parsed).unwrap();
        let reparsed: RecommendationResponse = serde_json::from_str(&reserialized).unwrap();
        assert_eq!(parsed, reparsed);
        assert_eq!(reparsed.analysis.dominant_emotion, "stressed");
        assert_eq!(reparsed.recommendations.len(), 1);
        assert_eq!(reparsed.recommendations[0].match_score, 9.0);
    }

    #[test]
    fn preferences_parse_with_missing_fields() {
        // Persisted blobs and request bodies may carry only a subset of the
        // preference fields; the rest fall back to empty defaults.
        let prefs: UserPreferences =
            serde_json::from_str(r#"{ "dietaryPreferences": ["Vegan"] }"#).unwrap();
        assert_eq!(prefs.dietary_preferences, vec!["Vegan"]);
        assert!(prefs.health_restrictions.is_empty());
        assert_eq!(prefs.budget_range, BudgetRange::default());
    }

    #[test]
    fn preferences_update_omits_absent_fields() {
        let update = PreferencesUpdate {
            nationality: Some("Italian".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("nationality"));
        assert!(!json.contains("dietaryPreferences"));
    }
}
