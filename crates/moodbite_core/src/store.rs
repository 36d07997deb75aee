//! crates/moodbite_core/src/store.rs
//!
//! The food store: the single persisted state object holding the user's
//! preferences, saved meals, and selection history. Persistence is injected
//! through the [`StateStorage`] port so the store can be exercised in tests
//! with an in-memory implementation.
//!
//! Every mutation is written back to storage immediately. Two named blobs
//! are maintained: `food-store` carries the whole state, and the slim
//! `moodbite-preferences` blob mirrors just the preferences snapshot for
//! consumers that only care about those. On load, `food-store` is the source
//! of truth.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    BudgetRange, MealContext, PreferencesUpdate, Recommendation, SavedMeal,
    SelectedRecommendation, UserPreferences,
};
use crate::ports::{PortError, PortResult, StateStorage};

/// Storage name of the full store blob.
pub const FOOD_STORE_BLOB: &str = "food-store";
/// Storage name of the preferences-only blob.
pub const PREFERENCES_BLOB: &str = "moodbite-preferences";

/// Current persisted envelope version. A blob written with a different
/// version is not migrated in place; the store starts from defaults instead.
const STORE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct PersistedBlob<T> {
    version: u32,
    state: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FoodStoreState {
    user_preferences: UserPreferences,
    saved_meals: Vec<SavedMeal>,
    selected_recommendations: Vec<SelectedRecommendation>,
}

/// The process-wide preference/selection store.
pub struct FoodStore {
    storage: Arc<dyn StateStorage>,
    state: FoodStoreState,
}

impl FoodStore {
    /// Initializes the store from persisted storage, falling back to empty
    /// defaults when nothing has been written yet or the envelope version
    /// is unknown.
    pub async fn load(storage: Arc<dyn StateStorage>) -> PortResult<Self> {
        let state = match storage.load(FOOD_STORE_BLOB).await? {
            Some(raw) => {
                let blob: PersistedBlob<FoodStoreState> =
                    serde_json::from_str(&raw).map_err(|e| {
                        PortError::Storage(format!("corrupt {FOOD_STORE_BLOB} blob: {e}"))
                    })?;
                if blob.version == STORE_VERSION {
                    blob.state
                } else {
                    FoodStoreState::default()
                }
            }
            None => FoodStoreState::default(),
        };
        Ok(Self { storage, state })
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.state.user_preferences
    }

    pub fn saved_meals(&self) -> &[SavedMeal] {
        &self.state.saved_meals
    }

    pub fn selection_history(&self) -> &[SelectedRecommendation] {
        &self.state.selected_recommendations
    }

    pub async fn set_dietary_preferences(&mut self, preferences: Vec<String>) -> PortResult<()> {
        self.state.user_preferences.dietary_preferences = preferences;
        self.persist().await
    }

    pub async fn set_health_restrictions(&mut self, restrictions: Vec<String>) -> PortResult<()> {
        self.state.user_preferences.health_restrictions = restrictions;
        self.persist().await
    }

    pub async fn set_mood_tracking(&mut self, moods: Vec<String>) -> PortResult<()> {
        self.state.user_preferences.mood_tracking = moods;
        self.persist().await
    }

    pub async fn set_budget_range(&mut self, budget: BudgetRange) -> PortResult<()> {
        validate_budget(&budget)?;
        self.state.user_preferences.budget_range = budget;
        self.persist().await
    }

    /// Applies a partial update with shallow-merge semantics: only the
    /// fields present in `update` are replaced.
    pub async fn update_preferences(&mut self, update: PreferencesUpdate) -> PortResult<()> {
        if let Some(budget) = &update.budget_range {
            validate_budget(budget)?;
        }
        let prefs = &mut self.state.user_preferences;
        if let Some(v) = update.dietary_preferences {
            prefs.dietary_preferences = v;
        }
        if let Some(v) = update.health_restrictions {
            prefs.health_restrictions = v;
        }
        if let Some(v) = update.mood_tracking {
            prefs.mood_tracking = v;
        }
        if let Some(v) = update.nationality {
            prefs.nationality = v;
        }
        if let Some(v) = update.cuisine_preference {
            prefs.cuisine_preference = v;
        }
        if let Some(v) = update.budget_range {
            prefs.budget_range = v;
        }
        self.persist().await
    }

    /// Appends a chosen recommendation to the selection history, stamping it
    /// with the mood that produced it and the current time.
    pub async fn add_selected_recommendation(
        &mut self,
        mood: &str,
        recommendation: Recommendation,
    ) -> PortResult<SelectedRecommendation> {
        let entry = SelectedRecommendation {
            recommendation,
            mood: mood.to_string(),
            selected_at: Utc::now(),
        };
        self.state.selected_recommendations.push(entry.clone());
        self.persist().await?;
        Ok(entry)
    }

    pub async fn add_saved_meal(
        &mut self,
        name: &str,
        mood: &str,
        context: MealContext,
    ) -> PortResult<SavedMeal> {
        let meal = SavedMeal {
            id: Uuid::new_v4(),
            name: name.to_string(),
            mood: mood.to_string(),
            context,
            saved_at: Utc::now(),
        };
        self.state.saved_meals.push(meal.clone());
        self.persist().await?;
        Ok(meal)
    }

    pub async fn remove_saved_meal(&mut self, id: Uuid) -> PortResult<()> {
        let before = self.state.saved_meals.len();
        self.state.saved_meals.retain(|meal| meal.id != id);
        if self.state.saved_meals.len() == before {
            return Err(PortError::NotFound(format!("saved meal {id}")));
        }
        self.persist().await
    }

    /// Clears every field back to its empty default, including the saved
    /// meals and the selection history, and persists the cleared state.
    pub async fn reset(&mut self) -> PortResult<()> {
        self.state = FoodStoreState::default();
        self.persist().await
    }

    async fn persist(&self) -> PortResult<()> {
        let full = serde_json::json!({
            "version": STORE_VERSION,
            "state": &self.state,
        });
        self.storage
            .save(FOOD_STORE_BLOB, &full.to_string())
            .await?;

        let prefs = serde_json::json!({
            "version": STORE_VERSION,
            "state": &self.state.user_preferences,
        });
        self.storage
            .save(PREFERENCES_BLOB, &prefs.to_string())
            .await
    }
}

fn validate_budget(budget: &BudgetRange) -> PortResult<()> {
    let well_formed = budget.min.is_finite()
        && budget.max.is_finite()
        && budget.min >= 0.0
        && budget.min <= budget.max;
    if !well_formed {
        return Err(PortError::InvalidInput(
            "budget range must satisfy 0 <= min <= max".to_string(),
        ));
    }
    Ok(())
}
