//! crates/moodbite_core/src/onboarding.rs
//!
//! The onboarding flow: an explicit, forward-only sequence of preference
//! questions, plus the derived "has completed onboarding" predicate.
//!
//! The predicate is intentionally a function of the preference data alone
//! and never consults the flow's step position. A user who reloads mid-flow
//! with every required field already filled skips onboarding even though the
//! flow never reached its last step; that behavior is intentional and
//! covered by tests.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BudgetRange, PreferencesUpdate, UserPreferences};
use crate::ports::PortError;
use crate::store::FoodStore;

/// The onboarding questions, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    DietaryPreferences,
    HealthRestrictions,
    Nationality,
    MoodTracking,
    BudgetRange,
    CuisinePreferences,
}

impl OnboardingStep {
    /// All steps in presentation order.
    pub const ORDER: [OnboardingStep; 6] = [
        OnboardingStep::DietaryPreferences,
        OnboardingStep::HealthRestrictions,
        OnboardingStep::Nationality,
        OnboardingStep::MoodTracking,
        OnboardingStep::BudgetRange,
        OnboardingStep::CuisinePreferences,
    ];

    pub fn first() -> Self {
        Self::ORDER[0]
    }

    /// Zero-based position of this step within the flow.
    pub fn index(self) -> usize {
        Self::ORDER.iter().position(|step| *step == self).unwrap_or(0)
    }

    /// The step that follows this one, or `None` after the last step.
    pub fn next(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

/// A user's answer to one onboarding step.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepAnswer {
    DietaryPreferences { selections: Vec<String> },
    /// Free text; entries are split on commas, semicolons, and newlines.
    HealthRestrictions { restrictions: String },
    Nationality { nationality: String },
    MoodTracking { selections: Vec<String> },
    BudgetRange { min: f64, max: f64 },
    /// Optional step; an empty cuisine means "skip".
    CuisinePreferences { cuisine: String },
}

impl StepAnswer {
    /// The step this answer belongs to.
    pub fn step(&self) -> OnboardingStep {
        match self {
            StepAnswer::DietaryPreferences { .. } => OnboardingStep::DietaryPreferences,
            StepAnswer::HealthRestrictions { .. } => OnboardingStep::HealthRestrictions,
            StepAnswer::Nationality { .. } => OnboardingStep::Nationality,
            StepAnswer::MoodTracking { .. } => OnboardingStep::MoodTracking,
            StepAnswer::BudgetRange { .. } => OnboardingStep::BudgetRange,
            StepAnswer::CuisinePreferences { .. } => OnboardingStep::CuisinePreferences,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("answer is for step {answered:?} but the flow is at {current:?}")]
    WrongStep {
        current: OnboardingStep,
        answered: OnboardingStep,
    },
    #[error("onboarding is already complete")]
    Finished,
    #[error("{0}")]
    InvalidInput(String),
    #[error("failed to persist onboarding answer: {0}")]
    Store(PortError),
}

/// The flow's own position. Forward-only: a successful answer advances to
/// the next step and there is no backward navigation.
#[derive(Debug, Clone, Copy)]
pub struct OnboardingFlow {
    current: Option<OnboardingStep>,
}

impl Default for OnboardingFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingFlow {
    pub fn new() -> Self {
        Self {
            current: Some(OnboardingStep::first()),
        }
    }

    /// The step currently awaiting an answer, or `None` once the flow has
    /// handed control to the main recommendation screen.
    pub fn current_step(&self) -> Option<OnboardingStep> {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Validates the answer for the current step, writes it into the store,
    /// and advances the flow.
    pub async fn answer(
        &mut self,
        answer: StepAnswer,
        store: &mut FoodStore,
    ) -> Result<(), OnboardingError> {
        let Some(step) = self.current else {
            return Err(OnboardingError::Finished);
        };
        if answer.step() != step {
            return Err(OnboardingError::WrongStep {
                current: step,
                answered: answer.step(),
            });
        }

        match answer {
            StepAnswer::DietaryPreferences { selections } => {
                let selections = non_empty_selections(selections, "dietary preference")?;
                store
                    .set_dietary_preferences(selections)
                    .await
                    .map_err(store_error)?;
            }
            StepAnswer::HealthRestrictions { restrictions } => {
                let entries = split_free_text_list(&restrictions);
                if entries.is_empty() {
                    return Err(OnboardingError::InvalidInput(
                        "at least one health restriction is required".to_string(),
                    ));
                }
                store
                    .set_health_restrictions(entries)
                    .await
                    .map_err(store_error)?;
            }
            StepAnswer::Nationality { nationality } => {
                let nationality = nationality.trim();
                if nationality.is_empty() {
                    return Err(OnboardingError::InvalidInput(
                        "nationality must not be empty".to_string(),
                    ));
                }
                store
                    .update_preferences(PreferencesUpdate {
                        nationality: Some(nationality.to_string()),
                        ..Default::default()
                    })
                    .await
                    .map_err(store_error)?;
            }
            StepAnswer::MoodTracking { selections } => {
                let selections = non_empty_selections(selections, "mood")?;
                store.set_mood_tracking(selections).await.map_err(store_error)?;
            }
            StepAnswer::BudgetRange { min, max } => {
                store
                    .set_budget_range(BudgetRange { min, max })
                    .await
                    .map_err(store_error)?;
            }
            StepAnswer::CuisinePreferences { cuisine } => {
                // Skippable: an empty cuisine clears the preference.
                store
                    .update_preferences(PreferencesUpdate {
                        cuisine_preference: Some(cuisine.trim().to_string()),
                        ..Default::default()
                    })
                    .await
                    .map_err(store_error)?;
            }
        }

        self.current = step.next();
        Ok(())
    }
}

/// Whether the user has answered enough of onboarding for the main screen.
///
/// Derived from the stored preferences only; the cuisine step is optional
/// and does not count.
pub fn has_completed_onboarding(preferences: &UserPreferences) -> bool {
    !preferences.dietary_preferences.is_empty()
        && !preferences.health_restrictions.is_empty()
        && !preferences.mood_tracking.is_empty()
        && preferences.budget_range.max > 0.0
}

/// Splits a free-text list on commas, semicolons, and newlines, trimming
/// whitespace and dropping empty entries.
pub fn split_free_text_list(text: &str) -> Vec<String> {
    text.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty_selections(
    selections: Vec<String>,
    what: &str,
) -> Result<Vec<String>, OnboardingError> {
    let selections: Vec<String> = selections
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if selections.is_empty() {
        return Err(OnboardingError::InvalidInput(format!(
            "select at least one {what}"
        )));
    }
    Ok(selections)
}

fn store_error(err: PortError) -> OnboardingError {
    match err {
        PortError::InvalidInput(message) => OnboardingError::InvalidInput(message),
        other => OnboardingError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStorage;
    use std::sync::Arc;

    async fn fresh_store() -> FoodStore {
        FoodStore::load(Arc::new(MemoryStorage::default()))
            .await
            .unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn full_walk_finishes_the_flow() {
        let mut store = fresh_store().await;
        let mut flow = OnboardingFlow::new();

        flow.answer(
            StepAnswer::DietaryPreferences {
                selections: strings(&["Vegetarian"]),
            },
            &mut store,
        )
        .await
        .unwrap();
        flow.answer(
            StepAnswer::HealthRestrictions {
                restrictions: "allergic to peanuts, low sodium\nno dairy".to_string(),
            },
            &mut store,
        )
        .await
        .unwrap();
        flow.answer(
            StepAnswer::Nationality {
                nationality: "Italian".to_string(),
            },
            &mut store,
        )
        .await
        .unwrap();
        flow.answer(
            StepAnswer::MoodTracking {
                selections: strings(&["Happy", "Tired"]),
            },
            &mut store,
        )
        .await
        .unwrap();
        flow.answer(StepAnswer::BudgetRange { min: 10.0, max: 50.0 }, &mut store)
            .await
            .unwrap();
        assert!(!flow.is_finished());

        // The last step may be skipped with an empty cuisine.
        flow.answer(
            StepAnswer::CuisinePreferences {
                cuisine: String::new(),
            },
            &mut store,
        )
        .await
        .unwrap();

        assert!(flow.is_finished());
        assert!(has_completed_onboarding(store.preferences()));
        assert_eq!(
            store.preferences().health_restrictions,
            strings(&["allergic to peanuts", "low sodium", "no dairy"])
        );

        // Answering past the end is rejected.
        let err = flow
            .answer(
                StepAnswer::CuisinePreferences {
                    cuisine: "Thai".to_string(),
                },
                &mut store,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::Finished));
    }

    #[tokio::test]
    async fn wrong_step_answers_are_rejected() {
        let mut store = fresh_store().await;
        let mut flow = OnboardingFlow::new();

        let err = flow
            .answer(StepAnswer::BudgetRange { min: 0.0, max: 20.0 }, &mut store)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OnboardingError::WrongStep {
                current: OnboardingStep::DietaryPreferences,
                answered: OnboardingStep::BudgetRange,
            }
        ));
        // The flow did not move.
        assert_eq!(flow.current_step(), Some(OnboardingStep::DietaryPreferences));
    }

    #[tokio::test]
    async fn empty_required_input_is_rejected() {
        let mut store = fresh_store().await;
        let mut flow = OnboardingFlow::new();

        let err = flow
            .answer(
                StepAnswer::DietaryPreferences {
                    selections: strings(&["  "]),
                },
                &mut store,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::InvalidInput(_)));
        assert_eq!(flow.current_step(), Some(OnboardingStep::DietaryPreferences));
    }

    #[tokio::test]
    async fn completion_is_derived_from_data_not_step_position() {
        let mut store = fresh_store().await;

        // Fill every required field directly, as a previous session would
        // have; a brand-new flow still sits at its first step.
        store
            .set_dietary_preferences(strings(&["Vegan"]))
            .await
            .unwrap();
        store
            .set_health_restrictions(strings(&["no shellfish"]))
            .await
            .unwrap();
        store.set_mood_tracking(strings(&["Relaxed"])).await.unwrap();
        store
            .set_budget_range(BudgetRange { min: 5.0, max: 30.0 })
            .await
            .unwrap();

        let flow = OnboardingFlow::new();
        assert_eq!(flow.current_step(), Some(OnboardingStep::first()));
        // The reloaded UI would skip onboarding anyway.
        assert!(has_completed_onboarding(store.preferences()));
    }

    #[test]
    fn step_order_is_linear() {
        let mut step = OnboardingStep::first();
        let mut seen = vec![step];
        while let Some(next) = step.next() {
            seen.push(next);
            step = next;
        }
        assert_eq!(seen, OnboardingStep::ORDER.to_vec());
        assert!(OnboardingStep::CuisinePreferences.is_last());
        assert_eq!(OnboardingStep::Nationality.index(), 2);
    }

    #[test]
    fn free_text_lists_split_on_separators() {
        assert_eq!(
            split_free_text_list("a, b; c\n d\n\n"),
            vec!["a", "b", "c", "d"]
        );
        assert!(split_free_text_list("  \n ; ,").is_empty());
    }
}
