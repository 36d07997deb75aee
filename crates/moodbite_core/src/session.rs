//! crates/moodbite_core/src/session.rs
//!
//! The mood-input / result-selection session: the control state the result
//! screen works against. One submission may be in flight at a time (the
//! submit control is gated, not cancelled), one recommendation may be
//! selected at a time, and an explicit save appends the selection to the
//! store's history.

use crate::domain::{Recommendation, RecommendationResponse, SelectedRecommendation};
use crate::ports::PortError;
use crate::store::FoodStore;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("a recommendation request is already in flight")]
    AlreadyPending,
    #[error("mood must not be empty")]
    EmptyMood,
    #[error("no recommendations to select from")]
    NoResponse,
    #[error("recommendation index {0} is out of range")]
    IndexOutOfRange(usize),
    #[error("no recommendation is selected")]
    NoSelection,
    #[error(transparent)]
    Store(#[from] PortError),
}

/// Per-screen state for the recommendation flow.
#[derive(Debug, Default)]
pub struct RecommendationSession {
    mood_input: String,
    in_flight: bool,
    current_response: Option<RecommendationResponse>,
    selected: Option<usize>,
}

impl RecommendationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mood_input(&self) -> &str {
        &self.mood_input
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn current_response(&self) -> Option<&RecommendationResponse> {
        self.current_response.as_ref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The currently selected recommendation, if any.
    pub fn selected_recommendation(&self) -> Option<&Recommendation> {
        let response = self.current_response.as_ref()?;
        response.recommendations.get(self.selected?)
    }

    /// Marks a submission as started. Rejected while a previous submission
    /// is still pending; re-submission is prevented by this gate, not by
    /// cancelling the earlier request.
    pub fn begin_submission(&mut self, mood: &str) -> Result<(), SessionError> {
        if self.in_flight {
            return Err(SessionError::AlreadyPending);
        }
        let mood = mood.trim();
        if mood.is_empty() {
            return Err(SessionError::EmptyMood);
        }
        self.mood_input = mood.to_string();
        self.in_flight = true;
        Ok(())
    }

    /// Installs the response for a completed submission and clears any
    /// selection left over from the previous result set.
    pub fn complete_submission(&mut self, response: RecommendationResponse) {
        self.in_flight = false;
        self.selected = None;
        self.current_response = Some(response);
    }

    /// Clears the in-flight gate after a failed submission. The previous
    /// result set, if any, stays on screen.
    pub fn fail_submission(&mut self) {
        self.in_flight = false;
    }

    /// Click-to-select: marks one recommendation as the single current
    /// selection, replacing any earlier choice.
    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        let response = self
            .current_response
            .as_ref()
            .ok_or(SessionError::NoResponse)?;
        if index >= response.recommendations.len() {
            return Err(SessionError::IndexOutOfRange(index));
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Persists the current selection into the store's history, stamped
    /// with the mood text that produced it. Appends exactly one entry per
    /// call; selections replaced before saving leave no trace.
    pub async fn save(
        &mut self,
        store: &mut FoodStore,
    ) -> Result<SelectedRecommendation, SessionError> {
        let recommendation = self
            .current_response
            .as_ref()
            .ok_or(SessionError::NoResponse)?
            .recommendations
            .get(self.selected.ok_or(SessionError::NoSelection)?)
            .cloned()
            .ok_or(SessionError::NoSelection)?;
        let entry = store
            .add_selected_recommendation(&self.mood_input, recommendation)
            .await?;
        Ok(entry)
    }

    /// Clears the mood input, the current result set, and the selection,
    /// then delegates to the store's full reset.
    pub async fn reset(&mut self, store: &mut FoodStore) -> Result<(), SessionError> {
        self.mood_input.clear();
        self.in_flight = false;
        self.current_response = None;
        self.selected = None;
        store.reset().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_response, MemoryStorage};
    use std::sync::Arc;

    async fn fresh_store() -> FoodStore {
        FoodStore::load(Arc::new(MemoryStorage::default()))
            .await
            .unwrap()
    }

    #[test]
    fn submission_gate_blocks_resubmission() {
        let mut session = RecommendationSession::new();
        session.begin_submission("I'm stressed and craving comfort food").unwrap();
        let err = session.begin_submission("still stressed").unwrap_err();
        assert!(matches!(err, SessionError::AlreadyPending));

        session.fail_submission();
        session.begin_submission("still stressed").unwrap();
    }

    #[test]
    fn empty_mood_is_rejected() {
        let mut session = RecommendationSession::new();
        let err = session.begin_submission("   ").unwrap_err();
        assert!(matches!(err, SessionError::EmptyMood));
        assert!(!session.is_in_flight());
    }

    #[test]
    fn selection_requires_a_response_and_a_valid_index() {
        let mut session = RecommendationSession::new();
        assert!(matches!(session.select(0), Err(SessionError::NoResponse)));

        session.begin_submission("hungry").unwrap();
        session.complete_submission(sample_response(&["Pho", "Ramen", "Udon"]));
        session.select(2).unwrap();
        assert_eq!(session.selected_recommendation().unwrap().name, "Udon");
        assert!(matches!(
            session.select(3),
            Err(SessionError::IndexOutOfRange(3))
        ));
    }

    #[tokio::test]
    async fn save_appends_exactly_one_entry_with_the_original_mood() {
        let mut store = fresh_store().await;
        let mut session = RecommendationSession::new();

        session
            .begin_submission("I'm stressed and craving comfort food")
            .unwrap();
        session.complete_submission(sample_response(&["Pho", "Ramen", "Udon"]));

        // Changing the selection before saving must not record the first
        // choice.
        session.select(0).unwrap();
        session.select(1).unwrap();
        let entry = session.save(&mut store).await.unwrap();

        assert_eq!(store.selection_history().len(), 1);
        assert_eq!(entry.mood, "I'm stressed and craving comfort food");
        assert_eq!(entry.recommendation.name, "Ramen");
        assert_eq!(store.selection_history()[0].recommendation.name, "Ramen");
    }

    #[tokio::test]
    async fn save_without_a_selection_is_rejected() {
        let mut store = fresh_store().await;
        let mut session = RecommendationSession::new();
        session.begin_submission("hungry").unwrap();
        session.complete_submission(sample_response(&["Pho"]));

        let err = session.save(&mut store).await.unwrap_err();
        assert!(matches!(err, SessionError::NoSelection));
        assert!(store.selection_history().is_empty());
    }

    #[test]
    fn new_results_clear_the_previous_selection() {
        let mut session = RecommendationSession::new();
        session.begin_submission("hungry").unwrap();
        session.complete_submission(sample_response(&["Pho", "Ramen"]));
        session.select(1).unwrap();

        session.begin_submission("tired now").unwrap();
        session.complete_submission(sample_response(&["Congee"]));
        assert_eq!(session.selected_index(), None);
    }

    #[tokio::test]
    async fn reset_clears_the_session_and_the_store() {
        let mut store = fresh_store().await;
        store
            .set_dietary_preferences(vec!["Vegan".to_string()])
            .await
            .unwrap();

        let mut session = RecommendationSession::new();
        session.begin_submission("hungry").unwrap();
        session.complete_submission(sample_response(&["Pho"]));
        session.select(0).unwrap();
        session.save(&mut store).await.unwrap();

        session.reset(&mut store).await.unwrap();

        assert_eq!(session.mood_input(), "");
        assert!(session.current_response().is_none());
        assert_eq!(session.selected_index(), None);
        assert!(store.preferences().dietary_preferences.is_empty());
        assert!(store.selection_history().is_empty());
    }
}
