pub mod domain;
pub mod onboarding;
pub mod payload;
pub mod ports;
pub mod session;
pub mod store;

pub use domain::{
    BudgetRange, FitnessResponse, PreferencesUpdate, Recommendation, RecommendationRequest,
    RecommendationResponse, SavedMeal, SelectedRecommendation, UserPreferences,
};
pub use onboarding::{
    has_completed_onboarding, OnboardingError, OnboardingFlow, OnboardingStep, StepAnswer,
};
pub use payload::{extract_text, ContentSegment, ModelPayload, PayloadError};
pub use ports::{FitnessService, PortError, PortResult, RecommendationService, StateStorage};
pub use session::{RecommendationSession, SessionError};
pub use store::FoodStore;

#[cfg(test)]
pub(crate) mod test_support;
