//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use moodbite_core::onboarding::OnboardingFlow;
use moodbite_core::ports::{FitnessService, RecommendationService};
use moodbite_core::session::RecommendationSession;
use moodbite_core::store::FoodStore;
use tokio::sync::RwLock;

use crate::config::Config;

/// The shared application state, created once at startup and passed to all
/// handlers.
///
/// The store, flow, and session model a single user profile, matching the
/// per-installation state of the client app this service backs. Handlers
/// that need more than one lock acquire them in the order session →
/// onboarding → store.
pub struct AppState {
    pub config: Arc<Config>,
    pub store: RwLock<FoodStore>,
    pub onboarding: RwLock<OnboardingFlow>,
    pub session: RwLock<RecommendationSession>,
    pub recommender: Arc<dyn RecommendationService>,
    pub fitness: Arc<dyn FitnessService>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: FoodStore,
        recommender: Arc<dyn RecommendationService>,
        fitness: Arc<dyn FitnessService>,
    ) -> Self {
        Self {
            config,
            store: RwLock::new(store),
            onboarding: RwLock::new(OnboardingFlow::new()),
            session: RwLock::new(RecommendationSession::new()),
            recommender,
            fitness,
        }
    }
}
