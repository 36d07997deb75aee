//! crates/moodbite_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the LLM
//! provider or the persistence mechanism.

use async_trait::async_trait;

use crate::domain::{FitnessResponse, RecommendationRequest, RecommendationResponse};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Provider call failed: {0}")]
    Provider(String),
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for named state blobs.
///
/// The store writes two independently named blobs (`moodbite-preferences`
/// and `food-store`), each carrying a versioned JSON envelope. Implementors
/// only move opaque strings; versioning and migration are the store's job.
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Loads the raw payload persisted under `name`, or `None` if the blob
    /// has never been written.
    async fn load(&self, name: &str) -> PortResult<Option<String>>;

    /// Persists `payload` under `name`, replacing any previous value.
    async fn save(&self, name: &str, payload: &str) -> PortResult<()>;
}

/// Generates food recommendations for a mood plus a preferences snapshot.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> PortResult<RecommendationResponse>;
}

/// Generates meal recommendations for a free-text fitness query.
#[async_trait]
pub trait FitnessService: Send + Sync {
    async fn recommend(&self, query: &str) -> PortResult<FitnessResponse>;
}
