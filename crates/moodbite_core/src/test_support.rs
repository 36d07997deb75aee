//! Shared fixtures for the crate's unit tests: an in-memory `StateStorage`
//! and canned recommendation payloads.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    AnalysisContext, MoodAnalysis, Recommendation, RecommendationResponse,
};
use crate::ports::{PortResult, StateStorage};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn load(&self, name: &str) -> PortResult<Option<String>> {
        Ok(self.blobs.lock().unwrap().get(name).cloned())
    }

    async fn save(&self, name: &str, payload: &str) -> PortResult<()> {
        self.blobs
            .lock()
            .unwrap()
            .insert(name.to_string(), payload.to_string());
        Ok(())
    }
}

pub fn sample_recommendation(name: &str) -> Recommendation {
    Recommendation {
        name: name.to_string(),
        cuisine: "Vietnamese".to_string(),
        description: format!("A comforting bowl of {name}"),
        match_score: 8.0,
        mood_alignment: "Warm and soothing".to_string(),
        dietary_tags: vec!["gluten-free".to_string()],
        nutritional_benefits: vec!["protein".to_string()],
    }
}

pub fn sample_response(names: &[&str]) -> RecommendationResponse {
    RecommendationResponse {
        analysis: MoodAnalysis {
            dominant_emotion: "stressed".to_string(),
            intensity: 7.0,
            context: AnalysisContext {
                time_of_day: "evening".to_string(),
                weather: None,
                occasion: None,
            },
            food_associations: vec!["comfort food".to_string()],
        },
        recommendations: names.iter().map(|n| sample_recommendation(n)).collect(),
        explanation: "Comfort-leaning picks.".to_string(),
    }
}
