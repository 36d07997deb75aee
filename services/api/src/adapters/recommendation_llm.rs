//! services/api/src/adapters/recommendation_llm.rs
//!
//! This module contains the adapter for the mood-to-food recommendation LLM.
//! It implements the `RecommendationService` port from the `core` crate.

const PROMPT_TEMPLATE: &str = r#"You are MoodBite's AI food recommendation expert. Generate exactly 3 food recommendations based on the user's mood and preferences.

User Information:
Nationality: {nationality}
Mood: {mood}
Dietary Preferences: {dietary_preferences}
Health Restrictions: {health_restrictions}
Mood Tracking: {mood_tracking}
Cuisine Preference: {cuisine_preference}
{situation}
You must respond with a JSON object that exactly matches this structure:
{
  "analysis": {
    "dominantEmotion": "current primary emotion",
    "intensity": "number between 1-10",
    "context": {
      "timeOfDay": "morning/afternoon/evening",
      "weather": "optional weather context",
      "occasion": "optional special occasion"
    },
    "foodAssociations": ["food types associated with mood"]
  },
  "recommendations": [
    {
      "name": "dish name",
      "cuisine": "cuisine type",
      "description": "brief description",
      "matchScore": "number between 1-10",
      "moodAlignment": "how it aligns with mood",
      "dietaryTags": ["relevant dietary tags"],
      "nutritionalBenefits": ["key nutritional benefits"]
    }
  ],
  "explanation": "brief explanation of recommendations"
}

{format_instructions}

Important:
- Provide EXACTLY 3 recommendations
- Ensure all responses are in valid JSON format
- Do not include any additional text or explanations outside the JSON structure"#;

const TOP_LEVEL_FIELDS: [&str; 3] = ["analysis", "recommendations", "explanation"];
const RECOMMENDATION_FIELDS: [&str; 7] = [
    "name",
    "cuisine",
    "description",
    "matchScore",
    "moodAlignment",
    "dietaryTags",
    "nutritionalBenefits",
];

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use moodbite_core::domain::{RecommendationRequest, RecommendationResponse, RequestContext};
use moodbite_core::ports::{PortError, PortResult, RecommendationService};

use super::completions::{format_instructions, parse_json_payload, payload_from_completion};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `RecommendationService` using an
/// OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiRecommendationAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiRecommendationAdapter {
    /// Creates a new `OpenAiRecommendationAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, temperature: f32) -> Self {
        Self {
            client,
            model,
            temperature,
        }
    }
}

/// Formats the single-shot prompt for one recommendation request.
fn build_prompt(request: &RecommendationRequest) -> String {
    let prefs = &request.preferences;
    let cuisine = if prefs.cuisine_preference.trim().is_empty() {
        "No specific preference"
    } else {
        prefs.cuisine_preference.as_str()
    };

    PROMPT_TEMPLATE
        .replace("{nationality}", prefs.nationality.trim())
        .replace("{mood}", request.mood.trim())
        .replace("{dietary_preferences}", &prefs.dietary_preferences.join(", "))
        .replace("{health_restrictions}", &prefs.health_restrictions.join(", "))
        .replace("{mood_tracking}", &prefs.mood_tracking.join(", "))
        .replace("{cuisine_preference}", cuisine)
        .replace("{situation}", &situation_line(request.context.as_ref()))
        .replace(
            "{format_instructions}",
            &format_instructions(&TOP_LEVEL_FIELDS, &RECOMMENDATION_FIELDS),
        )
}

fn situation_line(context: Option<&RequestContext>) -> String {
    let Some(context) = context else {
        return String::new();
    };
    let mut parts = Vec::new();
    if let Some(time_of_day) = &context.time_of_day {
        parts.push(format!("time of day is {time_of_day}"));
    }
    if let Some(weather) = &context.weather {
        parts.push(format!("weather is {weather}"));
    }
    if let Some(location) = &context.location {
        parts.push(format!("location is {location}"));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("Current Situation: {}\n", parts.join(", "))
    }
}

//=========================================================================================
// `RecommendationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecommendationService for OpenAiRecommendationAdapter {
    /// Builds the prompt, invokes the model, and parses its JSON reply.
    /// There are no retries: if the model deviates from the contract the
    /// parse fails and the error propagates.
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> PortResult<RecommendationResponse> {
        let prompt = build_prompt(request);

        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PortError::Provider(e.to_string()))?
            .into()];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .n(1)
            .build()
            .map_err(|e| PortError::Provider(e.to_string()))?;

        // Call the API and manually map the error, which respects the
        // orphan rule.
        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::Provider(e.to_string()))?;

        let payload = payload_from_completion(response)?;
        parse_json_payload(&payload)
    }
}
