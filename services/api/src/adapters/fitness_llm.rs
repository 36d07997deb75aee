//! services/api/src/adapters/fitness_llm.rs
//!
//! This module contains the adapter for the fitness-query LLM. It implements
//! the `FitnessService` port from the `core` crate. Unlike the single-shot
//! recommendation prompt, this variant uses a system + user message pair.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a fitness and nutrition expert AI assistant. Generate detailed food recommendations based on the user's fitness and dietary needs.

You must respond with a JSON object that exactly matches this structure:
{
  "analysis": {
    "fitnessGoals": ["list of identified fitness goals"],
    "nutritionalNeeds": {
      "protein": "protein requirements",
      "carbs": "carb requirements",
      "fats": "fat requirements",
      "calories": "calorie requirements"
    },
    "dietaryContext": {
      "mealType": "breakfast/lunch/dinner/snack",
      "timing": "pre/post workout, morning, evening, etc",
      "restrictions": ["any dietary restrictions identified"]
    }
  },
  "recommendations": [
    {
      "name": "meal name",
      "description": "detailed description",
      "macros": {
        "protein": "protein content",
        "carbs": "carb content",
        "fats": "fat content",
        "calories": "calorie content"
      },
      "ingredients": ["list of ingredients"],
      "preparation": "brief preparation instructions",
      "mealTiming": "when to consume",
      "fitnessBenefits": ["specific fitness benefits"]
    }
  ],
  "explanation": "explanation of recommendations and how they meet the user's needs"
}

{format_instructions}

Important:
- Provide EXACTLY 2-3 recommendations
- Focus on practical, achievable meals
- Include specific portion sizes and macros
- Consider meal timing in relation to workouts
- Ensure all responses are in valid JSON format
- Do not include any additional text outside the JSON structure"#;

const USER_INPUT_TEMPLATE: &str = "User Query: {query}";

const TOP_LEVEL_FIELDS: [&str; 3] = ["analysis", "recommendations", "explanation"];
const RECOMMENDATION_FIELDS: [&str; 7] = [
    "name",
    "description",
    "macros",
    "ingredients",
    "preparation",
    "mealTiming",
    "fitnessBenefits",
];

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use moodbite_core::domain::FitnessResponse;
use moodbite_core::ports::{FitnessService, PortError, PortResult};

use super::completions::{format_instructions, parse_json_payload, payload_from_completion};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `FitnessService` using an OpenAI-compatible
/// LLM.
#[derive(Clone)]
pub struct OpenAiFitnessAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAiFitnessAdapter {
    /// Creates a new `OpenAiFitnessAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, temperature: f32) -> Self {
        Self {
            client,
            model,
            temperature,
        }
    }
}

fn system_instructions() -> String {
    SYSTEM_INSTRUCTIONS.replace(
        "{format_instructions}",
        &format_instructions(&TOP_LEVEL_FIELDS, &RECOMMENDATION_FIELDS),
    )
}

//=========================================================================================
// `FitnessService` Trait Implementation
//=========================================================================================

#[async_trait]
impl FitnessService for OpenAiFitnessAdapter {
    async fn recommend(&self, query: &str) -> PortResult<FitnessResponse> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_instructions())
                .build()
                .map_err(|e| PortError::Provider(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(USER_INPUT_TEMPLATE.replace("{query}", query))
                .build()
                .map_err(|e| PortError::Provider(e.to_string()))?
                .into(),
        ];

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
