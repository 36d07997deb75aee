//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Failure surface: request validation problems come back as 400 with a
//! concrete message and never reach the model; provider and response-shape
//! failures are logged with their cause and collapse to one generic 500
//! body that never exposes the underlying error.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use moodbite_core::domain::{
    FitnessResponse, MealContext, PreferencesUpdate, Recommendation, RecommendationRequest,
    RecommendationResponse, SavedMeal, SelectedRecommendation, UserPreferences,
};
use moodbite_core::onboarding::{has_completed_onboarding, OnboardingError, OnboardingStep, StepAnswer};
use moodbite_core::ports::PortError;
use moodbite_core::session::SessionError;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::state::AppState;

/// The one message every generation failure collapses to.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate recommendations";

/// Minimum length of a fitness query, counted in characters.
const MIN_FITNESS_QUERY_CHARS: usize = 10;
const FITNESS_QUERY_TOO_SHORT: &str = "Please provide a more detailed description of your needs";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        recommend_handler,
        fitness_handler,
        get_preferences_handler,
        update_preferences_handler,
        reset_preferences_handler,
        onboarding_status_handler,
        onboarding_answer_handler,
        list_selections_handler,
        record_selection_handler,
        list_meals_handler,
        save_meal_handler,
        delete_meal_handler,
        session_status_handler,
        session_submit_handler,
        session_select_handler,
        session_save_handler,
        session_reset_handler,
    ),
    components(schemas(
        ErrorBody,
        FitnessQuery,
        SubmitMoodRequest,
        SelectRequest,
        RecordSelectionRequest,
        SaveMealRequest,
        OnboardingStatus,
        SessionStatus,
        RecommendationRequest,
        RecommendationResponse,
        FitnessResponse,
        UserPreferences,
        PreferencesUpdate,
        SelectedRecommendation,
        SavedMeal,
        StepAnswer,
    )),
    tags(
        (name = "MoodBite API", description = "Mood-driven food recommendation endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Payloads
//=========================================================================================

/// The error body used for every failure response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Deserialize, ToSchema)]
pub struct FitnessQuery {
    pub query: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitMoodRequest {
    pub mood: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SelectRequest {
    pub index: usize,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordSelectionRequest {
    pub mood: String,
    pub recommendation: Recommendation,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveMealRequest {
    pub name: String,
    pub mood: String,
    #[serde(default)]
    pub context: MealContext,
}

/// Where the onboarding flow currently stands, plus the derived completion
/// flag. The flag depends on the stored data only, so it can be true while
/// the flow itself still has steps left.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub step: Option<OnboardingStep>,
    pub step_index: Option<usize>,
    pub total_steps: usize,
    pub completed: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub mood_input: String,
    pub in_flight: bool,
    pub selected_index: Option<usize>,
    pub response: Option<RecommendationResponse>,
}

type HandlerError = (StatusCode, Json<ErrorBody>);
type HandlerResult<T> = Result<T, HandlerError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Logs the real cause server-side and returns the fixed generic failure.
fn generation_failure(what: &str, err: PortError) -> HandlerError {
    error!("Failed to process {what} request: {err}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE_MESSAGE)
}

fn store_failure(err: PortError) -> HandlerError {
    match err {
        PortError::InvalidInput(message) => api_error(StatusCode::BAD_REQUEST, message),
        PortError::NotFound(what) => api_error(StatusCode::NOT_FOUND, format!("{what} not found")),
        other => {
            error!("Store operation failed: {other}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save preferences")
        }
    }
}

fn onboarding_failure(err: OnboardingError) -> HandlerError {
    match err {
        OnboardingError::WrongStep { .. } | OnboardingError::Finished => {
            api_error(StatusCode::CONFLICT, err.to_string())
        }
        OnboardingError::InvalidInput(message) => api_error(StatusCode::BAD_REQUEST, message),
        OnboardingError::Store(cause) => {
            error!("Failed to persist onboarding answer: {cause}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save preferences")
        }
    }
}

fn session_failure(err: SessionError) -> HandlerError {
    match err {
        SessionError::AlreadyPending => api_error(StatusCode::CONFLICT, err.to_string()),
        SessionError::EmptyMood
        | SessionError::NoResponse
        | SessionError::IndexOutOfRange(_)
        | SessionError::NoSelection => api_error(StatusCode::BAD_REQUEST, err.to_string()),
        SessionError::Store(cause) => {
            error!("Failed to persist session state: {cause}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save selection")
        }
    }
}

//=========================================================================================
// Recommendation Endpoints
//=========================================================================================

/// Generate food recommendations for a mood plus a preferences snapshot.
#[utoipa::path(
    post,
    path = "/recommendations",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Recommendations generated", body = RecommendationResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 500, description = "Generation failed", body = ErrorBody)
    )
)]
pub async fn recommend_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendationRequest>,
) -> HandlerResult<Json<RecommendationResponse>> {
    if request.mood.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "mood must not be empty"));
    }

    match state.recommender.recommend(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => Err(generation_failure("recommendation", e)),
    }
}

/// Generate meal recommendations for a free-text fitness query.
#[utoipa::path(
    post,
    path = "/fitness",
    request_body = FitnessQuery,
    responses(
        (status = 200, description = "Recommendations generated", body = FitnessResponse),
        (status = 400, description = "Query too short", body = ErrorBody),
        (status = 500, description = "Generation failed", body = ErrorBody)
    )
)]
pub async fn fitness_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FitnessQuery>,
) -> HandlerResult<Json<FitnessResponse>> {
    if request.query.chars().count() < MIN_FITNESS_QUERY_CHARS {
        return Err(api_error(StatusCode::BAD_REQUEST, FITNESS_QUERY_TOO_SHORT));
    }

    match state.fitness.recommend(&request.query).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => Err(generation_failure("fitness recommendation", e)),
    }
}

//=========================================================================================
// Preference Endpoints
//=========================================================================================

/// Read the current preferences snapshot.
#[utoipa::path(
    get,
    path = "/preferences",
    responses((status = 200, description = "Current preferences", body = UserPreferences))
)]
pub async fn get_preferences_handler(
    State(state): State<Arc<AppState>>,
) -> Json<UserPreferences> {
    Json(state.store.read().await.preferences().clone())
}

/// Apply a partial preferences update; absent fields are preserved.
#[utoipa::path(
    patch,
    path = "/preferences",
    request_body = PreferencesUpdate,
    responses(
        (status = 200, description = "Updated preferences", body = UserPreferences),
        (status = 400, description = "Invalid update", body = ErrorBody)
    )
)]
pub async fn update_preferences_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<PreferencesUpdate>,
) -> HandlerResult<Json<UserPreferences>> {
    let mut store = state.store.write().await;
    store.update_preferences(update).await.map_err(store_failure)?;
    Ok(Json(store.preferences().clone()))
}

/// Reset all preferences to defaults and clear the selection history.
#[utoipa::path(
    post,
    path = "/preferences/reset",
    responses((status = 200, description = "Cleared preferences", body = UserPreferences))
)]
pub async fn reset_preferences_handler(
    State(state): State<Arc<AppState>>,
) -> HandlerResult<Json<UserPreferences>> {
    let mut store = state.store.write().await;
    store.reset().await.map_err(store_failure)?;
    Ok(Json(store.preferences().clone()))
}

//=========================================================================================
// Onboarding Endpoints
//=========================================================================================

/// Where the onboarding flow stands and whether the profile counts as
/// complete.
#[utoipa::path(
    get,
    path = "/onboarding",
    responses((status = 200, description = "Flow position", body = OnboardingStatus))
)]
pub async fn onboarding_status_handler(
    State(state): State<Arc<AppState>>,
) -> Json<OnboardingStatus> {
    let flow = state.onboarding.read().await;
    let store = state.store.read().await;
    let step = flow.current_step();
    Json(OnboardingStatus {
        step,
        step_index: step.map(OnboardingStep::index),
        total_steps: OnboardingStep::ORDER.len(),
        completed: has_completed_onboarding(store.preferences()),
    })
}

/// Answer the current onboarding step and advance the flow.
#[utoipa::path(
    post,
    path = "/onboarding/answer",
    request_body = StepAnswer,
    responses(
        (status = 200, description = "Answer accepted", body = OnboardingStatus),
        (status = 400, description = "Invalid answer", body = ErrorBody),
        (status = 409, description = "Answer is for a different step", body = ErrorBody)
    )
)]
pub async fn onboarding_answer_handler(
    State(state): State<Arc<AppState>>,
    Json(answer): Json<StepAnswer>,
) -> HandlerResult<Json<OnboardingStatus>> {
    let mut flow = state.onboarding.write().await;
    let mut store = state.store.write().await;
    flow.answer(answer, &mut store)
        .await
        .map_err(onboarding_failure)?;

    let step = flow.current_step();
    Ok(Json(OnboardingStatus {
        step,
        step_index: step.map(OnboardingStep::index),
        total_steps: OnboardingStep::ORDER.len(),
        completed: has_completed_onboarding(store.preferences()),
    }))
}

//=========================================================================================
// Selection History and Saved Meals
//=========================================================================================

/// The persisted selection history, oldest first.
#[utoipa::path(
    get,
    path = "/selections",
    responses((status = 200, description = "Selection history", body = [SelectedRecommendation]))
)]
pub async fn list_selections_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<SelectedRecommendation>> {
    Json(state.store.read().await.selection_history().to_vec())
}

/// Append a chosen recommendation to the selection history.
#[utoipa::path(
    post,
    path = "/selections",
    request_body = RecordSelectionRequest,
    responses(
        (status = 201, description = "Selection recorded", body = SelectedRecommendation),
        (status = 500, description = "Persistence failed", body = ErrorBody)
    )
)]
pub async fn record_selection_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecordSelectionRequest>,
) -> HandlerResult<(StatusCode, Json<SelectedRecommendation>)> {
    let mut store = state.store.write().await;
    let entry = store
        .add_selected_recommendation(&request.mood, request.recommendation)
        .await
        .map_err(store_failure)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// The saved meals list.
#[utoipa::path(
    get,
    path = "/meals",
    responses((status = 200, description = "Saved meals", body = [SavedMeal]))
)]
pub async fn list_meals_handler(State(state): State<Arc<AppState>>) -> Json<Vec<SavedMeal>> {
    Json(state.store.read().await.saved_meals().to_vec())
}

/// Save a meal for later.
#[utoipa::path(
    post,
    path = "/meals",
    request_body = SaveMealRequest,
    responses(
        (status = 201, description = "Meal saved", body = SavedMeal),
        (status = 500, description = "Persistence failed", body = ErrorBody)
    )
)]
pub async fn save_meal_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveMealRequest>,
) -> HandlerResult<(StatusCode, Json<SavedMeal>)> {
    let mut store = state.store.write().await;
    let meal = store
        .add_saved_meal(&request.name, &request.mood, request.context)
        .await
        .map_err(store_failure)?;
    Ok((StatusCode::CREATED, Json(meal)))
}

/// Remove a saved meal.
#[utoipa::path(
    delete,
    path = "/meals/{id}",
    params(("id" = Uuid, Path, description = "The saved meal to remove.")),
    responses(
        (status = 204, description = "Meal removed"),
        (status = 404, description = "No such meal", body = ErrorBody)
    )
)]
pub async fn delete_meal_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> HandlerResult<StatusCode> {
    let mut store = state.store.write().await;
    store.remove_saved_meal(id).await.map_err(store_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Session Endpoints
//=========================================================================================

/// The result screen's current state.
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Session state", body = SessionStatus))
)]
pub async fn session_status_handler(State(state): State<Arc<AppState>>) -> Json<SessionStatus> {
    let session = state.session.read().await;
    Json(SessionStatus {
        mood_input: session.mood_input().to_string(),
        in_flight: session.is_in_flight(),
        selected_index: session.selected_index(),
        response: session.current_response().cloned(),
    })
}

/// Submit the mood input and fetch recommendations for it.
///
/// While a submission is pending the gate returns 409; the earlier request
/// is never cancelled.
#[utoipa::path(
    post,
    path = "/session/submit",
    request_body = SubmitMoodRequest,
    responses(
        (status = 200, description = "Recommendations generated", body = RecommendationResponse),
        (status = 400, description = "Empty mood", body = ErrorBody),
        (status = 409, description = "A submission is already pending", body = ErrorBody),
        (status = 500, description = "Generation failed", body = ErrorBody)
    )
)]
pub async fn session_submit_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitMoodRequest>,
) -> HandlerResult<Json<RecommendationResponse>> {
    {
        let mut session = state.session.write().await;
        session.begin_submission(&request.mood).map_err(session_failure)?;
    }

    // Locks are dropped while the provider call is in flight so status
    // reads stay responsive.
    let model_request = {
        let session = state.session.read().await;
        let store = state.store.read().await;
        RecommendationRequest {
            mood: session.mood_input().to_string(),
            preferences: store.preferences().clone(),
            context: None,
        }
    };

    match state.recommender.recommend(&model_request).await {
        Ok(response) => {
            state
                .session
                .write()
                .await
                .complete_submission(response.clone());
            Ok(Json(response))
        }
        Err(e) => {
            state.session.write().await.fail_submission();
            Err(generation_failure("session recommendation", e))
        }
    }
}

/// Mark one recommendation of the current result set as selected.
#[utoipa::path(
    post,
    path = "/session/select",
    request_body = SelectRequest,
    responses(
        (status = 200, description = "Selection updated", body = SessionStatus),
        (status = 400, description = "No response or index out of range", body = ErrorBody)
    )
)]
pub async fn session_select_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> HandlerResult<Json<SessionStatus>> {
    let mut session = state.session.write().await;
    session.select(request.index).map_err(session_failure)?;
    Ok(Json(SessionStatus {
        mood_input: session.mood_input().to_string(),
        in_flight: session.is_in_flight(),
        selected_index: session.selected_index(),
        response: session.current_response().cloned(),
    }))
}

/// Persist the current selection into the selection history.
#[utoipa::path(
    post,
    path = "/session/save",
    responses(
        (status = 201, description = "Selection saved", body = SelectedRecommendation),
        (status = 400, description = "Nothing selected", body = ErrorBody)
    )
)]
pub async fn session_save_handler(
    State(state): State<Arc<AppState>>,
) -> HandlerResult<(StatusCode, Json<SelectedRecommendation>)> {
    let mut session = state.session.write().await;
    let mut store = state.store.write().await;
    let entry = session.save(&mut store).await.map_err(session_failure)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Clear the session and reset the whole store.
#[utoipa::path(
    post,
    path = "/session/reset",
    responses((status = 200, description = "Session and store cleared", body = SessionStatus))
)]
pub async fn session_reset_handler(
    State(state): State<Arc<AppState>>,
) -> HandlerResult<Json<SessionStatus>> {
    let mut session = state.session.write().await;
    let mut store = state.store.write().await;
    session.reset(&mut store).await.map_err(session_failure)?;
    Ok(Json(SessionStatus {
        mood_input: String::new(),
        in_flight: false,
        selected_index: None,
        response: None,
    }))
}
