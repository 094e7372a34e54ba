//! Best-stories endpoint

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use newsrank_core::RankedStory;

use super::errors::ApiError;
use super::AppState;

/// Query parameters for the best-stories endpoint
#[derive(Debug, Deserialize)]
pub struct BestStoriesParams {
    /// How many stories to return
    #[serde(default = "default_n")]
    pub n: usize,
}

fn default_n() -> usize {
    10
}

/// Handle `GET /api/v1/stories/best?n={count}`
pub async fn get_best_stories(
    State(state): State<AppState>,
    Query(params): Query<BestStoriesParams>,
) -> Result<Json<Vec<RankedStory>>, ApiError> {
    if params.n < 1 {
        return Err(ApiError::BadRequest(
            "n must be greater than 0.".to_string(),
        ));
    }
    if params.n > state.max_items {
        return Err(ApiError::BadRequest(format!(
            "n must be less than or equal to {}.",
            state.max_items
        )));
    }

    debug!(n = params.n, "serving best stories");
    let stories = state.stories.get_best_stories(params.n).await;
    Ok(Json(stories))
}
