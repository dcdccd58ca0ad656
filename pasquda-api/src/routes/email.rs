use super::{invalid, RoastResponse};
use axum::extract::{Query, State};
use axum::Json;
use pasquda_app::application::db_err;
use pasquda_app::infrastructure::security::InputValidator;
use pasquda_app::AppContext;
use pasquda_errors::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_HISTORY_LIMIT: u64 = 20;

#[derive(Deserialize)]
pub(crate) struct CaptureRequest {
    email: String,
    #[serde(default)]
    roast_id: Option<Uuid>,
}

#[derive(Serialize)]
pub(crate) struct CaptureResponse {
    success: bool,
    token: String,
}

/// Addresses are normalized to lowercase before storage so the same
/// mailbox always maps to one token.
pub(crate) async fn capture(
    State(context): State<AppContext>,
    Json(body): Json<CaptureRequest>,
) -> Result<Json<CaptureResponse>, AppError> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(invalid("Email is required."));
    }
    if !InputValidator::is_valid_email(&email) {
        return Err(invalid("That doesn't look like an email address."));
    }

    let token = context.emails.upsert(&email).await.map_err(db_err)?;

    if let Some(roast_id) = body.roast_id {
        context
            .roasts
            .set_email(roast_id, &email)
            .await
            .map_err(db_err)?;
    }

    Ok(Json(CaptureResponse {
        success: true,
        token,
    }))
}

#[derive(Deserialize)]
pub(crate) struct HistoryParams {
    email: Option<String>,
    token: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

#[derive(Serialize)]
pub(crate) struct HistoryResponse {
    roasts: Vec<RoastResponse>,
}

pub(crate) async fn history(
    State(context): State<AppContext>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, AppError> {
    let (Some(email), Some(token)) = (params.email, params.token) else {
        return Err(invalid("Email and token are required."));
    };

    let email = email.trim().to_lowercase();
    if !context
        .emails
        .verify(&email, &token)
        .await
        .map_err(db_err)?
    {
        return Err(AppError::Unauthorized);
    }

    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let roasts = context
        .roasts
        .history_for_email(&email, limit, offset)
        .await
        .map_err(db_err)?;

    Ok(Json(HistoryResponse {
        roasts: roasts.into_iter().map(RoastResponse::from).collect(),
    }))
}
