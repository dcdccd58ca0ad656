mod battle;
mod email;
mod report_card;
mod roast;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use pasquda_app::infrastructure::db::entities::{battle as battle_entity, roast as roast_entity};
use pasquda_app::infrastructure::db::entities::{RecordStatus, RoastType};
use pasquda_app::AppContext;
use pasquda_errors::AppError;
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use uuid::Uuid;

/// Large enough for a 4MB base64 screenshot in a JSON body or a 5MB PDF
/// in a multipart body, plus framing overhead.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

const COMPLETED_CACHE: &str = "public, s-maxage=3600, stale-while-revalidate=86400";
const NO_CACHE: &str = "no-cache";
pub(crate) const CARD_CACHE: &str = "public, s-maxage=86400, stale-while-revalidate=604800";

pub fn router(context: AppContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/roast", post(roast::create))
        .route("/roast/linkedin", post(roast::create_linkedin))
        .route("/roast/resume", post(roast::create_resume))
        .route("/roast/{id}", get(roast::get_by_id))
        .route("/roast/{id}/share", post(roast::share))
        .route("/roasts/recent", get(roast::recent))
        .route("/battle", post(battle::create))
        .route("/battle/{id}", get(battle::get_by_id))
        .route("/battle/report-card/{id}", get(report_card::battle_card))
        .route("/email/capture", post(email::capture))
        .route("/history", get(email::history))
        .route("/og/{id}", get(report_card::og_card))
        .route("/report-card/{id}", get(report_card::full_card))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .with_state(context)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Only completed records are safe to cache at the edge. Processing records
/// are re-polled, and failed ones must not linger while the user retries.
pub(crate) fn cache_control(status: &RecordStatus) -> &'static str {
    match status {
        RecordStatus::Completed => COMPLETED_CACHE,
        RecordStatus::Processing | RecordStatus::Failed => NO_CACHE,
    }
}

pub(crate) fn invalid(message: &str) -> AppError {
    AppError::InvalidInput(message.to_string())
}

#[derive(Serialize)]
pub(crate) struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Serialize)]
pub(crate) struct RoastResponse {
    pub id: Uuid,
    pub url: String,
    pub domain: String,
    pub screenshot_url: Option<String>,
    pub score: i32,
    pub grade: String,
    pub roast_bullets: Vec<String>,
    pub summary: String,
    pub backhanded_compliment: String,
    pub status: RecordStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub share_count: i32,
    pub challenge_from: Option<Uuid>,
    pub roast_type: RoastType,
    pub content_file_url: Option<String>,
}

impl From<roast_entity::Model> for RoastResponse {
    fn from(model: roast_entity::Model) -> Self {
        let roast_bullets = model.bullets();
        Self {
            id: model.id,
            url: model.url,
            domain: model.domain,
            screenshot_url: model.screenshot_url,
            score: model.score,
            grade: model.grade,
            roast_bullets,
            summary: model.summary,
            backhanded_compliment: model.backhanded_compliment,
            status: model.status,
            created_at: model.created_at,
            share_count: model.share_count,
            challenge_from: model.challenge_from,
            roast_type: model.roast_type,
            content_file_url: model.content_file_url,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct BattleResponse {
    pub id: Uuid,
    pub roast_a: Uuid,
    pub roast_b: Uuid,
    pub winner_id: Option<Uuid>,
    pub verdict: String,
    pub status: RecordStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<battle_entity::Model> for BattleResponse {
    fn from(model: battle_entity::Model) -> Self {
        Self {
            id: model.id,
            roast_a: model.roast_a,
            roast_b: model.roast_b,
            winner_id: model.winner_id,
            verdict: model.verdict,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_records_get_the_public_cache_header() {
        assert_eq!(cache_control(&RecordStatus::Completed), COMPLETED_CACHE);
        assert_eq!(cache_control(&RecordStatus::Processing), NO_CACHE);
        assert_eq!(cache_control(&RecordStatus::Failed), NO_CACHE);
    }
}
