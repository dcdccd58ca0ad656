use super::{cache_control, BattleResponse, CreatedResponse, RoastResponse};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pasquda_app::application::{db_err, WebsiteSubmission};
use pasquda_app::infrastructure::db::entities::RoastType;
use pasquda_app::infrastructure::db::NewRoast;
use pasquda_app::infrastructure::security::InputValidator;
use pasquda_app::AppContext;
use pasquda_errors::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
pub(crate) struct BattleRequest {
    url_a: String,
    url_b: String,
}

pub(crate) async fn create(
    State(context): State<AppContext>,
    Json(body): Json<BattleRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let url_a = InputValidator::validate_url(&body.url_a)
        .map_err(|e| AppError::InvalidInput(format!("Site A: {}", e.user_message())))?;
    let url_b = InputValidator::validate_url(&body.url_b)
        .map_err(|e| AppError::InvalidInput(format!("Site B: {}", e.user_message())))?;

    let domain_a = InputValidator::extract_domain(&url_a);
    let domain_b = InputValidator::extract_domain(&url_b);

    let id_a = context
        .roasts
        .create_pending(NewRoast {
            url: url_a.clone(),
            domain: domain_a.clone(),
            roast_type: RoastType::Website,
            challenge_from: None,
            content_text: None,
            content_file_url: None,
        })
        .await
        .map_err(db_err)?;
    let id_b = context
        .roasts
        .create_pending(NewRoast {
            url: url_b.clone(),
            domain: domain_b.clone(),
            roast_type: RoastType::Website,
            challenge_from: None,
            content_text: None,
            content_file_url: None,
        })
        .await
        .map_err(db_err)?;

    let battle_id = context.battles.create(id_a, id_b).await.map_err(db_err)?;

    let pipeline = context.battle_pipeline.clone();
    let side_a = WebsiteSubmission {
        id: id_a,
        url: url_a,
        domain: domain_a,
    };
    let side_b = WebsiteSubmission {
        id: id_b,
        url: url_b,
        domain: domain_b,
    };
    tokio::spawn(async move { pipeline.run(battle_id, side_a, side_b).await });

    Ok(Json(CreatedResponse { id: battle_id }))
}

#[derive(Serialize)]
pub(crate) struct BattleView {
    battle: BattleResponse,
    roast_a: Option<RoastResponse>,
    roast_b: Option<RoastResponse>,
}

pub(crate) async fn get_by_id(
    State(context): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let battle = context
        .battles
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or(AppError::NotFound)?;

    let roast_a = context
        .roasts
        .find_by_id(battle.roast_a)
        .await
        .map_err(db_err)?;
    let roast_b = context
        .roasts
        .find_by_id(battle.roast_b)
        .await
        .map_err(db_err)?;

    let cache = cache_control(&battle.status);
    let view = BattleView {
        battle: BattleResponse::from(battle),
        roast_a: roast_a.map(RoastResponse::from),
        roast_b: roast_b.map(RoastResponse::from),
    };

    Ok(([(header::CACHE_CONTROL, cache)], Json(view)).into_response())
}
