use super::CARD_CACHE;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use pasquda_app::application::db_err;
use pasquda_app::domain::Winner;
use pasquda_app::infrastructure::db::entities::RecordStatus;
use pasquda_app::infrastructure::report_card::{BattleCard, BattleSide, RoastCard};
use pasquda_app::AppContext;
use pasquda_errors::AppError;
use uuid::Uuid;

/// Compact card for link previews: headline stats only.
pub(crate) async fn og_card(
    State(context): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    render_roast_card(context, id, false).await
}

/// Full report card with the roast bullets.
pub(crate) async fn full_card(
    State(context): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    render_roast_card(context, id, true).await
}

async fn render_roast_card(
    context: AppContext,
    id: Uuid,
    with_bullets: bool,
) -> Result<Response, AppError> {
    let roast = context
        .roasts
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or(AppError::NotFound)?;

    // Only completed roasts have anything to render.
    if roast.status != RecordStatus::Completed {
        return Err(AppError::NotFound);
    }

    let bullets = if with_bullets {
        roast.bullets()
    } else {
        Vec::new()
    };
    let card = RoastCard {
        domain: roast.domain,
        score: roast.score,
        grade: roast.grade,
        summary: roast.summary,
        bullets,
    };

    let renderer = context.report_cards.clone();
    let png = tokio::task::spawn_blocking(move || renderer.render_roast(&card))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(png_response(png))
}

pub(crate) async fn battle_card(
    State(context): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let battle = context
        .battles
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or(AppError::NotFound)?;

    if battle.status != RecordStatus::Completed {
        return Err(AppError::NotFound);
    }

    let roast_a = context
        .roasts
        .find_by_id(battle.roast_a)
        .await
        .map_err(db_err)?
        .ok_or(AppError::NotFound)?;
    let roast_b = context
        .roasts
        .find_by_id(battle.roast_b)
        .await
        .map_err(db_err)?
        .ok_or(AppError::NotFound)?;

    let winner = match battle.winner_id {
        Some(winner_id) if winner_id == roast_a.id => Winner::A,
        Some(_) => Winner::B,
        None => Winner::Tie,
    };

    let card = BattleCard {
        side_a: BattleSide {
            domain: roast_a.domain,
            score: roast_a.score,
            grade: roast_a.grade,
        },
        side_b: BattleSide {
            domain: roast_b.domain,
            score: roast_b.score,
            grade: roast_b.grade,
        },
        verdict: battle.verdict,
        winner,
    };

    let renderer = context.report_cards.clone();
    let png = tokio::task::spawn_blocking(move || renderer.render_battle(&card))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(png_response(png))
}

fn png_response(png: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, CARD_CACHE),
        ],
        png,
    )
        .into_response()
}
