use super::process_roast::{db_err, RoastPipeline, WebsiteSubmission};
use crate::domain::{RoastInput, RoastSnapshot, Winner};
use crate::infrastructure::anthropic::AnthropicClient;
use crate::infrastructure::db::entities::{roast, RecordStatus};
use crate::infrastructure::db::{BattleRepository, RoastRepository};
use pasquda_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

const BOTH_BROKEN_MESSAGE: &str =
    "One or both websites were too broken to roast. That's saying something.";
const IMPLODED_MESSAGE: &str = "The battle imploded. Both websites survive... for now.";

/// Runs two roast pipelines concurrently, then produces a comparative
/// verdict. The battle row is created before this runs and is always moved
/// to a terminal state here.
pub struct BattlePipeline {
    roasts: RoastRepository,
    battles: BattleRepository,
    anthropic: Arc<AnthropicClient>,
    roast_pipeline: Arc<RoastPipeline>,
}

impl BattlePipeline {
    pub fn new(
        roasts: RoastRepository,
        battles: BattleRepository,
        anthropic: Arc<AnthropicClient>,
        roast_pipeline: Arc<RoastPipeline>,
    ) -> Self {
        Self {
            roasts,
            battles,
            anthropic,
            roast_pipeline,
        }
    }

    pub async fn run(&self, battle_id: Uuid, a: WebsiteSubmission, b: WebsiteSubmission) {
        if let Err(err) = self.process(battle_id, a, b).await {
            tracing::error!(%battle_id, error = %err, "battle pipeline failed");
            if let Err(mark_err) = self.battles.fail(battle_id, IMPLODED_MESSAGE).await {
                tracing::error!(%battle_id, error = %mark_err, "could not mark battle as failed");
            }
        }
    }

    async fn process(
        &self,
        battle_id: Uuid,
        a: WebsiteSubmission,
        b: WebsiteSubmission,
    ) -> Result<(), AppError> {
        // Fan out both roasts; run() absorbs per-roast failures, so the join
        // always completes and the roast rows are terminal afterwards.
        tokio::join!(
            self.roast_pipeline.run(
                a.id,
                RoastInput::Website {
                    url: a.url.clone(),
                    domain: a.domain.clone(),
                },
            ),
            self.roast_pipeline.run(
                b.id,
                RoastInput::Website {
                    url: b.url.clone(),
                    domain: b.domain.clone(),
                },
            ),
        );

        let roast_a = self.roasts.find_by_id(a.id).await.map_err(db_err)?;
        let roast_b = self.roasts.find_by_id(b.id).await.map_err(db_err)?;

        let (Some(roast_a), Some(roast_b)) = (roast_a, roast_b) else {
            self.battles
                .fail(battle_id, BOTH_BROKEN_MESSAGE)
                .await
                .map_err(db_err)?;
            return Ok(());
        };

        if roast_a.status != RecordStatus::Completed || roast_b.status != RecordStatus::Completed {
            self.battles
                .fail(battle_id, BOTH_BROKEN_MESSAGE)
                .await
                .map_err(db_err)?;
            return Ok(());
        }

        let verdict = self
            .anthropic
            .battle_verdict(&snapshot(&roast_a), &snapshot(&roast_b))
            .await;

        let winner_id = match verdict.winner {
            Winner::A => Some(a.id),
            Winner::B => Some(b.id),
            Winner::Tie => None,
        };

        self.battles
            .complete(battle_id, winner_id, &verdict.verdict)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

fn snapshot(model: &roast::Model) -> RoastSnapshot {
    RoastSnapshot {
        domain: model.domain.clone(),
        score: model.score,
        grade: model.grade.clone(),
        summary: model.summary.clone(),
    }
}
