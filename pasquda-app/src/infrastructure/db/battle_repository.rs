use super::entities::{battle, Battle, RecordStatus};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct BattleRepository {
    db: DatabaseConnection,
}

impl BattleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a `processing` battle referencing two freshly-created roasts
    /// and returns the generated id.
    pub async fn create(&self, roast_a: Uuid, roast_b: Uuid) -> Result<Uuid, DbErr> {
        let id = Uuid::new_v4();
        let active = battle::ActiveModel {
            id: Set(id),
            roast_a: Set(roast_a),
            roast_b: Set(roast_b),
            winner_id: Set(None),
            verdict: Set(String::new()),
            status: Set(RecordStatus::Processing),
            created_at: Set(Some(chrono::Utc::now())),
        };
        active.insert(&self.db).await?;
        Ok(id)
    }

    /// `winner_id` is one of the two roast ids, or None for a tie. Guarded
    /// so terminal battles stay terminal.
    pub async fn complete(
        &self,
        id: Uuid,
        winner_id: Option<Uuid>,
        verdict: &str,
    ) -> Result<(), DbErr> {
        let update = battle::ActiveModel {
            winner_id: Set(winner_id),
            verdict: Set(verdict.to_string()),
            status: Set(RecordStatus::Completed),
            ..Default::default()
        };

        guarded_update(id, update).exec(&self.db).await?;
        Ok(())
    }

    pub async fn fail(&self, id: Uuid, message: &str) -> Result<(), DbErr> {
        let update = battle::ActiveModel {
            verdict: Set(message.to_string()),
            status: Set(RecordStatus::Failed),
            ..Default::default()
        };

        guarded_update(id, update).exec(&self.db).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<battle::Model>, DbErr> {
        Battle::find_by_id(id).one(&self.db).await
    }
}

/// Update restricted to rows still `processing`, mirroring the roast
/// repository guard: a settled battle can never change its outcome.
fn guarded_update(id: Uuid, update: battle::ActiveModel) -> UpdateMany<Battle> {
    Battle::update_many()
        .set(update)
        .filter(battle::Column::Id.eq(id))
        .filter(battle::Column::Status.eq(RecordStatus::Processing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    #[test]
    fn settled_battles_are_never_rewritten() {
        let update = battle::ActiveModel {
            winner_id: Set(Some(Uuid::nil())),
            verdict: Set("a.com takes it".to_string()),
            status: Set(RecordStatus::Completed),
            ..Default::default()
        };
        let sql = guarded_update(Uuid::nil(), update)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""status" = 'processing'"#), "{sql}");
    }
}
