use super::entities::{roast, Counter, RecordStatus, Roast, RoastType};
use crate::domain::RoastPayload;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, Statement};
use uuid::Uuid;

const TOTAL_ROASTS_KEY: &str = "total_roasts";
/// Completed screenshots younger than this are reused instead of recaptured.
const SCREENSHOT_CACHE_MINUTES: i64 = 60;
/// Hard cap on history page size regardless of the requested limit.
pub const MAX_HISTORY_PAGE: u64 = 50;

/// Fields supplied at creation time; everything else starts zeroed.
pub struct NewRoast {
    pub url: String,
    pub domain: String,
    pub roast_type: RoastType,
    pub challenge_from: Option<Uuid>,
    pub content_text: Option<String>,
    pub content_file_url: Option<String>,
}

#[derive(Clone)]
pub struct RoastRepository {
    db: DatabaseConnection,
}

impl RoastRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a `processing` row with placeholder output fields and returns
    /// the generated id so the caller can respond before background work.
    pub async fn create_pending(&self, data: NewRoast) -> Result<Uuid, DbErr> {
        let id = Uuid::new_v4();
        let active = roast::ActiveModel {
            id: Set(id),
            url: Set(data.url),
            domain: Set(data.domain),
            screenshot_url: Set(None),
            score: Set(0),
            grade: Set("-".to_string()),
            roast_bullets: Set(serde_json::json!([])),
            summary: Set(String::new()),
            backhanded_compliment: Set(String::new()),
            status: Set(RecordStatus::Processing),
            created_at: Set(Some(chrono::Utc::now())),
            share_count: Set(0),
            challenge_from: Set(data.challenge_from),
            roast_type: Set(data.roast_type),
            content_text: Set(data.content_text),
            content_file_url: Set(data.content_file_url),
            email: Set(None),
        };
        active.insert(&self.db).await?;
        Ok(id)
    }

    /// Writes the generated output and flips the row to `completed`. The
    /// status filter keeps terminal rows immutable, so a late or duplicate
    /// completion is a no-op instead of an overwrite.
    pub async fn complete(
        &self,
        id: Uuid,
        payload: &RoastPayload,
        screenshot_url: Option<String>,
    ) -> Result<(), DbErr> {
        let update = roast::ActiveModel {
            screenshot_url: Set(screenshot_url),
            score: Set(payload.score),
            grade: Set(payload.grade.to_string()),
            roast_bullets: Set(serde_json::json!(payload.roast_bullets)),
            summary: Set(payload.summary.clone()),
            backhanded_compliment: Set(payload.backhanded_compliment.clone()),
            status: Set(RecordStatus::Completed),
            ..Default::default()
        };

        let result = guarded_update(id, update).exec(&self.db).await?;

        if result.rows_affected == 1 {
            self.increment_total().await?;
        } else {
            tracing::warn!(%id, "completion skipped: roast is already terminal");
        }
        Ok(())
    }

    /// Marks the row failed with a user-facing message in `summary`.
    pub async fn fail(&self, id: Uuid, message: &str) -> Result<(), DbErr> {
        let update = roast::ActiveModel {
            summary: Set(message.to_string()),
            status: Set(RecordStatus::Failed),
            ..Default::default()
        };

        guarded_update(id, update).exec(&self.db).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<roast::Model>, DbErr> {
        Roast::find_by_id(id).one(&self.db).await
    }

    /// Most recent completed screenshot for `domain` within the cache
    /// window, if any.
    pub async fn find_recent_screenshot(&self, domain: &str) -> Result<Option<String>, DbErr> {
        let cutoff = chrono::Utc::now() - chrono::Duration::minutes(SCREENSHOT_CACHE_MINUTES);

        let row = Roast::find()
            .filter(roast::Column::Domain.eq(domain))
            .filter(roast::Column::Status.eq(RecordStatus::Completed))
            .filter(roast::Column::ScreenshotUrl.is_not_null())
            .filter(roast::Column::CreatedAt.gte(cutoff))
            .order_by_desc(roast::Column::CreatedAt)
            .one(&self.db)
            .await?;

        Ok(row.and_then(|r| r.screenshot_url))
    }

    /// Completed roasts for an email, newest first, capped at
    /// [`MAX_HISTORY_PAGE`] per page.
    pub async fn history_for_email(
        &self,
        email: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<roast::Model>, DbErr> {
        Roast::find()
            .filter(roast::Column::Email.eq(email))
            .filter(roast::Column::Status.eq(RecordStatus::Completed))
            .order_by_desc(roast::Column::CreatedAt)
            .limit(limit.min(MAX_HISTORY_PAGE))
            .offset(offset)
            .all(&self.db)
            .await
    }

    pub async fn set_email(&self, id: Uuid, email: &str) -> Result<(), DbErr> {
        let update = roast::ActiveModel {
            email: Set(Some(email.to_string())),
            ..Default::default()
        };
        Roast::update_many()
            .set(update)
            .filter(roast::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Returns the new count, or `None` when the roast does not exist.
    pub async fn increment_share_count(&self, id: Uuid) -> Result<Option<i32>, DbErr> {
        let Some(row) = Roast::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let new_count = row.share_count + 1;
        let mut active: roast::ActiveModel = row.into();
        active.share_count = Set(new_count);
        active.update(&self.db).await?;

        Ok(Some(new_count))
    }

    pub async fn recent_completed(&self, limit: u64) -> Result<Vec<roast::Model>, DbErr> {
        Roast::find()
            .filter(roast::Column::Status.eq(RecordStatus::Completed))
            .order_by_desc(roast::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }

    pub async fn total_roasts(&self) -> Result<i64, DbErr> {
        let row = Counter::find_by_id(TOTAL_ROASTS_KEY.to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(|c| c.value).unwrap_or(0))
    }

    async fn increment_total(&self) -> Result<(), DbErr> {
        self.db
            .execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "INSERT INTO counters (key, value) VALUES ($1, 1) \
                 ON CONFLICT (key) DO UPDATE SET value = counters.value + 1",
                [TOTAL_ROASTS_KEY.into()],
            ))
            .await?;
        Ok(())
    }
}

/// Update restricted to rows still `processing`. Terminal rows never match,
/// so completed and failed states are immutable.
fn guarded_update(id: Uuid, update: roast::ActiveModel) -> UpdateMany<Roast> {
    Roast::update_many()
        .set(update)
        .filter(roast::Column::Id.eq(id))
        .filter(roast::Column::Status.eq(RecordStatus::Processing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    #[test]
    fn terminal_updates_only_match_processing_rows() {
        let update = roast::ActiveModel {
            status: Set(RecordStatus::Completed),
            ..Default::default()
        };
        let sql = guarded_update(Uuid::nil(), update)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""status" = 'processing'"#), "{sql}");
        assert!(sql.contains("'completed'"), "{sql}");
    }

    #[test]
    fn failure_updates_carry_the_same_guard() {
        let update = roast::ActiveModel {
            summary: Set("it broke".to_string()),
            status: Set(RecordStatus::Failed),
            ..Default::default()
        };
        let sql = guarded_update(Uuid::nil(), update)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""status" = 'processing'"#), "{sql}");
    }
}
