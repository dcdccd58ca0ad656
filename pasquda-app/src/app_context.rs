use crate::application::{BattlePipeline, RoastPipeline};
use crate::infrastructure::anthropic::AnthropicClient;
use crate::infrastructure::db::{
    self, BattleRepository, EmailRepository, RoastRepository,
};
use crate::infrastructure::report_card::ReportCardRenderer;
use crate::infrastructure::screenshot::ScreenshotClient;
use crate::infrastructure::security::RateLimiter;
use crate::infrastructure::storage::StorageClient;
use sea_orm::DbErr;
use std::sync::Arc;

/// Everything the route handlers share. Cheap to clone; the server is
/// stateless between requests apart from the rate limiter.
#[derive(Clone)]
pub struct AppContext {
    pub roasts: RoastRepository,
    pub battles: BattleRepository,
    pub emails: EmailRepository,
    pub storage: Arc<StorageClient>,
    pub rate_limiter: RateLimiter,
    pub roast_pipeline: Arc<RoastPipeline>,
    pub battle_pipeline: Arc<BattlePipeline>,
    pub report_cards: Arc<ReportCardRenderer>,
}

impl AppContext {
    /// Builds the full context from the environment. Called once at
    /// startup; missing configuration is fatal.
    pub async fn from_env() -> Result<Self, DbErr> {
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let supabase_url =
            std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set");
        let supabase_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .expect("SUPABASE_SERVICE_ROLE_KEY must be set");
        let screenshot_key = std::env::var("SCREENSHOTONE_ACCESS_KEY")
            .expect("SCREENSHOTONE_ACCESS_KEY must be set");
        let anthropic_key =
            std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY must be set");

        let connection = db::create_connection(&database_url).await?;
        db::run_migrations(&connection).await?;

        let roasts = RoastRepository::new(connection.clone());
        let battles = BattleRepository::new(connection.clone());
        let emails = EmailRepository::new(connection);

        let storage = Arc::new(StorageClient::new(supabase_url, supabase_key));
        let anthropic = Arc::new(AnthropicClient::new(anthropic_key));

        let roast_pipeline = Arc::new(RoastPipeline::new(
            roasts.clone(),
            ScreenshotClient::new(screenshot_key),
            storage.clone(),
            anthropic.clone(),
        ));
        let battle_pipeline = Arc::new(BattlePipeline::new(
            roasts.clone(),
            battles.clone(),
            anthropic,
            roast_pipeline.clone(),
        ));

        Ok(Self {
            roasts,
            battles,
            emails,
            storage,
            rate_limiter: RateLimiter::new(),
            roast_pipeline,
            battle_pipeline,
            report_cards: Arc::new(ReportCardRenderer::new()),
        })
    }
}
