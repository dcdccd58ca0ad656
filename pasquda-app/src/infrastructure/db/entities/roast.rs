use super::enums::{RecordStatus, RoastType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roasts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub url: String,
    pub domain: String,
    pub screenshot_url: Option<String>,
    pub score: i32,
    pub grade: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub roast_bullets: Json,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    #[sea_orm(column_type = "Text")]
    pub backhanded_compliment: String,
    pub status: RecordStatus,
    pub created_at: Option<DateTimeUtc>,
    pub share_count: i32,
    pub challenge_from: Option<Uuid>,
    pub roast_type: RoastType,
    #[sea_orm(column_type = "Text", nullable)]
    pub content_text: Option<String>,
    pub content_file_url: Option<String>,
    pub email: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Bullets are stored as a JSON array; rows created before completion
    /// hold an empty array.
    pub fn bullets(&self) -> Vec<String> {
        serde_json::from_value(self.roast_bullets.clone()).unwrap_or_default()
    }
}
