use super::entities::{email, Email};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

const TOKEN_LEN: usize = 48;

#[derive(Clone)]
pub struct EmailRepository {
    db: DatabaseConnection,
}

impl EmailRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the bearer token for `email`, minting one on first sight.
    /// One token per address; re-capturing an email returns the same token.
    pub async fn upsert(&self, email: &str) -> Result<String, DbErr> {
        if let Some(existing) = self.find_by_email(email).await? {
            return Ok(existing.token);
        }

        let token = generate_token();
        let active = email::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            token: Set(token.clone()),
            created_at: Set(Some(chrono::Utc::now())),
        };
        active.insert(&self.db).await?;
        Ok(token)
    }

    /// Bare token-equality check; no sessions, no expiry.
    pub async fn verify(&self, email: &str, token: &str) -> Result<bool, DbErr> {
        Ok(self
            .find_by_email(email)
            .await?
            .map(|record| record.token == token)
            .unwrap_or(false))
    }

    async fn find_by_email(&self, address: &str) -> Result<Option<email::Model>, DbErr> {
        Email::find()
            .filter(email::Column::Email.eq(address))
            .one(&self.db)
            .await
    }
}

fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_opaque_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
