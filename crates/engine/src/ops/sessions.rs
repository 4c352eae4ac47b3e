//! Refresh tokens.
//!
//! Tokens are opaque strings generated by the server. The engine only stores
//! them, rotates them and forgets them.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, refresh_tokens};

use super::{Engine, with_tx};

fn invalid_token() -> EngineError {
    EngineError::InvalidToken("invalid refresh token".to_string())
}

fn new_token_model(
    user_id: &str,
    token: &str,
    expires_at: DateTime<Utc>,
) -> refresh_tokens::ActiveModel {
    refresh_tokens::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4().to_string()),
        user_id: ActiveValue::Set(user_id.to_string()),
        token: ActiveValue::Set(token.to_string()),
        expires_at: ActiveValue::Set(expires_at),
        created_at: ActiveValue::Set(Utc::now()),
    }
}

impl Engine {
    pub async fn store_refresh_token(
        &self,
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            new_token_model(user_id, token, expires_at)
                .insert(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Swap `old` for `new` and return the owner of the token.
    ///
    /// Unknown tokens fail with `InvalidToken`. An expired token is deleted
    /// and then rejected.
    pub async fn rotate_refresh_token(
        &self,
        old: &str,
        new: &str,
        new_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ResultEngine<String> {
        let owner = with_tx!(self, |db_tx| {
            let stored = refresh_tokens::Entity::find()
                .filter(refresh_tokens::Column::Token.eq(old.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(invalid_token)?;
            refresh_tokens::Entity::delete_by_id(stored.id.clone())
                .exec(&db_tx)
                .await?;

            // Expired rows are deleted for good; the caller still gets an error.
            if stored.expires_at <= now {
                Ok::<_, EngineError>(None)
            } else {
                new_token_model(&stored.user_id, new, new_expires_at)
                    .insert(&db_tx)
                    .await?;
                Ok(Some(stored.user_id))
            }
        })?;
        owner.ok_or_else(invalid_token)
    }

    /// Forget a token. Unknown tokens are ignored.
    pub async fn revoke_refresh_token(&self, token: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            refresh_tokens::Entity::delete_many()
                .filter(refresh_tokens::Column::Token.eq(token.to_string()))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
