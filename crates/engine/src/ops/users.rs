use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, SqlErr, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewUser, Preferences, ProfileUpdate, ResultEngine, Theme, User,
    users,
    util::{normalize_email, normalize_optional_text, normalize_required},
};

use super::{Engine, with_tx};

/// A racing registration passes the lookup and trips the unique index on
/// `users.email` instead.
fn email_conflict(err: DbErr) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::ExistingKey("email".to_string()),
        _ => EngineError::Database(err),
    }
}

impl Engine {
    /// Register a new account. Emails are unique, case-insensitively.
    pub async fn new_user(&self, new_user: &NewUser) -> ResultEngine<User> {
        let email = normalize_email(&new_user.email)?;
        let password_hash = normalize_required(&new_user.password_hash, "password")?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name: normalize_optional_text(new_user.name.as_deref()),
            avatar: None,
            preferences: Preferences {
                default_currency: self.rates.reference().clone(),
                theme: Theme::default(),
            },
            created_at: now,
            updated_at: now,
        };
        let model: users::ActiveModel = (&user).into();

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Email.eq(user.email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey("email".to_string()));
            }
            model.insert(&db_tx).await.map_err(email_conflict)?;
            Ok(user)
        })
    }

    pub async fn user(&self, user_id: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            User::try_from(model)
        })
    }

    /// Look an account up by email, `None` when there is none.
    pub async fn user_by_email(&self, email: &str) -> ResultEngine<Option<User>> {
        let email = email.trim().to_lowercase();
        with_tx!(self, |db_tx| {
            users::Entity::find()
                .filter(users::Column::Email.eq(email))
                .one(&db_tx)
                .await?
                .map(User::try_from)
                .transpose()
        })
    }

    /// Update name, avatar and preferences. Empty name/avatar clear the field.
    pub async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> ResultEngine<User> {
        let default_currency = update
            .default_currency
            .as_deref()
            .map(|code| self.rates.known(code))
            .transpose()?;
        let theme = update.theme.as_deref().map(Theme::try_from).transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            let mut active: users::ActiveModel = model.into();
            if let Some(name) = update.name.as_deref() {
                active.name = ActiveValue::Set(normalize_optional_text(Some(name)));
            }
            if let Some(avatar) = update.avatar.as_deref() {
                active.avatar = ActiveValue::Set(normalize_optional_text(Some(avatar)));
            }
            if let Some(currency) = default_currency {
                active.default_currency = ActiveValue::Set(currency.to_string());
            }
            if let Some(theme) = theme {
                active.theme = ActiveValue::Set(theme.as_str().to_string());
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            User::try_from(model)
        })
    }
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::Database;

    use super::*;

    fn account(email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: None,
            avatar: None,
            preferences: Preferences {
                default_currency: crate::CurrencyCode::new("USD").unwrap(),
                theme: Theme::default(),
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn unique_index_violation_is_a_conflict() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        users::ActiveModel::from(&account("ada@example.com"))
            .insert(&db)
            .await
            .unwrap();
        let err = users::ActiveModel::from(&account("ada@example.com"))
            .insert(&db)
            .await
            .unwrap_err();

        assert_eq!(
            email_conflict(err),
            EngineError::ExistingKey("email".to_string())
        );
    }

    #[test]
    fn other_database_errors_pass_through() {
        let err = email_conflict(DbErr::Custom("disk full".to_string()));
        assert!(matches!(err, EngineError::Database(DbErr::Custom(_))));
    }
}
