use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, RateTable, ResultEngine, Trip, trip, users};

use super::{Engine, with_tx};

impl Engine {
    /// Trip row owned by `user_id`.
    ///
    /// A trip of another user is reported exactly like a missing one.
    pub(super) async fn require_trip(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<trip::Model> {
        trip::Entity::find_by_id(trip_id.to_string())
            .filter(trip::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))
    }

    pub(super) async fn load_trip(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Trip> {
        let model = self.require_trip(db, trip_id, user_id).await?;
        Trip::try_from(model)
    }

    /// Write the whole aggregate back.
    pub(super) async fn save_trip(&self, db: &DatabaseTransaction, trip: &mut Trip) -> ResultEngine<()> {
        trip.updated_at = Utc::now();
        let model: trip::ActiveModel = (&*trip).try_into()?;
        model.update(db).await?;
        Ok(())
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Load a trip, apply `change` and save it, all in one transaction.
    ///
    /// Ownership is checked before `change` runs, so element lookups inside
    /// `change` never leak the existence of another user's trip.
    pub(super) async fn mutate_trip<T>(
        &self,
        trip_id: Uuid,
        user_id: &str,
        change: impl FnOnce(&mut Trip, &RateTable) -> ResultEngine<T>,
    ) -> ResultEngine<(Trip, T)> {
        with_tx!(self, |db_tx| {
            let mut trip = self.load_trip(&db_tx, trip_id, user_id).await?;
            let value = change(&mut trip, &self.rates)?;
            self.save_trip(&db_tx, &mut trip).await?;
            Ok((trip, value))
        })
    }
}
