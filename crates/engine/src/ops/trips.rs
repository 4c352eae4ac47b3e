use sea_orm::{
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Order,
};
use uuid::Uuid;

use crate::{
    ResultEngine, SortOrder, Trip, TripDraft, TripListQuery, TripPage, TripPatch, TripReplace,
    TripSort, trip,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return one page of the trips owned by `user_id`.
    pub async fn list_trips(&self, user_id: &str, query: &TripListQuery) -> ResultEngine<TripPage> {
        with_tx!(self, |db_tx| {
            let owned = trip::Entity::find().filter(trip::Column::UserId.eq(user_id.to_string()));
            let total = owned.clone().count(&db_tx).await?;

            let column = match query.sort_by {
                TripSort::CreatedAt => trip::Column::CreatedAt,
                TripSort::UpdatedAt => trip::Column::UpdatedAt,
                TripSort::Title => trip::Column::Title,
            };
            let order = match query.order {
                SortOrder::Asc => Order::Asc,
                SortOrder::Desc => Order::Desc,
            };
            let models = owned
                .order_by(column, order.clone())
                .order_by(trip::Column::Id, order)
                .offset(query.offset())
                .limit(query.limit)
                .all(&db_tx)
                .await?;

            let trips = models
                .into_iter()
                .map(Trip::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            Ok(TripPage {
                trips,
                total,
                page: query.page,
                limit: query.limit,
            })
        })
    }

    /// Return a trip owned by `user_id`.
    pub async fn trip(&self, trip_id: Uuid, user_id: &str) -> ResultEngine<Trip> {
        with_tx!(self, |db_tx| self.load_trip(&db_tx, trip_id, user_id).await)
    }

    /// Create a new trip with empty collections.
    pub async fn new_trip(&self, user_id: &str, draft: &TripDraft) -> ResultEngine<Trip> {
        let trip = Trip::from_draft(user_id, draft, &self.rates)?;
        let model: trip::ActiveModel = (&trip).try_into()?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            model.insert(&db_tx).await?;
            tracing::debug!(trip_id = %trip.id, "trip created");
            Ok(trip)
        })
    }

    /// Replace a trip: the header, plus every collection present in `replace`.
    pub async fn replace_trip(
        &self,
        trip_id: Uuid,
        user_id: &str,
        replace: &TripReplace,
    ) -> ResultEngine<Trip> {
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, rates| trip.replace(replace, rates))
            .await?;
        Ok(trip)
    }

    /// Update only the header fields present in `patch`.
    pub async fn patch_trip(
        &self,
        trip_id: Uuid,
        user_id: &str,
        patch: &TripPatch,
    ) -> ResultEngine<Trip> {
        if patch.is_empty() {
            return self.trip(trip_id, user_id).await;
        }
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, rates| trip.apply_patch(patch, rates))
            .await?;
        Ok(trip)
    }

    /// Delete a trip and everything in it.
    pub async fn delete_trip(&self, trip_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_trip(&db_tx, trip_id, user_id).await?;
            trip::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            tracing::debug!(%trip_id, "trip deleted");
            Ok(())
        })
    }
}
