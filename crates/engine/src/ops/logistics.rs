//! Transportation and accommodation entries.
//!
//! Both kinds keep their linked expense in sync on every write; see
//! [`Trip::relink`].

use uuid::Uuid;

use crate::{AccommodationDraft, ResultEngine, TransportationDraft, Trip};

use super::Engine;

impl Engine {
    pub async fn add_transportation(
        &self,
        trip_id: Uuid,
        user_id: &str,
        draft: &TransportationDraft,
    ) -> ResultEngine<Trip> {
        let (trip, _) = self
            .mutate_trip(trip_id, user_id, |trip, rates| {
                trip.add_transportation(draft, rates)
            })
            .await?;
        Ok(trip)
    }

    pub async fn update_transportation(
        &self,
        trip_id: Uuid,
        transportation_id: Uuid,
        user_id: &str,
        draft: &TransportationDraft,
    ) -> ResultEngine<Trip> {
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, rates| {
                trip.update_transportation(transportation_id, draft, rates)
            })
            .await?;
        Ok(trip)
    }

    /// Delete a transportation entry together with its linked expense.
    pub async fn delete_transportation(
        &self,
        trip_id: Uuid,
        transportation_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Trip> {
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, _| {
                trip.delete_transportation(transportation_id)
            })
            .await?;
        Ok(trip)
    }

    pub async fn add_accommodation(
        &self,
        trip_id: Uuid,
        user_id: &str,
        draft: &AccommodationDraft,
    ) -> ResultEngine<Trip> {
        let (trip, _) = self
            .mutate_trip(trip_id, user_id, |trip, rates| {
                trip.add_accommodation(draft, rates)
            })
            .await?;
        Ok(trip)
    }

    pub async fn update_accommodation(
        &self,
        trip_id: Uuid,
        accommodation_id: Uuid,
        user_id: &str,
        draft: &AccommodationDraft,
    ) -> ResultEngine<Trip> {
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, rates| {
                trip.update_accommodation(accommodation_id, draft, rates)
            })
            .await?;
        Ok(trip)
    }

    /// Delete an accommodation entry together with its linked expense.
    pub async fn delete_accommodation(
        &self,
        trip_id: Uuid,
        accommodation_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Trip> {
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, _| {
                trip.delete_accommodation(accommodation_id)
            })
            .await?;
        Ok(trip)
    }
}
