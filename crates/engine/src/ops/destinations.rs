use uuid::Uuid;

use crate::{DestinationDraft, ResultEngine, Trip};

use super::Engine;

impl Engine {
    /// Append a destination and return the updated trip.
    pub async fn add_destination(
        &self,
        trip_id: Uuid,
        user_id: &str,
        draft: &DestinationDraft,
    ) -> ResultEngine<Trip> {
        let (trip, _) = self
            .mutate_trip(trip_id, user_id, |trip, _| trip.add_destination(draft))
            .await?;
        Ok(trip)
    }

    pub async fn update_destination(
        &self,
        trip_id: Uuid,
        destination_id: Uuid,
        user_id: &str,
        draft: &DestinationDraft,
    ) -> ResultEngine<Trip> {
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, _| {
                trip.update_destination(destination_id, draft)
            })
            .await?;
        Ok(trip)
    }

    /// Remove a destination. Nothing else is deleted with it: elements that
    /// referenced it just lose their `destination_id`.
    pub async fn delete_destination(
        &self,
        trip_id: Uuid,
        destination_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Trip> {
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, _| {
                trip.delete_destination(destination_id)
            })
            .await?;
        Ok(trip)
    }
}
