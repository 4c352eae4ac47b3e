use uuid::Uuid;

use crate::{ExpenseDraft, ResultEngine, Trip};

use super::Engine;

impl Engine {
    /// Add a user-entered expense.
    pub async fn add_expense(
        &self,
        trip_id: Uuid,
        user_id: &str,
        draft: &ExpenseDraft,
    ) -> ResultEngine<Trip> {
        let (trip, _) = self
            .mutate_trip(trip_id, user_id, |trip, rates| trip.add_expense(draft, rates))
            .await?;
        Ok(trip)
    }

    /// Update a user-entered expense. Linked expenses are rejected with
    /// `ManagedExpense`: edit their transportation/accommodation instead.
    pub async fn update_expense(
        &self,
        trip_id: Uuid,
        expense_id: Uuid,
        user_id: &str,
        draft: &ExpenseDraft,
    ) -> ResultEngine<Trip> {
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, rates| {
                trip.update_expense(expense_id, draft, rates)
            })
            .await?;
        Ok(trip)
    }

    pub async fn delete_expense(
        &self,
        trip_id: Uuid,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Trip> {
        let (trip, ()) = self
            .mutate_trip(trip_id, user_id, |trip, _| trip.delete_expense(expense_id))
            .await?;
        Ok(trip)
    }
}
