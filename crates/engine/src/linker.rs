//! Expense linker.
//!
//! Every transportation/accommodation entry with a positive cost owns exactly
//! one expense whose `linked_id` is the entry id. The linked expense is never
//! edited in place: on each change of its source it is dropped and derived
//! again from the source's current values.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{CurrencyCode, Expense, ExpenseCategory, LinkedType, Trip};

/// Values of the expense derived from a linked source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedExpense {
    pub description: String,
    pub category: ExpenseCategory,
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub date: NaiveDate,
    pub destination_id: Option<Uuid>,
}

/// An element of a trip that may own a generated expense.
pub(crate) trait LinkSource {
    fn link_id(&self) -> Uuid;
    fn linked_type(&self) -> LinkedType;
    fn linked_expense(&self) -> LinkedExpense;
}

impl Trip {
    /// Replace the expense linked to `source_id`.
    ///
    /// Every expense linked to `source_id` is removed; when `derived` has a
    /// positive amount a new expense with a fresh id is appended. Unlinked
    /// expenses and expenses of other sources are left untouched.
    pub fn relink(&mut self, source_id: Uuid, linked_type: LinkedType, derived: LinkedExpense) {
        self.unlink(source_id);
        if derived.amount_minor > 0 {
            self.expenses.push(Expense {
                id: Uuid::new_v4(),
                description: derived.description,
                amount_minor: derived.amount_minor,
                currency: derived.currency,
                category: derived.category,
                date: derived.date,
                destination_id: derived.destination_id,
                linked_id: Some(source_id),
                linked_type: Some(linked_type),
            });
        }
    }

    /// Remove every expense linked to `source_id`.
    pub fn unlink(&mut self, source_id: Uuid) {
        self.expenses
            .retain(|expense| expense.linked_id != Some(source_id));
    }

    pub(crate) fn sync_link<S: LinkSource>(&mut self, source: &S) {
        self.relink(
            source.link_id(),
            source.linked_type(),
            source.linked_expense(),
        );
    }

    /// Linked expense of `source_id`, if any.
    #[must_use]
    pub fn linked_expense_of(&self, source_id: Uuid) -> Option<&Expense> {
        self.expenses
            .iter()
            .find(|expense| expense.linked_id == Some(source_id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
    }

    fn derived(amount_minor: i64) -> LinkedExpense {
        LinkedExpense {
            description: "Transport: Train (Rome - Florence)".to_string(),
            category: ExpenseCategory::Transport,
            amount_minor,
            currency: CurrencyCode::new("EUR").unwrap(),
            date: date(),
            destination_id: None,
        }
    }

    fn manual(description: &str) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            description: description.to_string(),
            amount_minor: 1_000,
            currency: CurrencyCode::new("USD").unwrap(),
            category: ExpenseCategory::Food,
            date: date(),
            destination_id: None,
            linked_id: None,
            linked_type: None,
        }
    }

    fn trip() -> Trip {
        Trip::new(
            "user".to_string(),
            "Italy".to_string(),
            100_000,
            CurrencyCode::new("USD").unwrap(),
            None,
        )
    }

    #[test]
    fn relink_inserts_single_expense() {
        let mut trip = trip();
        let source = Uuid::new_v4();
        trip.relink(source, LinkedType::Transportation, derived(5_000));
        trip.relink(source, LinkedType::Transportation, derived(7_000));

        let linked: Vec<_> = trip
            .expenses
            .iter()
            .filter(|e| e.linked_id == Some(source))
            .collect();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].amount_minor, 7_000);
        assert_eq!(linked[0].linked_type, Some(LinkedType::Transportation));
    }

    #[test]
    fn relink_with_zero_amount_removes() {
        let mut trip = trip();
        let source = Uuid::new_v4();
        trip.relink(source, LinkedType::Transportation, derived(5_000));
        trip.relink(source, LinkedType::Transportation, derived(0));
        assert!(trip.linked_expense_of(source).is_none());
        assert!(trip.expenses.is_empty());
    }

    #[test]
    fn relink_leaves_other_expenses_alone() {
        let mut trip = trip();
        let dinner = manual("Dinner");
        trip.expenses.push(dinner.clone());
        let other_source = Uuid::new_v4();
        trip.relink(other_source, LinkedType::Accommodation, derived(9_000));

        let source = Uuid::new_v4();
        trip.relink(source, LinkedType::Transportation, derived(5_000));
        trip.unlink(source);

        assert_eq!(trip.expenses.len(), 2);
        assert!(trip.expenses.contains(&dinner));
        assert!(trip.linked_expense_of(other_source).is_some());
    }

    #[test]
    fn relink_collapses_duplicates() {
        let mut trip = trip();
        let source = Uuid::new_v4();
        for _ in 0..2 {
            let mut duplicate = manual("stale");
            duplicate.linked_id = Some(source);
            duplicate.linked_type = Some(LinkedType::Transportation);
            trip.expenses.push(duplicate);
        }
        trip.relink(source, LinkedType::Transportation, derived(1_500));
        assert_eq!(trip.expenses.len(), 1);
        assert_eq!(trip.expenses[0].description, "Transport: Train (Rome - Florence)");
    }
}
