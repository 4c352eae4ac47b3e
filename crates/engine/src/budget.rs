//! Budget aggregation over the expenses of a trip.

use serde::Serialize;

use crate::{CurrencyCode, Expense, ExpenseCategory, RateTable, Trip};

/// Sum that sticks at the `i64` bounds instead of overflowing.
fn saturating_total(amounts: impl Iterator<Item = i64>) -> i64 {
    amounts.fold(0_i64, i64::saturating_add)
}

fn converted<'a>(
    expenses: impl Iterator<Item = &'a Expense>,
    rates: &'a RateTable,
) -> impl Iterator<Item = i64> {
    expenses.map(|expense| rates.to_reference_minor(expense.amount_minor, &expense.currency))
}

/// Spend of one category, in reference minor units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub category: ExpenseCategory,
    pub total_minor: i64,
}

/// Budget figures of a trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub reference_currency: CurrencyCode,
    pub budget_minor: i64,
    pub total_spent_minor: i64,
    /// Negative when the trip is over budget.
    pub remaining_minor: i64,
    pub spent_by_category: Vec<CategorySpend>,
}

impl Trip {
    /// Sum of all expenses converted into the reference currency.
    ///
    /// Each expense is converted and rounded on its own, so the result does
    /// not depend on the order of the collection.
    #[must_use]
    pub fn total_spent(&self, rates: &RateTable) -> i64 {
        saturating_total(converted(self.expenses.iter(), rates))
    }

    #[must_use]
    pub fn remaining(&self, total_spent_minor: i64) -> i64 {
        self.budget_minor.saturating_sub(total_spent_minor)
    }

    /// Raw sum of the amounts, whatever their currency.
    #[must_use]
    pub fn total_expenses_minor(&self) -> i64 {
        saturating_total(self.expenses.iter().map(|expense| expense.amount_minor))
    }

    /// Converted spend per category, categories without expenses omitted.
    #[must_use]
    pub fn spent_by_category(&self, rates: &RateTable) -> Vec<CategorySpend> {
        ExpenseCategory::ALL
            .iter()
            .filter_map(|category| {
                let mut expenses = self
                    .expenses
                    .iter()
                    .filter(|expense| expense.category == *category)
                    .peekable();
                expenses.peek()?;
                let total_minor = saturating_total(converted(expenses, rates));
                Some(CategorySpend {
                    category: *category,
                    total_minor,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn budget_summary(&self, rates: &RateTable) -> BudgetSummary {
        let total_spent_minor = self.total_spent(rates);
        BudgetSummary {
            reference_currency: rates.reference().clone(),
            budget_minor: self.budget_minor,
            total_spent_minor,
            remaining_minor: self.remaining(total_spent_minor),
            spent_by_category: self.spent_by_category(rates),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    fn expense(amount_minor: i64, currency: &str, category: ExpenseCategory) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            description: "x".to_string(),
            amount_minor,
            currency: CurrencyCode::new(currency).unwrap(),
            category,
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            destination_id: None,
            linked_id: None,
            linked_type: None,
        }
    }

    fn trip(budget_minor: i64, expenses: Vec<Expense>) -> Trip {
        let mut trip = Trip::new(
            "user".to_string(),
            "Trip".to_string(),
            budget_minor,
            CurrencyCode::new("USD").unwrap(),
            None,
        );
        trip.expenses = expenses;
        trip
    }

    #[test]
    fn total_spent_converts_each_expense() {
        let rates = RateTable::default();
        let trip = trip(
            100_000,
            vec![
                expense(20_000, "EUR", ExpenseCategory::Transport),
                expense(5_000, "USD", ExpenseCategory::Food),
            ],
        );
        assert_eq!(trip.total_spent(&rates), 26_600);
        assert_eq!(trip.remaining(26_600), 73_400);
        assert_eq!(trip.total_expenses_minor(), 25_000);
    }

    #[test]
    fn total_spent_ignores_order() {
        let rates = RateTable::default();
        let expenses = vec![
            expense(333, "EUR", ExpenseCategory::Food),
            expense(12_345, "ARS", ExpenseCategory::Other),
            expense(777, "USD", ExpenseCategory::Activities),
            expense(1, "EUR", ExpenseCategory::Food),
        ];
        let forward = trip(0, expenses.clone()).total_spent(&rates);
        let mut reversed = expenses;
        reversed.reverse();
        assert_eq!(trip(0, reversed).total_spent(&rates), forward);
    }

    #[test]
    fn unknown_currency_counts_at_par() {
        let rates = RateTable::default();
        let trip = trip(0, vec![expense(1_000, "JPY", ExpenseCategory::Food)]);
        assert_eq!(trip.total_spent(&rates), 1_000);
    }

    #[test]
    fn remaining_can_be_negative() {
        let rates = RateTable::default();
        let trip = trip(10_000, vec![expense(15_000, "USD", ExpenseCategory::Food)]);
        let summary = trip.budget_summary(&rates);
        assert_eq!(summary.total_spent_minor, 15_000);
        assert_eq!(summary.remaining_minor, -5_000);
    }

    #[test]
    fn huge_amounts_saturate() {
        let rates = RateTable::default();
        let trip = trip(
            100,
            vec![
                expense(5_000_000_000_000_000_000, "USD", ExpenseCategory::Food),
                expense(5_000_000_000_000_000_000, "USD", ExpenseCategory::Food),
            ],
        );
        let summary = trip.budget_summary(&rates);
        assert_eq!(summary.total_spent_minor, i64::MAX);
        assert_eq!(summary.remaining_minor, 100 - i64::MAX);
        assert_eq!(summary.spent_by_category[0].total_minor, i64::MAX);
        assert_eq!(trip.total_expenses_minor(), i64::MAX);
    }

    #[test]
    fn spend_per_category() {
        let rates = RateTable::default();
        let trip = trip(
            0,
            vec![
                expense(1_000, "USD", ExpenseCategory::Food),
                expense(1_000, "EUR", ExpenseCategory::Food),
                expense(300, "USD", ExpenseCategory::Other),
            ],
        );
        assert_eq!(
            trip.spent_by_category(&rates),
            vec![
                CategorySpend {
                    category: ExpenseCategory::Food,
                    total_minor: 2_080,
                },
                CategorySpend {
                    category: ExpenseCategory::Other,
                    total_minor: 300,
                },
            ]
        );
    }
}
