//! Mapping between request/response bodies and engine types.

use api_types::{
    accommodation::{AccommodationInput, AccommodationView},
    destination::{DestinationInput, DestinationView},
    expense::{ExpenseInput, ExpenseView},
    transportation::{TransportationInput, TransportationView},
    trip::{BudgetView, CategorySpendView, TripNew, TripPage, TripPatch, TripReplace, TripView},
    user::{Preferences, ProfileUpdate, UserView},
};
use engine::{
    Accommodation, AccommodationDraft, BudgetSummary, Destination, DestinationDraft, Expense,
    ExpenseDraft, Keyed, RateTable, Transportation, TransportationDraft, Trip, TripDraft, User,
};

pub(crate) fn trip_draft(payload: TripNew) -> TripDraft {
    TripDraft {
        title: payload.title,
        budget_minor: payload.budget_minor,
        currency: payload.currency,
        logo: payload.logo,
    }
}

fn keyed<I, D>(
    items: Option<Vec<I>>,
    id: fn(&I) -> Option<uuid::Uuid>,
    draft: fn(I) -> D,
) -> Option<Vec<Keyed<D>>> {
    items.map(|items| {
        items
            .into_iter()
            .map(|item| Keyed {
                id: id(&item),
                draft: draft(item),
            })
            .collect()
    })
}

pub(crate) fn trip_replace(payload: TripReplace) -> engine::TripReplace {
    engine::TripReplace {
        header: TripDraft {
            title: payload.title,
            budget_minor: payload.budget_minor,
            currency: payload.currency,
            logo: payload.logo,
        },
        destinations: keyed(payload.destinations, |d| d.id, destination_draft),
        expenses: keyed(payload.expenses, |e| e.id, expense_draft),
        transportation: keyed(payload.transportation, |t| t.id, transportation_draft),
        accommodation: keyed(payload.accommodation, |a| a.id, accommodation_draft),
    }
}

pub(crate) fn trip_patch(payload: TripPatch) -> engine::TripPatch {
    engine::TripPatch {
        title: payload.title,
        budget_minor: payload.budget_minor,
        currency: payload.currency,
        logo: payload.logo,
    }
}

pub(crate) fn destination_draft(payload: DestinationInput) -> DestinationDraft {
    DestinationDraft {
        city: payload.city,
        country: payload.country,
        arrival_date: payload.arrival_date,
        departure_date: payload.departure_date,
        notes: payload.notes,
    }
}

pub(crate) fn expense_draft(payload: ExpenseInput) -> ExpenseDraft {
    ExpenseDraft {
        description: payload.description,
        amount_minor: payload.amount_minor,
        currency: payload.currency,
        category: payload.category,
        date: payload.date,
        destination_id: payload.destination_id,
    }
}

pub(crate) fn transportation_draft(payload: TransportationInput) -> TransportationDraft {
    TransportationDraft {
        kind: payload.kind,
        from: payload.from,
        to: payload.to,
        date: payload.date,
        departure_time: payload.departure_time,
        arrival_time: payload.arrival_time,
        cost_minor: payload.cost_minor,
        currency: payload.currency,
        notes: payload.notes,
        destination_id: payload.destination_id,
    }
}

pub(crate) fn accommodation_draft(payload: AccommodationInput) -> AccommodationDraft {
    AccommodationDraft {
        name: payload.name,
        city: payload.city,
        address: payload.address,
        check_in: payload.check_in,
        check_out: payload.check_out,
        cost_minor: payload.cost_minor,
        currency: payload.currency,
        notes: payload.notes,
        destination_id: payload.destination_id,
    }
}

pub(crate) fn profile_update(payload: ProfileUpdate) -> engine::ProfileUpdate {
    let preferences = payload.preferences.unwrap_or_default();
    engine::ProfileUpdate {
        name: payload.name,
        avatar: payload.avatar,
        default_currency: preferences.default_currency,
        theme: preferences.theme,
    }
}

pub(crate) fn user_view(user: &User) -> UserView {
    UserView {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        avatar: user.avatar.clone(),
        preferences: Preferences {
            default_currency: user.preferences.default_currency.to_string(),
            theme: user.preferences.theme.as_str().to_string(),
        },
        created_at: user.created_at,
    }
}

fn budget_view(summary: BudgetSummary) -> BudgetView {
    BudgetView {
        reference_currency: summary.reference_currency.to_string(),
        budget_minor: summary.budget_minor,
        total_spent_minor: summary.total_spent_minor,
        remaining_minor: summary.remaining_minor,
        spent_by_category: summary
            .spent_by_category
            .into_iter()
            .map(|spend| CategorySpendView {
                category: spend.category.as_str().to_string(),
                total_minor: spend.total_minor,
            })
            .collect(),
    }
}

fn destination_view(destination: &Destination) -> DestinationView {
    DestinationView {
        id: destination.id,
        city: destination.city.clone(),
        country: destination.country.clone(),
        arrival_date: destination.arrival_date,
        departure_date: destination.departure_date,
        notes: destination.notes.clone(),
    }
}

fn expense_view(expense: &Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        description: expense.description.clone(),
        amount_minor: expense.amount_minor,
        currency: expense.currency.to_string(),
        category: expense.category.as_str().to_string(),
        date: expense.date,
        destination_id: expense.destination_id,
        linked_id: expense.linked_id,
        linked_type: expense.linked_type.map(|kind| kind.as_str().to_string()),
    }
}

fn transportation_view(entry: &Transportation) -> TransportationView {
    TransportationView {
        id: entry.id,
        kind: entry.kind.as_str().to_string(),
        from: entry.from.clone(),
        to: entry.to.clone(),
        date: entry.date,
        departure_time: entry.departure_time.clone(),
        arrival_time: entry.arrival_time.clone(),
        cost_minor: entry.cost_minor,
        currency: entry.currency.to_string(),
        notes: entry.notes.clone(),
        destination_id: entry.destination_id,
    }
}

fn accommodation_view(entry: &Accommodation) -> AccommodationView {
    AccommodationView {
        id: entry.id,
        name: entry.name.clone(),
        city: entry.city.clone(),
        address: entry.address.clone(),
        check_in: entry.check_in,
        check_out: entry.check_out,
        nights: entry.nights(),
        cost_minor: entry.cost_minor,
        currency: entry.currency.to_string(),
        notes: entry.notes.clone(),
        destination_id: entry.destination_id,
    }
}

pub(crate) fn trip_view(trip: &Trip, rates: &RateTable) -> TripView {
    TripView {
        id: trip.id,
        title: trip.title.clone(),
        budget_minor: trip.budget_minor,
        currency: trip.currency.to_string(),
        logo: trip.logo.clone(),
        destinations: trip.destinations.iter().map(destination_view).collect(),
        expenses: trip.expenses.iter().map(expense_view).collect(),
        transportation: trip.transportation.iter().map(transportation_view).collect(),
        accommodation: trip.accommodation.iter().map(accommodation_view).collect(),
        total_expenses_minor: trip.total_expenses_minor(),
        budget: budget_view(trip.budget_summary(rates)),
        created_at: trip.created_at,
        updated_at: trip.updated_at,
    }
}

pub(crate) fn trip_page(page: &engine::TripPage, rates: &RateTable) -> TripPage {
    TripPage {
        trips: page.trips.iter().map(|trip| trip_view(trip, rates)).collect(),
        total: page.total,
        page: page.page,
        limit: page.limit,
        total_pages: page.total_pages(),
    }
}
