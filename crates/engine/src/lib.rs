//! Waylo engine.
//!
//! The engine owns the trip aggregate and everything that has to stay
//! consistent inside it: destinations, expenses, transportation legs and
//! accommodations, the expenses generated from logistics costs and the
//! budget figures derived from all of them.
//!
//! Every operation exposed by [`Engine`] loads a whole trip, applies the change
//! in memory and writes the trip back in a single database transaction.

pub use accommodation::Accommodation;
pub use budget::{BudgetSummary, CategorySpend};
pub use commands::{
    AccommodationDraft, DestinationDraft, ExpenseDraft, Keyed, NewUser, ProfileUpdate, SortOrder,
    TransportationDraft, TripDraft, TripListQuery, TripPatch, TripReplace, TripSort,
};
pub use currency::{CurrencyCode, RateTable};
pub use destination::Destination;
pub use error::EngineError;
pub use expense::{Expense, ExpenseCategory, LinkedType};
pub use linker::LinkedExpense;
pub use ops::{Engine, EngineBuilder};
pub use transportation::{TransportKind, Transportation};
pub use trip::{Trip, TripPage};
pub use users::{Preferences, Theme, User};

mod accommodation;
mod budget;
mod commands;
mod currency;
mod destination;
mod error;
mod expense;
mod linker;
mod ops;
mod refresh_tokens;
mod transportation;
mod trip;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
