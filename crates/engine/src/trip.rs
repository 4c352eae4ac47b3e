//! The module contains the `Trip` aggregate and its table.
//!
//! A trip row is the whole aggregate: the header columns plus the four element
//! collections stored as JSON documents. Every mutation loads the row, applies
//! the change to a [`Trip`] and writes every column back.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    Accommodation, AccommodationDraft, CurrencyCode, Destination, DestinationDraft, EngineError,
    Expense, ExpenseDraft, RateTable, ResultEngine, Transportation, TransportationDraft,
    TripDraft, TripPatch, TripReplace,
    commands::Keyed,
    util::{ensure_amount, normalize_logo, normalize_title, parse_uuid},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub budget_minor: i64,
    pub currency: CurrencyCode,
    pub logo: Option<String>,
    pub destinations: Vec<Destination>,
    pub expenses: Vec<Expense>,
    pub transportation: Vec<Transportation>,
    pub accommodation: Vec<Accommodation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of trips plus the total number of trips of the owner.
#[derive(Clone, Debug)]
pub struct TripPage {
    pub trips: Vec<Trip>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl TripPage {
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1))
    }
}

fn not_exists(kind: &str) -> EngineError {
    EngineError::KeyNotFound(format!("{kind} not exists"))
}

impl Trip {
    pub fn new(
        user_id: String,
        title: String,
        budget_minor: i64,
        currency: CurrencyCode,
        logo: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            budget_minor,
            currency,
            logo,
            destinations: Vec::new(),
            expenses: Vec::new(),
            transportation: Vec::new(),
            accommodation: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate a draft and build a new, empty trip for `user_id`.
    pub(crate) fn from_draft(user_id: &str, draft: &TripDraft, rates: &RateTable) -> ResultEngine<Self> {
        let (title, budget_minor, currency, logo) = validate_header(draft, rates)?;
        Ok(Self::new(user_id.to_string(), title, budget_minor, currency, logo))
    }

    /// Replace the header fields. Collections are kept.
    fn replace_header(&mut self, draft: &TripDraft, rates: &RateTable) -> ResultEngine<()> {
        let (title, budget_minor, currency, logo) = validate_header(draft, rates)?;
        self.title = title;
        self.budget_minor = budget_minor;
        self.currency = currency;
        self.logo = logo;
        Ok(())
    }

    /// Replace the header and every collection present in `replace`.
    ///
    /// Nothing changes unless the whole replace is valid. Kept elements lose
    /// references to destinations that are no longer there, and every linked
    /// expense is derived again from the resulting entries.
    pub(crate) fn replace(&mut self, replace: &TripReplace, rates: &RateTable) -> ResultEngine<()> {
        let mut next = self.clone();
        next.replace_header(&replace.header, rates)?;

        if let Some(items) = &replace.destinations {
            next.destinations = items
                .iter()
                .map(|item| Destination::from_draft(keyed_id(item), &item.draft))
                .collect::<ResultEngine<_>>()?;
        }
        next.clear_missing_destinations();

        if let Some(items) = &replace.expenses {
            // Linked expenses echoed back by the client are skipped.
            let linked: HashSet<Uuid> = self
                .expenses
                .iter()
                .filter(|e| e.linked_id.is_some())
                .map(|e| e.id)
                .collect();
            let mut expenses = Vec::with_capacity(items.len());
            for item in items.iter().filter(|item| item.id.is_none_or(|id| !linked.contains(&id))) {
                next.ensure_destination(item.draft.destination_id)?;
                expenses.push(Expense::from_draft(
                    keyed_id(item),
                    &item.draft,
                    &next.currency,
                    rates,
                )?);
            }
            next.expenses = expenses;
        }

        if let Some(items) = &replace.transportation {
            let mut entries = Vec::with_capacity(items.len());
            for item in items {
                next.ensure_destination(item.draft.destination_id)?;
                entries.push(Transportation::from_draft(
                    keyed_id(item),
                    &item.draft,
                    &next.currency,
                    rates,
                )?);
            }
            next.transportation = entries;
        }

        if let Some(items) = &replace.accommodation {
            let mut entries = Vec::with_capacity(items.len());
            for item in items {
                next.ensure_destination(item.draft.destination_id)?;
                entries.push(Accommodation::from_draft(
                    keyed_id(item),
                    &item.draft,
                    &next.currency,
                    rates,
                )?);
            }
            next.accommodation = entries;
        }

        next.expenses.retain(|e| e.linked_id.is_none());
        next.ensure_unique_ids()?;
        for entry in next.transportation.clone() {
            next.sync_link(&entry);
        }
        for entry in next.accommodation.clone() {
            next.sync_link(&entry);
        }

        *self = next;
        Ok(())
    }

    fn clear_missing_destinations(&mut self) {
        let known: HashSet<Uuid> = self.destinations.iter().map(|d| d.id).collect();
        let missing = |id: &Option<Uuid>| id.is_some_and(|id| !known.contains(&id));
        for expense in self.expenses.iter_mut().filter(|e| missing(&e.destination_id)) {
            expense.destination_id = None;
        }
        for entry in self.transportation.iter_mut().filter(|t| missing(&t.destination_id)) {
            entry.destination_id = None;
        }
        for entry in self.accommodation.iter_mut().filter(|a| missing(&a.destination_id)) {
            entry.destination_id = None;
        }
    }

    /// Element ids are unique across the whole trip.
    fn ensure_unique_ids(&self) -> ResultEngine<()> {
        let mut seen = HashSet::new();
        let ids = self
            .destinations
            .iter()
            .map(|d| d.id)
            .chain(self.expenses.iter().map(|e| e.id))
            .chain(self.transportation.iter().map(|t| t.id))
            .chain(self.accommodation.iter().map(|a| a.id));
        for id in ids {
            if !seen.insert(id) {
                return Err(EngineError::InvalidField(format!("duplicate element id {id}")));
            }
        }
        Ok(())
    }

    pub(crate) fn apply_patch(&mut self, patch: &TripPatch, rates: &RateTable) -> ResultEngine<()> {
        // Validate everything before touching the trip.
        let title = patch.title.as_deref().map(normalize_title).transpose()?;
        let budget_minor = patch
            .budget_minor
            .map(|budget| ensure_amount(budget, "budget"))
            .transpose()?;
        let currency = patch.currency.as_deref().map(|c| rates.known(c)).transpose()?;
        let logo = patch
            .logo
            .as_deref()
            .map(|logo| normalize_logo(Some(logo)))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(budget_minor) = budget_minor {
            self.budget_minor = budget_minor;
        }
        if let Some(currency) = currency {
            self.currency = currency;
        }
        if let Some(logo) = logo {
            self.logo = logo;
        }
        Ok(())
    }

    fn ensure_destination(&self, destination_id: Option<Uuid>) -> ResultEngine<()> {
        match destination_id {
            Some(id) if !self.destinations.iter().any(|d| d.id == id) => {
                Err(not_exists("destination"))
            }
            _ => Ok(()),
        }
    }

    fn destination_index(&self, id: Uuid) -> ResultEngine<usize> {
        self.destinations
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| not_exists("destination"))
    }

    fn transportation_index(&self, id: Uuid) -> ResultEngine<usize> {
        self.transportation
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_exists("transportation"))
    }

    fn accommodation_index(&self, id: Uuid) -> ResultEngine<usize> {
        self.accommodation
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| not_exists("accommodation"))
    }

    // Destinations

    pub(crate) fn add_destination(&mut self, draft: &DestinationDraft) -> ResultEngine<Uuid> {
        let destination = Destination::from_draft(Uuid::new_v4(), draft)?;
        let id = destination.id;
        self.destinations.push(destination);
        Ok(id)
    }

    pub(crate) fn update_destination(&mut self, id: Uuid, draft: &DestinationDraft) -> ResultEngine<()> {
        let index = self.destination_index(id)?;
        self.destinations[index] = Destination::from_draft(id, draft)?;
        Ok(())
    }

    /// Remove a destination. Elements pointing at it lose the reference.
    pub(crate) fn delete_destination(&mut self, id: Uuid) -> ResultEngine<()> {
        let index = self.destination_index(id)?;
        self.destinations.remove(index);

        let dangling = Some(id);
        for expense in self.expenses.iter_mut().filter(|e| e.destination_id == dangling) {
            expense.destination_id = None;
        }
        for entry in self.transportation.iter_mut().filter(|t| t.destination_id == dangling) {
            entry.destination_id = None;
        }
        for entry in self.accommodation.iter_mut().filter(|a| a.destination_id == dangling) {
            entry.destination_id = None;
        }
        Ok(())
    }

    // Expenses

    pub(crate) fn add_expense(&mut self, draft: &ExpenseDraft, rates: &RateTable) -> ResultEngine<Uuid> {
        self.ensure_destination(draft.destination_id)?;
        let expense = Expense::from_draft(Uuid::new_v4(), draft, &self.currency, rates)?;
        let id = expense.id;
        self.expenses.push(expense);
        Ok(id)
    }

    pub(crate) fn update_expense(
        &mut self,
        id: Uuid,
        draft: &ExpenseDraft,
        rates: &RateTable,
    ) -> ResultEngine<()> {
        let index = self.editable_expense(id)?;
        self.ensure_destination(draft.destination_id)?;
        self.expenses[index] = Expense::from_draft(id, draft, &self.currency, rates)?;
        Ok(())
    }

    pub(crate) fn delete_expense(&mut self, id: Uuid) -> ResultEngine<()> {
        let index = self.editable_expense(id)?;
        self.expenses.remove(index);
        Ok(())
    }

    fn editable_expense(&self, id: Uuid) -> ResultEngine<usize> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| not_exists("expense"))?;
        if let Some(linked_type) = self.expenses[index].linked_type {
            return Err(EngineError::ManagedExpense(linked_type.as_str().to_string()));
        }
        Ok(index)
    }

    // Transportation

    pub(crate) fn add_transportation(
        &mut self,
        draft: &TransportationDraft,
        rates: &RateTable,
    ) -> ResultEngine<Uuid> {
        self.ensure_destination(draft.destination_id)?;
        let entry = Transportation::from_draft(Uuid::new_v4(), draft, &self.currency, rates)?;
        self.sync_link(&entry);
        let id = entry.id;
        self.transportation.push(entry);
        Ok(id)
    }

    pub(crate) fn update_transportation(
        &mut self,
        id: Uuid,
        draft: &TransportationDraft,
        rates: &RateTable,
    ) -> ResultEngine<()> {
        let index = self.transportation_index(id)?;
        self.ensure_destination(draft.destination_id)?;
        let entry = Transportation::from_draft(id, draft, &self.currency, rates)?;
        self.sync_link(&entry);
        self.transportation[index] = entry;
        Ok(())
    }

    pub(crate) fn delete_transportation(&mut self, id: Uuid) -> ResultEngine<()> {
        let index = self.transportation_index(id)?;
        self.transportation.remove(index);
        self.unlink(id);
        Ok(())
    }

    // Accommodation

    pub(crate) fn add_accommodation(
        &mut self,
        draft: &AccommodationDraft,
        rates: &RateTable,
    ) -> ResultEngine<Uuid> {
        self.ensure_destination(draft.destination_id)?;
        let entry = Accommodation::from_draft(Uuid::new_v4(), draft, &self.currency, rates)?;
        self.sync_link(&entry);
        let id = entry.id;
        self.accommodation.push(entry);
        Ok(id)
    }

    pub(crate) fn update_accommodation(
        &mut self,
        id: Uuid,
        draft: &AccommodationDraft,
        rates: &RateTable,
    ) -> ResultEngine<()> {
        let index = self.accommodation_index(id)?;
        self.ensure_destination(draft.destination_id)?;
        let entry = Accommodation::from_draft(id, draft, &self.currency, rates)?;
        self.sync_link(&entry);
        self.accommodation[index] = entry;
        Ok(())
    }

    pub(crate) fn delete_accommodation(&mut self, id: Uuid) -> ResultEngine<()> {
        let index = self.accommodation_index(id)?;
        self.accommodation.remove(index);
        self.unlink(id);
        Ok(())
    }
}

fn keyed_id<D>(item: &Keyed<D>) -> Uuid {
    item.id.unwrap_or_else(Uuid::new_v4)
}

fn validate_header(
    draft: &TripDraft,
    rates: &RateTable,
) -> ResultEngine<(String, i64, CurrencyCode, Option<String>)> {
    let title = normalize_title(&draft.title)?;
    let budget_minor = ensure_amount(draft.budget_minor, "budget")?;
    let currency = match draft.currency.as_deref() {
        Some(code) => rates.known(code)?,
        None => rates.reference().clone(),
    };
    let logo = normalize_logo(draft.logo.as_deref())?;
    Ok((title, budget_minor, currency, logo))
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub budget_minor: i64,
    pub currency: String,
    pub logo: Option<String>,
    pub destinations: String,
    pub expenses: String,
    pub transportation: String,
    pub accommodation: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&Trip> for ActiveModel {
    type Error = EngineError;

    fn try_from(value: &Trip) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            title: ActiveValue::Set(value.title.clone()),
            budget_minor: ActiveValue::Set(value.budget_minor),
            currency: ActiveValue::Set(value.currency.to_string()),
            logo: ActiveValue::Set(value.logo.clone()),
            destinations: ActiveValue::Set(serde_json::to_string(&value.destinations)?),
            expenses: ActiveValue::Set(serde_json::to_string(&value.expenses)?),
            transportation: ActiveValue::Set(serde_json::to_string(&value.transportation)?),
            accommodation: ActiveValue::Set(serde_json::to_string(&value.accommodation)?),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        })
    }
}

impl TryFrom<Model> for Trip {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "trip")?,
            user_id: model.user_id,
            title: model.title,
            budget_minor: model.budget_minor,
            currency: CurrencyCode::new(&model.currency)?,
            logo: model.logo,
            destinations: serde_json::from_str(&model.destinations)?,
            expenses: serde_json::from_str(&model.expenses)?,
            transportation: serde_json::from_str(&model.transportation)?,
            accommodation: serde_json::from_str(&model.accommodation)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
