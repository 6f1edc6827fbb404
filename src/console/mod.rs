//! Feature view-models: list, search filter, form and edit mode per area.
//!
//! Every mutation is followed by a full reload of the list so the view always
//! reflects the backend after a write. Outcomes are published to the shared
//! [`Notifications`](crate::state::Notifications) slot and also returned.

pub mod accounts;
pub mod customers;
pub mod movements;
pub mod reports;

pub use accounts::{AccountForm, AccountsView};
pub use customers::{CustomerForm, CustomersView};
pub use movements::{MovementForm, MovementsView};
pub use reports::ReportsView;

#[cfg(test)]
mod console_tests;

/// Case-insensitive containment used by every search box.
fn matches(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

/// Normalized search term, or `None` when the box is empty.
fn search_term(search: &str) -> Option<String> {
    let term = search.trim();
    if term.is_empty() {
        None
    } else {
        Some(term.to_lowercase())
    }
}
