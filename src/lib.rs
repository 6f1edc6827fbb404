//! Back-office console for a retail bank: customers, accounts, movements and
//! statement reports against the bank's REST backend.

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod report;
pub mod state;
