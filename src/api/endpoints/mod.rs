//! API endpoint handlers, one module per resource.

pub mod health;
pub mod history;
pub mod reports;
