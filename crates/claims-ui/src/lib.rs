//! Terminal UI layer for Claimsight.
//!
//! Provides themes, bar components, the dashboard and queue-table views, and
//! the main application event loop built on top of [`ratatui`] for rendering
//! fraud-risk dashboards in the terminal.

pub mod app;
pub mod components;
pub mod dashboard_view;
pub mod table_view;
pub mod themes;

pub use claims_core as core;
