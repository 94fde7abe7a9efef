//! protrack - Personal workout log
//!
//! Calendar of workout and rest days, three fixed training blocks,
//! hold-to-confirm for anything that cannot be undone.

pub mod active;
pub mod app;
pub mod blocks;
pub mod calendar;
pub mod countdown;
pub mod db;
pub mod gesture;
pub mod i18n;
pub mod model;
pub mod setup;
pub mod store;
pub mod tips;
pub mod tui;

pub use db::Database;
