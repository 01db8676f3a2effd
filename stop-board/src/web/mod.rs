//! Web layer for the favorites dashboard.
//!
//! Provides the JSON HTTP surface: favorites CRUD, the current
//! timetable mapping, and the refresh timer's progress.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
