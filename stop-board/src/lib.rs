//! Transit stop favorites dashboard.
//!
//! A service that keeps a user's favorite transit stops and their
//! departure timetables fresh: favorites live in a hosted storage
//! backend, timetables come from the public transit API, and a
//! repeating refresh cycle re-fetches everything on a fixed interval.

pub mod auth;
pub mod domain;
pub mod favorites;
pub mod refresh;
pub mod transit;
pub mod web;
