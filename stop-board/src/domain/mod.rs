//! Domain types for the favorites dashboard.
//!
//! This module contains the core domain model types. Identifiers
//! enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod delay;
mod favorite;
mod stop;
mod transport;

pub use delay::DelayStatus;
pub use favorite::{FavoriteStop, FavoriteStopInput};
pub use stop::{InvalidStopId, InvalidStopUrl, StopId};
pub use transport::TransportType;
