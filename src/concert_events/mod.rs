//! Concerts users attended, with venue, city and date.

mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{ConcertEvent, ConcertUpdate};
pub use store::SqliteConcertStore;
pub use trait_def::{ConcertError, ConcertResult, ConcertStore};
