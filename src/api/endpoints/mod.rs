//! API endpoint handlers.
//!
//! `pages` serves the embedded HTML; the rest are the JSON endpoints
//! the page drives. Handlers stay thin and call into `form`/`core_state`.

pub mod form;
pub mod health;
pub mod pages;
pub mod session;
