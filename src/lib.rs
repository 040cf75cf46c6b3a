//! Film lists: named film lists and a watchlist persisted to a key-value
//! string store.
//!
//! [`lists::ListStore`] owns persistence, [`controller::Controller`] maps UI
//! actions onto it, and [`console`] is the terminal front end used by the
//! `film-lists` binary.

pub mod catalog;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod film;
pub mod lists;
pub mod logger;
pub mod render;
pub mod store;
