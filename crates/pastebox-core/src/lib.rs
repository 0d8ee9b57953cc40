pub mod action;
pub mod config;
pub mod demo;
pub mod error;
pub mod io;
pub mod poller;
pub mod publisher;
pub mod schedule;
pub mod slot;
pub mod store;

pub use error::{PasteboxError, Result};
