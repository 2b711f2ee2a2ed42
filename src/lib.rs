pub mod analytics;
pub mod calendar;
pub mod config;
pub mod error;
pub mod growth;
pub mod model;
pub mod render;
pub mod store;

pub use error::{Error, ErrorKind, Result};
