pub mod args;
pub mod commands;
mod config;
pub mod debounce;
mod error;
pub mod format;
pub mod model;
pub mod screen;
pub mod source;
mod utils;
pub mod view_model;

#[cfg(test)]
mod test;

pub use config::{Config, Overrides};
pub use error::Error;
pub use error::FetchError;
pub use error::Result;
