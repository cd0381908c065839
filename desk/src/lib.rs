//! Box office desk: configuration and startup for the `boxoffice` binary.

pub mod bootstrap;
pub mod config;

pub use bootstrap::{init_tracing, open_box_office};
pub use config::Config;
