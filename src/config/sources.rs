//! Configuration sources, applied in order after the defaults.

pub mod config_file;
pub mod environment;
