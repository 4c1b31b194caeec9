//! Storage infrastructure: the injector's TOML configuration file.
//!
//! The `config` sub-module reads the file given on the command line and
//! fills every missing field with the built-in default, so an absent or
//! partial file still yields a complete configuration.

pub mod config;
