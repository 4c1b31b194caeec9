//! Infrastructure layer for the injector.
//!
//! Contains the OS-facing adapters: the Unix socket listener, the
//! diagnostics log file, the TOML config file, and concrete target surfaces.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touch_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`listener`** – Background thread that accepts one-shot socket
//!   connections, decodes each payload, and hands the command to the
//!   foreground over a bounded channel.
//! - **`diagnostics`** – Append-only, timestamped debug log shared by both
//!   threads.
//! - **`storage`** – TOML configuration with per-field defaults.
//! - **`surface`** – `TargetSurface` implementations that need no GUI
//!   toolkit: a logging headless surface and a recording mock.

pub mod diagnostics;
pub mod listener;
pub mod storage;
pub mod surface;
