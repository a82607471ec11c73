//! # CLI Module
//!
//! Command-line access to route tables.
//!
//! ## Commands
//!
//! ### `dump`
//!
//! Print the routing tree built from a route table:
//!
//! ```bash
//! radixmux dump --config routes.toml
//! ```
//!
//! ### `resolve`
//!
//! Show which registered pattern answers each path:
//!
//! ```bash
//! radixmux resolve --config routes.toml /api/users/42 /missing
//! ```
//!
//! ### `dispatch`
//!
//! Run synthetic requests through the router and print status and body:
//!
//! ```bash
//! radixmux dispatch --config routes.toml --trace -H 'x-request-id: 01J...' /static/app.js
//! ```
//!
//! `--config` can also come from `RADIXMUX_ROUTES`.

mod commands;


pub use self::commands::{run_cli, Cli, Commands};
