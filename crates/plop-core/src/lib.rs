//! Domain types shared across the plop crates.
//!
//! Defines the event record and context enums, the exact-match command
//! vocabulary, and the timezone-aware timestamp helpers the aggregation
//! queries depend on.

pub mod command;
pub mod record;
pub mod time_utils;

pub use command::{classify, Classification, Command, Window};
pub use record::{ContextKind, EventRecord, RegistryEntry, RegistryKind, UNKNOWN_USER_NAME};
pub use time_utils::{
    format_timestamp, parse_timestamp, same_month, today_prefix, week_start, TIMESTAMP_FORMAT,
};
