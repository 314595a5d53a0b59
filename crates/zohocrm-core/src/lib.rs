//! Core types: normalized contacts, phone labels, tracing setup

pub mod contact;
pub mod tracing;

pub use contact::{ContactDraft, NormalizedContact, PhoneLabel, PhoneNumber};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
