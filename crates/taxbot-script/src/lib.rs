//! Taxbot-5000 — Script Authoring bounded context.
//!
//! Owns the scripted steps, the initial greeting and the tagline, the
//! derived usable script, and the JSON document format used for export and
//! import.

pub mod application;
pub mod domain;
