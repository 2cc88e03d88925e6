//! # sonde-report
//!
//! Renderers for [`AuditReport`](sonde_audit::AuditReport) run handles.
//!
//! Rendering is a pure function of the report: nothing here re-runs a
//! probe, touches the store, or holds state between calls. Two formats are
//! provided: a fixed-width text table for terminals and JSON for machine
//! consumption.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod json;
pub mod text;

pub use json::render_json;
pub use text::render_text;
