//! Common types and utilities for the gsz compiler front end.
//!
//! This crate provides foundational types used across all gsz crates:
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, codes and message templates)
//! - Centralized recursion limits

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostics produced by the front-end passes
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

// Centralized limits and thresholds
pub mod limits;
