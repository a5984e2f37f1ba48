//! Live adapters that call real external APIs.

pub mod gemini;
