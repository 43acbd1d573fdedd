//! adorn-quality — Grayscale image statistics for quality-aware feathering.
//!
//! Derives the coarse signals (brightness, contrast, edge density) that the
//! geometry engine's feathering and padding nudges consume. The engine
//! itself never reads pixels; this crate is its quality-signal collaborator.

pub mod stats;

pub use stats::{assess, QualityReport, StatsError};
