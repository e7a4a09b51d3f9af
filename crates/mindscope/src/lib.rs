//! MindScope wellness self-assessment: question catalog, scoring engine, and the
//! service surface that exposes them over HTTP and the command line.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
