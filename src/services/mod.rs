//! Service layer module
//!
//! Contains failure classification and the demo runner

pub mod diagnosis;
pub mod runner;

pub use diagnosis::{classify, classify_facts, Diagnosis, ErrorFacts, Guidance};
pub use runner::{Console, Outcome, Runner};
