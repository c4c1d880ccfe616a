//! Agents module - LLM personas and the classification that routes to them.
//!
//! ## Key Types
//!
//! - [`Agent`] - Stateless persona descriptor (instructions, model, tools, schema)
//! - [`Instructions`] - Static prompt or a function of the [`RunContext`]
//! - [`ClassificationResult`] / [`Intent`] - The classifier's routing decision
//!
//! The concrete agents live in [`catalog`].

mod agent;
pub mod catalog;
mod classification;

pub use agent::{Agent, Instructions, OutputSchema, RunContext, LANGUAGE_KEY};
pub use classification::{ClassificationResult, Intent};
