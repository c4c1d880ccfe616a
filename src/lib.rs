//! Agency Assistant - guardrailed chat workflow for the agency's client assistant.
//!
//! Each user message passes a content-safety gate, has PII masked across the
//! conversation, is classified by intent and is answered by the matching
//! specialist agent.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
