//! SEO enrichment — sanitization, generation operations, and the per-post
//! decision workflow.

pub mod generator;
pub mod prompts;
pub mod sanitize;
pub mod workflow;
