//! Scrape → generate → parse → export, as one run.

pub mod handlers;
pub mod prompts;
pub mod runner;
