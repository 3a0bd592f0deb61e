//! Response parsing: turns free-form generated text into structured trial and
//! group records. Pure and synchronous; malformed input degrades to "NA" fields
//! or dropped records, never to an error.

pub mod cleanup;
pub mod grammar;
pub mod groups;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod questions;
pub mod trial;

pub use cleanup::DegenerateFilter;
pub use models::ParsedResultSet;
pub use parser::ResponseParser;
