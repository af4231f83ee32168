//! Serve a browsable view of a ninja build graph: every page shows one node,
//! how it is built and what consumes it, with links to its neighbours.

#[macro_use]
extern crate tracing;

pub mod browser;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod parse;
pub mod query;
pub mod render;
pub mod server;
pub mod url_encode_path;

#[cfg(test)]
mod utils;
