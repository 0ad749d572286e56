//! coursebook-core library.
//!
//! Record model, versioned course book, command parser and executor, and the
//! session that ties them to a storage backend. Front-ends feed raw input
//! lines to [`session::Session::execute`] and render the returned
//! [`command::CommandResult`].

pub mod book;
pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod manager;
pub mod model;
pub mod parser;
pub mod sample;
pub mod session;
pub mod storage;
pub mod versioned;
pub mod view;

/// # Conventions
///
/// - **Errors**: typed `thiserror` enums per layer, each mapping to an
///   [`error::ErrorCode`]. Failing commands leave the course book untouched.
/// - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).
pub fn init() {
    tracing::info!("coursebook-core initialized");
}
