//! Tutor is a terminal chat client that walks students through math and
//! science problems with a Gemini model.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation store, the provider session and turn
//!   dispatch, plus the interactive [`core::app::App`] state.
//! - [`api`] defines the Gemini wire types, the HTTP client and the
//!   connectivity probe.
//! - [`auth`] resolves the API key from the environment or the system keyring.
//! - [`ui`] renders the terminal interface and runs the interactive event loop.
//! - [`commands`] implements the slash commands typed into the composer.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
