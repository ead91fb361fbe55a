//! Terminal UI layer for the interactive tutor.
//!
//! - [`chat_loop`]: the event loop that feeds key presses to
//!   [`crate::commands`] and hands turns to [`crate::core::tutor::TurnService`].
//! - [`renderer`] and [`markdown`]: frame output for the transcript, composer
//!   and key screen.
//! - [`content`]: cleanup applied to model replies before they are rendered.
//! - [`theme`]: color and style policy.
//!
//! This layer only presents state; [`crate::core`] owns the conversation.

pub mod chat_loop;
pub mod content;
pub mod markdown;
pub mod renderer;
pub mod theme;
