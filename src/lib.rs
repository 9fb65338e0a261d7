//! Chat ranks for a Bedrock scripting host, built on the workspace's
//! chat-command framework.
//!
//! The embedding engine constructs one [`App`] and forwards its hooks:
//! outgoing chat to [`App::handle_chat`], the tick to [`App::tick`],
//! disconnects to [`App::actor_left`], and script events to
//! [`App::handle_script_event`]. Everything else (ranks as actor tags, the
//! persisted config, the `help` and `chatRank` commands) hangs off that.

mod app;
mod commands;
pub mod config;
pub mod ranks;
pub mod relay;

pub use app::{App, OP_EVENT_ID};
