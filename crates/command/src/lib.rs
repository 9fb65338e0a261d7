//! A chat-command framework for a Bedrock scripting host: typed argument
//! matchers, an arena command tree built by declarative registration, a
//! chat-intercepting dispatcher with permission and cooldown gates, and
//! help rendering over the same forest.
//!
//! Registration happens once at startup through an explicit
//! [`CommandRegistry`]; the dispatcher consults the forest read-only for the
//! rest of the process lifetime. Terminal callbacks always run on the tick
//! after the chat hook, never inside it.

mod argument;
mod context;
mod cooldown;
mod dispatcher;
mod error;
mod help;
mod node;
mod registry;
mod tokenizer;
mod value;

pub use argument::ArgumentType;
pub use context::{ArgumentSet, CommandCtx};
pub use dispatcher::{ChatOutcome, CommandDispatcher};
pub use error::{CommandError, CommandResult, InternalError, RuntimeError};
pub use help::{max_pages, render_command, render_page, PAGE_SIZE};
pub use node::{CommandData, Executor, NodeId, Requires};
pub use registry::{CommandBuilder, CommandRegistry};
pub use tokenizer::tokenize;
pub use value::Value;
