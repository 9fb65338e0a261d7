use thiserror::Error;

/// Expected, user-visible failures. These are replied to the sender and
/// never propagate past the dispatcher.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("§cYou do not have permission to use \"{command}\"")]
    PermissionDenied { command: String },
    #[error("{0}")]
    Message(String),
}

/// Command registration bugs. These indicate a broken tree built at startup
/// and are logged rather than shown to the player.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error("argument \"{name}\" not found in argument set (command registration bug)")]
    MissingArgument { name: String },
    #[error("argument \"{name}\" has wrong type, expected {expected} (command registration bug)")]
    WrongArgumentType { name: String, expected: String },
    #[error("{message}")]
    Message { message: String },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CommandError {
    pub fn runtime(message: impl Into<String>) -> Self {
        CommandError::Runtime(RuntimeError::Message(message.into()))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::Internal(InternalError::Message {
            message: message.into(),
        })
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
