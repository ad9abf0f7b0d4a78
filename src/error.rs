use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MacChangerError {
    #[error("Invalid hardware address: {0}")]
    InvalidAddress(String),

    #[error("OS {0} not supported by mac.changer module")]
    UnsupportedPlatform(String),

    #[error("Module {0} is already running")]
    AlreadyStarted(String),

    #[error("Module {0} is not running")]
    AlreadyStopped(String),

    #[error("Command {command} failed: {message}")]
    CommandFailed {
        command: String,
        message: String,
    },

    #[error("Interface error: {0}")]
    Interface(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error {0}")]
    Io(io::ErrorKind),

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Unknown or unsupported command: {0}")]
    UnknownCommand(String),
}

impl From<io::Error> for MacChangerError {
    fn from(err: io::Error) -> Self {
        MacChangerError::Io(err.kind())
    }
}

impl From<serde_yaml::Error> for MacChangerError {
    fn from(err: serde_yaml::Error) -> Self {
        MacChangerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MacChangerError>;
