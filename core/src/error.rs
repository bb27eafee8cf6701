use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownCommand(std::string::String),
    UnknownStatus(std::string::String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::UnknownCommand(msg) => write!(f, "Unknown command: {}", msg),
            ParseError::UnknownStatus(msg) => write!(f, "Unknown command status: {}", msg),
        }
    }
}

impl error::Error for ParseError {}
