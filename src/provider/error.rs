use std::convert::From;
use std::error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    EventParse,
    EventMissingKey,
    TimeParse,
    ConfigParse,
    SourceParse,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::ErrorKind> for Error {
    fn from(kind: io::ErrorKind) -> Error {
        Error::from(io::Error::from(kind))
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::new(
            ErrorKind::SourceParse,
            &format!("Could not read event list: {}", error),
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::new(ErrorKind::ConfigParse, &error.to_string())
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        if let ErrorKind::IOError(err) = err.kind {
            err
        } else {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                err.message.unwrap_or_else(|| "invalid format".to_owned()),
            )
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::EventParse => "invalid event format".to_owned(),
            ErrorKind::EventMissingKey => "missing key in event definition".to_owned(),
            ErrorKind::TimeParse => "invalid time format".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::SourceParse => "invalid event source".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}
