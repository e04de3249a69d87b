use std::string::FromUtf8Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid header. Expected {expected}, found '{found}'")]
    BadHeader {
        expected: &'static str,
        found: String,
    },

    #[error("Unexpected end of data while reading {0}")]
    TruncatedData(&'static str),

    #[error("String data is not valid UTF-8")]
    EncodingError(#[source] FromUtf8Error),

    #[error("Unknown property tag '{0}'")]
    UnknownTag(String),

    #[error("Length {0} cannot be represented by a string length prefix")]
    LengthOverflow(u64),

    #[error("Attribute line or block too large to encode ({0})")]
    TooManyValues(usize),

    #[error("Malformed text at line {line}: {reason}")]
    MalformedText { line: usize, reason: String },

    #[error("I/O failure")]
    Io(#[source] std::io::Error),
}

impl Error {
    /// Maps a failed primitive read to `TruncatedData` when the stream ran dry.
    pub(crate) fn from_read(what: &'static str) -> impl FnOnce(std::io::Error) -> Error {
        move |e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::TruncatedData(what)
            } else {
                Error::Io(e)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
