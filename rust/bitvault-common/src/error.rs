use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn index_out_of_range(index: usize, capacity: usize) -> Error {
        Error(ErrorKind::IndexOutOfRange { index, capacity }.into())
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Error {
        Error(
            ErrorKind::Unsupported {
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    /// Returns `true` for errors raised by a bit index beyond the array's capacity.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::IndexOutOfRange { .. })
    }

    /// Returns `true` for errors raised by invalid construction or operand arguments.
    pub fn is_invalid_arg(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidArgument { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("index {index} is greater than the capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("not supported: {message}")]
    Unsupported { message: String },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
