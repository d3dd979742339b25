use thiserror::Error;

use std::io;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("property '{property}' is not declared on type '{type_name}'")]
    UndeclaredProperty { type_name: String, property: String },

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("unsupported top-level payload kind: {0}")]
    UnsupportedPayload(&'static str),

    #[error("'{0}' is not a decimal literal")]
    InvalidDecimal(String),

    #[error("writer already closed")]
    WriterClosed,

    #[error("write cancelled")]
    Cancelled,

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = core::result::Result<T, Error>;
