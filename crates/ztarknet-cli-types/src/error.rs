use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Conversion error: {0}")]
    ConversionError(#[from] ConversionError),
    #[error(transparent)]
    JsonError(#[from] JsonError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Value is out of range: {0}")]
    OutOfRangeError(String),
    #[error("Error converting from hex string: {0}")]
    CustomFromHexError(String),
    #[error("Invalid short string: {0}")]
    ShortStringError(String),
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Error: {msg}")]
    Custom { msg: String },
}

pub type TypesResult<T, E = Error> = Result<T, E>;
