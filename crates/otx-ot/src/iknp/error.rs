use crate::base::BaseOtError;

/// Errors that can occur when using the extension sender.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum SenderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("base OT error: {0}")]
    BaseOt(#[from] BaseOtError),
    #[error("message count must be a non-zero multiple of 128: {0}")]
    InvalidCount(usize),
    #[error("count mismatch: m0 has {0} messages but m1 has {1}")]
    CountMismatch(usize, usize),
}

/// Errors that can occur when using the extension receiver.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ReceiverError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("base OT error: {0}")]
    BaseOt(#[from] BaseOtError),
    #[error("choice count must be a non-zero multiple of 128: {0}")]
    InvalidCount(usize),
}

/// Errors that can occur when persisting or loading public parameters.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum ParamsError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed public parameter encoding")]
    MalformedEncoding,
}
