use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of the attachment upload call
#[derive(Error, Debug)]
pub enum UploadError {
    /// The local file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file does not match the picker's accepted types
    #[error("{file} ({mime_type}) is not accepted here, expected {accept}")]
    Rejected {
        file: String,
        mime_type: String,
        accept: &'static str,
    },

    /// Transport-level failures (connect, timeout, body read)
    #[error("Upload request failed: {0}")]
    Transport(String),

    /// Non-2xx status from the storage endpoint
    #[error("Upload rejected with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body lacks the file reference
    #[error("Malformed upload response: {0}")]
    MalformedResponse(String),
}

/// Failure of the completion call
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Transport(String),

    #[error("Completion rejected with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion response contains no candidates")]
    NoCandidates,

    #[error("Completion candidate carries no text: {0}")]
    NoContent(String),
}

/// Unified error type for the chat client
#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Nothing to send: blank text and no pending attachments
    #[error("Nothing to send: type a message or attach a file")]
    EmptyMessage,

    /// A round trip is already in flight
    #[error("A request is still in flight, wait for it to finish")]
    Busy,

    #[error("No API key set, use /key or --api-key")]
    MissingApiKey,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// Describe a reqwest failure the same way for both network calls.
pub fn describe_reqwest_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("Request timed out: {}", err)
    } else if err.is_connect() {
        format!("Connection failed: {}", err)
    } else if err.is_decode() || err.is_body() {
        format!("Failed to read response body: {}", err)
    } else {
        format!("Request failed: {}", err)
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Transport(describe_reqwest_error(&err))
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        CompletionError::Transport(describe_reqwest_error(&err))
    }
}

impl From<rustyline::error::ReadlineError> for ChatError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ChatError::Input(format!("Line editor error: {}", err))
    }
}

impl ChatError {
    /// Whether the session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ChatError::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_component_errors_transparently() {
        let err: ChatError = CompletionError::NoCandidates.into();
        assert_eq!(
            err.to_string(),
            "Completion response contains no candidates"
        );

        let err: ChatError = UploadError::MalformedResponse("missing file.uri".into()).into();
        assert!(matches!(err, ChatError::Upload(_)));
        assert_eq!(err.to_string(), "Malformed upload response: missing file.uri");
    }

    #[test]
    fn io_errors_are_not_recoverable() {
        let err: ChatError = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(!err.is_recoverable());
        assert!(ChatError::EmptyMessage.is_recoverable());
        assert!(ChatError::Busy.is_recoverable());
    }
}
