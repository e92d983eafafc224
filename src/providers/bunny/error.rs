use crate::error::Error;
use std::fmt;
use thiserror::Error;

/// Accumulates the operation name and key/value context an error picked up
/// on its way out, so a failed API call can be correlated with the zone and
/// record it was about.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    op: &'static str,
    fields: Vec<(&'static str, String)>,
}

impl ErrorContext {
    pub fn new(op: &'static str) -> Self {
        ErrorContext {
            op,
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn wrap(self, kind: BunnyErrorKind) -> BunnyError {
        BunnyError {
            context: self,
            kind,
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op)?;
        if !self.fields.is_empty() {
            f.write_str("[")?;
            for (i, (key, value)) in self.fields.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{key}={value}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("{context}: {kind}")]
pub struct BunnyError {
    pub context: ErrorContext,
    #[source]
    pub kind: BunnyErrorKind,
}

#[derive(Debug, Error)]
pub enum BunnyErrorKind {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatus {
        status: u16,
        /// Best-effort decode of the error body; null when undecodable.
        body: serde_json::Value,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("no matching zone found for {0:?}")]
    ZoneNotFound(String),

    #[error("no record identifiers found for {0:?}")]
    RecordNotFound(String),
}

pub fn map_error(e: BunnyError) -> Error {
    match &e.kind {
        BunnyErrorKind::ZoneNotFound(_) | BunnyErrorKind::RecordNotFound(_) => {
            Error::NotFound(e.to_string())
        }
        _ => Error::Provider(e.to_string()),
    }
}
