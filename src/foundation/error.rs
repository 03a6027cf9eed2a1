pub type TemplatrResult<T> = Result<T, TemplatrError>;

#[derive(thiserror::Error, Debug)]
pub enum TemplatrError {
    #[error("validation error: {0}")]
    Validation(String),

    /// A source image could not be loaded or decoded.
    #[error("image decode error: '{reference}': {message}")]
    Decode { reference: String, message: String },

    /// Zero-sized or non-finite sizes reached a validated constructor.
    #[error("degenerate geometry: {0}")]
    Geometry(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TemplatrError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            reference: reference.into(),
            message: message.into(),
        }
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for failures that concern a source image rather than the caller's input.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

impl From<serde_json::Error> for TemplatrError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
