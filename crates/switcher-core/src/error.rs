//! # Switch Error Types
//!
//! Every failure upstream of filtering aborts the invocation. The variants
//! name the stage that failed so callers can report it.

use std::fmt;

use thiserror::Error;

/// Switch operation result type
pub type SwitchResult<T> = Result<T, SwitchError>;

/// Errors produced while resolving switches
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("cannot decode composite resource metadata: {source}")]
    MetadataDecode { source: serde_json::Error },

    #[error("cannot render template '{template}': {message}")]
    Render { template: String, message: String },

    #[error("cannot read desired composed resource '{resource}': {reason}")]
    UpstreamRead { resource: String, reason: String },
}

/// Stage of an invocation that produced a [`SwitchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchStage {
    MetadataDecode,
    Render,
    UpstreamRead,
}

impl SwitchStage {
    pub fn as_str(self) -> &'static str {
        match self {
            SwitchStage::MetadataDecode => "metadata-decode",
            SwitchStage::Render => "render",
            SwitchStage::UpstreamRead => "upstream-read",
        }
    }
}

impl fmt::Display for SwitchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SwitchError {
    /// Create a render error labelled with the template name
    pub fn render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Create an error for a desired resource that cannot be read
    pub fn upstream_read(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpstreamRead {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn stage(&self) -> SwitchStage {
        match self {
            SwitchError::MetadataDecode { .. } => SwitchStage::MetadataDecode,
            SwitchError::Render { .. } => SwitchStage::Render,
            SwitchError::UpstreamRead { .. } => SwitchStage::UpstreamRead,
        }
    }
}

impl From<serde_json::Error> for SwitchError {
    fn from(source: serde_json::Error) -> Self {
        Self::MetadataDecode { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_display() {
        let err = SwitchError::render("switcher.fn.kndp.io/enabled", "unexpected '}'");
        assert_eq!(
            err.to_string(),
            "cannot render template 'switcher.fn.kndp.io/enabled': unexpected '}'"
        );
        assert_eq!(err.stage(), SwitchStage::Render);
    }

    #[test]
    fn test_upstream_read_error_display() {
        let err = SwitchError::upstream_read("bucket", "resource is not an object");
        assert!(err.to_string().contains("'bucket'"));
        assert_eq!(err.stage(), SwitchStage::UpstreamRead);
    }

    #[test]
    fn test_metadata_decode_from_serde() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err: SwitchError = source.into();
        assert_eq!(err.stage(), SwitchStage::MetadataDecode);
        assert!(err
            .to_string()
            .starts_with("cannot decode composite resource metadata"));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(SwitchStage::MetadataDecode.to_string(), "metadata-decode");
        assert_eq!(SwitchStage::Render.as_str(), "render");
        assert_eq!(SwitchStage::UpstreamRead.as_str(), "upstream-read");
    }
}
