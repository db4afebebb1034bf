//! Release failure types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ReleaseError {
    /// A resource failed to release; the message is reported as-is.
    #[error("{message}")]
    Failed { message: String },

    #[error("failed to release {resource}: {message}")]
    Resource { resource: String, message: String },
}

impl ReleaseError {
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn resource(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resource {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Name of the resource that failed, when known
    #[must_use]
    pub fn resource_name(&self) -> Option<&str> {
        match self {
            Self::Resource { resource, .. } => Some(resource),
            Self::Failed { .. } => None,
        }
    }
}

impl UserFacingError for ReleaseError {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Self::Failed { message } => Cow::Borrowed(message.as_str()),
            Self::Resource { .. } => Cow::Owned(self.to_string()),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Failed { .. } => "release.failed",
            Self::Resource { .. } => "release.resource_failed",
        })
    }
}
