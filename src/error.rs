//! Error types for manifest generation

use thiserror::Error;

/// Category of provider being resolved, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCategory {
    /// Infrastructure provider (docker, aws, baremetal)
    Infrastructure,
    /// Bootstrap provider (kubeadm)
    Bootstrap,
}

impl std::fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Bootstrap => write!(f, "bootstrap"),
        }
    }
}

/// Main error type for manifest generation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Provider identifier does not match any known variant
    #[error("unsupported {category} provider {name:?}")]
    UnsupportedProvider {
        /// Which kind of provider was requested
        category: ProviderCategory,
        /// The identifier as given by the caller
        name: String,
    },

    /// Generation options cannot be represented in the emitted manifests
    #[error("validation error: {0}")]
    Validation(String),

    /// Manifest type is not registered with the serializer scheme
    #[error("no kind {kind:?} is registered for version {api_version:?} (manifest {name:?})")]
    UnregisteredKind {
        /// API version of the manifest
        api_version: String,
        /// Kind of the manifest
        kind: String,
        /// Name of the manifest
        name: String,
    },

    /// YAML encoding failed for a manifest
    #[error("serialization error for {kind} {name:?}: {message}")]
    Serialization {
        /// Kind of the manifest
        kind: String,
        /// Name of the manifest
        name: String,
        /// Encoder message
        message: String,
    },

    /// Writing to the output sink failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unsupported provider error
    pub fn unsupported_provider(category: ProviderCategory, name: impl Into<String>) -> Self {
        Self::UnsupportedProvider {
            category,
            name: name.into(),
        }
    }

    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an unregistered kind error
    pub fn unregistered_kind(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::UnregisteredKind {
            api_version: api_version.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a serialization error for the given manifest
    pub fn serialization(
        kind: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Serialization {
            kind: kind.into(),
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Story: a typo in the provider flag names the offending value and category
    #[test]
    fn unsupported_provider_names_identifier_and_category() {
        let err = Error::unsupported_provider(ProviderCategory::Infrastructure, "azure");
        assert_eq!(
            err.to_string(),
            "unsupported infrastructure provider \"azure\""
        );

        let err = Error::unsupported_provider(ProviderCategory::Bootstrap, "talos");
        assert!(err.to_string().contains("bootstrap"));
        assert!(err.to_string().contains("talos"));
    }

    /// Story: encoding failures identify the manifest that could not be written
    #[test]
    fn encoding_errors_identify_the_manifest() {
        let err = Error::unregistered_kind("example.com/v1", "Widget", "widget-0");
        assert!(err.to_string().contains("Widget"));
        assert!(err.to_string().contains("widget-0"));

        let err = Error::serialization("Machine", "worker-0", "boom");
        assert_eq!(
            err.to_string(),
            "serialization error for Machine \"worker-0\": boom"
        );
    }

    #[test]
    fn validation_errors_carry_message() {
        match Error::validation("worker count too large") {
            Error::Validation(msg) => assert_eq!(msg, "worker count too large"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn io_errors_convert_from_std() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("closed"));
    }
}
