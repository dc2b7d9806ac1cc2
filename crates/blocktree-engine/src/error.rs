use std::fmt;

/// Identifies which external collaborator reported a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    BlockSource,
    ContentFilter,
    BlockRenderer,
    ShortcodeExpander,
    ReferenceResolver,
    Hook,
}

impl Collaborator {
    /// Wraps a collaborator failure so it can be propagated with `?`.
    pub(crate) fn failed(self) -> impl FnOnce(anyhow::Error) -> ConvertError {
        move |source| ConvertError::Collaborator {
            collaborator: self,
            source,
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::BlockSource => "block source",
            Collaborator::ContentFilter => "content filter",
            Collaborator::BlockRenderer => "block renderer",
            Collaborator::ShortcodeExpander => "shortcode expander",
            Collaborator::ReferenceResolver => "reference resolver",
            Collaborator::Hook => "conversion hook",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Malformed block record: {reason}")]
    MalformedBlock { reason: String },

    #[error("The {collaborator} failed: {source}")]
    Collaborator {
        collaborator: Collaborator,
        #[source]
        source: anyhow::Error,
    },

    #[error("Reference cycle detected while expanding block reference {id}")]
    ReferenceCycle { id: String },
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::MalformedBlock {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_failure_names_the_collaborator() {
        let err = Collaborator::BlockRenderer.failed()(anyhow::anyhow!("template missing"));
        assert_eq!(
            err.to_string(),
            "The block renderer failed: template missing"
        );
    }

    #[test]
    fn collaborator_failure_keeps_source() {
        use std::error::Error;

        let err = Collaborator::ReferenceResolver.failed()(anyhow::anyhow!("db offline"));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("db offline"));
    }

    #[test]
    fn json_errors_become_malformed_blocks() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ConvertError::from(json_err);
        assert!(matches!(err, ConvertError::MalformedBlock { .. }));
    }
}
