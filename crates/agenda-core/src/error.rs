use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgendaError {
    #[error("not initialized: run 'agenda init'")]
    NotInitialized,

    #[error("last week's agenda not found: {}", .0.display())]
    MissingAgenda(PathBuf),

    #[error("cannot parse {document}: {reason}")]
    Parse { document: String, reason: String },

    #[error("{section}: no entry for {key}")]
    LookupMiss { section: String, key: String },

    #[error("{section}: anchor not found (expected a line matching `{pattern}`)")]
    AnchorNotFound { section: String, pattern: String },

    #[error("external collaborator failed: {0}")]
    Collaborator(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl AgendaError {
    pub fn parse(document: impl Into<String>, reason: impl Into<String>) -> Self {
        AgendaError::Parse {
            document: document.into(),
            reason: reason.into(),
        }
    }

    pub fn lookup_miss(section: impl Into<String>, key: impl ToString) -> Self {
        AgendaError::LookupMiss {
            section: section.into(),
            key: key.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgendaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bad_yaml_config_is_yaml_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(crate::paths::config_path(dir.path()), "title: [unclosed\n").unwrap();
        let err = crate::config::Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, AgendaError::Yaml(_)));
    }

    #[test]
    fn helpers_build_readable_messages() {
        assert_eq!(
            AgendaError::lookup_miss("pastor_prayer", "row 3").to_string(),
            "pastor_prayer: no entry for row 3"
        );
        assert_eq!(
            AgendaError::parse("pages", "no entries found").to_string(),
            "cannot parse pages: no entries found"
        );
    }
}
