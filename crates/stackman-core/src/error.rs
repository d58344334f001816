//! Error types for template splitting and uniting.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The error type for every core operation.
///
/// None of these are recovered internally: the first one aborts the whole
/// `split` or `unite` call.
#[derive(Debug, Error)]
pub enum Error {
    /// A document unit could not be parsed into an object.
    #[error("unable to decode {context}: {message}")]
    Decode { context: String, message: String },

    /// A strict locator did not find a key it requires.
    #[error("unable to find key {key:?} in {context}")]
    MissingKey { key: String, context: String },

    /// An object name that cannot be used as a directory once escaped.
    #[error("{kind} name {name:?} is not a usable directory name once escaped")]
    InvalidName { kind: String, name: String },

    /// Two objects of the same kind map to the same directory.
    #[error("name collision detected: {} appears more than once", path.display())]
    NameCollision {
        kind: String,
        name: String,
        path: PathBuf,
    },

    /// A filesystem operation failed.
    #[error("unable to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template references a script file that does not exist.
    #[error("script file {} referenced by {} does not exist", path.display(), template.display())]
    MissingScriptFile { path: PathBuf, template: PathBuf },

    /// A `file://` reference that is not a plain sibling file name.
    #[error("invalid script reference {reference:?} in {}", template.display())]
    InvalidScriptReference { reference: String, template: PathBuf },

    /// A template file is not valid template syntax.
    #[error("unable to parse template {}: {source}", path.display())]
    TemplateSyntax {
        path: PathBuf,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// Strict templating hit a reference the data does not resolve.
    #[error("unable to execute template {}: {source}", path.display())]
    TemplateData {
        path: PathBuf,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// The data file extension is not one we know how to parse.
    #[error("unrecognised data format {extension:?} for {}", path.display())]
    UnsupportedDataFormat { path: PathBuf, extension: String },

    /// The data file could not be parsed.
    #[error("unable to parse data file {}: {message}", path.display())]
    DataParse { path: PathBuf, message: String },

    /// Writing the united stream failed.
    #[error("unable to write template stream: {source}")]
    Encode {
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn decode(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Prefix the location of a decode or lookup failure with where the
    /// offending object lives.
    pub(crate) fn within(self, location: impl fmt::Display) -> Self {
        match self {
            Self::Decode { context, message } => Self::Decode {
                context: format!("{location}: {context}"),
                message,
            },
            Self::MissingKey { key, context } => Self::MissingKey {
                key,
                context: format!("{location}: {context}"),
            },
            other => other,
        }
    }
}

/// Result type alias using the core error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_prefixes_lookup_errors() {
        let err = Error::MissingKey {
            key: "query".into(),
            context: "spec".into(),
        }
        .within("templates/Task/nightly");

        assert_eq!(
            err.to_string(),
            "unable to find key \"query\" in templates/Task/nightly: spec"
        );
    }

    #[test]
    fn test_within_leaves_other_errors_alone() {
        let err = Error::MissingScriptFile {
            path: "a/missing.flux".into(),
            template: "a/template.yml".into(),
        }
        .within("elsewhere");

        assert!(matches!(err, Error::MissingScriptFile { .. }));
        assert!(!err.to_string().contains("elsewhere"));
    }
}
