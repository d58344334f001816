//! Declared template kinds.

use std::fmt;

/// The `kind` of a template object.
///
/// Kinds the tool knows something about get a variant; everything else is
/// carried through as [`Kind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Label,
    CheckThreshold,
    CheckDeadman,
    Task,
    Dashboard,
    Variable,
    Other(String),
}

impl Kind {
    pub fn as_str(&self) -> &str {
        match self {
            Kind::Label => "Label",
            Kind::CheckThreshold => "CheckThreshold",
            Kind::CheckDeadman => "CheckDeadman",
            Kind::Task => "Task",
            Kind::Dashboard => "Dashboard",
            Kind::Variable => "Variable",
            Kind::Other(name) => name,
        }
    }
}

impl From<&str> for Kind {
    fn from(name: &str) -> Self {
        match name {
            "Label" => Kind::Label,
            "CheckThreshold" => Kind::CheckThreshold,
            "CheckDeadman" => Kind::CheckDeadman,
            "Task" => Kind::Task,
            "Dashboard" => Kind::Dashboard,
            "Variable" => Kind::Variable,
            other => Kind::Other(other.to_string()),
        }
    }
}

impl From<String> for Kind {
    fn from(name: String) -> Self {
        match Kind::from(name.as_str()) {
            Kind::Other(_) => Kind::Other(name),
            known => known,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
