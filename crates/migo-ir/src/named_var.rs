use std::fmt;

/// A variable, channel or lock identified by a stable name.
///
/// Two `NamedVar`s are the same storage identity iff their names are equal,
/// so they can be used directly as map and set keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(transparent))]
pub struct NamedVar {
    name: String,
}

impl NamedVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for NamedVar {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NamedVar {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for NamedVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
