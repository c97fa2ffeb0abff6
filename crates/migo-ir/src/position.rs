use std::fmt;

/// Originating source location of a function or statement.
///
/// Line 0 is the "no position" sentinel carried by synthetic statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub filename: String,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(filename: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
        }
    }

    /// A position on `line` with no file or column information.
    pub fn line(line: usize) -> Self {
        Self {
            filename: String::new(),
            line,
            column: 0,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "-");
        }
        if !self.filename.is_empty() {
            write!(f, "{}:", self.filename)?;
        }
        write!(f, "{}", self.line)?;
        if self.column > 0 {
            write!(f, ":{}", self.column)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_invalid() {
        assert!(!Position::none().is_valid());
        assert_eq!(Position::none().to_string(), "-");
    }

    #[test]
    fn display_omits_missing_parts() {
        assert_eq!(Position::line(7).to_string(), "7");
        assert_eq!(Position::new("main.go", 12, 3).to_string(), "main.go:12:3");
    }
}
