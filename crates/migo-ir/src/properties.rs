//! Line-indexed annotations interleaved into annotated renderings.

use std::collections::BTreeMap;

use crate::position::Position;

/// Annotation strings keyed by source line.
///
/// Each line's annotations are handed out once: [`take`](Self::take) removes
/// them. Whatever is left after a full render never found a matching
/// function or statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Properties {
    by_line: BTreeMap<usize, Vec<String>>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate annotations with a source line, after any already registered.
    pub fn add<S: Into<String>>(&mut self, line: usize, props: impl IntoIterator<Item = S>) {
        let entry = self.by_line.entry(line).or_default();
        entry.extend(props.into_iter().map(Into::into));
    }

    /// Consume the annotations of `pos`'s line.
    ///
    /// Positions without a line never match, so annotations registered at
    /// line 0 are never handed out and surface through
    /// [`drain_remaining`](Self::drain_remaining).
    pub fn take(&mut self, pos: &Position) -> Vec<String> {
        if !pos.is_valid() {
            return Vec::new();
        }
        self.by_line.remove(&pos.line).unwrap_or_default()
    }

    /// All remaining annotations, by ascending line, without consuming them.
    pub fn values(&self) -> Vec<String> {
        self.by_line.values().flatten().cloned().collect()
    }

    /// Consume and return everything left in the registry.
    pub fn drain_remaining(&mut self) -> Vec<String> {
        std::mem::take(&mut self.by_line)
            .into_values()
            .flatten()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    /// Number of annotation strings left.
    pub fn len(&self) -> usize {
        self.by_line.values().map(Vec::len).sum()
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for Properties {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (line, prop) in iter {
            props.add(line, [prop]);
        }
        props
    }
}
