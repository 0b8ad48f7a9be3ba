//! Paths: sibling-index sequences from a tree root.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn root() -> Self { Path(Vec::new()) }
    pub fn is_root(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn as_slice(&self) -> &[usize] { &self.0 }

    /// Path of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Path {
        let mut v = self.0.clone();
        v.push(index);
        Path(v)
    }

    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() { return None; }
        Some(Path(self.0[..self.0.len() - 1].to_vec()))
    }

    /// `self` is an ancestor-or-self of `other`.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Strictly left of `other` in document order; ancestors are neither before nor after.
    pub fn is_before(&self, other: &Path) -> bool {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            if a != b { return a < b; }
        }
        false
    }

    pub fn is_after(&self, other: &Path) -> bool {
        !self.is_before(other) && !self.is_prefix_of(other) && !other.is_prefix_of(self)
    }
}

impl From<Vec<usize>> for Path {
    fn from(v: Vec<usize>) -> Self { Path(v) }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{}", idx)?;
        }
        write!(f, ")")
    }
}
