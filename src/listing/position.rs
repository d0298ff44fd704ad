use std::fmt::{self, Display, Formatter};

/// The index of a line in a listing, counting from zero.
///
/// Positions are only meaningful until the listing is next shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub usize);

impl Position {
    /// The position of the line directly below this one.
    pub fn below(self) -> Self {
        Self(self.0 + 1)
    }
}
impl Display for Position {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "line {}", self.0)
    }
}
