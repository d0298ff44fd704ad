use std::{
    fmt::{self, Display, Formatter},
    slice::{Iter, IterMut},
};

use super::position::*;

/// An ordered sequence of lines. Lines can be rewritten in place or removed;
/// removal shifts the position of every later line down by one.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    lines: Vec<T>,
}

impl<T> Listing<T> {
    pub fn new() -> Self {
        Self { lines: vec![] }
    }

    pub fn push(&mut self, line: T) {
        self.lines.push(line);
    }

    pub fn get(&self, position: Position) -> Option<&T> {
        self.lines.get(position.0)
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        self.lines.get_mut(position.0)
    }

    /// Remove the line at `position`. Panics if the position is out of bounds.
    pub fn remove(&mut self, position: Position) -> T {
        self.lines.remove(position.0)
    }

    /// Remove every line at the given positions. The positions need not be sorted.
    pub fn remove_all(&mut self, mut positions: Vec<Position>) {
        positions.sort_unstable();
        positions.dedup();
        for position in positions.into_iter().rev() {
            self.lines.remove(position.0);
        }
    }

    pub fn iter_lines(&self) -> LinesIter<'_, T> {
        LinesIter {
            inner: self.lines.iter(),
            position: Position(0),
        }
    }

    /// Iterate over the lines strictly after `position`.
    pub fn iter_lines_after(&self, position: Position) -> impl Iterator<Item = (Position, &T)> {
        self.iter_lines().skip(position.below().0)
    }

    pub fn iter_instructions(&self) -> Iter<'_, T> {
        self.lines.iter()
    }

    pub fn iter_instructions_mut(&mut self) -> IterMut<'_, T> {
        self.lines.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> From<Vec<T>> for Listing<T> {
    fn from(lines: Vec<T>) -> Self {
        Self { lines }
    }
}
impl<T> FromIterator<T> for Listing<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}
impl<T: Display> Display for Listing<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

pub struct LinesIter<'item, T> {
    inner: Iter<'item, T>,
    position: Position,
}

impl<'item, T> Iterator for LinesIter<'item, T> {
    type Item = (Position, &'item T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|v| {
            let current = self.position;
            self.position = current.below();
            (current, v)
        })
    }
}
