use std::fmt::{self, Display, Formatter};

/// Counts of the rewrites made by one run of the optimiser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimisationStats {
    pub folds: usize,
    pub propagations: usize,
    pub dead_code: usize,
    pub subexpressions: usize,
    pub redundant_assignments: usize,
    pub array_loads: usize,
    pub instructions_before: usize,
    pub instructions_after: usize,
}
impl OptimisationStats {
    /// The number of instructions removed from the listing.
    pub fn eliminated(&self) -> usize {
        self.instructions_before
            .saturating_sub(self.instructions_after)
    }

    fn eliminated_percentage(&self) -> f64 {
        if self.instructions_before == 0 {
            0.0
        } else {
            self.eliminated() as f64 * 100.0 / self.instructions_before as f64
        }
    }
}
impl Display for OptimisationStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "=== Code Optimization Statistics ===")?;
        writeln!(
            f,
            "Instructions before optimization: {}",
            self.instructions_before
        )?;
        writeln!(
            f,
            "Instructions after optimization:  {}",
            self.instructions_after
        )?;
        writeln!(
            f,
            "Instructions eliminated: {} ({:.1}%)",
            self.eliminated(),
            self.eliminated_percentage()
        )?;
        writeln!(f)?;
        writeln!(f, "Optimization breakdown:")?;
        writeln!(f, "- Constant folding:           {}", self.folds)?;
        writeln!(f, "- Constant propagation:       {}", self.propagations)?;
        writeln!(f, "- Dead code elimination:      {}", self.dead_code)?;
        writeln!(f, "- Common subexpression:       {}", self.subexpressions)?;
        writeln!(
            f,
            "- Redundant assignment:       {}",
            self.redundant_assignments
        )?;
        writeln!(f, "- Array access optimization:  {}", self.array_loads)?;
        write!(f, "=====================================")
    }
}
