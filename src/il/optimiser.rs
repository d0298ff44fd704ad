use crate::{listing::Position, prelude::*};

use super::{stats::OptimisationStats, tac::*};

/// The number of instructions a forward scan looks at before giving up.
pub const SCAN_HORIZON: usize = 1000;

/// Run the optimiser pipeline over a listing, rewriting it in place.
pub fn optimise(listing: &mut TacListing) -> OptimisationStats {
    let mut optimiser = Optimiser::new(listing);
    optimiser.optimise();
    optimiser.stats
}

struct Optimiser<'l> {
    listing: &'l mut TacListing,
    stats: OptimisationStats,
}
impl<'l> Optimiser<'l> {
    fn new(listing: &'l mut TacListing) -> Self {
        Self {
            listing,
            stats: OptimisationStats::default(),
        }
    }

    /// Run every pass once, in order. Later passes rely on the earlier ones:
    /// propagation expects literal operations to be folded already.
    fn optimise(&mut self) {
        self.stats.instructions_before = self.listing.len();

        self.fold_constants();
        self.propagate_constants();
        self.forward_copies();
        self.remove_self_assignments();
        self.eliminate_dead_code();
        self.eliminate_common_subexpressions();
        self.eliminate_redundant_array_loads();

        self.stats.instructions_after = self.listing.len();
        debug!(
            "Optimised {} instructions down to {}",
            self.stats.instructions_before, self.stats.instructions_after
        );
    }

    /// The end (exclusive) of a forward scan starting after `position`.
    fn scan_end(&self, position: usize) -> usize {
        self.listing.len().min(position + 1 + SCAN_HORIZON)
    }

    /// Replace operations over literals by their value.
    /// Optimises:
    /// ```text
    /// t1 := #3 * #4
    /// ```
    /// To:
    /// ```text
    /// t1 := #12
    /// ```
    fn fold_constants(&mut self) {
        for instr in self.listing.iter_instructions_mut() {
            if instr.fold() {
                trace!("Folded into {}", instr);
                self.stats.folds += 1;
            }
        }
        debug!("Constant folding: {}", self.stats.folds);
    }

    /// Substitute a constant for the name it was assigned to, until that name
    /// is assigned again. Instructions that end up with only literal operands
    /// are folded straight away.
    /// Optimises:
    /// ```text
    /// t1 := #12
    /// a := #2 + t1
    /// ```
    /// To:
    /// ```text
    /// t1 := #12
    /// a := #14
    /// ```
    fn propagate_constants(&mut self) {
        for position in 0..self.listing.len() {
            let Some((target, value)) = self
                .listing
                .get(Position(position))
                .and_then(TacInstr::as_constant_assign)
                .map(|(target, value)| (target.clone(), value.clone()))
            else {
                continue;
            };

            for line in position + 1..self.scan_end(position) {
                let Some(instr) = self.listing.get_mut(Position(line)) else {
                    break;
                };
                // A call may assign to any variable through a global.
                if instr.is_boundary() || (target.is_variable() && instr.is_call()) {
                    break;
                }

                if instr.replace_reads(&target, &value) > 0 {
                    self.stats.propagations += 1;
                    if instr.fold() {
                        self.stats.folds += 1;
                    }
                    trace!("Propagated {} := {} into {}", target, value, instr);
                }

                if instr.writes_to(&target) {
                    break;
                }
            }
        }
        debug!("Constant propagation: {}", self.stats.propagations);
    }

    /// Forward the source of a copy into a copy that immediately follows it.
    /// Optimises:
    /// ```text
    /// x := a
    /// y := x
    /// ```
    /// To:
    /// ```text
    /// x := a
    /// y := a
    /// ```
    fn forward_copies(&mut self) {
        for position in 1..self.listing.len() {
            let Some((first, source)) = self
                .listing
                .get(Position(position - 1))
                .and_then(TacInstr::as_assign)
                .filter(|(target, source)| target != source)
                .map(|(target, source)| (target.clone(), source.clone()))
            else {
                continue;
            };

            if let Some(TacInstr::Assign(_, value)) = self.listing.get_mut(Position(position)) {
                if *value == first {
                    trace!("Forwarding {} into {}", source, Position(position));
                    *value = source;
                    self.stats.redundant_assignments += 1;
                }
            }
        }
    }

    /// Remove copies of a name into itself.
    fn remove_self_assignments(&mut self) {
        let self_copies: Vec<_> = self
            .listing
            .iter_lines()
            .match_instruction(TacInstr::as_assign)
            .filter(|(_, (target, value))| target == value)
            .map(|(position, _)| position)
            .collect();

        self.stats.redundant_assignments += self_copies.len();
        self.listing.remove_all(self_copies);
        debug!("Redundant assignments: {}", self.stats.redundant_assignments);
    }

    /// Remove assignments whose result is never read, until none are left.
    /// Optimises:
    /// ```text
    /// t1 := #12
    /// a := #14
    /// ```
    /// To:
    /// ```text
    /// a := #14
    /// ```
    fn eliminate_dead_code(&mut self) {
        let mut rounds = 0;
        loop {
            let dead: Vec<_> = self
                .listing
                .iter_lines()
                .filter(|(position, instr)| self.is_dead(*position, instr))
                .map(|(position, _)| position)
                .collect();

            if dead.is_empty() {
                break;
            }

            rounds += 1;
            trace!("Round {} removes {} dead instructions", rounds, dead.len());
            self.stats.dead_code += dead.len();
            self.listing.remove_all(dead);
        }
        debug!(
            "Dead code elimination: {} in {} rounds",
            self.stats.dead_code, rounds
        );
    }

    fn is_dead(&self, position: Position, instr: &TacInstr) -> bool {
        if instr.has_side_effect() {
            return false;
        }

        match instr.write() {
            Some(target @ Operand::Temp(_)) => !self.listing.is_read(target),
            Some(target) => self.is_overwritten_before_read(position, target),
            None => false,
        }
    }

    /// Returns true if straight-line code after `position` assigns `name`
    /// again before anything could read it.
    fn is_overwritten_before_read(&self, position: Position, name: &Operand) -> bool {
        for (_, instr) in self.listing.iter_lines_after(position).take(SCAN_HORIZON) {
            if instr.reads_from(name)
                || instr.is_call()
                || instr.is_boundary()
                || instr.is_control_transfer()
            {
                return false;
            }
            if instr.writes_to(name) {
                return true;
            }
        }
        false
    }

    /// Reuse the result of an identical earlier operation.
    /// Optimises:
    /// ```text
    /// t1 := a + b
    /// t2 := a + b
    /// x := t2 * t2
    /// ```
    /// To:
    /// ```text
    /// t1 := a + b
    /// t2 := t1
    /// x := t1 * t1
    /// ```
    fn eliminate_common_subexpressions(&mut self) {
        for position in 0..self.listing.len() {
            let Some((first, op, lhs, rhs)) = self
                .listing
                .get(Position(position))
                .and_then(TacInstr::as_bin)
                .filter(|(target, _, lhs, rhs)| target.is_temp() && target != lhs && target != rhs)
                .map(|(target, op, lhs, rhs)| (target.clone(), op, lhs.clone(), rhs.clone()))
            else {
                continue;
            };

            for line in position + 1..self.scan_end(position) {
                let line = Position(line);
                let Some(instr) = self.listing.get(line) else {
                    break;
                };
                if instr.is_boundary() || instr.is_call() {
                    break;
                }

                let second = instr
                    .as_bin()
                    .filter(|(_, o, l, r)| *o == op && **l == lhs && **r == rhs)
                    .map(|(target, _, _, _)| target.clone());

                if let Some(second) = second {
                    trace!("{} recomputes {} {} {} at {}", second, lhs, op, rhs, line);
                    if let Some(instr) = self.listing.get_mut(line) {
                        *instr = TacInstr::Assign(second.clone(), first.clone());
                    }
                    if second.is_temp() {
                        self.listing.replace_reads_after(line, &second, &first);
                    }
                    self.stats.subexpressions += 1;
                }

                let Some(instr) = self.listing.get(line) else {
                    break;
                };
                if instr.writes_to(&lhs) || instr.writes_to(&rhs) || instr.writes_to(&first) {
                    break;
                }
            }
        }
        debug!("Common subexpressions: {}", self.stats.subexpressions);
    }

    /// Reuse an earlier load of the same array element, as long as the array
    /// has not been stored to in between.
    /// Optimises:
    /// ```text
    /// t1 := a[i]
    /// t2 := a[i]
    /// x := t1 + t2
    /// ```
    /// To:
    /// ```text
    /// t1 := a[i]
    /// x := t1 + t1
    /// ```
    fn eliminate_redundant_array_loads(&mut self) {
        let mut position = 0;
        while position < self.listing.len() {
            if let Some((first, array, index)) = self
                .listing
                .get(Position(position))
                .and_then(TacInstr::as_array_load)
                .filter(|(target, array, index)| target != array && target != index)
                .map(|(target, array, index)| (target.clone(), array.clone(), index.clone()))
            {
                self.forward_array_load(position, &first, &array, &index);
            }
            position += 1;
        }
        debug!("Redundant array loads: {}", self.stats.array_loads);
    }

    fn forward_array_load(
        &mut self,
        position: usize,
        first: &Operand,
        array: &Operand,
        index: &Operand,
    ) {
        let mut line = position + 1;
        while line < self.scan_end(position) {
            let Some(instr) = self.listing.get(Position(line)) else {
                break;
            };
            if instr.is_boundary() || instr.is_call() {
                break;
            }
            if matches!(instr, TacInstr::ArrayStore(stored, _, _) if stored == array) {
                break;
            }

            let second = instr
                .as_array_load()
                .filter(|(_, a, i)| *a == array && *i == index)
                .map(|(target, _, _)| target.clone());

            if let Some(second) = second {
                self.stats.array_loads += 1;
                if first.is_temp() && second.is_temp() {
                    trace!("Dropping reload of {}[{}] into {}", array, index, second);
                    self.listing.remove(Position(line));
                    self.listing
                        .replace_reads_after(Position(line - 1), &second, first);
                    continue;
                }

                trace!("Reload of {}[{}] into {} copies {}", array, index, second, first);
                if let Some(instr) = self.listing.get_mut(Position(line)) {
                    *instr = TacInstr::Assign(second, first.clone());
                }
            }

            let Some(instr) = self.listing.get(Position(line)) else {
                break;
            };
            if instr.writes_to(first) || instr.writes_to(array) || instr.writes_to(index) {
                break;
            }
            line += 1;
        }
    }
}
