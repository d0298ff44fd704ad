use super::Operand;

/// Hands out temporaries. Every temporary produced by one generator is unique.
pub struct NameGenerator {
    index: u32,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Generates a new unique temporary name.
    pub fn next_temp(&mut self) -> Operand {
        self.index += 1;
        Operand::Temp(self.index)
    }

    /// The flattened name of a struct member. There is no aggregate memory
    /// model: `p.x` is simply a variable called `p_x`.
    pub fn member_name(target: &str, member: &str) -> String {
        format!("{}_{}", target, member)
    }
}
