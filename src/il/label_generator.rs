use super::Label;

/// Hands out branch targets. Every label produced by one generator is unique.
pub struct LabelGenerator {
    index: u32,
}
impl LabelGenerator {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Generates a new unique label.
    pub fn next_label(&mut self) -> Label {
        self.index += 1;
        Label::new(self.index)
    }
}
