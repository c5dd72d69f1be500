use codespan_reporting::diagnostic::{Diagnostic, Label};

use super::{MessageAdder, Span};

const SECOND_LOOP: &str = "ES00";
const LOOP_TARGET: &str = "ES01";

impl<'a> MessageAdder<'a> {
    pub fn structure_second_loop(&mut self, index: usize, first: Span) {
        let labels = vec![
            Label::primary(self.at.file, self.at),
            Label::secondary(first.file, first).with_message("the loop already ends here"),
        ];
        let notes = vec![String::from("a program may contain at most one loop")];

        self.add(
            Diagnostic::error()
                .with_code(SECOND_LOOP)
                .with_message(format!("instruction {index}: second loop branch"))
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn structure_loop_target(&mut self, index: usize, target: i64) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message(format!("the target must be between 0 and {index}"))];

        self.add(
            Diagnostic::error()
                .with_code(LOOP_TARGET)
                .with_message(format!(
                    "instruction {index}: loop target {target} is out of range"
                ))
                .with_labels(labels),
        );
    }
}
