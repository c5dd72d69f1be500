use codespan_reporting::diagnostic::{Diagnostic, Label};

use super::MessageAdder;

const UNKNOWN_MNEMONIC: &str = "EP00";
const INVALID_REGISTER: &str = "EP01";
const NOT_GENERAL: &str = "EP02";
const MALFORMED_IMMEDIATE: &str = "EP03";
const MALFORMED_ADDRESS: &str = "EP04";
const OPERAND_COUNT: &str = "EP05";
const INVALID_CHARACTER: &str = "EP06";
const MALFORMED_OPERAND: &str = "EP07";

impl<'a> MessageAdder<'a> {
    pub fn parse_unknown_mnemonic(&mut self, index: usize, mnemonic: &str) {
        let labels = vec![Label::primary(self.at.file, self.at)];
        let notes = vec![String::from(
            "known mnemonics are add, addi, sub, mulu, ld, st, mov, loop, loop.pip and nop",
        )];

        self.add(
            Diagnostic::error()
                .with_code(UNKNOWN_MNEMONIC)
                .with_message(format!(
                    "instruction {index}: unknown mnemonic `{mnemonic}`"
                ))
                .with_labels(labels)
                .with_notes(notes),
        );
    }

    pub fn parse_invalid_register(&mut self, index: usize, register: &str) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("registers are `x0` to `x95`, `p0` to `p95`, `LC` or `EC`")];

        self.add(
            Diagnostic::error()
                .with_code(INVALID_REGISTER)
                .with_message(format!("instruction {index}: invalid register `{register}`"))
                .with_labels(labels),
        );
    }

    pub fn parse_not_general(&mut self, index: usize) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("expected a register `x0` to `x95`")];

        self.add(
            Diagnostic::error()
                .with_code(NOT_GENERAL)
                .with_message(format!(
                    "instruction {index}: expected a general-purpose register"
                ))
                .with_labels(labels),
        );
    }

    pub fn parse_malformed_immediate(&mut self, index: usize) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("expected a signed 64-bit integer")];

        self.add(
            Diagnostic::error()
                .with_code(MALFORMED_IMMEDIATE)
                .with_message(format!("instruction {index}: malformed immediate"))
                .with_labels(labels),
        );
    }

    pub fn parse_malformed_address(&mut self, index: usize) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("expected an address like `8(x2)`")];

        self.add(
            Diagnostic::error()
                .with_code(MALFORMED_ADDRESS)
                .with_message(format!("instruction {index}: malformed address"))
                .with_labels(labels),
        );
    }

    pub fn parse_operand_count(&mut self, index: usize, expected: usize, actual: usize) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message(format!("expected {expected} operands, found {actual}"))];

        self.add(
            Diagnostic::error()
                .with_code(OPERAND_COUNT)
                .with_message(format!("instruction {index}: wrong number of operands"))
                .with_labels(labels),
        );
    }

    pub fn parse_invalid_character(&mut self, index: usize) {
        let labels = vec![Label::primary(self.at.file, self.at)];

        self.add(
            Diagnostic::error()
                .with_code(INVALID_CHARACTER)
                .with_message(format!("instruction {index}: invalid character"))
                .with_labels(labels),
        );
    }

    pub fn parse_malformed_operand(&mut self, index: usize) {
        let labels = vec![Label::primary(self.at.file, self.at)
            .with_message("expected a register, an immediate, an address or `true`/`false`")];

        self.add(
            Diagnostic::error()
                .with_code(MALFORMED_OPERAND)
                .with_message(format!("instruction {index}: malformed operand"))
                .with_labels(labels),
        );
    }
}
