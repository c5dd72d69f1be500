mod parser;
mod structure;


use vliw_common::inst::Instruction;
use vliw_common::message::Messages;
use vliw_common::Driver;

/// Parse and validate a program given as one string per instruction. `file`
/// is the id the driver uses to render the source, which is the lines joined
/// by newlines. Returns `None` if any error was reported.
pub fn parse(driver: &mut impl Driver, file: usize, lines: &[String]) -> Option<Vec<Instruction>> {
    let mut messages = Messages::new();
    let mut spans = Vec::with_capacity(lines.len());

    let insts = parser::parse_lines(&mut messages, &mut spans, file, lines);

    if let Some(ref insts) = insts {
        structure::check(&mut messages, &spans, insts);
    }

    let failed = messages.has_errors();
    driver.report(messages);

    if failed {
        None
    } else {
        insts
    }
}
