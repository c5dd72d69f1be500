use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config, DisplayStyle};
use console::{style, Term};
use log::warn;

use vliw_common::bundle::Schedule;
use vliw_common::message::Messages;
use vliw_common::Driver;

pub struct ConsoleDriver {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: Config,
    term: Term,
}

impl ConsoleDriver {
    pub fn new(files: SimpleFiles<String, String>) -> Self {
        Self {
            files,
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: Config {
                display_style: DisplayStyle::Rich,
                ..Default::default()
            },
            term: Term::stderr(),
        }
    }
}

impl Driver for ConsoleDriver {
    fn report(&mut self, messages: Messages) {
        for msg in messages.msgs {
            if let Err(err) = term::emit(&mut self.writer, &self.config, &self.files, &msg) {
                warn!("could not print a diagnostic: {err}");
            }
        }
    }

    fn report_schedule(&mut self, name: &str, schedule: &Schedule) {
        let issued = schedule.items().count();
        let summary = if schedule.has_loop() {
            format!(
                "{issued} instructions in {} bundles ({} before, {} in and {} after the loop)",
                schedule.len(),
                schedule.pre_loop().len(),
                schedule.loop_body().len(),
                schedule.post_loop().len()
            )
        } else {
            format!("{issued} instructions in {} bundles, no loop", schedule.len())
        };

        let line = format!("{:>10} {summary}", style(name).green().bold());
        if let Err(err) = self.term.write_line(&line) {
            warn!("could not print a schedule summary: {err}");
        }
    }
}
