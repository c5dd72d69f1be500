mod args;
mod console_driver;

use clap::Parser;
use codespan_reporting::files::SimpleFiles;
use vliwc::{read_program, schedule, write_schedules};

use args::Arguments;
use console_driver::ConsoleDriver;

fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let lines = read_program(&args.input)?;

    let mut files = SimpleFiles::new();
    let file = files.add(args.input.display().to_string(), lines.join("\n"));

    let mut driver = ConsoleDriver::new(files);
    let schedules = schedule(&mut driver, file, &lines, &args.config())?;

    write_schedules(&args.loop_output, &args.pip_output, &schedules, args.pretty)
}
