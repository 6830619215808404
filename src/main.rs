mod error_formatting;
mod input;
mod line_reader;

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Once;

use clap::Parser;
use colored::*;

use pylite::config::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_WHILE_ITERATION_CAP};
use pylite::{Config, Interpreter, RunReport};

use input::{Input, Source};
use line_reader::{LineReadStatus, LineReader};

static TRACING_INIT: Once = Once::new();

#[derive(Debug, Parser)]
#[command(
    name = "pylite",
    about = "Runs a small subset of Python line by line.",
    version
)]
struct Args {
    /// Program file to run. Starts a REPL when neither a file nor -c is given.
    input: Option<PathBuf>,

    /// Program passed in as a string.
    #[arg(short = 'c', long = "command", conflicts_with = "input")]
    command: Option<String>,

    /// Print a JSON report instead of the program output.
    #[arg(long)]
    json: bool,

    /// Body executions a while loop may perform before it is stopped.
    #[arg(long, default_value_t = DEFAULT_WHILE_ITERATION_CAP)]
    loop_cap: usize,

    /// Nested function calls allowed before the run is aborted.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,
}

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn fail(what: &str) -> ! {
    eprintln!("pylite: {}: {}", "error".red().bold(), what.white().bold());
    process::exit(1);
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(err) = ctrlc::set_handler(|| process::exit(130)) {
        fail(&format!("failed to install the Ctrl-C handler: {}", err));
    }

    let config = Config {
        while_iteration_cap: args.loop_cap,
        max_call_depth: args.max_depth,
    };

    let input = match (args.command, args.input) {
        (Some(content), _) => Input {
            source: Source::Literal,
            content,
        },
        (None, Some(path)) => match fs::read_to_string(&path) {
            Ok(content) => Input {
                source: Source::File(path.display().to_string()),
                content,
            },
            Err(err) => fail(&format!("failed to read {}: {}", path.display(), err)),
        },
        (None, None) => {
            repl(config, args.json);
            return;
        }
    };

    if !execute(&input, config, args.json) {
        process::exit(1);
    }
}

/// Runs one program and reports it. Returns whether it succeeded.
fn execute(input: &Input, config: Config, json: bool) -> bool {
    let mut interp = Interpreter::new(config);
    let outcome = interp.interpret(&input.content);

    if json {
        let report = RunReport::from_outcome(&interp.output, &outcome);
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(err) => fail(&format!("failed to serialize the report: {}", err)),
        }
        return outcome.is_ok();
    }

    for line in &interp.output {
        println!("{}", line);
    }
    match outcome {
        Ok(()) => true,
        Err(err) => {
            eprint!("{}", error_formatting::format_interpreter_error(&err, input));
            false
        }
    }
}

fn repl(config: Config, json: bool) {
    let mut reader = match LineReader::new(".pylite-history.txt") {
        Ok(reader) => reader,
        Err(err) => fail(&format!("failed to start the line editor: {}", err)),
    };

    println!(
        "pylite {}: enter a program, then an empty line to run it. Ctrl-D exits.",
        env!("CARGO_PKG_VERSION")
    );

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { ">>> " } else { "... " };
        match reader.readline(prompt) {
            LineReadStatus::Line(line) if line.trim().is_empty() => {
                if buffer.is_empty() {
                    continue;
                }
                let input = Input {
                    source: Source::Repl,
                    content: std::mem::take(&mut buffer),
                };
                execute(&input, config, json);
            }
            LineReadStatus::Line(line) => {
                buffer.push_str(&line);
                buffer.push('\n');
            }
            LineReadStatus::Interrupted => buffer.clear(),
            LineReadStatus::Done => break,
        }
    }
}
