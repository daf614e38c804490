//! slang: Runs slang programs.
//!
//! Usage:
//!   slang [options] FILE
//!   slang [options] -e CODE
//!   slang [options] --repl
//!
//! Diagnostics go to stderr, program output to stdout. The exit code is 0
//! on success, 1 when the program was rejected, 2 on a runtime failure and
//! 3 when the input could not be read.

mod report;

use clap::Parser as ClapParser;
use report::{Renderer, Summary};
use slang_compiler::{Options, Outcome, Program};
use slang_core::text::SourceText;
use slang_diagnostics::{DiagnosticCollection, Severity};
use slang_interpreter::{Io, StdIo, DEFAULT_MAX_CALL_DEPTH};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::debug;

#[derive(ClapParser, Debug)]
#[command(name = "slang", version, about = "slang - a small statically typed scripting language")]
struct Cli {
    /// Source file to run.
    #[arg(value_name = "FILE", conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Run CODE given on the command line.
    #[arg(short = 'e', long = "eval", value_name = "CODE")]
    eval: Option<String>,

    /// Start an interactive session. Each line runs as its own program.
    #[arg(long, conflicts_with_all = ["file", "eval"])]
    repl: bool,

    /// Check the program without running it.
    #[arg(long = "no-run")]
    no_run: bool,

    /// Deepest allowed nesting of function calls.
    #[arg(long = "max-call-depth", value_name = "N", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Print the syntax tree instead of running.
    #[arg(long = "print-tree")]
    print_tree: bool,

    /// Disable colored diagnostics.
    #[arg(long = "no-color")]
    no_color: bool,

    /// Log pipeline stages to stderr.
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            run: !self.no_run,
            max_call_depth: self.max_call_depth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Success = 0,
    Rejected = 1,
    RuntimeFailure = 2,
    Usage = 3,
}

impl From<Outcome> for Exit {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Exit::Success,
            Outcome::Rejected => Exit::Rejected,
            Outcome::RuntimeFailure => Exit::RuntimeFailure,
        }
    }
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version print to stdout and are not failures.
            let code = if e.use_stderr() { Exit::Usage } else { Exit::Success };
            process::exit(code as i32);
        }
    };

    init_tracing(cli.verbose);
    let color = !cli.no_color && std::io::stderr().is_terminal();

    let exit = if let Some(ref path) = cli.file {
        match Program::from_file(path, cli.options()) {
            Ok(program) => execute(&program, &cli, color, &mut StdIo::new()),
            Err(e) => {
                print_error(&e.to_string(), color);
                Exit::Usage
            }
        }
    } else if let Some(ref code) = cli.eval {
        let program = Program::new(SourceText::new("<eval>", code.as_str()), cli.options());
        execute(&program, &cli, color, &mut StdIo::new())
    } else {
        run_repl(&cli, color)
    };

    process::exit(exit as i32);
}

/// Install a stderr subscriber when `SLANG_LOG` or `RUST_LOG` is set, or
/// at `debug` level for `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match std::env::var("SLANG_LOG").or_else(|_| std::env::var("RUST_LOG")) {
        Ok(directives) => EnvFilter::new(directives),
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => return,
    };
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

/// Run one program and report its diagnostics.
fn execute(program: &Program, cli: &Cli, color: bool, io: &mut dyn Io) -> Exit {
    let start = Instant::now();

    if cli.print_tree {
        let (tree, diagnostics) = program.dump_tree();
        if io.write_str(&tree).is_err() {
            return Exit::Usage;
        }
        report(program.source(), &diagnostics, color);
        return if diagnostics.has_errors() {
            Exit::Rejected
        } else {
            Exit::Success
        };
    }

    let compilation = program.run(io);
    report(program.source(), &compilation.diagnostics, color);
    debug!(
        outcome = ?compilation.outcome,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "finished"
    );
    compilation.outcome.into()
}

fn report(source: &SourceText, diagnostics: &DiagnosticCollection, color: bool) {
    if diagnostics.is_empty() {
        return;
    }
    let renderer = Renderer::new(source, color);
    for diagnostic in diagnostics.iter() {
        eprint!("{}", renderer.render(diagnostic));
    }
    let summary = Summary {
        errors: diagnostics.error_count(),
        warnings: diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count(),
    };
    eprintln!("{}", summary);
}

/// Read lines until end of input, running each as a fresh program.
fn run_repl(cli: &Cli, color: bool) -> Exit {
    let mut io = StdIo::new();
    eprintln!(
        "slang {} (Ctrl-D to quit)",
        env!("CARGO_PKG_VERSION")
    );
    loop {
        if io.write_str("> ").is_err() {
            return Exit::Usage;
        }
        let line = match io.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                print_error(&format!("cannot read input: {}", e), color);
                return Exit::Usage;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let program = Program::new(SourceText::new("<repl>", line), cli.options());
        let exit = execute(&program, cli, color, &mut io);
        debug!(?exit, "repl line");
    }
    Exit::Success
}

fn print_error(msg: &str, color: bool) {
    if color {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use slang_interpreter::BufferIo;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("slang").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_options() {
        let cli = parse(&["--no-run", "--max-call-depth", "10", "main.sl"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("main.sl")));
        let options = cli.options();
        assert!(!options.run);
        assert_eq!(options.max_call_depth, 10);

        let cli = parse(&[]).unwrap();
        assert_eq!(cli.options(), Options::default());
    }

    #[test]
    fn test_conflicting_inputs() {
        assert!(parse(&["main.sl", "-e", "print(\"x\");"]).is_err());
        assert!(parse(&["--repl", "main.sl"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let cli = parse(&[]).unwrap();
        let run = |text: &str| {
            let program = Program::new(SourceText::new("t.sl", text), cli.options());
            let mut io = BufferIo::new();
            execute(&program, &cli, false, &mut io) as i32
        };
        assert_eq!(run("print(\"ok\");"), 0);
        assert_eq!(run("print(y);"), 1);
        assert_eq!(run("print(int(\"y\"));"), 2);
    }

    #[test]
    fn test_print_tree_writes_to_output() {
        let cli = parse(&["--print-tree"]).unwrap();
        let program = Program::new(SourceText::new("t.sl", "var x = 1;"), cli.options());
        let mut io = BufferIo::new();
        assert_eq!(execute(&program, &cli, false, &mut io), Exit::Success);
        assert!(io.output().starts_with("CompilationUnit"), "{}", io.output());
    }
}
