//! slang_compiler: Pipeline orchestration.
//!
//! A [`Program`] owns one source text and runs it through the stages:
//! parse, bind and, when no error was reported, interpret. Every stage
//! reports into one diagnostic collection, which comes back sorted by
//! position.

use std::path::Path;

use slang_ast::node::SyntaxNode;
use slang_ast::printer::dump_tree;
use slang_binder::Binder;
use slang_core::arena::SyntaxArena;
use slang_core::text::{SourceText, SourceTextError};
use slang_diagnostics::DiagnosticCollection;
use slang_interpreter::{Interpreter, Io, DEFAULT_MAX_CALL_DEPTH};
use thiserror::Error;
use tracing::{debug, info};

/// How a program is compiled and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Execute the program once it binds without errors.
    pub run: bool,
    pub max_call_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            run: true,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Failures outside the program itself.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Source(#[from] SourceTextError),
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No errors. The program ran unless running was turned off.
    Success,
    /// Lexing, parsing or binding reported an error; nothing was executed.
    Rejected,
    /// Execution stopped at a runtime failure.
    RuntimeFailure,
}

/// The result of [`Program::run`].
#[derive(Debug)]
pub struct Compilation {
    pub outcome: Outcome,
    /// Every diagnostic of the run, sorted by position.
    pub diagnostics: DiagnosticCollection,
}

impl Compilation {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// One compilation unit and the options to run it with.
#[derive(Debug)]
pub struct Program {
    source: SourceText,
    options: Options,
}

impl Program {
    pub fn new(source: SourceText, options: Options) -> Self {
        Self { source, options }
    }

    /// Load the program from a file.
    pub fn from_file(path: &Path, options: Options) -> Result<Self, CompileError> {
        let source = SourceText::from_file(path)?;
        Ok(Self::new(source, options))
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Run the full pipeline: parse -> bind -> interpret.
    ///
    /// Interpretation is skipped when any error was reported. A runtime
    /// failure is added to the diagnostics.
    #[tracing::instrument(level = "debug", skip_all, fields(file = self.source.name()))]
    pub fn run(&self, io: &mut dyn Io) -> Compilation {
        // Roughly one node per few bytes of source.
        let arena = SyntaxArena::with_capacity(self.source.len() * 4);
        let mut diagnostics = DiagnosticCollection::new();

        let unit = slang_parser::parse(arena.bump(), &self.source, &mut diagnostics);
        debug!(bytes = arena.allocated_bytes(), "syntax tree allocated");
        let tree = Binder::bind(unit, &self.source, &mut diagnostics);

        let outcome = if diagnostics.has_errors() {
            info!(errors = diagnostics.error_count(), "program rejected");
            Outcome::Rejected
        } else if !self.options.run {
            debug!("running disabled");
            Outcome::Success
        } else {
            let result = Interpreter::new(&tree, io)
                .with_max_call_depth(self.options.max_call_depth)
                .run();
            match result {
                Ok(()) => Outcome::Success,
                Err(error) => {
                    info!(%error, "runtime failure");
                    diagnostics.add(error.to_diagnostic(self.source.name()));
                    Outcome::RuntimeFailure
                }
            }
        };

        diagnostics.sort();
        Compilation {
            outcome,
            diagnostics,
        }
    }

    /// The syntax tree as text, with the lexing and parsing diagnostics.
    pub fn dump_tree(&self) -> (String, DiagnosticCollection) {
        let arena = SyntaxArena::new();
        let mut diagnostics = DiagnosticCollection::new();
        let unit = slang_parser::parse(arena.bump(), &self.source, &mut diagnostics);
        diagnostics.sort();
        (dump_tree(SyntaxNode::CompilationUnit(unit)), diagnostics)
    }
}
