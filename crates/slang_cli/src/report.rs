//! Diagnostic rendering for the terminal.
//!
//! Each [`Diagnostic`] is wrapped in a [`Report`] that implements
//! `miette::Diagnostic`, so miette's graphical handler can print the code,
//! the severity and a source snippet with the offending span underlined.

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceCode};
use slang_core::text::SourceText;
use slang_diagnostics::{Diagnostic, Severity};
use std::fmt::{self, Display};
use thiserror::Error;

/// One diagnostic together with the source it points into.
#[derive(Debug, Error)]
#[error("{}", .diagnostic.message)]
pub struct Report<'r> {
    diagnostic: &'r Diagnostic,
    text: &'r NamedSource<String>,
}

impl miette::Diagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.diagnostic.code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diagnostic.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
            Severity::Information => miette::Severity::Advice,
        })
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.diagnostic.source.as_ref()?;
        Some(self.text)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.diagnostic.span()?;
        let label = LabeledSpan::at(span.to_range(), "here");
        Some(Box::new(std::iter::once(label)))
    }
}

/// Renders diagnostics against one source text.
pub struct Renderer {
    handler: GraphicalReportHandler,
    source: NamedSource<String>,
}

impl Renderer {
    pub fn new(source: &SourceText, color: bool) -> Self {
        let theme = if color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        Self {
            handler: GraphicalReportHandler::new_themed(theme),
            source: NamedSource::new(source.name(), source.text().to_string()),
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let report = Report {
            diagnostic,
            text: &self.source,
        };
        let mut out = String::new();
        if self.handler.render_report(&mut out, &report).is_err() {
            // Fall back to the one-line form.
            out = format!("{}\n", diagnostic);
        }
        out
    }
}

/// The closing line, e.g. `Found 2 errors.`
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        match (self.errors, self.warnings) {
            (0, 0) => Ok(()),
            (e, 0) => write!(f, "Found {} error{}.", e, plural(e)),
            (0, w) => write!(f, "Found {} warning{}.", w, plural(w)),
            (e, w) => write!(
                f,
                "Found {} error{} and {} warning{}.",
                e,
                plural(e),
                w,
                plural(w)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use slang_core::text::TextSpan;
    use slang_diagnostics::messages;

    #[test]
    fn test_render_includes_code_message_and_snippet() {
        let source = SourceText::new("demo.sl", "var x = y;");
        let diagnostic = Diagnostic::with_source(
            &source,
            TextSpan::new(8, 1),
            &messages::UNDEFINED_VARIABLE,
            &["y"],
        );
        let rendered = Renderer::new(&source, false).render(&diagnostic);
        assert!(rendered.contains("B0001"), "{}", rendered);
        assert!(rendered.contains(&diagnostic.message), "{}", rendered);
        assert!(rendered.contains("var x = y;"), "{}", rendered);
        assert!(rendered.contains("demo.sl"), "{}", rendered);
    }

    #[test]
    fn test_render_without_location() {
        let source = SourceText::new("demo.sl", "");
        let diagnostic = Diagnostic::new(&messages::UNDEFINED_VARIABLE, &["y"]);
        let rendered = Renderer::new(&source, false).render(&diagnostic);
        assert!(rendered.contains(&diagnostic.message), "{}", rendered);
    }

    #[test]
    fn test_summary() {
        let summary = |errors, warnings| Summary { errors, warnings }.to_string();
        assert_eq!(summary(0, 0), "");
        assert_eq!(summary(1, 0), "Found 1 error.");
        assert_eq!(summary(0, 2), "Found 2 warnings.");
        assert_eq!(summary(2, 1), "Found 2 errors and 1 warning.");
    }
}
