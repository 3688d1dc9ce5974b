//! The core error reporting structs and utility functions for
//! reporting runtime errors from the interpreter.
use std::io;

use codespan_reporting::diagnostic::LabelStyle;

use crate::result::Result;
use std::fmt::Display;
use std::ops::Range;

const STACK_OVERFLOW_TITLE: &str = "Stack Overflow";
const EMPTY_STACK_TITLE: &str = "Empty Call Stack";
const UNBOUND_NAME_TITLE: &str = "Unbound Name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    message: String,
    range: Range<usize>,
    style: LabelStyle,
}

impl Label {
    pub fn primary(message: impl Into<String>, range: impl Into<Range<usize>>) -> Label {
        Label {
            message: message.into(),
            range: range.into(),
            style: LabelStyle::Primary,
        }
    }

    pub fn secondary(message: impl Into<String>, range: impl Into<Range<usize>>) -> Label {
        Label {
            message: message.into(),
            range: range.into(),
            style: LabelStyle::Secondary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    labels: Vec<Label>,
    notes: Option<Vec<String>>,
}

impl Diagnostic {
    pub fn error(message: String, labels: Vec<Label>) -> Diagnostic {
        Self {
            message,
            labels,
            notes: None,
        }
    }

    pub fn with_note(self, note: impl Into<String>) -> Self {
        let mut notes = self.notes.unwrap_or_default();
        notes.push(note.into());
        Self {
            message: self.message,
            labels: self.labels,
            notes: Some(notes),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn notes(&self) -> &[String] {
        self.notes.as_deref().unwrap_or_default()
    }
}

/// Takes an instance of our own `Diagnostic` and converts it to the `codespan_reporting` variant
/// so we can report the error in the terminal.
pub fn report_diagnostic_to_term(diagnostic: Diagnostic, file_name: &str, file_source: &str) {
    use codespan_reporting::diagnostic::{
        Diagnostic as CodespanDiagnostic, Label as CodespanLabel,
    };
    use codespan_reporting::files::SimpleFiles;
    use codespan_reporting::term;
    use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
    let mut files = SimpleFiles::new();
    // Map our diagnostic to the codespan structures
    let diagnostic = {
        let id = files.add(file_name, file_source);
        let labels = diagnostic
            .labels
            .iter()
            .map(|label| {
                CodespanLabel::new(label.style, id, label.range.clone())
                    .with_message(label.message.clone())
            })
            .collect();
        let mut csp_diagnostic = CodespanDiagnostic::error()
            .with_message(diagnostic.message)
            .with_labels(labels);
        if let Some(notes) = diagnostic.notes {
            csp_diagnostic = csp_diagnostic.with_notes(notes)
        }
        csp_diagnostic
    };
    let writer = StandardStream::stderr(ColorChoice::Always);
    let mut writer = writer.lock();
    let config = codespan_reporting::term::Config::default();
    term::emit(&mut writer, &config, &files, &diagnostic).unwrap()
}

/// Builds the user-facing diagnostic for a fatal runtime error. `trace`
/// is the rendered stack snapshot, outermost frame first; it is attached
/// as notes so the report always carries the call history.
pub fn runtime_diagnostic(error: &Error, trace: &[String]) -> Diagnostic {
    let diagnostic = match error {
        Error::StackOverflow { max_depth } => Diagnostic::error(
            format!(
                "{}: exceeded the maximum call depth of {}",
                STACK_OVERFLOW_TITLE, max_depth
            ),
            vec![],
        ),
        Error::EmptyStack => Diagnostic::error(
            format!(
                "{}: a call returned that was never entered",
                EMPTY_STACK_TITLE
            ),
            vec![],
        ),
        Error::UnboundName(name) => Diagnostic::error(
            format!("{}: cannot resolve '{}'", UNBOUND_NAME_TITLE, name),
            vec![],
        ),
        Error::IO(message) => Diagnostic::error(message.clone(), vec![]),
        Error::Diagnostic(diagnostic) => diagnostic.clone(),
    };
    trace
        .iter()
        .fold(diagnostic, |diagnostic, line| {
            diagnostic.with_note(line.as_str())
        })
}

/// Report a name-resolution failure from the evaluator layer.
pub fn unbound_name_error<T>(name: impl Display) -> Result<T> {
    Err(Error::UnboundName(name.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A push would exceed the configured maximum call depth. Fatal to
    /// the current execution, recoverable by the embedding application.
    StackOverflow { max_depth: usize },
    /// A pop on an empty stack. Call/return pairing is broken in the
    /// host interpreter.
    EmptyStack,
    /// A name resolved to no binding anywhere in the scope chain.
    UnboundName(String),
    IO(String),
    Diagnostic(Diagnostic),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IO(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_carry_the_trace_as_notes() {
        let trace = vec![
            "main.src:10:4 in main".to_string(),
            "main.src:22:8 in fetch".to_string(),
        ];
        let diagnostic = runtime_diagnostic(&Error::StackOverflow { max_depth: 64 }, &trace);
        assert_eq!(
            diagnostic.message(),
            "Stack Overflow: exceeded the maximum call depth of 64"
        );
        assert_eq!(diagnostic.notes(), trace.as_slice());
    }

    #[test]
    fn unbound_name_reports_the_missing_name() {
        let error = unbound_name_error::<()>("missing").unwrap_err();
        assert_eq!(error, Error::UnboundName("missing".into()));
        let diagnostic = runtime_diagnostic(&error, &[]);
        assert_eq!(diagnostic.message(), "Unbound Name: cannot resolve 'missing'");
        assert!(diagnostic.notes().is_empty());
    }

    #[test]
    fn diagnostics_render_to_the_terminal() {
        let diagnostic = Diagnostic::error("Unexpected token".into(), vec![Label::primary("here", 0..1)])
            .with_note("while parsing 'main.src'");
        report_diagnostic_to_term(diagnostic, "main.src", "x");
    }
}
