//! Terminal output for the pxbase CLI.
//!
//! Status lines go to stderr with a right-aligned verb column, so stdout can
//! carry the generated save document when no output file is given.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const VERB_WIDTH: usize = 12;

/// Status printer for stderr.
///
/// Colour is on when stderr is a terminal. Verbose lines are dropped unless
/// enabled with [`Printer::with_verbose`].
#[derive(Debug, Clone)]
pub struct Printer {
    color: bool,
    verbose: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
            verbose: false,
        }
    }

    /// A printer that never emits ANSI codes.
    pub fn plain() -> Self {
        Self {
            color: false,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// e.g. "     Loading base.json"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    pub fn success(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Dim info line, only shown in verbose mode.
    pub fn verbose(&self, verb: &str, message: &str) {
        if self.verbose {
            self.print_line(DIM, verb, message);
        }
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    /// Colour a diagnostic severity label.
    pub fn severity(&self, label: &str, is_error: bool) -> String {
        let color = if is_error { RED } else { YELLOW };
        if self.color {
            format!("{BOLD}{color}{label}{RESET}")
        } else {
            label.to_string()
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Pluralize a count: `plural(1, "object", "objects")` gives "1 object".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Relative display path when under the working directory.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "object", "objects"), "1 object");
        assert_eq!(plural(0, "object", "objects"), "0 objects");
        assert_eq!(plural(3000, "object", "objects"), "3000 objects");
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let p = Path::new("/nonexistent/bases/base.json");
        assert_eq!(display_path(p), "/nonexistent/bases/base.json");
    }

    #[test]
    fn test_plain_printer_has_no_escapes() {
        let printer = Printer::plain();
        assert_eq!(printer.bold("x"), "x");
        assert_eq!(printer.severity("error", true), "error");
    }
}
