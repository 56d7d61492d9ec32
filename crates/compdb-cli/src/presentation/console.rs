use super::progress::{Throttle, format_bar};
use compdb_core::{AggregateProgress, GenerateOutcome, GenerateProgress};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Writes run diagnostics and the progress bar to a diagnostic stream.
///
/// On a terminal the bar is redrawn in place; otherwise only the final
/// 100% line is printed so logs stay readable. Write failures are ignored.
pub struct ConsoleReporter<W: Write> {
    out: W,
    interactive: bool,
    pattern: String,
    throttle: Throttle,
}

impl ConsoleReporter<io::Stderr> {
    pub fn stderr() -> Self {
        let interactive = io::stderr().is_terminal();
        Self::new(io::stderr(), interactive)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self {
            out,
            interactive,
            pattern: compdb_core::DEFAULT_RECORD_PATTERN.to_string(),
            throttle: Throttle::default(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render(&mut self, progress: &GenerateProgress) {
        match progress {
            GenerateProgress::Discovering { pattern } => {
                self.pattern = pattern.clone();
                let _ = writeln!(self.out, "Building {} file list...", self.pattern);
            }
            GenerateProgress::NothingFound { roots } => {
                let roots = join_paths(roots);
                let _ = writeln!(self.out, "No {} files found in {}", self.pattern, roots);
            }
            GenerateProgress::Parsing(parsing) => self.render_parsing(parsing),
            GenerateProgress::Writing { destination } => {
                let name = destination
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| destination.display().to_string());
                let _ = writeln!(self.out, "Writing {}...", name);
            }
        }
        let _ = self.out.flush();
    }

    fn render_parsing(&mut self, progress: &AggregateProgress) {
        if let AggregateProgress::Started { .. } = progress {
            let _ = writeln!(self.out, "Parsing {} files...", self.pattern);
        }

        let fraction = progress.fraction();
        if self.interactive {
            if self.throttle.should_draw(fraction) {
                let _ = write!(self.out, "\r{}", format_bar(fraction));
            }
            if progress.is_complete() {
                let _ = writeln!(self.out);
            }
        } else if progress.is_complete() {
            let _ = writeln!(self.out, "{}", format_bar(fraction));
        }
    }

    pub fn finish(&mut self, outcome: &GenerateOutcome) {
        if let GenerateOutcome::Written {
            destination,
            records,
            entries,
        } = outcome
        {
            let summary = format!(
                "Wrote {} entries from {} records to {}",
                entries,
                records,
                destination.display()
            );
            if self.interactive {
                let _ = writeln!(self.out, "{}", summary.green());
            } else {
                let _ = writeln!(self.out, "{}", summary);
            }
        }
        let _ = self.out.flush();
    }

    /// Terminate a half-drawn bar before an error message
    pub fn interrupt(&mut self) {
        if self.interactive {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print a top-level error the way every command reports failures
pub fn print_error(err: &anyhow::Error) {
    if io::stderr().is_terminal() {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
    } else {
        eprintln!("Error: {:#}", err);
    }
}
