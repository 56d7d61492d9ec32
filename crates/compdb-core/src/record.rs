// Kbuild writes one `<dir>/.<obj>.o.cmd` per object. The lines we care about:
//
//   savedcmd_drivers/tty/tty_io.o := gcc -Wp,-MMD,... -c -o drivers/tty/tty_io.o drivers/tty/tty_io.c
//   source_drivers/tty/tty_io.o := drivers/tty/tty_io.c
//
// Older trees spell the first one `cmd_...`. Everything else (deps_, $(wildcard ...)) is noise.

use crate::{Error, Result};
use compdb_types::CompileEntry;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static CMD_VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:saved)?cmd_(\S+)[ \t]*:=[ \t]*(\S.*)$").unwrap()
});

static SOURCE_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*source_(\S+)[ \t]*:=[ \t]*(\S.*)$").unwrap());

/// Turns the text of one command record into compile entries.
pub trait RecordParser: Send + Sync {
    /// Every entry is stamped with `directory`. Objects missing either
    /// a command or a source declaration are left out.
    fn parse(&self, text: &str, directory: &str) -> Vec<CompileEntry>;
}

/// Line-oriented `cmd_`/`source_` matcher for Kbuild `.o.cmd` files
#[derive(Debug, Clone, Copy, Default)]
pub struct KbuildRecordParser;

impl RecordParser for KbuildRecordParser {
    fn parse(&self, text: &str, directory: &str) -> Vec<CompileEntry> {
        // Later declarations overwrite earlier ones
        let commands: HashMap<&str, &str> = CMD_VAR_RE
            .captures_iter(text)
            .map(|caps| (caps.get(1).map_or("", |m| m.as_str()), capture_value(&caps)))
            .collect();

        let mut order: Vec<&str> = Vec::new();
        let mut sources: HashMap<&str, &str> = HashMap::new();
        for caps in SOURCE_VAR_RE.captures_iter(text) {
            let output = caps.get(1).map_or("", |m| m.as_str());
            if sources.insert(output, capture_value(&caps)).is_none() {
                order.push(output);
            }
        }

        order
            .into_iter()
            .filter_map(|output| {
                let command = commands.get(output)?;
                let file = sources.get(output)?;
                Some(CompileEntry::new(directory, *command, *file, output))
            })
            .collect()
    }
}

fn capture_value<'t>(caps: &regex::Captures<'t>) -> &'t str {
    caps.get(2).map_or("", |m| m.as_str().trim())
}

/// Read a record from disk. Missing files and non-UTF-8 content both fail.
pub fn read_record(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::RecordRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a single record file
pub fn parse_record_file(
    parser: &dyn RecordParser,
    path: &Path,
    directory: &str,
) -> Result<Vec<CompileEntry>> {
    let text = read_record(path)?;
    Ok(parser.parse(&text, directory))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIR: &str = "/build";

    fn parse(text: &str) -> Vec<CompileEntry> {
        KbuildRecordParser.parse(text, DIR)
    }

    #[test]
    fn test_joins_command_and_source_on_output() {
        let entries = parse("cmd_a.o := cc -c a.c\nsource_a.o := a.c\n");

        assert_eq!(entries, vec![CompileEntry::new(DIR, "cc -c a.c", "a.c", "a.o")]);
    }

    #[test]
    fn test_accepts_saved_prefix() {
        let text = "savedcmd_kernel/fork.o := gcc -O2 -c -o kernel/fork.o kernel/fork.c\n\
                    source_kernel/fork.o := kernel/fork.c\n";
        let entries = parse(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].output, "kernel/fork.o");
        assert_eq!(entries[0].command, "gcc -O2 -c -o kernel/fork.o kernel/fork.c");
    }

    #[test]
    fn test_source_without_command_is_dropped() {
        assert!(parse("source_b.o := b.c\n").is_empty());
    }

    #[test]
    fn test_command_without_source_is_dropped() {
        assert!(parse("cmd_b.o := cc -c b.c\n").is_empty());
    }

    #[test]
    fn test_only_shared_tokens_are_emitted() {
        let text = "cmd_a.o := cc a\ncmd_c.o := cc c\nsource_a.o := a.c\nsource_b.o := b.c\n";
        let entries = parse(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].output, "a.o");
    }

    #[test]
    fn test_values_are_trimmed_and_crlf_tolerated() {
        let entries = parse("  cmd_a.o   :=   cc -c a.c   \r\n\tsource_a.o:=a.c \r\n");

        assert_eq!(entries[0].command, "cc -c a.c");
        assert_eq!(entries[0].file, "a.c");
    }

    #[test]
    fn test_ignores_unrelated_lines() {
        let text = "deps_a.o := \\\n  include/linux/kconfig.h \\\n  $(wildcard include/config/FOO) \\\n\n\
                    a.o: $(deps_a.o)\n\n$(deps_a.o):\n\
                    cmd_a.o := cc -c a.c\nsource_a.o := a.c\n";
        let entries = parse(text);

        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_declarations_must_start_a_line() {
        let text = "# see cmd_a.o := bogus\ncmd_a.o := cc -c a.c\nsource_a.o := a.c\n";

        assert_eq!(parse(text)[0].command, "cc -c a.c");
    }

    #[test]
    fn test_empty_assignment_does_not_swallow_next_line() {
        let entries = parse("cmd_a.o :=\nsource_a.o := a.c\n");

        assert!(entries.is_empty());
    }

    #[test]
    fn test_blank_values_are_not_declarations() {
        assert!(parse("cmd_a.o :=  
source_a.o := a.c
").is_empty());
        assert!(parse("cmd_a.o :=\r\nsource_a.o := a.c\r\n").is_empty());
        assert!(parse("cmd_a.o := cc -c a.c
source_a.o :=  	
").is_empty());
    }

    #[test]
    fn test_blank_redeclaration_keeps_earlier_value() {
        let entries = parse("cmd_a.o := cc -c a.c
cmd_a.o :=   
source_a.o := a.c
");

        assert_eq!(entries[0].command, "cc -c a.c");
    }

    #[test]
    fn test_last_declaration_wins() {
        let text = "cmd_a.o := old\nsource_a.o := old.c\ncmd_a.o := new\nsource_a.o := new.c\n";
        let entries = parse(text);

        assert_eq!(entries, vec![CompileEntry::new(DIR, "new", "new.c", "a.o")]);
    }

    #[test]
    fn test_entries_follow_source_order() {
        let text = "cmd_a.o := ca\ncmd_b.o := cb\nsource_b.o := b.c\nsource_a.o := a.c\n";
        let outputs: Vec<_> = parse(text).into_iter().map(|e| e.output).collect();

        assert_eq!(outputs, vec!["b.o", "a.o"]);
    }

    #[test]
    fn test_directory_is_stamped_verbatim() {
        let entries = KbuildRecordParser.parse("cmd_a.o := cc\nsource_a.o := a.c\n", "/out/x86");

        assert_eq!(entries[0].directory, "/out/x86");
    }

    #[test]
    fn test_parse_record_file_reports_missing_path() {
        let missing = Path::new("/nonexistent/compdb/.a.o.cmd");
        let err = parse_record_file(&KbuildRecordParser, missing, DIR).unwrap_err();

        match err {
            Error::RecordRead { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
