//! Record text in the shape Kbuild writes it.

/// A `.o.cmd` body for one object: saved command, source and a deps block.
///
/// `output` is the object path relative to the build root, e.g. `kernel/fork.o`.
pub fn kbuild_record(output: &str, source: &str, command: &str) -> String {
    format!(
        "savedcmd_{output} := {command}\n\
         \n\
         source_{output} := {source}\n\
         \n\
         deps_{output} := \\\n\
         \x20 include/linux/compiler-version.h \\\n\
         \x20   $(wildcard include/config/CC_VERSION_TEXT) \\\n\
         \x20 include/linux/kconfig.h \\\n\
         \n\
         {output}: $(deps_{output})\n\
         \n\
         $(deps_{output}):\n"
    )
}

/// Record produced for generated objects that have no source declaration
pub fn command_only_record(output: &str, command: &str) -> String {
    format!("savedcmd_{output} := {command}\n")
}

/// Record with a source but no command
pub fn source_only_record(output: &str, source: &str) -> String {
    format!("source_{output} := {source}\n")
}

/// Typical gcc invocation for `source` compiled to `output`
pub fn gcc_command(output: &str, source: &str) -> String {
    format!(
        "gcc -Wp,-MMD,{output}.d -nostdinc -I./include -D__KERNEL__ -O2 -c -o {output} {source}"
    )
}

/// Record file path for an object, following Kbuild's `<dir>/.<name>.cmd` layout
pub fn record_path_for(output: &str) -> String {
    match output.rsplit_once('/') {
        Some((dir, name)) => format!("{dir}/.{name}.cmd"),
        None => format!(".{output}.cmd"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_path_for_nested_object() {
        assert_eq!(record_path_for("kernel/sched/core.o"), "kernel/sched/.core.o.cmd");
        assert_eq!(record_path_for("init.o"), ".init.o.cmd");
    }

    #[test]
    fn test_kbuild_record_contains_both_declarations() {
        let text = kbuild_record("a.o", "a.c", "cc -c a.c");

        assert!(text.starts_with("savedcmd_a.o := cc -c a.c\n"));
        assert!(text.contains("\nsource_a.o := a.c\n"));
        assert!(text.contains("deps_a.o := \\\n  include/linux/compiler-version.h"));
    }
}
