//! Line-scoped editing of `KEY="value"` shell assignments.
//!
//! Boot scripts in the toolkit carry their tunables as plain shell
//! assignments, for example:
//!
//! ```text
//! ALLOCATED_RAM="4096" # MiB
//! CPU_SOCKETS="1"
//! ```
//!
//! A line matches key `K` only when, after leading whitespace, it starts with
//! `K="`. Comments mentioning `K`, keys that merely contain `K`, and keys that
//! have `K` as a prefix never match. Rewriting touches only the bytes between
//! the quotes; indentation, trailing comments and line endings are preserved.

/// Location of an assignment value inside a single line.
struct ValueSpan {
    start: usize,
    end: usize,
}

fn value_span(line: &str, key: &str) -> Option<ValueSpan> {
    let indent = line.len() - line.trim_start().len();
    let rest = &line[indent..];
    let after_key = rest.strip_prefix(key)?;
    let quoted = after_key.strip_prefix("=\"")?;
    let close = quoted.find('"')?;
    let start = indent + key.len() + 2;
    Some(ValueSpan {
        start,
        end: start + close,
    })
}

/// Value of the first assignment to `key`, if any.
pub fn read_assignment<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.lines()
        .find_map(|line| value_span(line, key).map(|span| &line[span.start..span.end]))
}

/// Replace the value of every assignment to `key`.
///
/// Returns the rewritten text and whether any line matched. When nothing
/// matches the returned text is identical to the input.
pub fn set_assignment(text: &str, key: &str, value: &str) -> (String, bool) {
    let mut output = String::with_capacity(text.len() + value.len());
    let mut replaced = false;

    for line in text.split_inclusive('\n') {
        if let Some(span) = value_span(line, key) {
            output.push_str(&line[..span.start]);
            output.push_str(value);
            output.push_str(&line[span.end..]);
            replaced = true;
        } else {
            output.push_str(line);
        }
    }

    (output, replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "#!/usr/bin/env bash\n\
# ALLOCATED_RAM=\"1024\" is too small\n\
MY_ALLOCATED_RAM=\"2048\"\n\
ALLOCATED_RAM_MAX=\"9000\"\n\
ALLOCATED_RAM=\"4096\" # MiB\n\
CPU_SOCKETS=\"1\"\n\
args=( -m \"$ALLOCATED_RAM\" )\n";

    #[test]
    fn test_read_assignment_exact_key() {
        assert_eq!(read_assignment(SCRIPT, "ALLOCATED_RAM"), Some("4096"));
        assert_eq!(read_assignment(SCRIPT, "CPU_SOCKETS"), Some("1"));
        assert_eq!(read_assignment(SCRIPT, "CPU_CORES"), None);
    }

    #[test]
    fn test_set_assignment_touches_only_the_assignment_line() {
        let (updated, replaced) = set_assignment(SCRIPT, "ALLOCATED_RAM", "8192");
        assert!(replaced);

        let expected = SCRIPT.replace(
            "ALLOCATED_RAM=\"4096\" # MiB",
            "ALLOCATED_RAM=\"8192\" # MiB",
        );
        assert_eq!(updated, expected);
        assert!(updated.contains("# ALLOCATED_RAM=\"1024\" is too small"));
        assert!(updated.contains("MY_ALLOCATED_RAM=\"2048\""));
        assert!(updated.contains("ALLOCATED_RAM_MAX=\"9000\""));
        assert!(updated.contains("-m \"$ALLOCATED_RAM\""));
    }

    #[test]
    fn test_set_assignment_missing_key_is_identity() {
        let (updated, replaced) = set_assignment(SCRIPT, "CPU_THREADS", "8");
        assert!(!replaced);
        assert_eq!(updated, SCRIPT);
    }

    #[test]
    fn test_set_assignment_preserves_indent_and_crlf() {
        let text = "  CPU_CORES=\"2\"\r\nother\r\n";
        let (updated, replaced) = set_assignment(text, "CPU_CORES", "6");
        assert!(replaced);
        assert_eq!(updated, "  CPU_CORES=\"6\"\r\nother\r\n");
    }

    #[test]
    fn test_set_assignment_without_trailing_newline() {
        let (updated, _) = set_assignment("CPU_THREADS=\"4\"", "CPU_THREADS", "16");
        assert_eq!(updated, "CPU_THREADS=\"16\"");
    }

    #[test]
    fn test_unquoted_assignment_is_ignored() {
        let text = "CPU_CORES=2\n";
        assert_eq!(read_assignment(text, "CPU_CORES"), None);
        let (updated, replaced) = set_assignment(text, "CPU_CORES", "4");
        assert!(!replaced);
        assert_eq!(updated, text);
    }
}
