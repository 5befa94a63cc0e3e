//! Terminal implementation of the operator port.
//!
//! Prompts go to the writer, answers come from the reader one line at a
//! time. Numeric and yes/no questions re-prompt until the answer is
//! understood; choice questions return the raw answer for the caller to
//! validate.

use std::io::{self, BufRead, Write};
use std::sync::{Mutex, PoisonError};

use console::style;
use kvmac_core::ports::{
    Operator, OperatorError, OperatorResult, interpret_confirmation, interpret_number,
};

/// Operator reading answers line by line.
pub struct CliOperator {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl CliOperator {
    pub fn new(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Operator attached to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }

    fn write_line(&self, line: &str) {
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        // A closed stdout is not worth aborting provisioning for.
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }

    /// Show `prompt` and read one trimmed line.
    fn prompt_string(&self, prompt: &str) -> OperatorResult<String> {
        {
            let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
            write!(out, "{} ", style(format!("{prompt}:")).bold())?;
            out.flush()?;
        }

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .read_line(&mut line)?;
        if read == 0 {
            return Err(OperatorError::Io("input closed".to_string()));
        }
        Ok(line.trim().to_string())
    }
}

impl Operator for CliOperator {
    fn choose(&self, prompt: &str, options: &[String]) -> OperatorResult<String> {
        self.prompt_string(&format!("{prompt} ({})", options.join("/")))
    }

    fn number(&self, prompt: &str, default: u32) -> OperatorResult<u32> {
        loop {
            let input = self.prompt_string(prompt)?;
            if let Some(value) = interpret_number(&input, default) {
                return Ok(value);
            }
            self.warn("Please enter a positive whole number.");
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> OperatorResult<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let input = self.prompt_string(&format!("{prompt} ({hint})"))?;
            if let Some(value) = interpret_confirmation(&input, default) {
                return Ok(value);
            }
            self.warn("Please enter 'y' for yes or 'n' for no.");
        }
    }

    fn text(&self, prompt: &str, default: Option<&str>) -> OperatorResult<String> {
        let shown = match default {
            Some(default_val) => format!("{prompt} [{default_val}]"),
            None => prompt.to_string(),
        };
        let input = self.prompt_string(&shown)?;
        if input.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(input)
        }
    }

    fn info(&self, message: &str) {
        self.write_line(message);
    }

    fn warn(&self, message: &str) {
        self.write_line(&format!("{} {message}", style("warning:").yellow().bold()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    /// Writer that keeps everything written for later inspection.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            console::strip_ansi_codes(&String::from_utf8_lossy(&self.0.lock().unwrap())).into_owned()
        }
    }

    fn operator(input: &str) -> (CliOperator, SharedBuf) {
        let out = SharedBuf::default();
        (
            CliOperator::new(Cursor::new(input.to_string()), out.clone()),
            out,
        )
    }

    #[test]
    fn test_number_reprompts_then_accepts() {
        let (op, out) = operator("abc\n0\n8192\n");
        assert_eq!(op.number("Memory (MiB) [4096]", 4096).unwrap(), 8192);
        assert_eq!(out.text().matches("positive whole number").count(), 2);
    }

    #[test]
    fn test_number_default_on_empty() {
        let (op, _) = operator("\n");
        assert_eq!(op.number("CPU cores [2]", 2).unwrap(), 2);
    }

    #[test]
    fn test_confirm_default_and_hint() {
        let (op, out) = operator("\nyes\n");
        assert!(!op.confirm("Make changes?", false).unwrap());
        assert!(op.confirm("Make changes?", false).unwrap());
        assert!(out.text().contains("Make changes? (y/N):"));
    }

    #[test]
    fn test_choose_returns_raw_answer() {
        let options = vec!["intel".to_string(), "amd".to_string()];
        let (op, out) = operator("  ARM \n");
        assert_eq!(op.choose("Select your CPU vendor", &options).unwrap(), "ARM");
        assert!(out.text().contains("(intel/amd)"));
    }

    #[test]
    fn test_text_default() {
        let (op, _) = operator("\n");
        assert_eq!(op.text("Virtual disk size", Some("256G")).unwrap(), "256G");
    }

    #[test]
    fn test_closed_input_is_error() {
        let (op, _) = operator("");
        assert!(matches!(
            op.confirm("Again?", false),
            Err(OperatorError::Io(_))
        ));
    }
}
