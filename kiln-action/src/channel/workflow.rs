//! GitHub Actions workflow commands
//!
//! Log lines go to stdout. Groups and failures use `::command::` lines.
//! Outputs are appended to the file named by `GITHUB_OUTPUT` as
//! `name<<delimiter` blocks, or fall back to the legacy `::set-output` command
//! when that file is not available.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

use super::PipelineChannel;

/// Channel writing GitHub Actions workflow commands
pub struct WorkflowCommandChannel {
    out: Mutex<Box<dyn Write + Send>>,
    output_file: Option<PathBuf>,
}

impl WorkflowCommandChannel {
    /// Creates a channel writing commands to `out`
    ///
    /// # Arguments
    /// * `out` - Destination of log lines and commands
    /// * `output_file` - File outputs are appended to, if any
    pub fn new(out: Box<dyn Write + Send>, output_file: Option<PathBuf>) -> Self {
        Self {
            out: Mutex::new(out),
            output_file,
        }
    }

    /// Creates a channel on stdout, using `GITHUB_OUTPUT` for outputs
    pub fn from_env() -> Self {
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Self::new(Box::new(io::stdout()), output_file)
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap();
        // The log stream is the only place to report a failed log write
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }

    fn append_output(&self, path: &Path, name: &str, value: &str) -> io::Result<()> {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());

        if name.contains(&delimiter) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Unexpected input: name should not contain the delimiter \"{}\"", delimiter),
            ));
        }

        if value.contains(&delimiter) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Unexpected input: value should not contain the delimiter \"{}\"", delimiter),
            ));
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        write!(file, "{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
    }
}

impl PipelineChannel for WorkflowCommandChannel {
    fn info(&self, message: &str) {
        self.write_line(message);
    }

    fn debug(&self, message: &str) {
        self.write_line(&format!("::debug::{}", escape_data(message)));
    }

    fn warning(&self, message: &str) {
        self.write_line(&format!("::warning::{}", escape_data(message)));
    }

    fn start_group(&self, name: &str) {
        self.write_line(&format!("::group::{}", escape_data(name)));
    }

    fn end_group(&self) {
        self.write_line("::endgroup::");
    }

    fn set_output(&self, name: &str, value: &str) -> io::Result<()> {
        match &self.output_file {
            Some(path) => self.append_output(path, name, value),
            None => {
                self.write_line(&format!(
                    "::set-output name={}::{}",
                    escape_property(name),
                    escape_data(value)
                ));
                Ok(())
            }
        }
    }

    fn set_failed(&self, message: &str) {
        self.write_line(&format!("::error::{}", escape_data(message)));
    }
}

/// Escapes a command message
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escapes a command property value
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Writer sharing its buffer with the test
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("50% done\r\nnext"), "50%25 done%0D%0Anext");
        assert_eq!(escape_property("a:b,c"), "a%3Ab%2Cc");
    }

    #[test]
    fn test_log_commands() {
        let buffer = SharedBuffer::default();
        let channel = WorkflowCommandChannel::new(Box::new(buffer.clone()), None);

        channel.start_group("Docker tags");
        channel.info("ghcr.io/o/i:a");
        channel.end_group();
        channel.debug("hidden");
        channel.warning("cpuCount is not a number: 50%");
        channel.set_failed("line one\nline two");

        assert_eq!(
            buffer.contents(),
            "::group::Docker tags\n\
             ghcr.io/o/i:a\n\
             ::endgroup::\n\
             ::debug::hidden\n\
             ::warning::cpuCount is not a number: 50%25\n\
             ::error::line one%0Aline two\n"
        );
    }

    #[test]
    fn test_set_output_without_file_uses_command() {
        let buffer = SharedBuffer::default();
        let channel = WorkflowCommandChannel::new(Box::new(buffer.clone()), None);

        channel.set_output("aliases", "a-1,b-1").unwrap();

        assert_eq!(buffer.contents(), "::set-output name=aliases::a-1,b-1\n");
    }

    #[test]
    fn test_set_output_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        std::fs::write(&path, "existing=1\n").unwrap();

        let buffer = SharedBuffer::default();
        let channel = WorkflowCommandChannel::new(Box::new(buffer.clone()), Some(path.clone()));

        channel.set_output("aliases", "a-1,b-1").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "existing=1");
        let delimiter = lines[1].strip_prefix("aliases<<").unwrap();
        assert!(delimiter.starts_with("ghadelimiter_"));
        assert_eq!(lines[2], "a-1,b-1");
        assert_eq!(lines[3], delimiter);
        assert!(buffer.contents().is_empty());
    }
}
