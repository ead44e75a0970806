//! Report formatting and emission

mod json;
mod text;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::config::{OutputDestination, OutputFormat};
use crate::ensemble::EnsembleResult;
use crate::error::{EnsembleError, Result};

pub use json::JsonOutput;
pub use text::{format_number, format_report, TextOutput};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render an ensemble result as ordered text lines
    fn render(&self, result: &EnsembleResult) -> Result<Vec<String>>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Text => Box::new(TextOutput),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Write lines to `writer`, one per line
pub fn write_lines(lines: &[String], writer: &mut dyn Write) -> std::io::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}

/// Write a dataset's report lines to the configured destination
pub fn emit(lines: &[String], destination: &OutputDestination, dataset: &str) -> Result<()> {
    match destination {
        OutputDestination::Console => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_lines(lines, &mut lock).map_err(|e| EnsembleError::io("<stdout>", e))
        }
        OutputDestination::File(path) => write_file(lines, path),
        OutputDestination::Directory(dir) => {
            fs::create_dir_all(dir).map_err(|e| EnsembleError::io(dir, e))?;
            write_file(lines, &dir.join(dataset))
        }
    }
}

fn write_file(lines: &[String], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| EnsembleError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_lines(lines, &mut writer).map_err(|e| EnsembleError::io(path, e))?;
    info!(path = %path.display(), lines = lines.len(), "wrote report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_lines_terminates_each_line() {
        let mut buf = Vec::new();
        write_lines(&["a".to_string(), "b c".to_string()], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a\nb c\n");
    }

    #[test]
    fn test_emit_to_directory_names_file_after_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let destination = OutputDestination::Directory(out.clone());

        emit(&["1.0 2.0 0.0".to_string()], &destination, "g.dat").unwrap();

        let written = fs::read_to_string(out.join("g.dat")).unwrap();
        assert_eq!(written, "1.0 2.0 0.0\n");
    }

    #[test]
    fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avg.txt");
        emit(&[], &OutputDestination::File(path.clone()), "x.dat").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }
}
