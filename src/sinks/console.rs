//! Console sink implementation

use crate::core::{Result, Sink};
use std::io::{self, Write};

/// Writes records to the process's standard output.
///
/// The stdout lock is held for the whole record, so records from different
/// loggers sharing the terminal never interleave mid-line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for ConsoleSink {
    fn log(&self, data: &[u8]) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_sink_writes() {
        let sink = ConsoleSink::new();
        sink.log(b"console sink test line\n").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.name(), "console");
    }
}
