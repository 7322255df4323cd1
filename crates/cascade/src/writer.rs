use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::result::NewsResult;

/// Streams completed news results into a single JSON array, flushing after
/// every entry so finished work survives a crash. The document only gains
/// its closing bracket in `finish()`: a run that dies mid-way leaves a
/// syntactically incomplete file on purpose, so partial output is
/// distinguishable from a completed run.
pub struct ResultWriter {
    writer: BufWriter<File>,
    entries: usize,
}

impl ResultWriter {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context(format!("Failed to create output directory: {:?}", parent))?;
            }
        }

        let file = File::create(path).context(format!("Failed to create output file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(b"[\n")?;

        Ok(Self { writer, entries: 0 })
    }

    /// Append one news result and flush it to disk before returning.
    pub fn write(&mut self, result: &NewsResult) -> Result<()> {
        if self.entries > 0 {
            self.writer.write_all(b",\n")?;
        }
        let json = serde_json::to_string_pretty(result)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.flush()?;
        self.entries += 1;
        Ok(())
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Close the array. Consumes the writer: nothing can be appended to a
    /// completed document.
    pub fn finish(mut self) -> Result<()> {
        self.writer.write_all(b"\n]\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
