//! Report document sink
//!
//! Append-only text output. Every write is flushed straight away so an
//! interrupted run still leaves everything rendered so far on disk.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Append-only report writer with optional mirroring to stdout
pub struct Document<W: Write> {
    sink: W,
    mirror: Option<Box<dyn Write + Send>>,
}

impl Document<File> {
    /// Create (or truncate) the report file
    pub fn create(path: &Path, mirror_stdout: bool) -> io::Result<Self> {
        let document = Document::new(File::create(path)?);
        Ok(if mirror_stdout {
            document.with_mirror(Box::new(io::stdout()))
        } else {
            document
        })
    }
}

impl<W: Write> Document<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, mirror: None }
    }

    /// Copy every write to a second stream, typically stdout
    pub fn with_mirror(mut self, mirror: Box<dyn Write + Send>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.sink.write_all(text.as_bytes())?;
        self.sink.flush()?;

        if let Some(mirror) = self.mirror.as_mut() {
            mirror.write_all(text.as_bytes())?;
            mirror.flush()?;
        }
        Ok(())
    }

    /// Document title, upper-cased between `=` rules
    pub fn title(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(title.chars().count());
        self.write(&format!("\n{rule}\n{}\n{rule}\n\n", title.to_uppercase()))
    }

    /// Section title underlined with `-`
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        let rule = "-".repeat(title.chars().count());
        self.write(&format!("\n{title}\n{rule}\n\n"))
    }

    /// Sub-section title prefixed by `depth` dashes and `+ `
    pub fn sub_section(&mut self, title: &str, depth: usize) -> io::Result<()> {
        self.write(&format!("\n{}+ {title}\n\n", "-".repeat(depth)))
    }

    /// Heading for a section at the given nesting level
    pub fn heading(&mut self, level: usize, title: &str) -> io::Result<()> {
        match level {
            0 => self.title(title),
            1 => self.section(title),
            _ => self.sub_section(title, level - 2),
        }
    }

    pub fn string(&mut self, text: &str) -> io::Result<()> {
        self.write(&format!("{text}\n"))
    }

    pub fn newline(&mut self) -> io::Result<()> {
        self.write("\n")
    }

    /// Text followed by a blank line
    pub fn paragraph(&mut self, text: &str) -> io::Result<()> {
        self.write(&format!("{text}\n\n"))
    }

    /// `key: value` lines with values aligned on the widest key
    pub fn key_values(&mut self, pairs: &[(&str, &str)]) -> io::Result<()> {
        let width = pairs
            .iter()
            .map(|(key, _)| key.chars().count() + 1)
            .max()
            .unwrap_or(0);

        let mut block = String::from("\n");
        for (key, value) in pairs {
            let label = format!("{key}:");
            block.push_str(&format!("{label:<width$} {value}\n"));
        }
        block.push('\n');
        self.write(&block)
    }

    pub fn numbered_list<S: AsRef<str>>(&mut self, items: &[S]) -> io::Result<()> {
        let mut block = String::from("\n");
        for (index, item) in items.iter().enumerate() {
            block.push_str(&format!("{}. {}\n", index + 1, item.as_ref()));
        }
        block.push('\n');
        self.write(&block)
    }

    pub fn bulleted_list<S: AsRef<str>>(&mut self, items: &[S]) -> io::Result<()> {
        let mut block = String::from("\n");
        for item in items {
            block.push_str(&format!("* {}\n", item.as_ref()));
        }
        block.push('\n');
        self.write(&block)
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.sink.flush()?;
        if let Some(mirror) = self.mirror.as_mut() {
            mirror.flush()?;
        }
        Ok(self.sink)
    }
}
