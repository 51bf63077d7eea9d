use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::error::InputError;
use super::event::InputEvent;

const DOCUMENT_START: &str = "---";
const DOCUMENT_END: &str = "...";
const DIRECTIVE: char = '%';

fn is_document_start(line: &str) -> bool {
    match line.strip_prefix(DOCUMENT_START) {
        Some(rest) => rest.is_empty() || rest.starts_with(' '),
        None => false,
    }
}

/// EventSource reads events one at a time from a multi-document YAML file.
///
/// Each YAML document is one [`InputEvent`]. Documents are read and parsed lazily, so the
/// file never has to fit in memory, and the number of bytes consumed so far is tracked for
/// progress reporting.
#[derive(Debug)]
pub struct EventSource {
    reader: BufReader<File>,
    path: PathBuf,
    total_bytes: u64,
    bytes_read: u64,
    line: String,
    document: String,
    is_ended: bool,
}

impl EventSource {
    /// Open an event file
    pub fn new(path: &Path) -> Result<Self, InputError> {
        if !path.exists() {
            return Err(InputError::BadFilePath(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let total_bytes = file.metadata()?.len();
        Ok(Self {
            reader: BufReader::new(file),
            path: path.to_path_buf(),
            total_bytes,
            bytes_read: 0,
            line: String::new(),
            document: String::new(),
            is_ended: false,
        })
    }

    /// Get the next event in the file
    ///
    /// Returns a `Result<Option<InputEvent>>`. The Option is None if the file has no more
    /// events.
    pub fn next_event(&mut self) -> Result<Option<InputEvent>, InputError> {
        while !self.is_ended {
            self.line.clear();
            let n = self.reader.read_line(&mut self.line)?;
            self.bytes_read += n as u64;
            if n == 0 {
                self.is_ended = true;
                return self.take_document();
            }

            let trimmed = self.line.trim_end();
            if trimmed == DOCUMENT_END {
                if let Some(event) = self.take_document()? {
                    return Ok(Some(event));
                }
            } else if is_document_start(trimmed) || self.line.starts_with(DIRECTIVE) {
                // Directives and the start marker open the next document; whatever came before
                // them, if anything, is a finished event
                let event = if self.has_content() {
                    self.take_document()?
                } else {
                    None
                };
                self.document.push_str(&self.line);
                if event.is_some() {
                    return Ok(event);
                }
            } else {
                self.document.push_str(&self.line);
            }
        }
        Ok(None)
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    pub fn get_total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn get_bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// True if the buffered document holds anything besides blanks, comments, directives and
    /// start markers
    fn has_content(&self) -> bool {
        self.document.lines().any(|l| {
            let t = l.trim();
            !t.is_empty() && !t.starts_with('#') && !l.starts_with(DIRECTIVE) && t != DOCUMENT_START
        })
    }

    /// Parse the buffered document if it has content, then clear the buffer
    fn take_document(&mut self) -> Result<Option<InputEvent>, InputError> {
        let result = if self.has_content() {
            Some(serde_yaml::from_str::<InputEvent>(&self.document)?)
        } else {
            None
        };
        self.document.clear();
        Ok(result)
    }
}
