use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::*;

/// Where the lines of an import came from, used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(String),
    Bytes,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::File(file) => write!(f, "file \"{file}\""),
            Origin::Bytes => write!(f, "bytes"),
        }
    }
}

/// A text input for one import pass. Files ending in `.gz` are decompressed on the fly.
///
/// The underlying file is closed when the input is dropped, which happens when the pass
/// that consumed it returns.
pub struct Input<'reader> {
    reader: Box<dyn Read + Send + 'reader>,
    origin: Origin,
}

impl<'reader> Input<'reader> {
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let path = file.as_ref();
        let name = path.display().to_string();

        let f = File::open(path).map_err(|e| Error::FileIo {
            file: name.clone(),
            source: Box::new(e),
        })?;

        let reader: Box<dyn Read + Send> = if name.ends_with(".gz") {
            Box::new(MultiGzDecoder::new(f))
        } else {
            Box::new(f)
        };

        Ok(Self {
            reader,
            origin: Origin::File(name),
        })
    }

    /// Input from an arbitrary `Read`er.
    pub fn from_reader(reader: impl Read + Send + 'reader) -> Self {
        Self {
            reader: Box::new(reader),
            origin: Origin::Bytes,
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Numbered lines (starting at 1) without line terminators.
    pub(crate) fn lines(self) -> (Lines<'reader>, Origin) {
        let origin = self.origin.clone();
        (
            Lines {
                reader: BufReader::new(self.reader),
                origin: self.origin,
                line_no: 0,
                buf: String::new(),
            },
            origin,
        )
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Input::from_reader(bytes)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::from_reader(text.as_bytes())
    }
}

pub(crate) struct Lines<'reader> {
    reader: BufReader<Box<dyn Read + Send + 'reader>>,
    origin: Origin,
    line_no: usize,
    buf: String,
}

impl<'reader> Lines<'reader> {
    /// Read the next line, returning its number and content.
    pub(crate) fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        self.buf.clear();

        let n = self.reader.read_line(&mut self.buf).map_err(|e| match &self.origin {
            Origin::File(file) => Error::FileIo {
                file: file.clone(),
                source: Box::new(e),
            },
            Origin::Bytes => Error::BytesIo(Box::new(e)),
        })?;

        if n == 0 {
            return Ok(None);
        }

        self.line_no += 1;
        let line = self.buf.trim_end_matches(['\n', '\r']);
        Ok(Some((self.line_no, line)))
    }
}
