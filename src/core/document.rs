use std::iter::FusedIterator;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::SplitInclusive;
use tracing::{debug, info};

use crate::error::TextSwapResult;
use crate::utils::fs::{atomic_write, read_utf8};

/// The single text resource being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    /// Full contents; mutated in place by rule application
    pub text: String,
}

impl Document {
    /// Build a document from text already in memory
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Load the full text of `path`, decoded as UTF-8
    pub fn load(path: impl AsRef<Path>) -> TextSwapResult<Self> {
        let path = path.as_ref();
        let text = read_utf8(path)?;
        info!("Loaded {} ({} bytes)", path.display(), text.len());

        Ok(Self::new(path, text))
    }

    /// Overwrite the resource the document was loaded from
    pub fn save(&self) -> TextSwapResult<()> {
        atomic_write(&self.path, &self.text)?;
        info!("Saved {} ({} bytes)", self.path.display(), self.text.len());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw lines with 1-based numbers, terminators included
    pub fn lines(&self, range: RangeInclusive<usize>) -> InspectLines<'_> {
        debug!(
            "Inspecting lines {}-{} of {}",
            range.start(),
            range.end(),
            self.path.display()
        );
        InspectLines {
            inner: self.text.split_inclusive('\n'),
            next_number: 1,
            range,
        }
    }
}

/// Lazy view over a line range of a [`Document`]; clone it to restart
#[derive(Debug, Clone)]
pub struct InspectLines<'a> {
    inner: SplitInclusive<'a, char>,
    next_number: usize,
    range: RangeInclusive<usize>,
}

impl<'a> Iterator for InspectLines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.next_number > *self.range.end() {
                return None;
            }
            let line = self.inner.next()?;
            let number = self.next_number;
            self.next_number += 1;
            if number >= *self.range.start() {
                return Some((number, line));
            }
        }
    }
}

impl FusedIterator for InspectLines<'_> {}
