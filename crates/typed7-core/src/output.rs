//! Resource output sinks
//!
//! Callers that persist generated segments get their streams from a
//! [`ResourceOutput`]. The directory-backed implementation guarantees
//! that asking twice for the same name never overwrites: the n-th request
//! for `name` (n > 1) opens `name_{n-1}` instead.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// A factory for named writable streams.
pub trait ResourceOutput {
    /// Create or open the named sink. No buffering beyond the underlying
    /// writer is guaranteed.
    fn new_stream(&mut self, name: &str) -> Result<Box<dyn Write>>;
}

/// A resource output that hands out stdout regardless of the name.
#[derive(Debug, Default)]
pub struct StdOutput;

impl ResourceOutput for StdOutput {
    fn new_stream(&mut self, _name: &str) -> Result<Box<dyn Write>> {
        Ok(Box::new(io::stdout()))
    }
}

/// A resource output that stores each stream as a file in one directory.
/// Files are never reopened or updated.
#[derive(Debug)]
pub struct DirectoryOutput {
    path: PathBuf,
    count: HashMap<String, usize>,
}

impl DirectoryOutput {
    /// Create a directory output rooted at `path`, creating the directory
    /// if it does not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Result<DirectoryOutput> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::EmptyOutputPath);
        }
        if !path.exists() {
            fs::create_dir(&path)?;
        }
        Ok(DirectoryOutput { path, count: HashMap::new() })
    }
}

impl ResourceOutput for DirectoryOutput {
    fn new_stream(&mut self, name: &str) -> Result<Box<dyn Write>> {
        let seen = self.count.entry(name.to_string()).or_insert(0);
        let filename = if *seen > 0 { format!("{}_{}", name, seen) } else { name.to_string() };
        *seen += 1;
        let file = File::create(self.path.join(filename))?;
        Ok(Box::new(file))
    }
}
