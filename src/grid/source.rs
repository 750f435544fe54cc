use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::debug;

use super::{parse, Grid};
use crate::error::GridError;

/// Where the bytes of a grid file come from.
#[derive(Clone, Debug)]
pub enum GridSource {
    /// A file on disk, read on first use.
    Path(PathBuf),
    /// Bytes owned by the caller, e.g. downloaded at runtime.
    Bytes { name: String, data: Arc<[u8]> },
    /// A blob compiled into the binary with `include_bytes!`.
    Static {
        name: &'static str,
        data: &'static [u8],
    },
}

impl GridSource {
    /// Cache key identifying this source, prefixed with its kind.
    pub fn key(&self) -> String {
        match self {
            GridSource::Path(path) => format!("path:{}", path.display()),
            GridSource::Bytes { name, .. } => format!("bytes:{name}"),
            GridSource::Static { name, .. } => format!("static:{name}"),
        }
    }

    fn bytes(&self) -> Result<Cow<'_, [u8]>, GridError> {
        match self {
            // The file handle is closed before `read` returns, on every path.
            GridSource::Path(path) => Ok(Cow::Owned(std::fs::read(path)?)),
            GridSource::Bytes { data, .. } => Ok(Cow::Borrowed(&data[..])),
            GridSource::Static { data, .. } => Ok(Cow::Borrowed(*data)),
        }
    }

    /// Read and parse the grid, without caching.
    pub fn load(&self) -> Result<Grid, GridError> {
        parse(&self.bytes()?)
    }
}

/// Parse-once store of grids, keyed by [`GridSource::key`].
///
/// Owned by the caller and shared by reference; the lock is held only for
/// the map lookup and insert, never while reading or parsing.
#[derive(Debug, Default)]
pub struct GridCache {
    grids: Mutex<HashMap<String, Arc<Grid>>>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &GridSource) -> Result<Arc<Grid>, GridError> {
        let key = source.key();
        if let Some(grid) = self.lock().get(&key) {
            debug!("grid cache hit: {key}");
            return Ok(Arc::clone(grid));
        }

        let grid = Arc::new(source.load()?);
        let mut grids = self.lock();
        // Another thread may have won the race, keep its copy
        let entry = grids.entry(key).or_insert(grid);
        Ok(Arc::clone(entry))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Grid>>> {
        // A panic elsewhere while holding the lock leaves the map usable
        self.grids.lock().unwrap_or_else(|e| e.into_inner())
    }
}
