//! In-memory song catalog.

use crate::error::ServerError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;

use log::info;

/// Song names in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    names: Vec<String>,
}

impl Catalog {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads one song name per line. Lines are trimmed and blank lines skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Catalog`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ServerError::Catalog {
            path: path.to_path_buf(),
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let catalog = Self::from_names(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        );

        info!("Loaded {} songs from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names starting with `term`, ignoring case. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<String> {
        let term = term.to_lowercase();
        self.names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&term))
            .cloned()
            .collect()
    }
}
