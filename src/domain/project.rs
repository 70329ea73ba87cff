use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::LocationPick;

/// A solar design project: one site/address record, persisted as one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub location: String,
    pub is_starred: bool,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Backing file. `None` until the first successful save.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

impl Default for Project {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            name: String::new(),
            description: String::new(),
            location: String::new(),
            is_starred: false,
            created_date: now,
            last_modified_date: now,
            latitude: 0.0,
            longitude: 0.0,
            file_path: None,
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn has_location(&self) -> bool {
        !self.location.trim().is_empty()
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// File name without extension, e.g. `Solar_Farm_20240101_120000`.
    pub fn file_stem(&self) -> Option<&str> {
        self.file_path()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
    }

    /// Record a location picked on the map. The address is written to both
    /// `location` and `description`.
    pub fn apply_location(&mut self, pick: &LocationPick) {
        self.location = pick.address.clone();
        self.description = pick.address.clone();
        if let Some((latitude, longitude)) = pick.coordinates() {
            self.latitude = latitude;
            self.longitude = longitude;
        }
    }
}
