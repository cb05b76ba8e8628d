//! Column-name mapping for collar and survey tables.
//!
//! Each column role has a list of accepted header names, matched
//! case-insensitively; the first one present in the file wins. Defaults cover
//! the common exports (`HoleID`/`BHID`, `DH_X`/`EAST`, `DH_RL`, `AZI`, ...).
//!
//! A TOML file can replace any list:
//!
//! ```toml
//! [collar]
//! hole_id = ["BHID"]
//! z = ["RL_AHD"]
//!
//! [survey]
//! dip = ["INCL"]
//! dip_positive_down = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_hole_id() -> Vec<String> {
    names(&["holeid", "hole_id", "bhid", "hole"])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollarColumns {
    pub hole_id: Vec<String>,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub z: Vec<String>,
}

impl Default for CollarColumns {
    fn default() -> Self {
        Self {
            hole_id: default_hole_id(),
            x: names(&["dh_x", "x", "east", "easting"]),
            y: names(&["dh_y", "y", "north", "northing"]),
            z: names(&["dh_z", "dh_rl", "z", "rl", "elevation"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurveyColumns {
    pub hole_id: Vec<String>,
    pub depth: Vec<String>,
    pub dip: Vec<String>,
    pub azimuth: Vec<String>,
    /// Source dips are positive downward; negate them on ingest.
    pub dip_positive_down: bool,
}

impl Default for SurveyColumns {
    fn default() -> Self {
        Self {
            hole_id: default_hole_id(),
            depth: names(&["depth", "md", "at"]),
            dip: names(&["dip", "dh_dip"]),
            azimuth: names(&["azimuth", "azi", "az", "dh_azimuth"]),
            dip_positive_down: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMap {
    pub collar: CollarColumns,
    pub survey: SurveyColumns,
}

impl ColumnMap {
    /// Parse a column map from TOML text; omitted roles keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::new(2, format!("Failed to read column map '{}': {e}", path.display())))?;
        Self::from_toml(&text)
            .map_err(|e| AppError::new(2, format!("Invalid column map '{}': {e}", path.display())))
    }

    /// Load from `path` when given, else the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
