//! Canonical schemas and per-dataset cleaning rules.
//!
//! Every supported dataset shape is a [`DatasetKind`] variant. Each variant
//! owns a static [`DatasetRules`] object describing:
//! - the ordered canonical fields and their semantic types
//! - which fields are required
//! - how raw column names map onto canonical names

mod anime;
mod movie;
mod netflix;

pub use anime::AnimeRules;
pub use movie::MovieRules;
pub use netflix::NetflixRules;

use crate::types::{FieldSpec, FieldType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How raw column names are turned into canonical names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnNaming {
    /// Trim, lowercase, and drop everything that is not `[a-z0-9]`.
    Structural,
    /// Explicit `(source, canonical)` pairs; unknown names pass through.
    RenameTable(&'static [(&'static str, &'static str)]),
}

/// Cleaning rules for one dataset shape.
pub trait DatasetRules: Send + Sync {
    /// Human-readable name of the dataset shape.
    fn display_name(&self) -> &'static str;

    /// Canonical fields in output order.
    fn fields(&self) -> &'static [FieldSpec];

    /// Strategy used by the column normalizer.
    fn column_naming(&self) -> ColumnNaming;

    /// Names of the fields that must not be missing.
    fn required_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    /// Names of the fields subject to URL-shape validation.
    fn url_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|f| f.field_type == FieldType::Url)
            .map(|f| f.name)
            .collect()
    }

    /// Look up a canonical field by name.
    fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }
}

/// The three supported dataset shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Anime,
    Movie,
    #[serde(rename = "netflix")]
    NetflixCatalog,
}

static ANIME: AnimeRules = AnimeRules;
static MOVIE: MovieRules = MovieRules;
static NETFLIX: NetflixRules = NetflixRules;

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [Self::Anime, Self::Movie, Self::NetflixCatalog];

    /// The cleaning rules for this dataset kind.
    pub fn rules(self) -> &'static dyn DatasetRules {
        match self {
            Self::Anime => &ANIME,
            Self::Movie => &MOVIE,
            Self::NetflixCatalog => &NETFLIX,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Movie => "movie",
            Self::NetflixCatalog => "netflix",
        }
    }

    /// Pick a dataset kind from a file name by naming convention.
    ///
    /// Matches `anime`, `movie`, or `netflix` anywhere in the lowercased
    /// file stem. The file content is never inspected.
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| stem.contains(kind.as_str()))
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
