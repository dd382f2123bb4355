use super::{ColumnNaming, DatasetRules};
use crate::types::{FieldSpec, FieldType};

/// Movie catalog export with snake_case headers.
pub struct MovieRules;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("ReleaseDate", FieldType::Date),
    FieldSpec::required("Title", FieldType::Text),
    FieldSpec::optional("Overview", FieldType::Text),
    FieldSpec::optional("Popularity", FieldType::Decimal),
    FieldSpec::optional("VoteCount", FieldType::Integer),
    FieldSpec::required("VoteAverage", FieldType::Decimal),
    FieldSpec::optional("OriginalLanguage", FieldType::Text),
    FieldSpec::optional("Genre", FieldType::Text),
    FieldSpec::optional("PosterUrl", FieldType::Url),
];

const RENAMES: &[(&str, &str)] = &[
    ("release_date", "ReleaseDate"),
    ("title", "Title"),
    ("overview", "Overview"),
    ("popularity", "Popularity"),
    ("vote_count", "VoteCount"),
    ("vote_average", "VoteAverage"),
    ("original_language", "OriginalLanguage"),
    ("genre", "Genre"),
    ("poster_url", "PosterUrl"),
];

impl DatasetRules for MovieRules {
    fn display_name(&self) -> &'static str {
        "Movie"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn column_naming(&self) -> ColumnNaming {
        ColumnNaming::RenameTable(RENAMES)
    }
}
