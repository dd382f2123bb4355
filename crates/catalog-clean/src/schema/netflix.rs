use super::{ColumnNaming, DatasetRules};
use crate::types::{FieldSpec, FieldType};

/// Netflix titles catalog.
pub struct NetflixRules;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("ShowId", FieldType::Text),
    FieldSpec::required("Type", FieldType::Text),
    FieldSpec::required("Title", FieldType::Text),
    FieldSpec::optional("Director", FieldType::Text),
    FieldSpec::optional("Cast", FieldType::Text),
    FieldSpec::optional("Country", FieldType::Text),
    FieldSpec::optional("DateAdded", FieldType::Date),
    FieldSpec::required("ReleaseYear", FieldType::Integer),
    FieldSpec::optional("Rating", FieldType::Text),
    FieldSpec::optional("Duration", FieldType::Text),
    FieldSpec::optional("Genres", FieldType::Text),
    FieldSpec::optional("Description", FieldType::Text),
];

// `listed_in` holds comma-separated genres.
const RENAMES: &[(&str, &str)] = &[
    ("show_id", "ShowId"),
    ("type", "Type"),
    ("title", "Title"),
    ("director", "Director"),
    ("cast", "Cast"),
    ("country", "Country"),
    ("date_added", "DateAdded"),
    ("release_year", "ReleaseYear"),
    ("rating", "Rating"),
    ("duration", "Duration"),
    ("listed_in", "Genres"),
    ("description", "Description"),
];

impl DatasetRules for NetflixRules {
    fn display_name(&self) -> &'static str {
        "Netflix catalog"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn column_naming(&self) -> ColumnNaming {
        ColumnNaming::RenameTable(RENAMES)
    }
}
