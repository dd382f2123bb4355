use super::{ColumnNaming, DatasetRules};
use crate::types::{FieldSpec, FieldType};

/// Anime rankings export (one row per title).
///
/// Headers such as `Anime URL` or ` Rank ` are normalized structurally,
/// so the canonical names are the collapsed lowercase forms.
pub struct AnimeRules;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("rank", FieldType::Integer),
    FieldSpec::required("title", FieldType::Text),
    FieldSpec::optional("type", FieldType::Text),
    FieldSpec::optional("episodes", FieldType::Integer),
    FieldSpec::required("score", FieldType::Decimal),
    FieldSpec::optional("members", FieldType::Integer),
    FieldSpec::optional("aired", FieldType::Text),
    FieldSpec::required("animeurl", FieldType::Url),
    FieldSpec::required("imageurl", FieldType::Url),
];

impl DatasetRules for AnimeRules {
    fn display_name(&self) -> &'static str {
        "Anime"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn column_naming(&self) -> ColumnNaming {
        ColumnNaming::Structural
    }
}
