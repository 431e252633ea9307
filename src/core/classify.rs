// Declared-type classification: which database types each accessor family accepts.
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SemanticCategory {
    Integer,
    Float,
    Text,
    Temporal,
}

impl SemanticCategory {
    /// Priority order used when a single category must be picked for a column.
    pub const ALL: [SemanticCategory; 4] = [
        SemanticCategory::Integer,
        SemanticCategory::Float,
        SemanticCategory::Text,
        SemanticCategory::Temporal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticCategory::Integer => "int",
            SemanticCategory::Float => "float",
            SemanticCategory::Text => "string",
            SemanticCategory::Temporal => "time",
        }
    }

    fn accepted(self) -> &'static [&'static str] {
        match self {
            SemanticCategory::Integer => INTEGER_TYPES,
            SemanticCategory::Float => FLOAT_TYPES,
            SemanticCategory::Text => TEXT_TYPES,
            SemanticCategory::Temporal => TEMPORAL_TYPES,
        }
    }
}

impl fmt::Display for SemanticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// YEAR and TIME appear twice: once for their plain reading, once for GetTime.
const INTEGER_TYPES: &[&str] = &["INT", "TINYINT", "SMALLINT", "MEDIUMINT", "BIGINT", "YEAR"];
const FLOAT_TYPES: &[&str] = &["FLOAT", "DOUBLE", "DECIMAL"];
const TEXT_TYPES: &[&str] = &[
    "CHAR",
    "VARCHAR",
    "TINYTEXT",
    "TEXT",
    "MEDIUMTEXT",
    "LONGTEXT",
    "JSON",
    "TIME",
];
const TEMPORAL_TYPES: &[&str] = &["DATE", "DATETIME", "TIMESTAMP", "YEAR", "TIME"];

/// Returns whether `declared_type` may be read through the `category` accessors.
/// Matching is exact and case-sensitive.
pub fn classify(declared_type: &str, category: SemanticCategory) -> bool {
    category.accepted().contains(&declared_type)
}

/// First category accepting `declared_type`, in `SemanticCategory::ALL` order.
pub fn category_of(declared_type: &str) -> Option<SemanticCategory> {
    SemanticCategory::ALL
        .into_iter()
        .find(|category| classify(declared_type, *category))
}

#[cfg(test)]
mod tests {
    use super::{SemanticCategory, category_of, classify};

    #[test]
    fn year_and_time_belong_to_two_categories() {
        assert!(classify("YEAR", SemanticCategory::Integer));
        assert!(classify("YEAR", SemanticCategory::Temporal));
        assert!(!classify("YEAR", SemanticCategory::Text));
        assert!(classify("TIME", SemanticCategory::Text));
        assert!(classify("TIME", SemanticCategory::Temporal));
        assert!(!classify("TIME", SemanticCategory::Integer));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(classify("BIGINT", SemanticCategory::Integer));
        assert!(!classify("bigint", SemanticCategory::Integer));
        assert_eq!(category_of("varchar"), None);
    }

    #[test]
    fn category_of_uses_priority_order() {
        assert_eq!(category_of("YEAR"), Some(SemanticCategory::Integer));
        assert_eq!(category_of("TIME"), Some(SemanticCategory::Text));
        assert_eq!(category_of("DECIMAL"), Some(SemanticCategory::Float));
        assert_eq!(category_of("DATETIME"), Some(SemanticCategory::Temporal));
        assert_eq!(category_of("BLOB"), None);
    }

    #[test]
    fn float_types_are_not_text() {
        for declared in ["FLOAT", "DOUBLE", "DECIMAL"] {
            assert!(classify(declared, SemanticCategory::Float));
            assert!(!classify(declared, SemanticCategory::Text));
            assert!(!classify(declared, SemanticCategory::Integer));
        }
    }
}
