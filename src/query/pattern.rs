//! Equality filters: `"Pi"=3.14159 & "Sub"."Key"=false`.
//!
//! Each clause compares the raw text at a path with the raw text after
//! `=`, byte for byte. Whitespace outside strings is ignored on both sides.

use crate::core::document::Document;
use crate::core::error::{Error, ErrorKind, Result};
use crate::json::normalize::de_whitespace;
use crate::json::scanner::{find_top_level, split_top_level};
use crate::query::path::FieldPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub path: FieldPath,
    pub expected: String,
}

impl Clause {
    /// A clause whose path cannot be resolved does not match
    pub fn matches(&self, doc: &Document) -> bool {
        matches!(doc.query_raw_path(&self.path), Ok(raw) if raw == self.expected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    clauses: Vec<Clause>,
}

impl Pattern {
    pub fn parse(expr: &str) -> Result<Self> {
        let normalized = de_whitespace(expr);
        if normalized.is_empty() {
            return Err(Error::new(ErrorKind::InvalidArgument, "no pattern".to_string()));
        }

        let clauses = split_top_level(&normalized, b'&')
            .into_iter()
            .map(parse_clause)
            .collect::<Result<Vec<_>>>()?;
        Ok(Pattern { clauses })
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|clause| clause.matches(doc))
    }
}

fn parse_clause(clause: &str) -> Result<Clause> {
    let invalid = |reason: &str| {
        Error::new(ErrorKind::InvalidArgument, format!("syntax issue in clause '{}': {}", clause, reason))
    };

    if clause.is_empty() {
        return Err(invalid("empty clause"));
    }
    let eq = find_top_level(clause, b'=').ok_or_else(|| invalid("missing equal sign"))?;
    if eq == 0 {
        return Err(invalid("no key"));
    }
    let expected = &clause[eq + 1..];
    if expected.is_empty() {
        return Err(invalid("no value"));
    }

    Ok(Clause {
        path: FieldPath::parse(&clause[..eq])?,
        expected: expected.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DocId;

    fn doc(json: &str) -> Document {
        Document::with_id(DocId(0), json).unwrap()
    }

    #[test]
    fn test_parse_clauses() {
        let pattern = Pattern::parse(r#" "Pi" = 3.14159 & "Sub"."Key"=false "#).unwrap();
        assert_eq!(pattern.clauses().len(), 2);
        assert_eq!(pattern.clauses()[0].expected, "3.14159");
        assert_eq!(pattern.clauses()[1].path.to_string(), r#""Sub"."Key""#);
    }

    #[test]
    fn test_separators_inside_values_are_kept() {
        let pattern = Pattern::parse(r#""a"="x&y=z"&"b"={"k":"&"}"#).unwrap();
        assert_eq!(pattern.clauses().len(), 2);
        assert_eq!(pattern.clauses()[0].expected, r#""x&y=z""#);
        assert_eq!(pattern.clauses()[1].expected, r#"{"k":"&"}"#);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "   ", r#""a""#, "=1", r#""a"=1&"#, r#""a"="#, "a=1"] {
            let err = Pattern::parse(bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidArgument, "{}", bad);
        }
    }

    #[test]
    fn test_matching() {
        let d = doc(r#"{"Pi":3.14159,"Sub":{"Key":true},"List":[1,{"n":"x"}]}"#);
        assert!(Pattern::parse(r#""Pi"=3.14159"#).unwrap().matches(&d));
        assert!(Pattern::parse(r#""Sub"."Key"=true & "List"[1]."n"="x""#).unwrap().matches(&d));
        assert!(Pattern::parse(r#""Sub"={"Key":true}"#).unwrap().matches(&d));
        assert!(!Pattern::parse(r#""Sub"."Key"=false"#).unwrap().matches(&d));
        // raw comparison: 3.141590 is not the same text
        assert!(!Pattern::parse(r#""Pi"=3.141590"#).unwrap().matches(&d));
    }

    #[test]
    fn test_unresolvable_path_is_no_match() {
        let d = doc(r#"{"a":1}"#);
        assert!(!Pattern::parse(r#""missing"=1"#).unwrap().matches(&d));
        assert!(!Pattern::parse(r#""a"."b"=1"#).unwrap().matches(&d));
        assert!(!Pattern::parse(r#""a"=1&"a"[0]=1"#).unwrap().matches(&d));
    }
}
