use std::fmt;
use crate::core::error::Result;
use crate::core::types::{DocId, IdGenerator};
use crate::json::normalize::de_whitespace;
use crate::json::patch::merge_object;
use crate::json::pretty::pretty_object;
use crate::json::validator::{validate_document, validate_patch};
use crate::json::view::{object_field, FromJson, JsonObject};
use crate::query::path::FieldPath;

/// A stored JSON object: fixed id, normalized text that always validates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocId,
    data: String,
}

impl Document {
    /// Parse untrusted text and take the next id from `ids`
    pub fn parse(json: &str, ids: &IdGenerator) -> Result<Self> {
        let data = Self::normalized(json)?;
        Ok(Document { id: ids.next_id(), data })
    }

    /// Rebuild a document with a known id (reload path)
    pub fn with_id(id: DocId, json: &str) -> Result<Self> {
        let data = Self::normalized(json)?;
        Ok(Document { id, data })
    }

    fn normalized(json: &str) -> Result<String> {
        let data = de_whitespace(json);
        validate_document(&data)?;
        Ok(data)
    }

    pub fn id(&self) -> DocId {
        self.id
    }

    /// Normalized JSON text
    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn as_object(&self) -> JsonObject {
        JsonObject::new(self.data.as_str())
    }

    pub fn get<T: FromJson>(&self, key: &str) -> Result<T> {
        T::from_json(self.raw(key)?)
    }

    pub fn raw(&self, key: &str) -> Result<&str> {
        object_field(&self.data, key)
    }

    pub fn is_null(&self, key: &str) -> Result<bool> {
        Ok(self.raw(key)? == "null")
    }

    /// Resolve a path expression such as `"a"."b"[2]` and convert the target
    pub fn query<T: FromJson>(&self, path: &str) -> Result<T> {
        T::from_json(self.query_raw(path)?)
    }

    pub fn query_raw(&self, path: &str) -> Result<&str> {
        let path = FieldPath::parse(path)?;
        self.query_raw_path(&path)
    }

    pub fn query_raw_path(&self, path: &FieldPath) -> Result<&str> {
        path.resolve(&self.data)
    }

    /// Merge a patch into this document.
    ///
    /// The patch is normalized and validated first and the merged text is
    /// validated again; on any failure the document is left as it was.
    pub fn apply_patch(&mut self, patch: &str) -> Result<()> {
        let patch = de_whitespace(patch);
        validate_patch(&patch)?;
        self.data = self.merged(&patch)?;
        Ok(())
    }

    /// Merged text for an already normalized and validated patch
    pub(crate) fn merged(&self, patch: &str) -> Result<String> {
        let merged = merge_object(&self.data, patch)?;
        validate_document(&merged).map_err(|e| e.within("patched document is invalid"))?;
        Ok(merged)
    }

    pub(crate) fn replace_data(&mut self, data: String) {
        self.data = data;
    }

    pub fn to_pretty_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Document {}: {}", self.id, pretty_object(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::json::view::JsonArray;

    const FLAT: &str = r#"{"Field One":"Foobar","Int Field 1":23,"Double Field 1":-3.1479658694523,"Bool Field 1":false,"Bool Field 2":true,"Null Field":null,"Array Field":["test",123,-3e8,true,false,null,["1","2","3"],{"field_name":true}]}"#;

    #[test]
    fn test_parse_normalizes_and_assigns_ids() {
        let ids = IdGenerator::new();
        let a = Document::parse("{ \"a\" : 1 }", &ids).unwrap();
        let b = Document::parse("{}", &ids).unwrap();
        assert_eq!(a.as_str(), r#"{"a":1}"#);
        assert_eq!(a.id(), DocId(0));
        assert_eq!(b.id(), DocId(1));
    }

    #[test]
    fn test_invalid_text_rejected_without_consuming_id() {
        let ids = IdGenerator::new();
        let err = Document::parse(r#"{"a":1,}"#, &ids).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert_eq!(ids.peek(), DocId(0));
        assert!(Document::parse(r#"{"a":delete}"#, &ids).is_err());
    }

    #[test]
    fn test_typed_getters() {
        let d = Document::with_id(DocId(7), FLAT).unwrap();
        assert_eq!(d.get::<String>("Field One").unwrap(), "\"Foobar\"");
        assert_eq!(d.get::<i64>("Int Field 1").unwrap(), 23);
        assert_eq!(d.get::<f64>("Double Field 1").unwrap(), -3.1479658694523);
        assert!(!d.get::<bool>("Bool Field 1").unwrap());
        assert!(d.get::<bool>("Bool Field 2").unwrap());
        assert!(d.is_null("Null Field").unwrap());
        let array = d.get::<JsonArray>("Array Field").unwrap();
        assert_eq!(array.get::<JsonArray>(6).unwrap().get::<String>(0).unwrap(), "\"1\"");
        assert!(array.get::<JsonObject>(7).unwrap().get::<bool>("field_name").unwrap());
    }

    #[test]
    fn test_accessor_shape_mismatch() {
        let d = Document::with_id(DocId(0), r#"{"text":"abc","num":"123"}"#).unwrap();
        assert_eq!(d.get::<bool>("text").unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(d.get::<i64>("num").unwrap_err().kind, ErrorKind::TypeMismatch);
        assert_eq!(d.get::<i64>("nope").unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(d.is_null("nope").unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_typed_query() {
        let d = Document::with_id(
            DocId(0),
            r#"{"Object Field":{"Array Field":["test",{"inner":[1.5,false]}],"Count":4.9}}"#,
        )
        .unwrap();
        assert_eq!(d.query::<String>(r#""Object Field"."Array Field"[0]"#).unwrap(), "\"test\"");
        assert_eq!(d.query::<f64>(r#""Object Field"."Array Field"[1]."inner"[0]"#).unwrap(), 1.5);
        assert!(!d.query::<bool>(r#""Object Field"."Array Field"[1]."inner"[1]"#).unwrap());
        assert_eq!(d.query::<i64>(r#""Object Field"."Count""#).unwrap(), 4);
        assert_eq!(d.query_raw(r#""Object Field"."Count""#).unwrap(), "4.9");
        assert_eq!(
            d.query::<String>(r#""Object Field"."Count""#).unwrap_err().kind,
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_apply_patch() {
        let mut d = Document::with_id(DocId(0), r#"{"a":1,"b":2}"#).unwrap();
        d.apply_patch(r#"{ "a" : delete, "c" : 3 }"#).unwrap();
        assert_eq!(d.as_str(), r#"{"b":2,"c":3}"#);
    }

    #[test]
    fn test_failed_patch_leaves_document_untouched() {
        let mut d = Document::with_id(DocId(0), r#"{"a":[1,2]}"#).unwrap();
        assert_eq!(d.apply_patch(r#"{"a":}"#).unwrap_err().kind, ErrorKind::Parse);
        // a plain array holding delete would leak the sentinel into storage
        assert_eq!(d.apply_patch(r#"{"a":[1,delete]}"#).unwrap_err().kind, ErrorKind::Parse);
        assert_eq!(d.apply_patch(r#"{"a":[7:1]}"#).unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(d.as_str(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_display_empty() {
        let d = Document::with_id(DocId(0), "{}").unwrap();
        assert_eq!(d.to_string(), "Document 0: {}");
    }
}
