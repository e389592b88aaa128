use std::collections::BTreeSet;
use jsondb::core::collection::Collection;
use jsondb::parallel::LanePool;
use jsondb::{DocId, Document, ErrorKind, IdGenerator};

fn populated(size: u64) -> (Collection, IdGenerator) {
    let ids = IdGenerator::new();
    let mut collection = Collection::new("numbers");
    for i in 0..size {
        let json = format!(
            r#"{{"n":{},"parity":"{}","Sub":{{"Key":{}}},"tags":["t{}"]}}"#,
            i,
            if i % 2 == 0 { "even" } else { "odd" },
            i % 3 == 0,
            i % 4,
        );
        collection.add_document(&json, &ids).unwrap();
    }
    (collection, ids)
}

fn id_set(docs: &[Document]) -> BTreeSet<DocId> {
    docs.iter().map(Document::id).collect()
}

#[test]
fn test_crud_scenario() {
    let ids = IdGenerator::new();
    let mut collection = Collection::new("people");
    let texts = [r#"{"name":"ann"}"#, r#"{"name":"bob"}"#, r#"{"name":"cy"}"#];
    let added: Vec<DocId> = texts.iter().map(|t| collection.add_document(t, &ids).unwrap()).collect();

    for (id, text) in added.iter().zip(texts) {
        assert_eq!(collection.get_document(*id).unwrap().as_str(), text);
    }

    collection.remove_document(added[1]).unwrap();
    assert_eq!(collection.ids(), vec![added[0], added[2]]);
    assert!(collection.get_document(added[0]).is_ok());
    assert!(collection.get_document(added[2]).is_ok());
}

#[test]
fn test_parallel_and_sequential_scans_agree() {
    let (collection, _) = populated(500);
    let sequential = LanePool::sequential();
    let parallel = LanePool::new(4).unwrap();

    for pattern in [
        r#""Sub"."Key"=true"#,
        r#""parity"="odd" & "Sub"."Key"=false"#,
        r#""tags"[0]="t3""#,
        r#""n"=499"#,
        r#""n"=-1"#,
    ] {
        let a = collection.get_documents(pattern, &sequential).unwrap();
        let b = collection.get_documents(pattern, &parallel).unwrap();
        assert_eq!(id_set(&a), id_set(&b), "{}", pattern);
    }

    let every_third = collection.get_documents(r#""Sub"."Key"=true"#, &parallel).unwrap();
    assert_eq!(every_third.len(), 167);
}

#[test]
fn test_bulk_update_counts_and_applies() {
    let (mut collection, _) = populated(20);
    let parallel = LanePool::new(3).unwrap();

    let n = collection
        .update_documents(r#""parity"="even""#, r#"{"tags":[1:"new"],"parity":delete}"#, &parallel)
        .unwrap();
    assert_eq!(n, 10);

    let doc = collection.get_document(DocId(4)).unwrap();
    assert_eq!(doc.as_str(), r#"{"n":4,"Sub":{"Key":false},"tags":["t0","new"]}"#);
    assert_eq!(collection.get_documents(r#""parity"="even""#, &parallel).unwrap().len(), 0);
    assert_eq!(collection.get_documents(r#""parity"="odd""#, &parallel).unwrap().len(), 10);
}

#[test]
fn test_bulk_update_rejects_bad_patch_up_front() {
    let (mut collection, _) = populated(5);
    let lanes = LanePool::sequential();
    let before: Vec<String> = collection.documents().iter().map(|d| d.as_str().to_string()).collect();

    let err = collection.update_documents(r#""n"=1"#, r#"{"a":}"#, &lanes).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
    let err = collection.update_documents(r#""n"1"#, "{}", &lanes).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    let after: Vec<String> = collection.documents().iter().map(|d| d.as_str().to_string()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_remove_by_pattern_modes_leave_same_set() {
    let (mut a, _) = populated(300);
    let mut b = a.clone();

    let removed_a = a.remove_documents(r#""parity"="odd""#, &LanePool::sequential()).unwrap();
    let removed_b = b.remove_documents(r#""parity"="odd""#, &LanePool::new(4).unwrap()).unwrap();
    assert_eq!(removed_a, 150);
    assert_eq!(removed_a, removed_b);
    assert_eq!(a.ids(), b.ids());

    // ids stay sorted so point lookups keep working after a bulk removal
    assert!(b.ids().windows(2).all(|w| w[0] < w[1]));
    assert!(b.get_document(DocId(298)).is_ok());
}

#[test]
fn test_update_by_id_failure_is_atomic() {
    let (mut collection, _) = populated(3);
    let original = collection.get_document(DocId(2)).unwrap().clone();

    let err = collection.update_document(DocId(2), r#"{"tags":[9:"x"]}"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = collection.update_document(DocId(2), r#"{"n":[0:1]}"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
    assert_eq!(collection.get_document(DocId(2)).unwrap(), &original);

    assert_eq!(collection.update_document(DocId(77), "{}").unwrap_err().kind, ErrorKind::NotFound);
}
