/// jsondb API walk-through
///
/// - CRUD by id
/// - typed field access and path queries
/// - pattern scans, bulk patches and removals
/// - switching collections and saving to disk
///
/// Run with `RUST_LOG=jsondb=debug cargo run --example basic_usage` to see
/// the store's lifecycle events.

use jsondb::{Config, Database, JsonArray, ScanMode};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║        jsondb - Document Store Demo           ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: open a store with a private cache directory
    let mut db = Database::open(Config::default())?;
    db.add_collection("books")?;
    db.add_collection("authors")?;
    db.set_current_collection("books")?;

    // Step 2: INSERT
    println!("Step 2: INSERT - Adding documents...");
    let rust = db.add_document(
        r#"{"title": "Rust Programming", "year": 2018, "tags": ["systems", "rust"], "meta": {"available": true}}"#,
    )?;
    db.add_document(r#"{"title": "Database Systems", "year": 2011, "tags": ["sql"], "meta": {"available": false}}"#)?;
    db.add_document(r#"{"title": "Web Development", "year": 2020, "tags": [], "meta": {"available": true}}"#)?;
    println!("  Inserted {} documents\n", db.get_ids()?.len());

    // Step 3: READ
    println!("Step 3: READ - Typed access...");
    let doc = db.get_document(rust)?;
    println!("  title: {}", doc.get::<String>("title")?);
    println!("  year: {}", doc.get::<i64>("year")?);
    println!("  first tag: {}", doc.query::<String>(r#""tags"[0]"#)?);
    println!("  tag count: {}", doc.get::<JsonArray>("tags")?.len());
    println!("{}\n", doc);

    // Step 4: SCAN
    println!("Step 4: SCAN - Pattern matching...");
    let available = db.get_documents(r#""meta"."available"=true"#)?;
    println!("  {} available books", available.len());
    let old = db.get_documents_with(r#""year"=2011"#, ScanMode::Sequential)?;
    println!("  {} books from 2011\n", old.len());

    // Step 5: UPDATE
    println!("Step 5: UPDATE - Patching documents...");
    db.update_document(rust, r#"{"year": 2021, "tags": [2: "edition-2021"], "meta": {"available": delete}}"#)?;
    let updated = db.update_documents(r#""meta"."available"=true"#, r#"{"featured": true}"#)?;
    println!("  featured {} documents", updated);
    println!("{}\n", db.get_document(rust)?);

    // Step 6: switch collections; books are spilled to the cache dir
    println!("Step 6: COLLECTIONS - Switching...");
    db.set_current_collection("authors")?;
    db.add_document(r#"{"name": "Ferris", "books": 3}"#)?;
    db.set_current_collection("books")?;
    println!("  back on {:?} with {} documents\n", db.current_collection_name(), db.get_ids()?.len());

    // Step 7: DELETE and save
    println!("Step 7: DELETE - Removing documents...");
    let removed = db.remove_documents(r#""featured"=true"#)?;
    println!("  removed {} documents", removed);

    let out = tempfile::tempdir()?;
    let path = out.path().join("books.json");
    db.save_current_collection(&path)?;
    println!("  saved remaining books:\n{}", std::fs::read_to_string(&path)?);

    Ok(())
}
