use msrswdb::catalog;
use msrswdb::error::MsrswdbError;
use msrswdb::persist::{PersistenceMode, Persistor};
use msrswdb::settings::{ConnectionSettings, ImportSettings, UnknownPolicy};
use msrswdb::walker::Importer;

fn persistor() -> Persistor {
    Persistor::new(PersistenceMode::InMemory, &ConnectionSettings::default()).expect("db")
}

fn importer(policy: UnknownPolicy) -> Importer {
    Importer::new(catalog::msrsw(), ImportSettings { policy })
}

fn count(persistor: &Persistor, table: &str) -> i64 {
    persistor
        .connection()
        .query_row(&format!("select count(*) from \"{}\"", table), [], |r| r.get(0))
        .expect("count")
}

#[test]
fn strict_mode_fails_on_unknown_element() {
    let mut db = persistor();
    let err = importer(UnknownPolicy::Strict)
        .import_str("<MSRSW><NO-SUCH-KIND/></MSRSW>", &mut db)
        .unwrap_err();
    assert!(matches!(err, MsrswdbError::UnknownElementKind { tag } if tag == "NO-SUCH-KIND"));
}

#[test]
fn lenient_mode_skips_unknown_subtree_and_counts_it() {
    let mut db = persistor();
    let outcome = importer(UnknownPolicy::Lenient)
        .import_str(
            "<MSRSW>
                <SHORT-NAME>demo</SHORT-NAME>
                <NO-SUCH-KIND><CATEGORY>hidden</CATEGORY></NO-SUCH-KIND>
            </MSRSW>",
            &mut db,
        )
        .expect("import");
    assert_eq!(outcome.report.skipped_elements, 1);
    // the whole subtree below the unknown element goes with it
    assert_eq!(count(&db, "short_name"), 1);
    assert_eq!(count(&db, "category"), 0);
}

#[test]
fn strict_mode_fails_on_unknown_attribute() {
    let mut db = persistor();
    let err = importer(UnknownPolicy::Strict)
        .import_str("<MSRSW UNMAPPED=\"x\"/>", &mut db)
        .unwrap_err();
    assert!(
        matches!(err, MsrswdbError::UnknownAttribute { tag, attribute }
            if tag == "MSRSW" && attribute == "UNMAPPED")
    );
}

#[test]
fn lenient_mode_drops_unknown_attribute_and_counts_it() {
    let mut db = persistor();
    let outcome = importer(UnknownPolicy::Lenient)
        .import_str("<MSRSW ID=\"kept\" UNMAPPED=\"x\"/>", &mut db)
        .expect("import");
    assert_eq!(outcome.report.dropped_attributes, 1);
    let id: String = db
        .connection()
        .query_row("select \"_id\" from msrsw", [], |r| r.get(0))
        .expect("row");
    assert_eq!(id, "kept");
}

#[test]
fn singular_slot_keeps_only_the_first_child() {
    let mut db = persistor();
    let outcome = importer(UnknownPolicy::Lenient)
        .import_str(
            "<MSRSW>
                <CATEGORY>first</CATEGORY>
                <CATEGORY>second</CATEGORY>
                <CATEGORY>third</CATEGORY>
            </MSRSW>",
            &mut db,
        )
        .expect("import");
    assert_eq!(outcome.report.discarded_extras, 2);
    assert_eq!(count(&db, "category"), 1);
    let kept: String = db
        .connection()
        .query_row(
            "select c.content from msrsw m join category c on c.rid = m.category_rid",
            [],
            |r| r.get(0),
        )
        .expect("row");
    assert_eq!(kept, "first");
}

#[test]
fn discarded_extra_takes_its_subtree_with_it() {
    let mut db = persistor();
    let outcome = importer(UnknownPolicy::Lenient)
        .import_str(
            "<MSRSW>
                <SW-SYSTEMS><SW-SYSTEM><SHORT-NAME>kept</SHORT-NAME></SW-SYSTEM></SW-SYSTEMS>
                <SW-SYSTEMS><SW-SYSTEM><SHORT-NAME>dropped</SHORT-NAME></SW-SYSTEM></SW-SYSTEMS>
            </MSRSW>",
            &mut db,
        )
        .expect("import");
    assert_eq!(outcome.report.discarded_extras, 1);
    assert_eq!(count(&db, "sw_systems"), 1);
    assert_eq!(count(&db, "sw_system"), 1);
    assert_eq!(count(&db, "short_name"), 1);
    let kept: String = db
        .connection()
        .query_row("select content from short_name", [], |r| r.get(0))
        .expect("row");
    assert_eq!(kept, "kept");
}

#[test]
fn child_without_a_slot_follows_the_policy() {
    // V is a registered kind, but MSRSW has no slot for it
    let xml = "<MSRSW><V>1</V></MSRSW>";

    let mut db = persistor();
    let err = importer(UnknownPolicy::Strict).import_str(xml, &mut db).unwrap_err();
    assert!(
        matches!(err, MsrswdbError::UnknownChildSlot { parent, child }
            if parent == "MSRSW" && child == "V")
    );

    let mut db = persistor();
    let outcome = importer(UnknownPolicy::Lenient).import_str(xml, &mut db).expect("import");
    assert_eq!(outcome.report.unplaced_children, 1);
    assert_eq!(count(&db, "v"), 0);
}

#[test]
fn unknown_root_is_fatal_even_in_lenient_mode() {
    let mut db = persistor();
    let err = importer(UnknownPolicy::Lenient)
        .import_str("<NOT-A-DOCUMENT/>", &mut db)
        .unwrap_err();
    assert!(matches!(err, MsrswdbError::UnknownElementKind { .. }));
}

#[test]
fn namespace_qualifiers_are_stripped_before_lookup() {
    let mut db = persistor();
    let outcome = importer(UnknownPolicy::Strict)
        .import_str(
            "<msr:MSRSW xmlns:msr=\"http://example.org/msrsw\">
                <msr:SHORT-NAME>qualified</msr:SHORT-NAME>
            </msr:MSRSW>",
            &mut db,
        )
        .expect("import");
    assert_eq!(outcome.report, Default::default());
    let name: String = db
        .connection()
        .query_row("select content from short_name", [], |r| r.get(0))
        .expect("row");
    assert_eq!(name, "qualified");
}
