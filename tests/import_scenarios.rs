use msrswdb::catalog;
use msrswdb::persist::{PersistenceMode, Persistor};
use msrswdb::settings::{ConnectionSettings, ImportSettings};
use msrswdb::walker::{ImportOutcome, Importer};

fn import(xml: &str) -> (Persistor, ImportOutcome) {
    let mut persistor =
        Persistor::new(PersistenceMode::InMemory, &ConnectionSettings::default()).expect("db");
    let importer = Importer::new(catalog::msrsw(), ImportSettings::default());
    let outcome = importer.import_str(xml, &mut persistor).expect("import");
    (persistor, outcome)
}

fn count(persistor: &Persistor, table: &str) -> i64 {
    persistor
        .connection()
        .query_row(&format!("select count(*) from \"{}\"", table), [], |r| r.get(0))
        .expect("count")
}

#[test]
fn root_with_singular_children_wires_foreign_keys() {
    let (persistor, outcome) = import(
        "<MSRSW><SHORT-NAME>Foo</SHORT-NAME><CATEGORY>C</CATEGORY></MSRSW>",
    );
    assert_eq!(count(&persistor, "msrsw"), 1);
    assert_eq!(count(&persistor, "short_name"), 1);
    assert_eq!(count(&persistor, "category"), 1);
    // the root row must reference the two child rows
    let name: String = persistor
        .connection()
        .query_row(
            "select s.content from msrsw m
                join short_name s on s.rid = m.short_name_rid
                where m.rid = ?",
            [outcome.root_rid],
            |r| r.get(0),
        )
        .expect("join");
    assert_eq!(name, "Foo");
    let category: String = persistor
        .connection()
        .query_row(
            "select c.content from msrsw m
                join category c on c.rid = m.category_rid
                where m.rid = ?",
            [outcome.root_rid],
            |r| r.get(0),
        )
        .expect("join");
    assert_eq!(category, "C");
}

#[test]
fn one_row_per_resolvable_source_element() {
    let (persistor, outcome) = import(
        "<MSRSW><SHORT-NAME>demo</SHORT-NAME>
            <SW-SYSTEMS>
                <SW-SYSTEM>
                    <SHORT-NAME>sys</SHORT-NAME>
                    <SW-INSTANCE-SPEC>
                        <SW-INSTANCE-TREE>
                            <SHORT-NAME>tree</SHORT-NAME>
                            <SW-INSTANCE><SHORT-NAME>a</SHORT-NAME></SW-INSTANCE>
                            <SW-INSTANCE><SHORT-NAME>b</SHORT-NAME></SW-INSTANCE>
                            <SW-INSTANCE><SHORT-NAME>c</SHORT-NAME></SW-INSTANCE>
                        </SW-INSTANCE-TREE>
                    </SW-INSTANCE-SPEC>
                </SW-SYSTEM>
            </SW-SYSTEMS>
        </MSRSW>",
    );
    assert_eq!(outcome.report, Default::default());
    assert_eq!(count(&persistor, "msrsw"), 1);
    assert_eq!(count(&persistor, "sw_systems"), 1);
    assert_eq!(count(&persistor, "sw_system"), 1);
    assert_eq!(count(&persistor, "sw_instance_spec"), 1);
    assert_eq!(count(&persistor, "sw_instance_tree"), 1);
    assert_eq!(count(&persistor, "sw_instance"), 3);
    // three instance names plus demo, sys and tree
    assert_eq!(count(&persistor, "short_name"), 6);
}

#[test]
fn plural_slots_preserve_within_kind_order() {
    let (persistor, _) = import(
        "<MSRSW><SHORT-NAME>demo</SHORT-NAME>
            <SW-SYSTEMS><SW-SYSTEM>
                <SW-INSTANCE-SPEC><SW-INSTANCE-TREE>
                    <SW-INSTANCE>
                        <SW-VALUE-CONT>
                            <SW-VALUES-PHYS>
                                <VT>alpha</VT>
                                <V>1</V>
                                <VT>beta</VT>
                                <V>2</V>
                                <V>3</V>
                            </SW-VALUES-PHYS>
                        </SW-VALUE-CONT>
                    </SW-INSTANCE>
                </SW-INSTANCE-TREE></SW-INSTANCE-SPEC>
            </SW-SYSTEM></SW-SYSTEMS>
        </MSRSW>",
    );
    let texts: Vec<String> = persistor
        .connection()
        .prepare(
            "select c.content from element_link l
                join vt c on c.rid = l.child_rid
                where l.parent_table = 'sw_values_phys' and l.slot = 'vts'
                order by l.position",
        )
        .expect("prepare")
        .query_map([], |r| r.get(0))
        .expect("query")
        .collect::<Result<_, _>>()
        .expect("rows");
    assert_eq!(texts, vec!["alpha".to_owned(), "beta".to_owned()]);
    let numbers: Vec<String> = persistor
        .connection()
        .prepare(
            "select c.content from element_link l
                join v c on c.rid = l.child_rid
                where l.parent_table = 'sw_values_phys' and l.slot = 'vs'
                order by l.position",
        )
        .expect("prepare")
        .query_map([], |r| r.get(0))
        .expect("query")
        .collect::<Result<_, _>>()
        .expect("rows");
    assert_eq!(numbers, vec!["1".to_owned(), "2".to_owned(), "3".to_owned()]);
}

#[test]
fn mapped_attributes_are_stored_renamed() {
    let (persistor, _) = import(
        "<MSRSW><SHORT-NAME>demo</SHORT-NAME>
            <SW-SYSTEMS><SW-SYSTEM>
                <SW-INSTANCE-SPEC><SW-INSTANCE-TREE>
                    <SW-INSTANCE ID=\"inst.1\" VIEW=\"all\" F-ID-CLASS=\"cls\">
                        <SHORT-NAME>a</SHORT-NAME>
                    </SW-INSTANCE>
                </SW-INSTANCE-TREE></SW-INSTANCE-SPEC>
            </SW-SYSTEM></SW-SYSTEMS>
        </MSRSW>",
    );
    let (id, view, class): (String, String, String) = persistor
        .connection()
        .query_row(
            "select \"_id\", \"_view\", f_id_class from sw_instance",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .expect("row");
    assert_eq!(id, "inst.1");
    assert_eq!(view, "all");
    assert_eq!(class, "cls");
    // unset mapped attributes stay NULL
    let t: Option<String> = persistor
        .connection()
        .query_row("select t from sw_instance", [], |r| r.get(0))
        .expect("row");
    assert!(t.is_none());
}

#[test]
fn hex_content_is_stored_as_blob() {
    let (persistor, _) = import(
        "<MSRSW><SHORT-NAME>demo</SHORT-NAME>
            <SW-SYSTEMS><SW-SYSTEM>
                <SW-INSTANCE-SPEC><SW-INSTANCE-TREE>
                    <SW-INSTANCE>
                        <SW-VALUE-CONT>
                            <SW-VALUES-CODED><VH>DEADBEEF</VH></SW-VALUES-CODED>
                        </SW-VALUE-CONT>
                    </SW-INSTANCE>
                </SW-INSTANCE-TREE></SW-INSTANCE-SPEC>
            </SW-SYSTEM></SW-SYSTEMS>
        </MSRSW>",
    );
    let blob: Vec<u8> = persistor
        .connection()
        .query_row("select content from vh", [], |r| r.get(0))
        .expect("row");
    assert_eq!(blob, vec![0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn structural_wrappers_without_content_are_legal() {
    let (persistor, _) = import("<MSRSW><SW-SYSTEMS></SW-SYSTEMS></MSRSW>");
    assert_eq!(count(&persistor, "sw_systems"), 1);
    let short_name: Option<i64> = persistor
        .connection()
        .query_row("select short_name_rid from msrsw", [], |r| r.get(0))
        .expect("row");
    assert!(short_name.is_none());
}
