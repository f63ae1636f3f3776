//! The shipped MSRSW descriptor catalog.
//!
//! This is configuration data, not logic: each entry restates one
//! element kind of the MSRSW vocabulary. The full standard defines a
//! few hundred kinds; the subset here covers the document shapes the
//! importer is used for (top-level boilerplate, administrative data,
//! instance trees, value and axis containers, change-control history
//! and variant criteria) and every structural feature of the engine,
//! including the cyclic kinds (`VG` nests `VG`, `SW-INSTANCE` nests
//! `SW-INSTANCE`). Adding a kind means adding an entry; the engine
//! does not change.

use crate::datatype::ScalarKind;
use crate::registry::{Descriptor, Registry};

/// Builds the registry for the MSRSW vocabulary subset.
pub fn msrsw() -> Registry {
    let mut registry = Registry::new();

    // ----- terminal leaf kinds -----
    for tag in [
        "SHORT-NAME",
        "LONG-NAME",
        "DISPLAY-NAME",
        "CATEGORY",
        "LABEL",
        "LANGUAGE",
        "REVISION-LABEL",
        "STATE",
        "TEAM-MEMBER-REF",
        "SYMBOLIC-FILE",
        "DATA-FILE",
        "SW-FEATURE-REF",
        "SW-COLLECTION-REF",
        "SW-INSTANCE-REF",
        "SW-VCD-CRITERION-REF",
        "SW-MODEL-LINK",
        "SW-ARRAY-INDEX",
        "UNIT-DISPLAY-NAME",
        "FLAG",
        "CSUS",
        "CSPR",
        "CSWP",
        "CSTO",
        "CSTV",
        "CSPI",
        "CSDI",
        "P",
        "VT",
    ] {
        registry.register(common(Descriptor::new(tag)).terminal(ScalarKind::Text));
    }
    registry.register(common(Descriptor::new("V")).terminal(ScalarKind::Decimal));
    registry.register(common(Descriptor::new("VF")).terminal(ScalarKind::Decimal));
    registry.register(common(Descriptor::new("VH")).terminal(ScalarKind::HexBlob));
    registry.register(common(Descriptor::new("DATE")).terminal(ScalarKind::Timestamp));

    // ----- document root and administrative data -----
    registry.register(
        common(Descriptor::new("MSRSW"))
            .child("SHORT-NAME", "short_name")
            .child("CATEGORY", "category")
            .child("ADMIN-DATA", "admin_data")
            .child("SW-SYSTEMS", "sw_systems"),
    );
    registry.register(
        common(Descriptor::new("ADMIN-DATA"))
            .child("LANGUAGE", "language")
            .child("DOC-REVISIONS", "doc_revisions"),
    );
    registry.register(
        common(Descriptor::new("DOC-REVISIONS")).children("DOC-REVISION", "doc_revision"),
    );
    registry.register(
        common(Descriptor::new("DOC-REVISION"))
            .child("REVISION-LABEL", "revision_label")
            .child("STATE", "state")
            .child("TEAM-MEMBER-REF", "team_member_ref")
            .child("DATE", "date"),
    );

    // ----- systems and instance trees -----
    registry.register(common(Descriptor::new("SW-SYSTEMS")).children("SW-SYSTEM", "sw_system"));
    registry.register(
        common(Descriptor::new("SW-SYSTEM"))
            .child("SHORT-NAME", "short_name")
            .child("CATEGORY", "category")
            .child("SW-INSTANCE-SPEC", "sw_instance_spec"),
    );
    registry.register(
        common(Descriptor::new("SW-INSTANCE-SPEC"))
            .children("SW-INSTANCE-TREE", "sw_instance_tree"),
    );
    registry.register(
        common(Descriptor::new("SW-INSTANCE-TREE"))
            .child("SHORT-NAME", "short_name")
            .child("CATEGORY", "category")
            .child("SW-INSTANCE-TREE-ORIGIN", "sw_instance_tree_origin")
            .child("SW-CS-COLLECTIONS", "sw_cs_collections")
            .children("SW-INSTANCE", "sw_instance")
            .legal("category", &["VCD", "NO_VCD"]),
    );
    registry.register(
        common(Descriptor::new("SW-INSTANCE-TREE-ORIGIN"))
            .child("SYMBOLIC-FILE", "symbolic_file")
            .child("DATA-FILE", "data_file"),
    );
    registry.register(
        common(Descriptor::new("SW-CS-COLLECTIONS"))
            .children("SW-CS-COLLECTION", "sw_cs_collection"),
    );
    registry.register(
        common(Descriptor::new("SW-CS-COLLECTION"))
            .child("CATEGORY", "category")
            .child("SW-FEATURE-REF", "sw_feature_ref")
            .child("SW-COLLECTION-REF", "sw_collection_ref")
            .legal("category", &["FEATURE", "COLLECTION"]),
    );

    // ----- instances -----
    registry.register(
        common(Descriptor::new("SW-INSTANCE"))
            .child("SHORT-NAME", "short_name")
            .child("LONG-NAME", "long_name")
            .child("DISPLAY-NAME", "display_name")
            .child("CATEGORY", "category")
            .child("SW-ARRAY-INDEX", "sw_array_index")
            .child("SW-FEATURE-REF", "sw_feature_ref")
            .child("SW-MODEL-LINK", "sw_model_link")
            .child("SW-VALUE-CONT", "sw_value_cont")
            .child("SW-AXIS-CONTS", "sw_axis_conts")
            .child("SW-CS-HISTORY", "sw_cs_history")
            .child("SW-CS-FLAGS", "sw_cs_flags")
            .child("SW-INSTANCE-PROPS-VARIANTS", "sw_instance_props_variants")
            .children("SW-INSTANCE", "sw_instance")
            .legal(
                "category",
                &[
                    "VALUE", "ASCII", "VAL_BLK", "AXIS_PTS", "CURVE", "MAP", "CUBOID",
                    "CUBE_4", "CUBE_5", "BOOLEAN",
                ],
            ),
    );

    // ----- value and axis containers -----
    registry.register(
        common(Descriptor::new("SW-VALUE-CONT"))
            .child("UNIT-DISPLAY-NAME", "unit_display_name")
            .child("SW-ARRAYSIZE", "sw_arraysize")
            .child("SW-VALUES-PHYS", "sw_values_phys")
            .child("SW-VALUES-CODED", "sw_values_coded"),
    );
    registry.register(
        common(Descriptor::new("SW-ARRAYSIZE"))
            .children("V", "vs")
            .children("VF", "vfs"),
    );
    for tag in ["SW-VALUES-PHYS", "SW-VALUES-CODED"] {
        registry.register(
            common(Descriptor::new(tag))
                .children("V", "vs")
                .children("VF", "vfs")
                .children("VT", "vts")
                .children("VH", "vhs")
                .children("VG", "vgs"),
        );
    }
    registry.register(
        common(Descriptor::new("VG"))
            .child("LABEL", "label")
            .children("V", "vs")
            .children("VF", "vfs")
            .children("VT", "vts")
            .children("VH", "vhs")
            .children("VG", "vgs"),
    );
    registry.register(
        common(Descriptor::new("SW-AXIS-CONTS")).children("SW-AXIS-CONT", "sw_axis_cont"),
    );
    registry.register(
        common(Descriptor::new("SW-AXIS-CONT"))
            .child("CATEGORY", "category")
            .child("UNIT-DISPLAY-NAME", "unit_display_name")
            .child("SW-ARRAYSIZE", "sw_arraysize")
            .child("SW-VALUES-PHYS", "sw_values_phys")
            .child("SW-VALUES-CODED", "sw_values_coded")
            .child("SW-INSTANCE-REF", "sw_instance_ref")
            .legal(
                "category",
                &["STD_AXIS", "FIX_AXIS", "COM_AXIS", "RES_AXIS", "CURVE_AXIS"],
            ),
    );

    // ----- change-control history and flags -----
    registry.register(
        common(Descriptor::new("SW-CS-HISTORY")).children("CS-ENTRY", "cs_entry"),
    );
    registry.register(
        common(Descriptor::new("CS-ENTRY"))
            .child("STATE", "state")
            .child("DATE", "date")
            .child("CSUS", "csus")
            .child("CSPR", "cspr")
            .child("CSWP", "cswp")
            .child("CSTO", "csto")
            .child("CSTV", "cstv")
            .child("CSPI", "cspi")
            .child("CSDI", "csdi")
            .child("REMARK", "remark"),
    );
    registry.register(
        common(Descriptor::new("SW-CS-FLAGS"))
            .child("CATEGORY", "category")
            .child("FLAG", "flag")
            .child("CSUS", "csus")
            .child("DATE", "date")
            .child("REMARK", "remark"),
    );
    registry.register(common(Descriptor::new("REMARK")).children("P", "ps"));

    // ----- variant criteria -----
    registry.register(
        common(Descriptor::new("SW-INSTANCE-PROPS-VARIANTS"))
            .children("SW-INSTANCE-PROPS-VARIANT", "sw_instance_props_variant"),
    );
    registry.register(
        common(Descriptor::new("SW-INSTANCE-PROPS-VARIANT"))
            .child("SW-VCD-CRITERION-VALUES", "sw_vcd_criterion_values")
            .child("SW-VALUE-CONT", "sw_value_cont")
            .child("SW-AXIS-CONTS", "sw_axis_conts")
            .child("SW-CS-HISTORY", "sw_cs_history")
            .child("SW-CS-FLAGS", "sw_cs_flags"),
    );
    registry.register(
        common(Descriptor::new("SW-VCD-CRITERION-VALUES"))
            .children("SW-VCD-CRITERION-VALUE", "sw_vcd_criterion_value"),
    );
    registry.register(
        common(Descriptor::new("SW-VCD-CRITERION-VALUE"))
            .child("SW-VCD-CRITERION-REF", "sw_vcd_criterion_ref")
            .children("VT", "vts"),
    );

    registry
}

/// Attributes shared across the vocabulary. `ID` and `VIEW` collide
/// with reserved words downstream and are renamed with a leading
/// underscore; `T` carries a change timestamp.
fn common(descriptor: Descriptor) -> Descriptor {
    descriptor
        .attribute("ID", "_id")
        .attribute("VIEW", "_view")
        .attribute("F-ID-CLASS", "f_id_class")
        .attribute("S", "s")
        .typed_attribute("T", "t", ScalarKind::Timestamp)
}
