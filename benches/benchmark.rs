use criterion::{Criterion, black_box, criterion_group, criterion_main};

use std::fmt::Write;

use msrswdb::catalog;
use msrswdb::persist::{PersistenceMode, Persistor};
use msrswdb::settings::{ConnectionSettings, ImportSettings};
use msrswdb::walker::Importer;

/// A synthetic but structurally realistic document: one instance tree
/// with `instances` scalar instances, each carrying a value container.
fn synthetic_document(instances: usize) -> String {
    let mut xml = String::from(
        "<MSRSW><SHORT-NAME>bench</SHORT-NAME><CATEGORY>CDF20</CATEGORY>\
         <SW-SYSTEMS><SW-SYSTEM><SHORT-NAME>sys</SHORT-NAME>\
         <SW-INSTANCE-SPEC><SW-INSTANCE-TREE><SHORT-NAME>tree</SHORT-NAME>",
    );
    for i in 0..instances {
        write!(
            xml,
            "<SW-INSTANCE><SHORT-NAME>param_{i}</SHORT-NAME><CATEGORY>VALUE</CATEGORY>\
             <SW-VALUE-CONT><SW-VALUES-PHYS><V>{i}.5</V></SW-VALUES-PHYS>\
             <SW-VALUES-CODED><V>{i}</V></SW-VALUES-CODED></SW-VALUE-CONT></SW-INSTANCE>"
        )
        .unwrap();
    }
    xml.push_str("</SW-INSTANCE-TREE></SW-INSTANCE-SPEC></SW-SYSTEM></SW-SYSTEMS></MSRSW>");
    xml
}

fn import_benchmark(c: &mut Criterion) {
    let document = synthetic_document(500);
    c.bench_function("import 500 instances", |b| {
        b.iter(|| {
            let mut persistor =
                Persistor::new(PersistenceMode::InMemory, &ConnectionSettings::default())
                    .expect("db");
            let importer = Importer::new(catalog::msrsw(), ImportSettings::default());
            let outcome = importer
                .import_str(black_box(&document), &mut persistor)
                .expect("import");
            black_box(outcome.root_rid)
        })
    });
}

criterion_group!(benches, import_benchmark);
criterion_main!(benches);
