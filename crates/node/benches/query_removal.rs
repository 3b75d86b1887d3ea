use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use node::{Node, Query};

fn wide_tree(sections: usize, entries: usize) -> Node {
    let root = Node::new("web-app").unwrap();
    for i in 0..sections {
        let section = root.create("servlet").unwrap();
        section.attribute("id", i);
        for j in 0..entries {
            let param = section.create("init-param").unwrap();
            param.create("param-name").unwrap().set_text(j);
            param.create("param-value").unwrap().set_text("v");
        }
    }
    root
}

fn bench_queries(c: &mut Criterion) {
    let query = Query::relative().with_definition("param-value");

    c.bench_function("get_matching 100x20", |b| {
        let root = wide_tree(100, 20);
        b.iter(|| black_box(root.get_matching(&query).unwrap().len()))
    });

    c.bench_function("remove_matching 100x20", |b| {
        b.iter_batched(
            || wide_tree(100, 20),
            |root| black_box(root.remove_matching(&query).unwrap().len()),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
