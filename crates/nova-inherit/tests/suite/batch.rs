use nova_config::InheritConfig;
use nova_inherit::{resolve_all, HierarchyBuilder, TypeDeclaration, TypeHierarchyIndex};
use pretty_assertions::assert_eq;

use super::{abstract_method, default_method, id, index_of, public_method, ty};

fn with_threads(threads: usize) -> InheritConfig {
    let mut config = InheritConfig::default();
    config.resolution.threads = threads;
    config
}

fn mixed_index() -> TypeHierarchyIndex {
    index_of([
        TypeDeclaration::interface("A")
            .extends(ty("B"))
            .with_method(abstract_method("m")),
        TypeDeclaration::interface("B").extends(ty("A")),
        TypeDeclaration::interface("C").extends(ty("A")),
        TypeDeclaration::interface("I").with_method(default_method("foo")),
        TypeDeclaration::interface("J").with_method(default_method("foo")),
        TypeDeclaration::class("D").implements(ty("I")).implements(ty("J")),
        TypeDeclaration::interface("K").with_method(abstract_method("run")),
        TypeDeclaration::class("E").implements(ty("K")),
        TypeDeclaration::class("F")
            .implements(ty("K"))
            .with_method(public_method("run")),
    ])
}

#[test]
fn cyclic_types_are_skipped_and_reported_first() {
    let index = mixed_index();
    let batch = resolve_all(&index, &with_threads(1));

    let (a, b, c, d) = (
        id(&index, "A"),
        id(&index, "B"),
        id(&index, "C"),
        id(&index, "D"),
    );
    assert_eq!(batch.skipped, vec![a, b, c]);
    assert!(batch.get(a).is_none());
    assert!(batch.get(d).is_some());
    assert!(batch.get(id(&index, "F")).is_some_and(|f| f.is_concrete_ok()));

    let messages: Vec<&str> = batch.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Cycle detected: a cycle exists in the type hierarchy between A and B",
            "Cycle detected: a cycle exists in the type hierarchy between B and A",
            "Duplicate default methods named foo with the parameters () and () are inherited from the types J and I",
            "The type E must implement the inherited abstract method K.run()",
        ]
    );
    assert!(batch.has_errors());
}

#[test]
fn output_does_not_depend_on_worker_count() {
    let index = mixed_index();
    let inline = resolve_all(&index, &with_threads(1));
    for threads in [0, 2, 4] {
        let pooled = resolve_all(&index, &with_threads(threads));
        assert_eq!(pooled.types, inline.types, "threads = {threads}");
        assert_eq!(pooled.diagnostics, inline.diagnostics, "threads = {threads}");
        assert_eq!(pooled.skipped, inline.skipped);
    }
}

#[test]
fn minimal_jdk_resolves_cleanly() {
    let index = HierarchyBuilder::with_minimal_jdk()
        .build()
        .expect("jdk should build");
    let batch = resolve_all(&index, &InheritConfig::default());
    assert!(batch.skipped.is_empty());
    assert_eq!(batch.types.len(), index.len());
    assert!(!batch.has_errors(), "{:#?}", batch.diagnostics);

    let integer = id(&index, "java.lang.Integer");
    let bridges: Vec<String> = batch
        .get(integer)
        .expect("Integer should be resolved")
        .bridges
        .iter()
        .map(|bridge| bridge.descriptor())
        .collect();
    assert_eq!(bridges, vec!["(Ljava/lang/Object;)I"]);
}
