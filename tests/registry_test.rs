// Printer lookup through typedefs, qualifiers and references

mod common;

use common::*;
use pretty_assertions::assert_eq;
use stlview::memory::value::Value;
use stlview::printers::{Printer, Summary};
use stlview::registry::{PrinterKind, PrinterRegistry};
use stlview::types::StructDef;
use stlview::{Renderer, Snapshot};

fn vector_summary(s: &Snapshot, value: &Value) -> Option<String> {
    let registry = PrinterRegistry::libstdcxx().unwrap();
    let printer = registry.lookup(s, value).unwrap()?;
    match printer.summary(s).unwrap() {
        Summary::Text(text) => Some(text),
        other => panic!("unexpected summary {:?}", other),
    }
}

#[test]
fn test_lookup_through_typedef() {
    init_tracing();
    let mut s = Snapshot::default();
    let vector = vector_of_ints(&mut s, &[1, 2, 3], 3);
    let alias = s.types.define_typedef("IntVec", vector.ty().clone());
    let aliased = vector.cast(alias);

    assert_eq!(
        vector_summary(&s, &aliased).as_deref(),
        Some("std::vector of length 3, capacity 3")
    );
}

#[test]
fn test_lookup_strips_const() {
    let mut s = Snapshot::default();
    let vector = vector_of_ints(&mut s, &[4], 2);
    let constant = vector.cast(vector.ty().clone().with_const());

    assert_eq!(
        vector_summary(&s, &constant).as_deref(),
        Some("std::vector of length 1, capacity 2")
    );
}

#[test]
fn test_lookup_follows_reference() {
    let mut s = Snapshot::default();
    let vector = vector_of_ints(&mut s, &[7, 8], 2);
    let reference = s.place(&vector.ty().clone().with_reference()).unwrap();
    s.write_pointer(&reference, vector.address()).unwrap();

    let registry = PrinterRegistry::libstdcxx().unwrap();
    let text = Renderer::new(&registry).render_to_string(&s, &reference).unwrap();
    assert_eq!(text, "std::vector of length 2, capacity 2 = {7, 8}");
}

#[test]
fn test_const_typedef_to_reference() {
    let mut s = Snapshot::default();
    let vector = vector_of_ints(&mut s, &[5], 1);
    let alias = s.types.define_typedef("IntVec", vector.ty().clone());
    let reference = s.place(&alias.with_const().with_reference()).unwrap();
    s.write_pointer(&reference, vector.address()).unwrap();

    assert_eq!(
        vector_summary(&s, &reference).as_deref(),
        Some("std::vector of length 1, capacity 1")
    );
}

#[test]
fn test_scalars_and_pointers_have_no_printer() {
    let mut s = Snapshot::default();
    let registry = PrinterRegistry::libstdcxx().unwrap();

    let n = s.place(&int()).unwrap();
    assert!(registry.lookup(&s, &n).unwrap().is_none());

    let vector = vector_of_ints(&mut s, &[], 0);
    let pointer = s.place(&vector.ty().clone().with_pointer()).unwrap();
    assert!(registry.lookup(&s, &pointer).unwrap().is_none());
}

#[test]
fn test_unregistered_struct_has_no_printer() {
    let mut s = Snapshot::default();
    let ty = s.types.define_struct(
        StructDef::new("Point")
            .with_field("x", int())
            .with_field("y", int()),
    );
    let point = s.place(&ty).unwrap();

    let registry = PrinterRegistry::libstdcxx().unwrap();
    assert!(registry.lookup(&s, &point).unwrap().is_none());
    assert_eq!(registry.kind_for("Point"), None);
}

#[test]
fn test_custom_entry_overrides_builtin() {
    let registry = PrinterRegistry::builder()
        .register(r"^std::list<.*>$", PrinterKind::Slist)
        .libstdcxx()
        .build()
        .unwrap();
    assert_eq!(registry.kind_for("std::list<int>"), Some(&PrinterKind::Slist));
    assert_eq!(
        registry.kind_for("std::_List_iterator<int>"),
        Some(&PrinterKind::ListIterator)
    );
}

#[test]
fn test_invalid_pattern_is_reported() {
    let err = PrinterRegistry::builder()
        .register(r"^std::(vector<.*>$", PrinterKind::Vector)
        .build()
        .unwrap_err();
    assert!(matches!(err, stlview::PrintError::Pattern(_)));
}
