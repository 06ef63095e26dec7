// Tree and bucket-chain walks over target memory, including damaged snapshots

mod common;

use common::*;
use pretty_assertions::assert_eq;
use stlview::printers::hashtable::HashBuckets;
use stlview::printers::tree::RbTreeNodes;
use stlview::walk::{successor, ChainWalk, InOrderWalk};
use stlview::{PrintError, PrinterRegistry, Renderer, Result, Snapshot};

fn keys_in_order(s: &Snapshot, tree: &BuiltTree, count: usize) -> Result<Vec<i64>> {
    let links = RbTreeNodes::new(s, map_node_type());
    let header = stlview::memory::value::Value::new(tree.header, map_node_type());
    let leftmost = header.field(s, "_M_left")?.read_pointer(s)?.address;
    InOrderWalk::new(links, tree.header, leftmost, count)
        .map(|pair| pair?.field(s, "first")?.read_int(s))
        .collect()
}

#[test]
fn test_walk_yields_ascending_keys() {
    init_tracing();
    let mut s = Snapshot::default();
    let entries: Vec<(i64, i64)> = [5, 3, 8, 1, 4, 7, 9].iter().map(|&k| (k, k * 10)).collect();
    let (_, tree) = map_of_ints(&mut s, &entries);

    assert_eq!(keys_in_order(&s, &tree, 7).unwrap(), vec![1, 3, 4, 5, 7, 8, 9]);
}

#[test]
fn test_successor_of_maximum_is_header() {
    let mut s = Snapshot::default();
    let (_, tree) = map_of_ints(&mut s, &[(2, 0), (1, 0), (3, 0)]);
    let links = RbTreeNodes::new(&s, map_node_type());

    // Insertion order 2, 1, 3: nodes[2] holds the maximum
    assert_eq!(successor(&links, tree.nodes[2]).unwrap(), tree.header);
    assert_eq!(successor(&links, tree.nodes[1]).unwrap(), tree.nodes[0]);
    assert_eq!(successor(&links, tree.nodes[0]).unwrap(), tree.nodes[2]);
}

#[test]
fn test_single_node_successor_is_header() {
    let mut s = Snapshot::default();
    let (_, tree) = map_of_ints(&mut s, &[(1, 1)]);
    let links = RbTreeNodes::new(&s, map_node_type());
    assert_eq!(successor(&links, tree.nodes[0]).unwrap(), tree.header);
    assert_eq!(keys_in_order(&s, &tree, 1).unwrap(), vec![1]);
}

#[test]
fn test_nth_successor_from_minimum_is_header() {
    let mut s = Snapshot::default();
    let keys = [50, 20, 80, 10, 30, 70, 90, 60];
    let entries: Vec<(i64, i64)> = keys.iter().map(|&k| (k, 0)).collect();
    let (_, tree) = map_of_ints(&mut s, &entries);
    let links = RbTreeNodes::new(&s, map_node_type());

    let mut node = tree.nodes[3]; // key 10, the minimum
    for _ in 0..keys.len() {
        node = successor(&links, node).unwrap();
    }
    assert_eq!(node, tree.header);
}

#[test]
fn test_count_larger_than_tree_is_premature_end() {
    let mut s = Snapshot::default();
    let (map, _) = map_of_ints(&mut s, &[(1, 10), (2, 20)]);
    set_int(&mut s, &map, "_M_t._M_impl._M_node_count", 3);

    let registry = PrinterRegistry::libstdcxx().unwrap();
    let err = Renderer::new(&registry).render(&s, &map).unwrap_err();
    assert!(matches!(
        err,
        PrintError::PrematureEnd {
            expected: 3,
            yielded: 2
        }
    ));
}

#[test]
fn test_all_ones_node_count_is_a_fault() {
    let mut s = Snapshot::default();
    let (map, _) = map_of_ints(&mut s, &[(1, 10), (2, 20), (3, 30)]);
    set_int(&mut s, &map, "_M_t._M_impl._M_node_count", -1);

    let registry = PrinterRegistry::libstdcxx().unwrap();
    let err = Renderer::new(&registry).render(&s, &map).unwrap_err();
    assert!(matches!(
        err,
        PrintError::PrematureEnd { yielded: 3, .. } | PrintError::MalformedTree { .. }
    ));
}

#[test]
fn test_wild_right_link_is_invalid_address() {
    let mut s = Snapshot::default();
    let (map, tree) = map_of_ints(&mut s, &[(1, 0), (2, 0), (3, 0)]);
    let minimum = stlview::memory::value::Value::new(tree.nodes[0], map_node_type());
    set_ptr(&mut s, &minimum, "_M_right", 0xFFFF_FFFF_FFFF_FFF0);

    let registry = PrinterRegistry::libstdcxx().unwrap();
    let err = Renderer::new(&registry).render_to_string(&s, &map).unwrap_err();
    assert!(matches!(err, PrintError::InvalidAddress { .. }));
    assert_eq!(err.address(), Some(0xFFFF_FFFF_FFFF_FFF0));
}

#[test]
fn test_missing_parent_is_malformed_tree() {
    let mut s = Snapshot::default();
    let (_, tree) = map_of_ints(&mut s, &[(2, 0), (1, 0)]);
    // Node 1 is the left child of the root; cut it off from its parent
    let node = stlview::memory::value::Value::new(tree.nodes[1], map_node_type());
    set_ptr(&mut s, &node, "_M_parent", 0);

    let err = keys_in_order(&s, &tree, 2).unwrap_err();
    assert!(matches!(err, PrintError::MalformedTree { .. }));
}

#[test]
fn test_released_node_is_stale() {
    let mut s = Snapshot::default();
    let (map, tree) = map_of_ints(&mut s, &[(2, 0), (1, 0), (3, 0)]);
    s.release(tree.nodes[2]).unwrap();

    let registry = PrinterRegistry::libstdcxx().unwrap();
    let err = Renderer::new(&registry).render(&s, &map).unwrap_err();
    assert!(matches!(err, PrintError::StaleReference { .. }));
    // The walk reaches the released node through its left link
    assert_eq!(err.address(), Some(tree.nodes[2] + 16));
}

#[test]
fn test_chain_walk_over_target_memory() {
    let mut s = Snapshot::default();
    let table = unordered_set_of_ints(&mut s, &[&[1], &[], &[2, 3, 4], &[], &[5]]);
    let buckets = HashBuckets::new(&s, &table).unwrap();

    let walked: Vec<i64> = ChainWalk::new(buckets, 5)
        .map(|key| key?.read_int(&s))
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(walked, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_element_count_past_last_bucket_is_a_fault() {
    let mut s = Snapshot::default();
    let table = unordered_set_of_ints(&mut s, &[&[1], &[2], &[3]]);
    set_int(&mut s, &table, "_M_element_count", 4);

    let registry = PrinterRegistry::libstdcxx().unwrap();
    let err = Renderer::new(&registry).render(&s, &table).unwrap_err();
    assert!(matches!(
        err,
        PrintError::BucketsExhausted {
            expected: 4,
            yielded: 3,
            buckets: 3
        }
    ));
}

#[test]
fn test_element_count_limits_chain_walk() {
    let mut s = Snapshot::default();
    let table = unordered_set_of_ints(&mut s, &[&[1, 2], &[3]]);
    set_int(&mut s, &table, "_M_element_count", 2);

    let registry = PrinterRegistry::libstdcxx().unwrap();
    let text = Renderer::new(&registry).render_to_string(&s, &table).unwrap();
    assert_eq!(text, "std::unordered_set with 2 elements = {[0] = 1, [1] = 2}");
}
