// Snapshot builders shared by the integration tests
//
// Each builder defines the libstdc++ layout in the snapshot's type table,
// places the container, and links its storage the way the library would.

#![allow(dead_code)]

use stlview::layouts;
use stlview::memory::value::{Address, Pointer, Value};
use stlview::snapshot::Snapshot;
use stlview::types::{BaseType, Type};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

pub fn int() -> Type {
    Type::new(BaseType::Int)
}

pub fn long() -> Type {
    Type::new(BaseType::Long)
}

pub fn set_ptr(s: &mut Snapshot, base: &Value, path: &str, address: Address) {
    let slot = base.field_path(&*s, path).unwrap();
    s.write_pointer(&slot, address).unwrap();
}

pub fn set_int(s: &mut Snapshot, base: &Value, path: &str, n: i64) {
    let slot = base.field_path(&*s, path).unwrap();
    s.write_int(&slot, n).unwrap();
}

/// `capacity` contiguous elements, the first ones set to `values`
pub fn int_array(s: &mut Snapshot, elem: &Type, values: &[i64], capacity: usize) -> Pointer {
    let first = s.place_array(elem, capacity.max(1)).unwrap();
    for (i, v) in values.iter().enumerate() {
        let slot = first.index(&*s, i as i64).unwrap();
        s.write_int(&slot, *v).unwrap();
    }
    first
}

// ---------------------------------------------------------------------------
// Sequence containers
// ---------------------------------------------------------------------------

pub fn set_vector_storage(s: &mut Snapshot, vector: &Value, first: &Pointer, len: usize, capacity: usize) {
    let size = s.types.sizeof(&first.pointee).unwrap() as u64;
    set_ptr(s, vector, "_M_impl._M_start", first.address);
    set_ptr(s, vector, "_M_impl._M_finish", first.address + size * len as u64);
    set_ptr(
        s,
        vector,
        "_M_impl._M_end_of_storage",
        first.address + size * capacity as u64,
    );
}

/// Fill an already placed `std::vector` of integers; capacity 0 leaves it null
pub fn fill_vector(s: &mut Snapshot, vector: &Value, values: &[i64], capacity: usize) {
    if capacity == 0 {
        return;
    }
    let elem = vector.template_argument(&*s, 0).unwrap();
    let first = int_array(s, &elem, values, capacity);
    set_vector_storage(s, vector, &first, values.len(), capacity);
}

pub fn vector_of_ints(s: &mut Snapshot, values: &[i64], capacity: usize) -> Value {
    let ty = layouts::vector(&mut s.types, &int());
    let vector = s.place(&ty).unwrap();
    fill_vector(s, &vector, values, capacity);
    vector
}

pub fn list_of_ints(s: &mut Snapshot, values: &[i64]) -> Value {
    let ty = layouts::list(&mut s.types, &int());
    let list = s.place(&ty).unwrap();
    let node_type = Type::named_struct(layouts::list_node_name(&int()));

    let mut ring = vec![list.field_path(&*s, "_M_impl._M_node").unwrap()];
    for v in values {
        let node = s.place(&node_type).unwrap();
        set_int(s, &node, "_M_data", *v);
        ring.push(node);
    }
    let len = ring.len();
    for i in 0..len {
        let next = ring[(i + 1) % len].address();
        let prev = ring[(i + len - 1) % len].address();
        set_ptr(s, &ring[i], "_M_next", next);
        set_ptr(s, &ring[i], "_M_prev", prev);
    }
    list
}

/// Nodes of a `std::list<int>` in list order, sentinel excluded
pub fn list_nodes(s: &Snapshot, list: &Value) -> Vec<Address> {
    let sentinel = list.field_path(s, "_M_impl._M_node").unwrap();
    let mut nodes = Vec::new();
    let mut at = sentinel
        .field(s, "_M_next")
        .unwrap()
        .read_pointer(s)
        .unwrap();
    while at.address != sentinel.address() {
        nodes.push(at.address);
        at = at.dereference().unwrap().field(s, "_M_next").unwrap().read_pointer(s).unwrap();
    }
    nodes
}

pub fn slist_of_ints(s: &mut Snapshot, values: &[i64]) -> Value {
    let ty = layouts::slist(&mut s.types, &int());
    let slist = s.place(&ty).unwrap();
    let node_type = Type::named_struct(layouts::slist_node_name(&int()));

    let mut next: Address = 0;
    for v in values.iter().rev() {
        let node = s.place(&node_type).unwrap();
        set_int(s, &node, "_M_data", *v);
        set_ptr(s, &node, "_M_next", next);
        next = node.address();
    }
    set_ptr(s, &slist, "_M_head._M_next", next);
    slist
}

/// Elements per buffer of a `std::deque<long>`
pub const LONG_DEQUE_BUFFER: usize = 64;

/// `std::deque<long>` whose first element sits at slot `offset` of the first buffer
pub fn deque_of_longs(s: &mut Snapshot, values: &[i64], offset: usize) -> Value {
    let elem = long();
    let ty = layouts::deque(&mut s.types, &elem);
    let deque = s.place(&ty).unwrap();

    let end_pos = offset + values.len();
    let buffer_count = end_pos / LONG_DEQUE_BUFFER + 1;
    let map = s.place_array(&elem.clone().with_pointer(), buffer_count + 2).unwrap();
    let mut buffers = Vec::new();
    for b in 0..buffer_count {
        let buffer = s.place_array(&elem, LONG_DEQUE_BUFFER).unwrap();
        let slot = map.index(&*s, (b + 1) as i64).unwrap();
        s.write_pointer(&slot, buffer.address).unwrap();
        buffers.push(buffer);
    }
    for (i, v) in values.iter().enumerate() {
        let pos = offset + i;
        let slot = buffers[pos / LONG_DEQUE_BUFFER]
            .index(&*s, (pos % LONG_DEQUE_BUFFER) as i64)
            .unwrap();
        s.write_int(&slot, *v).unwrap();
    }

    for (name, pos) in [("_M_start", offset), ("_M_finish", end_pos)] {
        let buffer = buffers[pos / LONG_DEQUE_BUFFER].address;
        let it = deque.field_path(&*s, &format!("_M_impl.{}", name)).unwrap();
        set_ptr(s, &it, "_M_cur", buffer + 8 * (pos % LONG_DEQUE_BUFFER) as u64);
        set_ptr(s, &it, "_M_first", buffer);
        set_ptr(s, &it, "_M_last", buffer + 8 * LONG_DEQUE_BUFFER as u64);
        set_ptr(s, &it, "_M_node", map.address + 8 * (pos / LONG_DEQUE_BUFFER + 1) as u64);
    }
    set_ptr(s, &deque, "_M_impl._M_map", map.address);
    set_int(s, &deque, "_M_impl._M_map_size", (buffer_count + 2) as i64);
    deque
}

// ---------------------------------------------------------------------------
// Red-black trees
// ---------------------------------------------------------------------------

struct TreeSlot {
    node: Value,
    key: i64,
    left: Option<usize>,
    right: Option<usize>,
    parent: Option<usize>,
}

/// Nodes of a built tree, in insertion order
pub struct BuiltTree {
    pub header: Address,
    pub nodes: Vec<Address>,
}

/// Link one node per key into `_M_t` by unbalanced BST insertion
///
/// `write_payload` fills the node's `_M_value_field` for the key at the given
/// index. Colors are left at zero; nothing reads them.
pub fn fill_tree(
    s: &mut Snapshot,
    container: &Value,
    node_type: &Type,
    keys: &[i64],
    mut write_payload: impl FnMut(&mut Snapshot, &Value, usize),
) -> BuiltTree {
    let imp = container.field_path(&*s, "_M_t._M_impl").unwrap();
    let header = imp.field(&*s, "_M_header").unwrap();

    let mut slots: Vec<TreeSlot> = Vec::new();
    for (index, &key) in keys.iter().enumerate() {
        let node = s.place(node_type).unwrap();
        let payload = node.field(&*s, "_M_value_field").unwrap();
        write_payload(s, &payload, index);

        let mut parent = None;
        if !slots.is_empty() {
            let mut at = 0;
            loop {
                let go_left = key < slots[at].key;
                let child = if go_left { slots[at].left } else { slots[at].right };
                match child {
                    Some(next) => at = next,
                    None => {
                        if go_left {
                            slots[at].left = Some(index);
                        } else {
                            slots[at].right = Some(index);
                        }
                        parent = Some(at);
                        break;
                    }
                }
            }
        }
        slots.push(TreeSlot {
            node,
            key,
            left: None,
            right: None,
            parent,
        });
    }

    let address = |index: Option<usize>| index.map_or(0, |i| slots[i].node.address());
    for slot in &slots {
        set_ptr(s, &slot.node, "_M_left", address(slot.left));
        set_ptr(s, &slot.node, "_M_right", address(slot.right));
        let parent = slot
            .parent
            .map_or(header.address(), |i| slots[i].node.address());
        set_ptr(s, &slot.node, "_M_parent", parent);
    }

    if slots.is_empty() {
        set_ptr(s, &header, "_M_parent", 0);
        set_ptr(s, &header, "_M_left", header.address());
        set_ptr(s, &header, "_M_right", header.address());
    } else {
        let mut min = 0;
        while let Some(left) = slots[min].left {
            min = left;
        }
        let mut max = 0;
        while let Some(right) = slots[max].right {
            max = right;
        }
        set_ptr(s, &header, "_M_parent", slots[0].node.address());
        set_ptr(s, &header, "_M_left", slots[min].node.address());
        set_ptr(s, &header, "_M_right", slots[max].node.address());
    }
    set_int(s, &imp, "_M_node_count", keys.len() as i64);

    BuiltTree {
        header: header.address(),
        nodes: slots.iter().map(|slot| slot.node.address()).collect(),
    }
}

pub fn map_node_type() -> Type {
    let value_type = Type::named_struct(layouts::pair_name(&int().with_const(), &int()));
    Type::named_struct(layouts::rb_tree_node_name(&value_type))
}

/// `std::map<int, int>` (or another map-shaped container) with entries inserted in order
pub fn map_of_ints_named(s: &mut Snapshot, name: &str, entries: &[(i64, i64)]) -> (Value, BuiltTree) {
    let ty = layouts::map_named(&mut s.types, name, &int(), &int());
    let map = s.place(&ty).unwrap();
    let keys: Vec<i64> = entries.iter().map(|(k, _)| *k).collect();
    let tree = fill_tree(s, &map, &map_node_type(), &keys, |s, pair, i| {
        set_int(s, pair, "first", entries[i].0);
        set_int(s, pair, "second", entries[i].1);
    });
    (map, tree)
}

pub fn map_of_ints(s: &mut Snapshot, entries: &[(i64, i64)]) -> (Value, BuiltTree) {
    map_of_ints_named(s, "std::map", entries)
}

pub fn set_of_ints_named(s: &mut Snapshot, name: &str, keys: &[i64]) -> (Value, BuiltTree) {
    let ty = layouts::set_named(&mut s.types, name, &int());
    let set = s.place(&ty).unwrap();
    let node_type = Type::named_struct(layouts::rb_tree_node_name(&int()));
    let tree = fill_tree(s, &set, &node_type, keys, |s, key, i| {
        s.write_int(key, keys[i]).unwrap();
    });
    (set, tree)
}

pub fn set_of_ints(s: &mut Snapshot, keys: &[i64]) -> (Value, BuiltTree) {
    set_of_ints_named(s, "std::set", keys)
}

// ---------------------------------------------------------------------------
// Hash tables
// ---------------------------------------------------------------------------

/// Fill `_M_buckets` with one chain per entry of `chain_lens`
///
/// `write_payload` receives the node's `_M_v`, the bucket and the position in
/// the chain.
pub fn fill_hashtable(
    s: &mut Snapshot,
    table: &Value,
    chain_lens: &[usize],
    mut write_payload: impl FnMut(&mut Snapshot, &Value, usize, usize),
) {
    let node_ptr = table
        .field(&*s, "_M_buckets")
        .unwrap()
        .ty()
        .pointee()
        .unwrap();
    let node_type = node_ptr.pointee().unwrap();
    let buckets = s.place_array(&node_ptr, chain_lens.len().max(1)).unwrap();

    for (bucket, &len) in chain_lens.iter().enumerate() {
        let mut next: Address = 0;
        for pos in (0..len).rev() {
            let node = s.place(&node_type).unwrap();
            let payload = node.field(&*s, "_M_v").unwrap();
            write_payload(s, &payload, bucket, pos);
            set_ptr(s, &node, "_M_next", next);
            next = node.address();
        }
        let slot = buckets.index(&*s, bucket as i64).unwrap();
        s.write_pointer(&slot, next).unwrap();
    }
    set_ptr(s, table, "_M_buckets", buckets.address);
    set_int(s, table, "_M_bucket_count", chain_lens.len() as i64);
    set_int(s, table, "_M_element_count", chain_lens.iter().sum::<usize>() as i64);
}

pub fn unordered_set_of_ints_named(s: &mut Snapshot, name: &str, chains: &[&[i64]]) -> Value {
    let ty = layouts::unordered_set_named(&mut s.types, name, &int());
    let table = s.place(&ty).unwrap();
    let lens: Vec<usize> = chains.iter().map(|chain| chain.len()).collect();
    fill_hashtable(s, &table, &lens, |s, key, bucket, pos| {
        s.write_int(key, chains[bucket][pos]).unwrap();
    });
    table
}

pub fn unordered_set_of_ints(s: &mut Snapshot, chains: &[&[i64]]) -> Value {
    unordered_set_of_ints_named(s, "std::unordered_set", chains)
}

pub fn unordered_map_of_ints_named(s: &mut Snapshot, name: &str, chains: &[&[(i64, i64)]]) -> Value {
    let ty = layouts::unordered_map_named(&mut s.types, name, &int(), &int());
    let table = s.place(&ty).unwrap();
    let lens: Vec<usize> = chains.iter().map(|chain| chain.len()).collect();
    fill_hashtable(s, &table, &lens, |s, pair, bucket, pos| {
        let (k, v) = chains[bucket][pos];
        set_int(s, pair, "first", k);
        set_int(s, pair, "second", v);
    });
    table
}

pub fn unordered_map_of_ints(s: &mut Snapshot, chains: &[&[(i64, i64)]]) -> Value {
    unordered_map_of_ints_named(s, "std::unordered_map", chains)
}

// ---------------------------------------------------------------------------
// Strings and smart pointers
// ---------------------------------------------------------------------------

/// `std::basic_string<CharT>` holding `units` followed by a NUL
pub fn basic_string_value(s: &mut Snapshot, char_type: &Type, units: &[u64]) -> Value {
    let ty = layouts::basic_string(&mut s.types, char_type);
    let data = s.place_array(char_type, units.len() + 1).unwrap();
    for (i, unit) in units.iter().enumerate() {
        let slot = data.index(&*s, i as i64).unwrap();
        s.write_uint(&slot, *unit).unwrap();
    }
    let string = s.place(&ty).unwrap();
    set_ptr(s, &string, "_M_dataplus._M_p", data.address);
    string
}

pub fn string_value(s: &mut Snapshot, text: &str) -> Value {
    let units: Vec<u64> = text.bytes().map(u64::from).collect();
    basic_string_value(s, &Type::new(BaseType::Char), &units)
}

/// `std::shared_ptr<int>` to a fresh int; `use_count: None` leaves no control block
pub fn shared_ptr_to_int(s: &mut Snapshot, value: i64, use_count: Option<i64>) -> (Value, Address) {
    let ty = layouts::shared_ptr(&mut s.types, &int());
    let ptr = s.place(&ty).unwrap();
    let object = s.place(&int()).unwrap();
    s.write_int(&object, value).unwrap();
    set_ptr(s, &ptr, "_M_ptr", object.address());
    if let Some(count) = use_count {
        let counted = s
            .place(&Type::named_struct(layouts::SP_COUNTED_BASE))
            .unwrap();
        set_int(s, &counted, "_M_use_count", count);
        set_int(s, &counted, "_M_weak_count", 1);
        set_ptr(s, &ptr, "_M_refcount._M_pi", counted.address());
    }
    (ptr, object.address())
}
