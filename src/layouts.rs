//! libstdc++ v6 object layouts
//!
//! Each function registers the structs behind one standard library type in a
//! [`TypeTable`] and returns the container type. The layouts mirror what the
//! library's debug info describes on LP64 targets, with base-class members
//! flattened into the derived struct:
//!
//! | type | members the printers read |
//! |---|---|
//! | `std::vector<T>` | `_M_impl._M_start`, `_M_finish`, `_M_end_of_storage` |
//! | `std::list<T>` | `_M_impl._M_node` (`_M_next`, `_M_prev`); nodes add `_M_data` |
//! | `std::map`/`std::set` | `_M_t._M_impl._M_header` (`_M_parent`, `_M_left`, `_M_right`), `_M_node_count`; nodes add `_M_value_field` |
//! | `std::unordered_*` | `_M_buckets`, `_M_bucket_count`, `_M_element_count`; nodes `_M_v`, `_M_next` |
//! | `std::deque<T>` | `_M_impl._M_start`/`_M_finish` iterators (`_M_cur`, `_M_first`, `_M_last`, `_M_node`) |
//!
//! The `*_node_name` helpers are shared with the printers so that node lookups
//! always match what was defined here.

use crate::types::{template_name, BaseType, StructDef, Type, TypeTable};

pub const LIST_NODE_BASE: &str = "std::__detail::_List_node_base";
pub const SLIST_NODE_BASE: &str = "__gnu_cxx::_Slist_node_base";
pub const RB_TREE_NODE_BASE: &str = "std::_Rb_tree_node_base";
pub const SP_COUNTED_BASE: &str = "std::_Sp_counted_base";

pub fn list_node_name(elem: &Type) -> String {
    template_name("std::_List_node", &[elem])
}

pub fn slist_node_name(elem: &Type) -> String {
    template_name("__gnu_cxx::_Slist_node", &[elem])
}

pub fn rb_tree_node_name(value_type: &Type) -> String {
    template_name("std::_Rb_tree_node", &[value_type])
}

pub fn pair_name(first: &Type, second: &Type) -> String {
    template_name("std::pair", &[first, second])
}

/// `std::size_t`
pub fn size_t(types: &mut TypeTable) -> Type {
    types.define_typedef("std::size_t", Type::new(BaseType::UnsignedLong))
}

/// `std::pair<A, B>`
pub fn pair(types: &mut TypeTable, first: &Type, second: &Type) -> Type {
    types.define_struct(
        StructDef::new(pair_name(first, second))
            .with_template_arg(first.clone())
            .with_template_arg(second.clone())
            .with_field("first", first.clone())
            .with_field("second", second.clone()),
    )
}

/// `std::basic_string<CharT>` with a single data pointer
pub fn basic_string(types: &mut TypeTable, char_type: &Type) -> Type {
    let name = template_name("std::basic_string", &[char_type]);
    let hider = types.define_struct(
        StructDef::new(format!("{}::_Alloc_hider", name))
            .with_field("_M_p", char_type.clone().with_pointer()),
    );
    types.define_struct(
        StructDef::new(name)
            .with_template_arg(char_type.clone())
            .with_field("_M_dataplus", hider),
    )
}

/// `std::string`
pub fn string(types: &mut TypeTable) -> Type {
    basic_string(types, &Type::new(BaseType::Char))
}

/// `std::vector<T>`
pub fn vector(types: &mut TypeTable, elem: &Type) -> Type {
    let ptr = elem.clone().with_pointer();
    let imp = types.define_struct(
        StructDef::new(format!(
            "{}::_Vector_impl",
            template_name("std::_Vector_base", &[elem])
        ))
        .with_field("_M_start", ptr.clone())
        .with_field("_M_finish", ptr.clone())
        .with_field("_M_end_of_storage", ptr),
    );
    types.define_struct(
        StructDef::new(template_name("std::vector", &[elem]))
            .with_template_arg(elem.clone())
            .with_field("_M_impl", imp),
    )
}

fn list_node_base(types: &mut TypeTable) -> Type {
    let base_ptr = Type::named_struct(LIST_NODE_BASE).with_pointer();
    types.define_struct(
        StructDef::new(LIST_NODE_BASE)
            .with_field("_M_next", base_ptr.clone())
            .with_field("_M_prev", base_ptr),
    )
}

/// `std::list<T>` and its node type
pub fn list(types: &mut TypeTable, elem: &Type) -> Type {
    let base = list_node_base(types);
    let base_ptr = base.clone().with_pointer();
    types.define_struct(
        StructDef::new(list_node_name(elem))
            .with_template_arg(elem.clone())
            .with_field("_M_next", base_ptr.clone())
            .with_field("_M_prev", base_ptr)
            .with_field("_M_data", elem.clone()),
    );
    let imp = types.define_struct(
        StructDef::new(format!(
            "{}::_List_impl",
            template_name("std::_List_base", &[elem])
        ))
        .with_field("_M_node", base),
    );
    types.define_struct(
        StructDef::new(template_name("std::list", &[elem]))
            .with_template_arg(elem.clone())
            .with_field("_M_impl", imp),
    )
}

/// `std::_List_iterator<T>` (or the const variant)
pub fn list_iterator(types: &mut TypeTable, elem: &Type, is_const: bool) -> Type {
    let base = list_node_base(types);
    let name = if is_const {
        "std::_List_const_iterator"
    } else {
        "std::_List_iterator"
    };
    types.define_struct(
        StructDef::new(template_name(name, &[elem]))
            .with_template_arg(elem.clone())
            .with_field("_M_node", base.with_pointer()),
    )
}

fn slist_node_base(types: &mut TypeTable) -> Type {
    types.define_struct(
        StructDef::new(SLIST_NODE_BASE)
            .with_field("_M_next", Type::named_struct(SLIST_NODE_BASE).with_pointer()),
    )
}

/// `__gnu_cxx::slist<T>` and its node type
pub fn slist(types: &mut TypeTable, elem: &Type) -> Type {
    let base = slist_node_base(types);
    types.define_struct(
        StructDef::new(slist_node_name(elem))
            .with_template_arg(elem.clone())
            .with_field("_M_next", base.clone().with_pointer())
            .with_field("_M_data", elem.clone()),
    );
    types.define_struct(
        StructDef::new(template_name("__gnu_cxx::slist", &[elem]))
            .with_template_arg(elem.clone())
            .with_field("_M_head", base),
    )
}

/// `__gnu_cxx::_Slist_iterator<T>`
pub fn slist_iterator(types: &mut TypeTable, elem: &Type) -> Type {
    let base = slist_node_base(types);
    types.define_struct(
        StructDef::new(template_name("__gnu_cxx::_Slist_iterator", &[elem]))
            .with_template_arg(elem.clone())
            .with_field("_M_node", base.with_pointer()),
    )
}

/// `std::_Deque_iterator<T, T&, T*>`
pub fn deque_iterator(types: &mut TypeTable, elem: &Type) -> Type {
    let ptr = elem.clone().with_pointer();
    let reference = elem.clone().with_reference();
    types.define_struct(
        StructDef::new(template_name(
            "std::_Deque_iterator",
            &[elem, &reference, &ptr],
        ))
        .with_template_arg(elem.clone())
        .with_template_arg(reference.clone())
        .with_template_arg(ptr.clone())
        .with_field("_M_cur", ptr.clone())
        .with_field("_M_first", ptr.clone())
        .with_field("_M_last", ptr.clone())
        .with_field("_M_node", ptr.with_pointer()),
    )
}

/// `std::deque<T>`
pub fn deque(types: &mut TypeTable, elem: &Type) -> Type {
    let iter = deque_iterator(types, elem);
    let size = size_t(types);
    let imp = types.define_struct(
        StructDef::new(format!(
            "{}::_Deque_impl",
            template_name("std::_Deque_base", &[elem])
        ))
        .with_field("_M_map", elem.clone().with_pointer().with_pointer())
        .with_field("_M_map_size", size)
        .with_field("_M_start", iter.clone())
        .with_field("_M_finish", iter),
    );
    types.define_struct(
        StructDef::new(template_name("std::deque", &[elem]))
            .with_template_arg(elem.clone())
            .with_field("_M_impl", imp),
    )
}

fn rb_tree_node_base(types: &mut TypeTable) -> Type {
    let base_ptr = Type::named_struct(RB_TREE_NODE_BASE).with_pointer();
    types.define_struct(
        StructDef::new(RB_TREE_NODE_BASE)
            .with_field("_M_color", Type::new(BaseType::Int))
            .with_field("_M_parent", base_ptr.clone())
            .with_field("_M_left", base_ptr.clone())
            .with_field("_M_right", base_ptr),
    )
}

/// `std::_Rb_tree<K, V>` plus its node type for `value_type`
fn rb_tree(types: &mut TypeTable, key: &Type, value_type: &Type) -> Type {
    let base = rb_tree_node_base(types);
    let base_ptr = base.clone().with_pointer();
    types.define_struct(
        StructDef::new(rb_tree_node_name(value_type))
            .with_template_arg(value_type.clone())
            .with_field("_M_color", Type::new(BaseType::Int))
            .with_field("_M_parent", base_ptr.clone())
            .with_field("_M_left", base_ptr.clone())
            .with_field("_M_right", base_ptr)
            .with_field("_M_value_field", value_type.clone()),
    );
    let compare = types.define_struct(StructDef::new(template_name("std::less", &[key])));
    let size = size_t(types);
    let tree_name = template_name("std::_Rb_tree", &[key, value_type]);
    let imp = types.define_struct(
        StructDef::new(format!("{}::_Rb_tree_impl", tree_name))
            .with_field("_M_key_compare", compare)
            .with_field("_M_header", base)
            .with_field("_M_node_count", size),
    );
    types.define_struct(StructDef::new(tree_name).with_field("_M_impl", imp))
}

/// `std::map<K, V>`, `std::multimap<K, V>` or another map-shaped tree container
pub fn map_named(types: &mut TypeTable, name: &str, key: &Type, value: &Type) -> Type {
    let value_type = pair(types, &key.clone().with_const(), value);
    let tree = rb_tree(types, key, &value_type);
    types.define_struct(
        StructDef::new(template_name(name, &[key, value]))
            .with_template_arg(key.clone())
            .with_template_arg(value.clone())
            .with_field("_M_t", tree),
    )
}

pub fn map(types: &mut TypeTable, key: &Type, value: &Type) -> Type {
    map_named(types, "std::map", key, value)
}

/// `std::set<K>`, `std::multiset<K>` or another set-shaped tree container
pub fn set_named(types: &mut TypeTable, name: &str, key: &Type) -> Type {
    let tree = rb_tree(types, key, key);
    types.define_struct(
        StructDef::new(template_name(name, &[key]))
            .with_template_arg(key.clone())
            .with_field("_M_t", tree),
    )
}

pub fn set(types: &mut TypeTable, key: &Type) -> Type {
    set_named(types, "std::set", key)
}

/// `std::_Rb_tree_iterator<V>` (or the const variant)
pub fn rb_tree_iterator(types: &mut TypeTable, value_type: &Type, is_const: bool) -> Type {
    let base = rb_tree_node_base(types);
    let name = if is_const {
        "std::_Rb_tree_const_iterator"
    } else {
        "std::_Rb_tree_iterator"
    };
    types.define_struct(
        StructDef::new(template_name(name, &[value_type]))
            .with_template_arg(value_type.clone())
            .with_field("_M_node", base.with_pointer()),
    )
}

/// Hash node holding `value_type`
fn hash_node(types: &mut TypeTable, value_type: &Type) -> Type {
    let name = template_name("std::__detail::_Hash_node", &[value_type]);
    types.define_struct(
        StructDef::new(name.clone())
            .with_template_arg(value_type.clone())
            .with_field("_M_v", value_type.clone())
            .with_field("_M_next", Type::named_struct(name).with_pointer()),
    )
}

fn hashtable(types: &mut TypeTable, name: String, args: &[&Type], value_type: &Type) -> Type {
    let node = hash_node(types, value_type);
    let size = size_t(types);
    let policy = types.define_struct(
        StructDef::new("std::__detail::_Prime_rehash_policy")
            .with_field("_M_max_load_factor", Type::new(BaseType::Float))
            .with_field("_M_growth_factor", Type::new(BaseType::Float))
            .with_field("_M_next_resize", size.clone()),
    );
    let mut def = StructDef::new(name);
    for arg in args {
        def = def.with_template_arg((*arg).clone());
    }
    types.define_struct(
        def.with_field("_M_buckets", node.with_pointer().with_pointer())
            .with_field("_M_bucket_count", size.clone())
            .with_field("_M_element_count", size)
            .with_field("_M_rehash_policy", policy),
    )
}

/// `std::unordered_map<K, V>` and friends, including the `std::tr1` spellings
pub fn unordered_map_named(types: &mut TypeTable, name: &str, key: &Type, value: &Type) -> Type {
    let value_type = pair(types, &key.clone().with_const(), value);
    hashtable(
        types,
        template_name(name, &[key, value]),
        &[key, value],
        &value_type,
    )
}

pub fn unordered_map(types: &mut TypeTable, key: &Type, value: &Type) -> Type {
    unordered_map_named(types, "std::unordered_map", key, value)
}

/// `std::unordered_set<K>` and friends, including the `std::tr1` spellings
pub fn unordered_set_named(types: &mut TypeTable, name: &str, key: &Type) -> Type {
    hashtable(types, template_name(name, &[key]), &[key], key)
}

pub fn unordered_set(types: &mut TypeTable, key: &Type) -> Type {
    unordered_set_named(types, "std::unordered_set", key)
}

/// `std::bitset<N>`: a single word up to 64 bits, an array of words beyond
pub fn bitset(types: &mut TypeTable, bits: usize) -> Type {
    let words = bits.div_ceil(64).max(1);
    let word = Type::new(BaseType::UnsignedLong);
    let storage = if words == 1 { word } else { word.with_array(words) };
    types.define_struct(StructDef::new(format!("std::bitset<{}>", bits)).with_field("_M_w", storage))
}

fn shared_count(types: &mut TypeTable) -> Type {
    let counted = types.define_struct(
        StructDef::new(SP_COUNTED_BASE)
            .with_field("_vptr", Type::new(BaseType::Void).with_pointer())
            .with_field("_M_use_count", Type::new(BaseType::Int))
            .with_field("_M_weak_count", Type::new(BaseType::Int)),
    );
    types.define_struct(StructDef::new("std::__shared_count").with_field("_M_pi", counted.with_pointer()))
}

/// `std::shared_ptr<T>`, `std::weak_ptr<T>` and the `std::tr1` spellings
pub fn smart_ptr_named(types: &mut TypeTable, name: &str, elem: &Type) -> Type {
    let count = shared_count(types);
    types.define_struct(
        StructDef::new(template_name(name, &[elem]))
            .with_template_arg(elem.clone())
            .with_field("_M_ptr", elem.clone().with_pointer())
            .with_field("_M_refcount", count),
    )
}

pub fn shared_ptr(types: &mut TypeTable, elem: &Type) -> Type {
    smart_ptr_named(types, "std::shared_ptr", elem)
}

pub fn weak_ptr(types: &mut TypeTable, elem: &Type) -> Type {
    smart_ptr_named(types, "std::weak_ptr", elem)
}

/// `std::unique_ptr<T>` holding its pointer in a `std::tuple`
pub fn unique_ptr(types: &mut TypeTable, elem: &Type) -> Type {
    let deleter = Type::named_struct(template_name("std::default_delete", &[elem]));
    let ptr = elem.clone().with_pointer();
    let tuple = types.define_struct(
        StructDef::new(template_name("std::tuple", &[&ptr, &deleter]))
            .with_template_arg(ptr.clone())
            .with_template_arg(deleter)
            .with_field("_M_head_impl", ptr),
    );
    types.define_struct(
        StructDef::new(template_name("std::unique_ptr", &[elem]))
            .with_template_arg(elem.clone())
            .with_field("_M_t", tuple),
    )
}

/// `std::stack<T, C>` / `std::queue<T, C>` wrapping `container`
pub fn adapter_named(types: &mut TypeTable, name: &str, elem: &Type, container: &Type) -> Type {
    let mut def = StructDef::new(template_name(name, &[elem, container]))
        .with_template_arg(elem.clone())
        .with_template_arg(container.clone())
        .with_field("c", container.clone());
    if name.ends_with("priority_queue") {
        let compare = types.define_struct(StructDef::new(template_name("std::less", &[elem])));
        def = def.with_field("comp", compare);
    }
    types.define_struct(def)
}

pub fn stack(types: &mut TypeTable, elem: &Type, container: &Type) -> Type {
    adapter_named(types, "std::stack", elem, container)
}

pub fn queue(types: &mut TypeTable, elem: &Type, container: &Type) -> Type {
    adapter_named(types, "std::queue", elem, container)
}

pub fn priority_queue(types: &mut TypeTable, elem: &Type, container: &Type) -> Type {
    adapter_named(types, "std::priority_queue", elem, container)
}

/// `__gnu_cxx::__normal_iterator<T*, Container>` (vector iterator)
pub fn normal_iterator(types: &mut TypeTable, elem: &Type, container: &Type) -> Type {
    let ptr = elem.clone().with_pointer();
    types.define_struct(
        StructDef::new(template_name("__gnu_cxx::__normal_iterator", &[&ptr, container]))
            .with_template_arg(ptr.clone())
            .with_template_arg(container.clone())
            .with_field("_M_current", ptr),
    )
}
