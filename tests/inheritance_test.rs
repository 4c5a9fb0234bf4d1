//! Inheritance resolution across blocks, classes and states.

use pretty_assertions::assert_eq;
use style_inherit::*;

/// ```text
/// Base    { foo { hover }, bar }
/// Derived { baz }              extends Base
/// ```
fn sample() -> (StyleTree, NodeId, NodeId) {
    let mut tree = StyleTree::new();
    let base = tree.add_block("Base");
    let derived = tree.add_block("Derived");
    tree.ensure_selector(base, "foo", Some("hover")).unwrap();
    tree.ensure_selector(base, "bar", None).unwrap();
    tree.ensure_selector(derived, "baz", None).unwrap();
    tree.extend(derived, base);
    (tree, base, derived)
}

#[test]
fn test_ensure_child_returns_same_instance() {
    let (mut tree, base, _) = sample();
    let before = tree.len();

    let a = tree.ensure_child(base, "foo").unwrap();
    let b = tree.ensure_child(base, "foo").unwrap();

    assert_eq!(a, b);
    assert_eq!(tree.len(), before);
}

#[test]
fn test_explicit_base_is_recorded() {
    let (tree, base, derived) = sample();

    assert_eq!(tree.base(derived), Some(base));
    assert_eq!(tree.base_name(derived), Some("Base"));
    assert_eq!(tree.base_state(derived), BaseState::Present(base));
}

#[test]
fn test_resolve_child_inherits_without_creating() {
    let (tree, base, derived) = sample();
    let base_foo = tree.get_child(base, "foo").unwrap();
    let before = tree.len();

    assert_eq!(tree.resolve_child(derived, "foo"), Some(base_foo));
    // Resolution never materializes a child on the derived block
    assert_eq!(tree.get_child(derived, "foo"), None);
    assert_eq!(tree.len(), before);
}

#[test]
fn test_independent_child_derives_base_by_name() {
    let (mut tree, base, derived) = sample();
    let base_foo = tree.get_child(base, "foo").unwrap();

    let derived_foo = tree.ensure_child(derived, "foo").unwrap();
    assert_eq!(tree.base_state(derived_foo), BaseState::Unresolved);
    assert_eq!(tree.base(derived_foo), Some(base_foo));

    // One level deeper: Derived.foo.hover → Base.foo.hover
    let base_hover = tree.get_child(base_foo, "hover").unwrap();
    let derived_hover = tree.ensure_child(derived_foo, "hover").unwrap();
    assert_eq!(tree.base(derived_hover), Some(base_hover));
}

#[test]
fn test_direct_child_wins_over_inherited() {
    let (mut tree, _, derived) = sample();
    let derived_foo = tree.ensure_child(derived, "foo").unwrap();

    assert_eq!(tree.resolve_child(derived, "foo"), Some(derived_foo));
}

#[test]
fn test_absent_everywhere_resolves_to_none() {
    let (tree, base, derived) = sample();

    assert_eq!(tree.resolve_child(derived, "nope"), None);
    assert_eq!(tree.resolve_child(base, "baz"), None);
}

#[test]
fn test_three_level_chain_order() {
    let mut tree = StyleTree::new();
    let a = tree.add_block("A");
    let b = tree.add_block("B");
    let c = tree.add_block("C");
    tree.extend(b, a);
    tree.extend(c, b);

    assert_eq!(tree.resolve_inheritance(c), vec![a, b]);
    assert_eq!(tree.resolve_inheritance(b), vec![a]);
    assert!(tree.resolve_inheritance(a).is_empty());
    assert_eq!(tree.try_resolve_inheritance(c), Ok(vec![a, b]));

    assert_eq!(tree.base_chain(c).collect::<Vec<_>>(), vec![b, a]);
    assert!(tree.inherits_from(c, a));
    assert!(!tree.inherits_from(a, c));
}

#[test]
fn test_nearest_base_wins_in_chain() {
    // A { x }  ◄── B { x }  ◄── C { }
    let mut tree = StyleTree::new();
    let a = tree.add_block("A");
    let b = tree.add_block("B");
    let c = tree.add_block("C");
    tree.ensure_child(a, "x").unwrap();
    let b_x = tree.ensure_child(b, "x").unwrap();
    tree.extend(b, a);
    tree.extend(c, b);

    assert_eq!(tree.resolve_child(c, "x"), Some(b_x));
}

#[test]
fn test_unparented_node_never_gains_base() {
    let mut tree = StyleTree::new();
    let lonely = tree.add_block("Lonely");

    assert_eq!(tree.base(lonely), None);
    assert_eq!(tree.base_state(lonely), BaseState::Absent);

    // Later structure does not revive resolution
    let other = tree.add_block("Other");
    tree.ensure_child(other, "Lonely").unwrap();
    assert_eq!(tree.base(lonely), None);
}

#[test]
fn test_base_survives_mutation_after_first_read() {
    let (mut tree, base, derived) = sample();
    let derived_baz = tree.get_child(derived, "baz").unwrap();
    assert_eq!(tree.base(derived_baz), None);

    tree.ensure_child(base, "baz").unwrap();

    // Cached "no base" stays; resolve_child on the block sees the new child
    assert_eq!(tree.base(derived_baz), None);
    assert_eq!(tree.resolve_child(derived, "baz"), Some(derived_baz));
}

#[test]
fn test_children_record_serializes_by_name() {
    let (tree, base, _) = sample();
    let foo = tree.get_child(base, "foo").unwrap();
    let bar = tree.get_child(base, "bar").unwrap();

    let json = serde_json::to_value(tree.children_record(base)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "bar": bar.index(), "foo": foo.index() })
    );
}

#[test]
fn test_resolved_children_of_derived_block() {
    let (tree, base, derived) = sample();

    let names: Vec<String> = tree.resolved_children(derived).into_keys().collect();
    assert_eq!(names, vec!["bar", "baz", "foo"]);

    let foo = tree.resolved_children(derived)["foo"];
    assert_eq!(tree.parent(foo), Some(base));
}
