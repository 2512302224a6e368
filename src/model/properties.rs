//! 随机文档上的性质测试

use std::rc::Rc;

use proptest::prelude::*;

use crate::model::diff::{deep_eq, is_dirty};
use crate::model::engine::{assign, resolve};
use crate::model::links::{normalize, FieldNameClassifier, LinkKind};
use crate::model::node::Node;
use crate::model::path::Path;
use crate::model::query::matches;
use crate::model::shadow_tree::build_shadow_tree;

fn arb_leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::Null),
        any::<bool>().prop_map(Node::Bool),
        any::<i64>().prop_map(Node::from),
        "[a-zA-Z#/:.@]{0,10}".prop_map(Node::String),
    ]
}

fn arb_node() -> impl Strategy<Value = Node> {
    arb_leaf().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Node::sequence),
            prop::collection::vec(("[a-z]{1,5}", inner), 0..4).prop_map(|fields| Node::mapping(fields)),
        ]
    })
}

fn arb_doc() -> impl Strategy<Value = Node> {
    prop::collection::vec(
        (prop_oneof!["[a-z]{1,5}", Just("url".to_string()), Just("link".to_string())], arb_node()),
        1..5,
    )
    .prop_map(|fields| Node::mapping(fields))
}

fn all_paths(doc: &Node) -> Vec<Path> {
    build_shadow_tree(doc).into_iter().map(|row| row.path).collect()
}

proptest! {
    #[test]
    fn resolve_after_assign_returns_value(doc in arb_doc(), pick in any::<prop::sample::Index>(), value in arb_node()) {
        let paths = all_paths(&doc);
        let path = pick.get(&paths);

        let same = resolve(&doc, path).unwrap().clone();
        let rewritten = assign(&doc, path, same.clone()).unwrap();
        prop_assert_eq!(resolve(&rewritten, path), Some(&same));

        let replaced = assign(&doc, path, value.clone()).unwrap();
        prop_assert_eq!(resolve(&replaced, path), Some(&value));
    }

    #[test]
    fn assign_shares_subtrees_off_the_ancestor_chain(doc in arb_doc(), pick in any::<prop::sample::Index>()) {
        let paths = all_paths(&doc);
        let target = pick.get(&paths).clone();
        let next = assign(&doc, &target, Node::from("changed")).unwrap();

        for other in paths.iter().filter(|q| !q.starts_with(&target) && !target.starts_with(q)) {
            let before = resolve(&doc, other).unwrap();
            let after = resolve(&next, other).unwrap();
            match (before, after) {
                (Node::Mapping(a), Node::Mapping(b)) => prop_assert!(Rc::ptr_eq(a, b)),
                (Node::Sequence(a), Node::Sequence(b)) => prop_assert!(Rc::ptr_eq(a, b)),
                _ => prop_assert!(deep_eq(before, after)),
            }
        }
    }

    #[test]
    fn dirty_is_reflexive_and_detects_edits(doc in arb_doc(), pick in any::<prop::sample::Index>()) {
        let paths = all_paths(&doc);
        for path in &paths {
            prop_assert!(!is_dirty(&doc, &doc, path));
        }

        let path = pick.get(&paths);
        let marker = Node::from("__edited__");
        let next = assign(&doc, path, marker).unwrap();
        prop_assert!(is_dirty(&doc, &next, path));
    }

    #[test]
    fn scalar_text_is_found_from_root(doc in arb_doc()) {
        prop_assert!(matches(&doc, &Path::root(), None, ""));
        for path in all_paths(&doc) {
            let node = resolve(&doc, &path).unwrap();
            if let Some(text) = node.scalar_text().filter(|t| !t.is_empty()) {
                prop_assert!(matches(&doc, &Path::root(), None, &text));
                prop_assert!(matches(&doc, &Path::root(), None, &text.to_uppercase()));
            }
        }
    }

    #[test]
    fn normalize_is_idempotent(doc in arb_doc()) {
        let base = "https://audit.tv";
        let by_name = FieldNameClassifier::default();
        let once = normalize(&doc, &by_name, base);
        prop_assert_eq!(normalize(&once, &by_name, base), once);

        let everything = |_: &Path| LinkKind::Link;
        let once = normalize(&doc, &everything, base);
        prop_assert_eq!(normalize(&once, &everything, base), once);
    }
}
