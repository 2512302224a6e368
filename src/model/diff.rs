//! 基线（baseline）与草稿（draft）的差异判断，仅用于高亮展示，无副作用

use std::rc::Rc;

use crate::model::engine::resolve;
use crate::model::node::Node;
use crate::model::path::Path;

/// 深度比较；共享同一 `Rc` 的子树直接视为相等
pub fn deep_eq(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Mapping(x), Node::Mapping(y)) => {
            Rc::ptr_eq(x, y)
                || (x.len() == y.len()
                    && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| deep_eq(v, w))))
        }
        (Node::Sequence(x), Node::Sequence(y)) => {
            Rc::ptr_eq(x, y)
                || (x.len() == y.len() && x.iter().zip(y.iter()).all(|(v, w)| deep_eq(v, w)))
        }
        (Node::Number(x), Node::Number(y)) => x == y || number_eq(x, y),
        _ => a == b,
    }
}

/// 数值按值比较：`1` 与 `1.0` 相等
fn number_eq(x: &serde_json::Number, y: &serde_json::Number) -> bool {
    if x.is_f64() || y.is_f64() {
        matches!((x.as_f64(), y.as_f64()), (Some(p), Some(q)) if p == q)
    } else {
        false
    }
}

/// path 处的子树是否被修改；一侧存在另一侧缺失也算修改
pub fn is_dirty(baseline: &Node, draft: &Node, path: &Path) -> bool {
    match (resolve(baseline, path), resolve(draft, path)) {
        (None, None) => false,
        (Some(a), Some(b)) => !deep_eq(a, b),
        _ => true,
    }
}

/// 列出所有发生变化的最小路径
///
/// 两侧同为 Mapping 或同为 Sequence 时继续下钻，否则在当前节点报告一次。
pub fn dirty_paths(baseline: &Node, draft: &Node) -> Vec<Path> {
    let mut out = Vec::new();
    let mut path = Path::root();
    collect(Some(baseline), Some(draft), &mut path, &mut out);
    out
}

fn collect(before: Option<&Node>, after: Option<&Node>, path: &mut Path, out: &mut Vec<Path>) {
    match (before, after) {
        (Some(a), Some(b)) if deep_eq(a, b) => {}
        (Some(Node::Mapping(x)), Some(Node::Mapping(y))) => {
            for (k, v) in x.iter() {
                path.push(k.as_str());
                collect(Some(v), y.get(k), path, out);
                path.pop();
            }
            for (k, w) in y.iter().filter(|(k, _)| !x.contains_key(*k)) {
                path.push(k.as_str());
                collect(None, Some(w), path, out);
                path.pop();
            }
        }
        (Some(Node::Sequence(x)), Some(Node::Sequence(y))) => {
            for i in 0..x.len().max(y.len()) {
                path.push(i);
                collect(x.get(i), y.get(i), path, out);
                path.pop();
            }
        }
        (None, None) => {}
        _ => out.push(path.clone()),
    }
}
