//! 搜索匹配：对字段名与标量值做大小写不敏感的子串匹配

use std::collections::HashSet;

use crate::model::node::{Node, NodeKind};
use crate::model::path::{Path, Selector};

/// 数组元素的展示标签（从 1 开始计数）
pub fn row_label(index: usize) -> String {
    format!("Row {}", index + 1)
}

/// 路径末级选择器对应的展示标签；根节点为空串
pub fn label_for(path: &Path) -> String {
    match path.last() {
        Some(Selector::Field(name)) => name.clone(),
        Some(Selector::Index(i)) => row_label(*i),
        None => String::new(),
    }
}

/// 查询词统一处理：去掉首尾空白并转小写
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// 节点是否匹配查询
///
/// 标量看自身文本；组合节点看自身标签或任一后代。空查询匹配一切。
/// `label` 为 None 时按 path 的末级选择器生成标签。
pub fn matches(node: &Node, path: &Path, label: Option<&str>, query: &str) -> bool {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return true;
    }
    let label = match label {
        Some(label) => label.to_string(),
        None => label_for(path),
    };
    matches_needle(node, &label, &needle)
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn matches_needle(node: &Node, label: &str, needle: &str) -> bool {
    match node {
        Node::Mapping(map) => {
            contains(label, needle) || map.iter().any(|(k, v)| matches_needle(v, k, needle))
        }
        Node::Sequence(items) => {
            contains(label, needle)
                || items
                    .iter()
                    .enumerate()
                    .any(|(i, v)| matches_needle(v, &row_label(i), needle))
        }
        scalar => scalar
            .scalar_text()
            .is_some_and(|text| contains(&text, needle)),
    }
}

/// 过滤时应保持可见的全部路径（单次后序遍历）
pub fn visible_paths(root: &Node, query: &str) -> HashSet<Path> {
    let needle = normalize_query(query);
    let mut out = HashSet::new();
    let mut path = Path::root();
    mark_visible(root, "", &needle, &mut path, &mut out);
    out
}

fn mark_visible(node: &Node, label: &str, needle: &str, path: &mut Path, out: &mut HashSet<Path>) -> bool {
    let hit = match node {
        Node::Mapping(map) => {
            let mut any = false;
            for (k, v) in map.iter() {
                path.push(k.as_str());
                any |= mark_visible(v, k, needle, path, out);
                path.pop();
            }
            any || contains(label, needle)
        }
        Node::Sequence(items) => {
            let mut any = false;
            for (i, v) in items.iter().enumerate() {
                path.push(i);
                any |= mark_visible(v, &row_label(i), needle, path, out);
                path.pop();
            }
            any || contains(label, needle)
        }
        scalar => scalar
            .scalar_text()
            .is_some_and(|text| contains(&text, needle)),
    };
    if hit {
        out.insert(path.clone());
    }
    hit
}

/// 单条搜索命中
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub path: Path,
    pub label: String,
    pub kind: NodeKind,
    pub preview: String,
}

/// 列出直接命中的节点，规则与 [`matches`] 一致：
/// 标量只看自身文本，组合节点只看自身标签
pub fn search(root: &Node, query: &str) -> Vec<SearchHit> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    let mut path = Path::root();
    walk_hits(root, &needle, &mut path, &mut hits);
    hits
}

fn walk_hits(node: &Node, needle: &str, path: &mut Path, hits: &mut Vec<SearchHit>) {
    let label = label_for(path);
    let direct = if node.is_composite() {
        contains(&label, needle)
    } else {
        node.scalar_text().is_some_and(|text| contains(&text, needle))
    };
    if direct {
        hits.push(SearchHit {
            path: path.clone(),
            label,
            kind: node.kind(),
            preview: node.preview(),
        });
    }
    match node {
        Node::Mapping(map) => {
            for (k, v) in map.iter() {
                path.push(k.as_str());
                walk_hits(v, needle, path, hits);
                path.pop();
            }
        }
        Node::Sequence(items) => {
            for (i, v) in items.iter().enumerate() {
                path.push(i);
                walk_hits(v, needle, path, hits);
                path.pop();
            }
        }
        _ => {}
    }
}
