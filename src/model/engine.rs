//! 路径引擎：按 Path 读写内容树
//!
//! 所有写操作都返回新的文档，只重建从根到目标的祖先链，兄弟子树按 `Rc` 共享。

use std::rc::Rc;

use jsonpath_rust::JsonPath;

use crate::model::data_core::EditorError;
use crate::model::node::Node;
use crate::model::path::{Path, Selector};

/// 按路径读取节点；任一选择器无法满足时返回 None（不是错误）
pub fn resolve<'a>(doc: &'a Node, path: &Path) -> Option<&'a Node> {
    path.iter().try_fold(doc, |node, selector| match (node, selector) {
        (Node::Mapping(map), Selector::Field(name)) => map.get(name),
        (Node::Sequence(items), Selector::Index(i)) => items.get(*i),
        _ => None,
    })
}

/// 将 path 处的节点替换为 value，返回新文档
///
/// 末级选择器可以为已有 Mapping 新增字段，或在下标等于长度时向 Sequence 追加；
/// 中间路径不存在时报错，不会凭空构造结构。
pub fn assign(doc: &Node, path: &Path, value: Node) -> Result<Node, EditorError> {
    assign_at(doc, path, 0, value)
}

fn assign_at(node: &Node, path: &Path, depth: usize, value: Node) -> Result<Node, EditorError> {
    let selectors = path.selectors();
    let Some(selector) = selectors.get(depth) else {
        return Ok(value);
    };
    let is_last = depth + 1 == selectors.len();

    match (node, selector) {
        (Node::Mapping(map), Selector::Field(name)) => {
            let child = match map.get(name) {
                Some(child) => assign_at(child, path, depth + 1, value)?,
                None if is_last => value,
                None => return Err(address_error(path, depth, "字段不存在")),
            };
            let mut next = (**map).clone();
            next.insert(name.clone(), child);
            Ok(Node::Mapping(Rc::new(next)))
        }
        (Node::Sequence(items), Selector::Index(i)) => {
            let i = *i;
            let mut next = (**items).clone();
            if i < items.len() {
                next[i] = assign_at(&items[i], path, depth + 1, value)?;
            } else if i == items.len() && is_last {
                next.push(value);
            } else {
                return Err(address_error(path, depth, "下标越界"));
            }
            Ok(Node::Sequence(Rc::new(next)))
        }
        (Node::Mapping(_), Selector::Index(_)) => Err(address_error(path, depth, "对象不能按下标访问")),
        (Node::Sequence(_), Selector::Field(_)) => Err(address_error(path, depth, "数组不能按字段名访问")),
        _ => Err(address_error(path, depth, "标量节点没有子节点")),
    }
}

fn address_error(path: &Path, depth: usize, reason: &str) -> EditorError {
    let failed: Path = path.selectors()[..=depth].iter().cloned().collect();
    EditorError::Address {
        path: failed.to_string(),
        reason: reason.to_string(),
    }
}

fn sequence_at<'a>(doc: &'a Node, array_path: &Path) -> Result<&'a [Node], EditorError> {
    match resolve(doc, array_path) {
        Some(Node::Sequence(items)) => Ok(items.as_slice()),
        Some(other) => Err(EditorError::Address {
            path: array_path.to_string(),
            reason: format!("不是数组: {:?}", other.kind()),
        }),
        None => Err(EditorError::Address {
            path: array_path.to_string(),
            reason: "路径不存在".to_string(),
        }),
    }
}

/// 删除数组元素，后续元素下标依次前移
pub fn remove_at(doc: &Node, array_path: &Path, index: usize) -> Result<Node, EditorError> {
    let items = sequence_at(doc, array_path)?;
    if index >= items.len() {
        return Err(EditorError::Address {
            path: array_path.child(index).to_string(),
            reason: "下标越界".to_string(),
        });
    }
    let next: Vec<Node> = items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect();
    assign(doc, array_path, Node::Sequence(Rc::new(next)))
}

/// 在数组末尾追加模板元素
pub fn insert_template(doc: &Node, array_path: &Path, template: Node) -> Result<Node, EditorError> {
    let items = sequence_at(doc, array_path)?;
    let mut next = items.to_vec();
    next.push(template);
    assign(doc, array_path, Node::Sequence(Rc::new(next)))
}

/// 执行 JSONPath 查询，返回所有命中节点的 Path
pub fn select(doc: &Node, json_path: &str) -> Result<Vec<Path>, EditorError> {
    let dom = doc.to_value();
    let paths: Vec<String> = dom
        .query_only_path(json_path)
        .map_err(|e| EditorError::JsonPath(e.to_string()))?;
    paths.iter().map(|p| Path::parse(p)).collect()
}
