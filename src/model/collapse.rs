//! 折叠/展开索引：收集所有组合节点路径，维护 Path -> bool 的展开表
//!
//! 纯展示状态，不进入持久化文档。

use std::collections::HashMap;

use crate::model::node::Node;
use crate::model::path::{Path, Selector};

/// 先序遍历，收集所有 Mapping / Sequence 节点（含根）的路径
pub fn collect_composite_paths(root: &Node) -> Vec<Path> {
    fn walk(node: &Node, path: &mut Path, out: &mut Vec<Path>) {
        match node {
            Node::Mapping(map) => {
                out.push(path.clone());
                for (k, child) in map.iter() {
                    path.push(k.as_str());
                    walk(child, path, out);
                    path.pop();
                }
            }
            Node::Sequence(items) => {
                out.push(path.clone());
                for (i, child) in items.iter().enumerate() {
                    path.push(i);
                    walk(child, path, out);
                    path.pop();
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    walk(root, &mut Path::root(), &mut out);
    out
}

/// 展开状态表；未记录的路径视为折叠
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashMap<Path, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded.get(path).copied().unwrap_or(false)
    }

    pub fn set(&mut self, path: Path, expanded: bool) {
        self.expanded.insert(path, expanded);
    }

    /// 切换节点的展开状态，返回切换后的值
    pub fn toggle(&mut self, path: &Path) -> bool {
        let next = !self.is_expanded(path);
        self.expanded.insert(path.clone(), next);
        next
    }

    pub fn expand_all(&mut self, root: &Node) {
        for path in collect_composite_paths(root) {
            self.expanded.insert(path, true);
        }
    }

    pub fn collapse_all(&mut self, root: &Node) {
        for path in collect_composite_paths(root) {
            self.expanded.insert(path, false);
        }
    }

    /// 编辑后丢弃已不存在的路径
    pub fn retain_existing(&mut self, root: &Node) {
        let alive: std::collections::HashSet<Path> =
            collect_composite_paths(root).into_iter().collect();
        self.expanded.retain(|path, _| alive.contains(path));
    }

    /// 删除数组元素后同步下标：被删行的状态丢弃，后续行前移一位
    pub fn shift_after_removal(&mut self, array_path: &Path, removed: usize) {
        let depth = array_path.len();
        let entries: Vec<(Path, bool)> = self.expanded.drain().collect();
        for (path, expanded) in entries {
            if !path.starts_with(array_path) || path.len() <= depth {
                self.expanded.insert(path, expanded);
                continue;
            }
            let index = match path.selectors()[depth] {
                Selector::Index(i) => Some(i),
                Selector::Field(_) => None,
            };
            match index {
                Some(i) if i == removed => {}
                Some(i) if i > removed => {
                    let mut selectors = path.selectors().to_vec();
                    selectors[depth] = Selector::Index(i - 1);
                    self.expanded.insert(Path::from(selectors), expanded);
                }
                _ => {
                    self.expanded.insert(path, expanded);
                }
            }
        }
    }
}
