//! 影子树（Shadow Tree）：仅存结构与路径，不复制大值，供宿主逐行渲染

use std::collections::HashSet;

use crate::model::collapse::ExpansionState;
use crate::model::node::{Node, NodeKind};
use crate::model::path::Path;
use crate::model::query::{label_for, normalize_query, visible_paths};

#[derive(Debug, Clone)]
pub struct JsonTreeNode {
    /// 节点标签：字段名或 "Row N"，根节点为 "$"
    pub name: String,
    /// 精确寻址路径
    pub path: Path,
    /// 节点类型
    pub kind: NodeKind,
    /// 子元素数量（对象字段数 / 数组长度）
    pub children: u32,
    /// 轻量预览
    pub preview: String,
    /// 节点深度（用于UI缩进显示）
    pub depth: u32,
    /// 是否展开
    pub expanded: bool,
    /// 是否可见（展开状态与搜索过滤共同决定）
    pub visible: bool,
}

/// 从根节点构建全树影子索引（先序）
pub fn build_shadow_tree(root: &Node) -> Vec<JsonTreeNode> {
    fn walk(out: &mut Vec<JsonTreeNode>, node: &Node, path: &mut Path) {
        let name = if path.is_root() { "$".to_string() } else { label_for(path) };
        out.push(JsonTreeNode {
            name,
            path: path.clone(),
            kind: node.kind(),
            children: node.child_count() as u32,
            preview: node.preview(),
            depth: path.len() as u32,
            expanded: false,
            visible: true,
        });
        match node {
            Node::Mapping(map) => {
                for (k, child) in map.iter() {
                    path.push(k.as_str());
                    walk(out, child, path);
                    path.pop();
                }
            }
            Node::Sequence(items) => {
                for (idx, child) in items.iter().enumerate() {
                    path.push(idx);
                    walk(out, child, path);
                    path.pop();
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::with_capacity(1024);
    walk(&mut out, root, &mut Path::root());
    out
}

/// 根据展开状态与搜索词更新每行的 expanded / visible
///
/// 无搜索词时：根节点总是可见，其余节点要求所有祖先均已展开；
/// 有搜索词时：只显示匹配节点及其祖先，忽略折叠状态。
pub fn apply_view(rows: &mut [JsonTreeNode], root: &Node, expansion: &ExpansionState, query: &str) {
    let filter: Option<HashSet<Path>> = if normalize_query(query).is_empty() {
        None
    } else {
        Some(visible_paths(root, query))
    };

    for row in rows.iter_mut() {
        row.expanded = expansion.is_expanded(&row.path);
        row.visible = match &filter {
            Some(visible) => visible.contains(&row.path),
            None => {
                let mut ancestor = row.path.parent();
                let mut shown = true;
                while let Some(p) = ancestor {
                    if !expansion.is_expanded(&p) {
                        shown = false;
                        break;
                    }
                    ancestor = p.parent();
                }
                shown
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_object_shadow_tree() {
        let json = json!({
            "name": "测试",
            "age": 30
        });

        let tree = build_shadow_tree(&Node::from(json));

        // 应该有3个节点：根、name、age
        assert_eq!(tree.len(), 3);
        assert_eq!(tree[0].name, "$");
        assert_eq!(tree[0].path.to_string(), "$");
        assert_eq!(tree[0].kind, NodeKind::Mapping);
        assert_eq!(tree[0].children, 2);
        assert_eq!(tree[1].path.to_string(), "$.name");
        assert_eq!(tree[2].preview, "30");
    }

    #[test]
    fn test_array_rows_are_labelled() {
        let json = json!({
            "items": [
                "第一项",
                {"id": 1},
                [1, 2, 3]
            ]
        });

        let tree = build_shadow_tree(&Node::from(json));
        let paths: Vec<String> = tree.iter().map(|n| n.path.to_string()).collect();
        assert!(paths.contains(&"$.items[1].id".to_string()));
        assert!(paths.contains(&"$.items[2][2]".to_string()));

        let row = tree.iter().find(|n| n.path.to_string() == "$.items[0]").unwrap();
        assert_eq!(row.name, "Row 1");
        assert_eq!(row.depth, 2);
    }

    #[test]
    fn test_view_follows_expansion() {
        let root = Node::from(json!({"user": {"profile": {"name": "张三"}}, "flag": true}));
        let mut rows = build_shadow_tree(&root);
        let mut expansion = ExpansionState::new();
        expansion.set(Path::root(), true);

        apply_view(&mut rows, &root, &expansion, "");
        let visible: Vec<String> = rows.iter().filter(|r| r.visible).map(|r| r.path.to_string()).collect();
        assert_eq!(visible, vec!["$", "$.user", "$.flag"]);

        expansion.expand_all(&root);
        apply_view(&mut rows, &root, &expansion, "");
        assert!(rows.iter().all(|r| r.visible));
    }

    #[test]
    fn test_view_follows_search() {
        let root = Node::from(json!({"user": {"profile": {"name": "张三"}}, "flag": true}));
        let mut rows = build_shadow_tree(&root);
        apply_view(&mut rows, &root, &ExpansionState::new(), "张");

        let visible: Vec<String> = rows.iter().filter(|r| r.visible).map(|r| r.path.to_string()).collect();
        assert_eq!(visible, vec!["$", "$.user", "$.user.profile", "$.user.profile.name"]);
    }
}
