//! VM桥接层：把宿主输入（命令行文本）转换为内容树操作，并格式化输出

use crate::model::collapse::ExpansionState;
use crate::model::node::Node;
use crate::model::query::SearchHit;
use crate::model::shadow_tree::{apply_view, build_shadow_tree};

// === 常量定义（消除魔法值） ===
pub const STATUS_LOADED: &str = "文件加载完成";
pub const STATUS_SAVED: &str = "保存成功";
pub const STATUS_NO_CHANGES: &str = "没有需要保存的改动";
pub const STATUS_STALE: &str = "保存结果已过期，已忽略";
pub const STATUS_NOT_FOUND: &str = "路径不存在";

/// 把输入文本解析为节点，自动识别类型
///
/// - "true"/"false" → Bool
/// - "null" → Null
/// - 合法数字 → Number
/// - 以 `{` 或 `[` 开头且能解析为 JSON → Mapping / Sequence
/// - 其余 → String（保留原文，不做 trim）
pub fn parse_input_value(input: &str) -> Node {
    let trimmed = input.trim();

    match trimmed {
        "true" => return Node::Bool(true),
        "false" => return Node::Bool(false),
        "null" => return Node::Null,
        _ => {}
    }

    if trimmed.parse::<f64>().is_ok() {
        if let Ok(node) = serde_json::from_str::<Node>(trimmed) {
            return node;
        }
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(node) = serde_json::from_str::<Node>(trimmed) {
            return node;
        }
    }

    Node::String(input.to_string())
}

/// 以缩进形式渲染影子树的可见行
pub fn render_tree(root: &Node, expansion: &ExpansionState, query: &str) -> String {
    let mut rows = build_shadow_tree(root);
    apply_view(&mut rows, root, expansion, query);

    let mut out = String::new();
    for row in rows.iter().filter(|r| r.visible) {
        let marker = if !row.kind.is_composite() {
            " "
        } else if row.expanded {
            "-"
        } else {
            "+"
        };
        out.push_str(&format!(
            "{}{} {}  {}\n",
            "  ".repeat(row.depth as usize),
            marker,
            row.name,
            row.preview
        ));
    }
    out
}

/// 渲染搜索结果列表
pub fn render_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("{}\t{:?}\t{}\n", hit.path, hit.kind, hit.preview))
        .collect()
}
