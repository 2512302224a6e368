//! 模板合成：按已有元素的形状生成“空白”新行

use std::rc::Rc;

use serde_json::Number;

use crate::model::node::Node;

/// 生成与 reference 结构一致、所有标量归零的节点
///
/// - 标量：字符串 `""`、数字 `0`、布尔 `false`，null 保持 null
/// - Mapping：字段集合不变，逐字段递归
/// - Sequence：以第 0 个元素为形状；空数组没有形状信息，退化为空字符串
pub fn synthesize(reference: &Node) -> Node {
    match reference {
        Node::String(_) => Node::String(String::new()),
        Node::Number(_) => Node::Number(Number::from(0)),
        Node::Bool(_) => Node::Bool(false),
        Node::Null => Node::Null,
        Node::Mapping(map) => Node::Mapping(Rc::new(
            map.iter().map(|(k, v)| (k.clone(), synthesize(v))).collect(),
        )),
        Node::Sequence(items) => match items.first() {
            Some(first) => synthesize(first),
            None => Node::String(String::new()),
        },
    }
}

/// 为数组生成新行模板；数组为空或不是数组时返回 None，由调用方提供显式模板
pub fn synthesize_row(sequence: &Node) -> Option<Node> {
    sequence.as_sequence()?.first().map(synthesize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_zero_values() {
        assert_eq!(synthesize(&Node::from("hello")), Node::from(""));
        assert_eq!(synthesize(&Node::from(42i64)), Node::from(0i64));
        assert_eq!(synthesize(&Node::from(&json!(2.5))), Node::from(0i64));
        assert_eq!(synthesize(&Node::Bool(true)), Node::Bool(false));
        assert_eq!(synthesize(&Node::Null), Node::Null);
    }

    #[test]
    fn test_mapping_keeps_field_set() {
        let row = Node::from(json!({"a": "x", "b": {"c": 3, "d": [true]}}));
        let template = synthesize(&row);
        assert_eq!(template.to_value(), json!({"a": "", "b": {"c": 0, "d": false}}));
    }

    #[test]
    fn test_sequence_uses_first_element_shape() {
        let items = Node::from(json!([{"text": "A", "url": "/a"}, {"other": 1}]));
        assert_eq!(synthesize(&items).to_value(), json!({"text": "", "url": ""}));
    }

    #[test]
    fn test_empty_sequence_degrades_to_string() {
        assert_eq!(synthesize(&Node::sequence(Vec::new())), Node::from(""));
        assert!(synthesize_row(&Node::sequence(Vec::new())).is_none());
        assert!(synthesize_row(&Node::from("x")).is_none());
    }

    #[test]
    fn test_synthesize_row_from_existing_rows() {
        let items = Node::from(json!([{"question": "Q1", "answer": "A1"}]));
        let row = synthesize_row(&items).unwrap();
        assert_eq!(row.to_value(), json!({"question": "", "answer": ""}));
    }
}
