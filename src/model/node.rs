//! 内容树节点：无模式（schema-less）的 JSON 式数据单元
//!
//! 组合节点（Mapping / Sequence）通过 `Rc` 共享子树，编辑时只重建祖先链，
//! 其余兄弟子树按引用复用（写时复制）。

use std::rc::Rc;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// 有序字段表：保留插入顺序以便稳定展示
pub type Mapping = IndexMap<String, Node>;

/// 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Mapping,
    Sequence,
    String,
    Number,
    Bool,
    Null,
}

impl NodeKind {
    pub fn is_composite(self) -> bool {
        matches!(self, NodeKind::Mapping | NodeKind::Sequence)
    }
}

/// 内容树节点
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Mapping(Rc<Mapping>),
    Sequence(Rc<Vec<Node>>),
}

impl Default for Node {
    fn default() -> Self {
        Node::Mapping(Rc::new(Mapping::new()))
    }
}

impl Node {
    /// 由字段对构建 Mapping
    pub fn mapping<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Mapping(Rc::new(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// 由元素列表构建 Sequence
    pub fn sequence<I: IntoIterator<Item = Node>>(items: I) -> Self {
        Node::Sequence(Rc::new(items.into_iter().collect()))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::String(_) => NodeKind::String,
            Node::Number(_) => NodeKind::Number,
            Node::Bool(_) => NodeKind::Bool,
            Node::Null => NodeKind::Null,
        }
    }

    pub fn is_composite(&self) -> bool {
        self.kind().is_composite()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(&**m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// 子元素数量（对象字段数 / 数组长度），标量为 0
    pub fn child_count(&self) -> usize {
        match self {
            Node::Mapping(m) => m.len(),
            Node::Sequence(items) => items.len(),
            _ => 0,
        }
    }

    /// 标量的文本形式（用于搜索匹配）；null 视为空串，组合节点返回 None
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Node::String(s) => Some(s.clone()),
            Node::Number(n) => Some(n.to_string()),
            Node::Bool(b) => Some(b.to_string()),
            Node::Null => Some(String::new()),
            Node::Mapping(_) | Node::Sequence(_) => None,
        }
    }

    /// 轻量预览（字符串截断、数字/布尔/空的简短描述）
    pub fn preview(&self) -> String {
        match self {
            Node::String(s) => {
                let s = s.trim();
                if s.chars().count() > 32 {
                    let truncated: String = s.chars().take(32).collect();
                    format!("\"{}...\"", truncated)
                } else {
                    format!("\"{}\"", s)
                }
            }
            Node::Number(n) => n.to_string(),
            Node::Bool(b) => b.to_string(),
            Node::Null => "null".to_string(),
            Node::Mapping(m) => format!("{{..}} ({} keys)", m.len()),
            Node::Sequence(a) => format!("[..] ({} items)", a.len()),
        }
    }

    /// 转回 serde_json::Value（深拷贝）
    pub fn to_value(&self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::Mapping(m) => Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_value())).collect(),
            ),
            Node::Sequence(items) => Value::Array(items.iter().map(Node::to_value).collect()),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Object(map) => Node::Mapping(Rc::new(
                map.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
            )),
            Value::Array(items) => {
                Node::Sequence(Rc::new(items.into_iter().map(Node::from).collect()))
            }
        }
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        Node::from(value.clone())
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Number(Number::from(n))
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Mapping(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}
