//! 路径（Path）：由选择器组成的值类型地址，可直接作为 HashMap 键
//!
//! 字段名 `"0"` 与数组下标 `0` 是不同的选择器，不会发生碰撞。
//! 文本形式沿用 JSONPath：`$.home['key with spaces'][0]`。

use std::fmt;
use std::str::FromStr;

use crate::model::data_core::EditorError;

/// 单个选择器：Mapping 字段名或 Sequence 下标
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Selector {
    Field(String),
    Index(usize),
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Field(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Field(name)
    }
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Selector::Index(index)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(i) => write!(f, "[{}]", i),
            // 字段含特殊字符时使用 bracket-notation
            Selector::Field(k) if !k.is_empty() && k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') => {
                write!(f, ".{}", k)
            }
            Selector::Field(k) => {
                write!(f, "['{}']", k.replace('\\', "\\\\").replace('\'', "\\'"))
            }
        }
    }
}

/// 空路径表示根节点
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<Selector>);

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selector> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&Selector> {
        self.0.last()
    }

    /// 追加一个选择器，返回新路径
    pub fn child(&self, selector: impl Into<Selector>) -> Self {
        let mut next = self.0.clone();
        next.push(selector.into());
        Path(next)
    }

    pub fn push(&mut self, selector: impl Into<Selector>) {
        self.0.push(selector.into());
    }

    pub fn pop(&mut self) -> Option<Selector> {
        self.0.pop()
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// 从 JSONPath 文本解析（等价于 `str::parse`）
    pub fn parse(text: &str) -> Result<Self, EditorError> {
        text.parse()
    }
}

impl From<Vec<Selector>> for Path {
    fn from(selectors: Vec<Selector>) -> Self {
        Path(selectors)
    }
}

impl FromIterator<Selector> for Path {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for selector in &self.0 {
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = EditorError;

    /// 支持 `$.a.b`、`$['a']`、`$["a"]`、`$[0]`，`$` 前缀可省略（`home.hero[0]`）
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let rest = text.strip_prefix('$').unwrap_or(text);
        let chars: Vec<char> = rest.chars().collect();
        let mut selectors = Vec::new();
        let mut i = 0;
        let fail = |reason: &str| EditorError::JsonPath(format!("{}: {}", reason, text));

        // 无前缀时首段按字段名处理
        if !text.starts_with('$') && !chars.is_empty() && chars[0] != '[' && chars[0] != '.' {
            let start = i;
            while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                i += 1;
            }
            selectors.push(Selector::Field(chars[start..i].iter().collect()));
        }

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    i += 1;
                    let start = i;
                    while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                        i += 1;
                    }
                    if start == i {
                        return Err(fail("空字段名"));
                    }
                    selectors.push(Selector::Field(chars[start..i].iter().collect()));
                }
                '[' => {
                    i += 1;
                    match chars.get(i) {
                        Some(&quote) if quote == '\'' || quote == '"' => {
                            i += 1;
                            let mut name = String::new();
                            loop {
                                match chars.get(i) {
                                    None => return Err(fail("引号未闭合")),
                                    Some('\\') => {
                                        let escaped = chars.get(i + 1).ok_or_else(|| fail("转义不完整"))?;
                                        name.push(*escaped);
                                        i += 2;
                                    }
                                    Some(&c) if c == quote => {
                                        i += 1;
                                        break;
                                    }
                                    Some(&c) => {
                                        name.push(c);
                                        i += 1;
                                    }
                                }
                            }
                            if chars.get(i) != Some(&']') {
                                return Err(fail("缺少 ]"));
                            }
                            i += 1;
                            selectors.push(Selector::Field(name));
                        }
                        _ => {
                            let start = i;
                            while i < chars.len() && chars[i] != ']' {
                                i += 1;
                            }
                            if i >= chars.len() {
                                return Err(fail("缺少 ]"));
                            }
                            let digits: String = chars[start..i].iter().collect();
                            let index = digits
                                .trim()
                                .parse::<usize>()
                                .map_err(|_| fail("下标必须是非负整数"))?;
                            i += 1;
                            selectors.push(Selector::Index(index));
                        }
                    }
                }
                _ => return Err(fail("无法识别的路径片段")),
            }
        }

        Ok(Path(selectors))
    }
}
