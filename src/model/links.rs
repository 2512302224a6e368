//! 链接规范化：保存前把被识别为“链接”的叶子值改写为绝对 URL

use std::rc::Rc;

use crate::model::node::Node;
use crate::model::path::{Path, Selector};

/// 叶子字段的分类，由宿主按字段名启发式决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Link,
    Image,
    Icon,
    Plain,
}

/// 分类扩展点：宿主实现，引擎本身不关心字段命名
pub trait LinkClassifier {
    fn classify(&self, path: &Path) -> LinkKind;
}

impl<F> LinkClassifier for F
where
    F: Fn(&Path) -> LinkKind,
{
    fn classify(&self, path: &Path) -> LinkKind {
        self(path)
    }
}

/// 按字段名分类：`...url` / `...link` / `...href` 为链接，图片/上传/图标字段除外
#[derive(Debug, Clone)]
pub struct FieldNameClassifier {
    link_suffixes: Vec<String>,
    asset_markers: Vec<String>,
    icon_markers: Vec<String>,
}

pub const DEFAULT_LINK_SUFFIXES: &[&str] = &["url", "link", "href"];
pub const DEFAULT_ICON_MARKERS: &[&str] = &["icon"];
pub const DEFAULT_ASSET_MARKERS: &[&str] = &[
    "image", "img", "upload", "logo", "avatar", "photo", "cover", "thumbnail", "banner", "poster",
];

impl Default for FieldNameClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_SUFFIXES, DEFAULT_ASSET_MARKERS, DEFAULT_ICON_MARKERS)
    }
}

impl FieldNameClassifier {
    pub fn new<S, A, I>(link_suffixes: S, asset_markers: A, icon_markers: I) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            link_suffixes: lowered(link_suffixes),
            asset_markers: lowered(asset_markers),
            icon_markers: lowered(icon_markers),
        }
    }

    /// 跳过数组下标，取最近的字段名
    fn field_name(path: &Path) -> Option<String> {
        path.iter().rev().find_map(|s| match s {
            Selector::Field(name) => Some(name.to_lowercase()),
            Selector::Index(_) => None,
        })
    }
}

impl LinkClassifier for FieldNameClassifier {
    fn classify(&self, path: &Path) -> LinkKind {
        let Some(name) = Self::field_name(path) else {
            return LinkKind::Plain;
        };
        if self.icon_markers.iter().any(|m| name.contains(m.as_str())) {
            LinkKind::Icon
        } else if self.asset_markers.iter().any(|m| name.contains(m.as_str())) {
            LinkKind::Image
        } else if self.link_suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            LinkKind::Link
        } else {
            LinkKind::Plain
        }
    }
}

fn lowered<T>(items: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    items.into_iter().map(|s| s.as_ref().to_lowercase()).collect()
}

/// `scheme://` 形式的绝对地址
fn has_scheme(value: &str) -> bool {
    let Some(pos) = value.find("://") else {
        return false;
    };
    let scheme = &value[..pos];
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// 单个链接值的规范化规则
pub fn normalize_link(value: &str, base: &str) -> String {
    let value = value.trim();
    let base = base.trim_end_matches('/');
    if value.is_empty() {
        return String::new();
    }
    if has_scheme(value) || has_prefix_ignore_case(value, "mailto:") || has_prefix_ignore_case(value, "tel:") {
        return value.to_string();
    }
    if value.starts_with("//") {
        return format!("https:{}", value);
    }
    if value.starts_with('/') {
        return format!("{}{}", base, value);
    }
    if value.starts_with('#') {
        return format!("{}/{}", base, value);
    }
    format!("https://{}", value.trim_start_matches('/'))
}

/// 规范化整棵文档中的链接叶子；未改动的子树保持共享
pub fn normalize<C>(doc: &Node, classify: &C, base: &str) -> Node
where
    C: LinkClassifier + ?Sized,
{
    normalize_counted(doc, classify, base).0
}

/// 同 [`normalize`]，并返回被改写的叶子数量
pub fn normalize_counted<C>(doc: &Node, classify: &C, base: &str) -> (Node, usize)
where
    C: LinkClassifier + ?Sized,
{
    let mut path = Path::root();
    let mut rewritten = 0;
    let next = rewrite(doc, classify, base, &mut path, &mut rewritten);
    (next.unwrap_or_else(|| doc.clone()), rewritten)
}

/// 返回 Some 表示该子树发生了变化
fn rewrite<C>(node: &Node, classify: &C, base: &str, path: &mut Path, rewritten: &mut usize) -> Option<Node>
where
    C: LinkClassifier + ?Sized,
{
    match node {
        Node::Mapping(map) => {
            let mut changed = Vec::new();
            for (k, child) in map.iter() {
                path.push(k.as_str());
                if let Some(next) = rewrite(child, classify, base, path, rewritten) {
                    changed.push((k.clone(), next));
                }
                path.pop();
            }
            if changed.is_empty() {
                return None;
            }
            let mut next = (**map).clone();
            for (k, v) in changed {
                next.insert(k, v);
            }
            Some(Node::Mapping(Rc::new(next)))
        }
        Node::Sequence(items) => {
            let mut next: Option<Vec<Node>> = None;
            for (i, child) in items.iter().enumerate() {
                path.push(i);
                if let Some(updated) = rewrite(child, classify, base, path, rewritten) {
                    next.get_or_insert_with(|| (**items).clone())[i] = updated;
                }
                path.pop();
            }
            next.map(|items| Node::Sequence(Rc::new(items)))
        }
        Node::String(value) if classify.classify(path) == LinkKind::Link => {
            let normalized = normalize_link(value, base);
            if normalized == *value {
                None
            } else {
                *rewritten += 1;
                Some(Node::String(normalized))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://audit.tv";

    #[test]
    fn test_normalize_link_rules() {
        assert_eq!(normalize_link("#haqqimizda", BASE), "https://audit.tv/#haqqimizda");
        assert_eq!(normalize_link("/blog", BASE), "https://audit.tv/blog");
        assert_eq!(normalize_link("mailto:info@audit.tv", BASE), "mailto:info@audit.tv");
        assert_eq!(normalize_link("tel:+994501234567", BASE), "tel:+994501234567");
        assert_eq!(normalize_link("https://x.az/a", BASE), "https://x.az/a");
        assert_eq!(normalize_link("ftp://files.az", BASE), "ftp://files.az");
        assert_eq!(normalize_link("//cdn.audit.tv/a.js", BASE), "https://cdn.audit.tv/a.js");
        assert_eq!(normalize_link("instagram.com/audit", BASE), "https://instagram.com/audit");
        assert_eq!(normalize_link("", BASE), "");
        assert_eq!(normalize_link("/blog", "https://audit.tv/"), "https://audit.tv/blog");
    }

    #[test]
    fn test_normalize_link_is_idempotent() {
        for raw in ["#x", "/a/b", "//h/p", "host.az", "mailto:a@b", "HTTPS://A.B", ""] {
            let once = normalize_link(raw, BASE);
            assert_eq!(normalize_link(&once, BASE), once, "{}", raw);
        }
    }

    #[test]
    fn test_field_name_classifier() {
        let c = FieldNameClassifier::default();
        let p = |t: &str| Path::parse(t).unwrap();
        assert_eq!(c.classify(&p("$.home.hero.ctaUrl")), LinkKind::Link);
        assert_eq!(c.classify(&p("$.footer.links[0].link")), LinkKind::Link);
        assert_eq!(c.classify(&p("$.nav[2].href")), LinkKind::Link);
        assert_eq!(c.classify(&p("$.home.imageUrl")), LinkKind::Image);
        assert_eq!(c.classify(&p("$.home.uploadUrl")), LinkKind::Image);
        assert_eq!(c.classify(&p("$.social[0].iconUrl")), LinkKind::Icon);
        assert_eq!(c.classify(&p("$.home.title")), LinkKind::Plain);
        assert_eq!(c.classify(&p("$.gallery[0]")), LinkKind::Plain);
        assert_eq!(c.classify(&Path::root()), LinkKind::Plain);
    }

    #[test]
    fn test_icon_markers_are_configurable() {
        let p = |t: &str| Path::parse(t).unwrap();
        let c = FieldNameClassifier::new(DEFAULT_LINK_SUFFIXES, DEFAULT_ASSET_MARKERS, ["glyph"]);
        assert_eq!(c.classify(&p("$.social[0].glyphUrl")), LinkKind::Icon);
        assert_eq!(c.classify(&p("$.social[0].iconUrl")), LinkKind::Link);

        let none: [&str; 0] = [];
        let c = FieldNameClassifier::new(["url"], none, none);
        assert_eq!(c.classify(&p("$.home.imageUrl")), LinkKind::Link);
    }

    #[test]
    fn test_normalize_document() {
        let doc = Node::from(json!({
            "nav": [{"label": "Haqqımızda", "url": "#haqqimizda"}, {"label": "Blog", "url": "/blog"}],
            "contact": {"emailLink": "mailto:info@audit.tv", "phone": "/not-a-link"},
            "hero": {"imageUrl": "/uploads/a.png", "count": 3, "ctaLink": 7}
        }));
        let classifier = FieldNameClassifier::default();
        let (next, rewritten) = normalize_counted(&doc, &classifier, BASE);

        assert_eq!(rewritten, 2);
        assert_eq!(
            next.to_value(),
            json!({
                "nav": [
                    {"label": "Haqqımızda", "url": "https://audit.tv/#haqqimizda"},
                    {"label": "Blog", "url": "https://audit.tv/blog"}
                ],
                "contact": {"emailLink": "mailto:info@audit.tv", "phone": "/not-a-link"},
                "hero": {"imageUrl": "/uploads/a.png", "count": 3, "ctaLink": 7}
            })
        );

        // 未改动的子树保持共享
        let (Node::Mapping(before), Node::Mapping(after)) = (&doc, &next) else {
            panic!("根节点应为对象");
        };
        match (before.get("hero"), after.get("hero")) {
            (Some(Node::Mapping(a)), Some(Node::Mapping(b))) => assert!(Rc::ptr_eq(a, b)),
            _ => panic!("hero 应为对象"),
        }
    }

    #[test]
    fn test_normalize_document_is_idempotent() {
        let doc = Node::from(json!({"a": {"url": "x.az"}, "b": [{"link": "#top"}]}));
        let classify = |path: &Path| match path.last() {
            Some(Selector::Field(name)) if name == "url" || name == "link" => LinkKind::Link,
            _ => LinkKind::Plain,
        };
        let once = normalize(&doc, &classify, BASE);
        let twice = normalize(&once, &classify, BASE);
        assert_eq!(once, twice);
        assert_eq!(once.to_value(), json!({"a": {"url": "https://x.az"}, "b": [{"link": "https://audit.tv/#top"}]}));
    }
}
