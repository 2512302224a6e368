//! 数据模型层：内容树、路径引擎与编辑会话

pub mod collapse;
pub mod data_core;
pub mod diff;
pub mod engine;
pub mod links;
pub mod node;
pub mod path;
pub mod query;
pub mod shadow_tree;
pub mod template;

#[cfg(test)]
mod properties;
