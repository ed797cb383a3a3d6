//! 配置管理
//!
//! 配置来源（后者覆盖前者）：config.toml → config.{APP_ENV}.toml → AIGRADER__* 环境变量 → 常用环境变量。

mod r#impl;
mod structs;

pub use structs::*;
