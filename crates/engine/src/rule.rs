//! 解析后的规则：选择器、声明以及外层包装

use std::cmp::Ordering;

use crosswind_core::Declaration;
use serde::Serialize;

use crate::theme::MediaOrder;
use crate::utility::{Category, Origin};

/// at-rule 包装，如 `@media (min-width: 640px)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Condition {
    pub at_rule: String,
    #[serde(skip)]
    pub order: MediaOrder,
}

impl Condition {
    pub fn new(at_rule: impl Into<String>, order: MediaOrder) -> Self {
        Self {
            at_rule: at_rule.into(),
            order,
        }
    }

    /// 不参与断点排序的条件
    pub fn unordered(at_rule: impl Into<String>) -> Self {
        Self::new(at_rule, MediaOrder::UNCONDITIONAL)
    }
}

/// 规则的输出位置，按字段依次比较
///
/// 先比较断点（无包装在前，其后按断点升序），再比较变体深度，
/// 然后是来源层，最后是工具类类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    pub media: MediaOrder,
    pub variant_depth: usize,
    pub origin: Origin,
    pub category: Category,
}

/// 单条生成的规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRule {
    /// 来源 token（`sm:container`）
    pub token: String,
    pub selector: String,
    pub declarations: Vec<Declaration>,
    /// 最外层在前
    pub conditions: Vec<Condition>,
    pub category: Category,
    pub origin: Origin,
    #[serde(skip)]
    pub sort_key: SortKey,
}

impl ResolvedRule {
    /// 用于去重的标识
    pub fn identity(&self) -> (String, Vec<String>) {
        (
            self.selector.clone(),
            self.conditions.iter().map(|c| c.at_rule.clone()).collect(),
        )
    }

    /// 完整的输出顺序，选择器与条件文本作为决胜项
    pub fn output_cmp(&self, other: &Self) -> Ordering {
        self.sort_key
            .cmp(&other.sort_key)
            .then_with(|| self.selector.cmp(&other.selector))
            .then_with(|| {
                self.conditions
                    .iter()
                    .map(|c| &c.at_rule)
                    .cmp(other.conditions.iter().map(|c| &c.at_rule))
            })
    }
}
