use serde::{Deserialize, Serialize};

/// 解析后的 utility class 表示
///
/// 只做结构拆分：修饰符、负值、重要性和主体。
/// 主体里 utility 名和值的边界要依赖 utility 注册表才能确定，
/// 所以这里通过 [`ParsedClass::splits`] 给出所有候选拆分，由解析器按最长前缀匹配。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedClass {
    /// 原始 token（用于生成选择器）
    pub raw: String,

    /// 修饰符（按书写顺序，如 `md:hover:p-4` → ["md", "hover"]）
    pub modifiers: Vec<String>,

    /// 是否为负值（如 -m-4）
    pub negative: bool,

    /// utility 名 + 可选值（如 "p-4"、"w-[2rem]"、"container"）
    pub body: String,

    /// 重要性标记（`!p-4` 或 `p-4!`）
    pub important: bool,
}

/// 主体的一种候选拆分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilitySplit<'a> {
    /// utility 名（如 "border-t"）
    pub name: &'a str,
    /// 值后缀（如 "2"、"[3px]"）
    pub value: Option<ParsedValue>,
}

/// 值类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParsedValue {
    /// 标准值（如 "4", "red-500", "lg"），需要到主题里查找
    Standard(String),

    /// 任意值（如 "[13px]", "[#ff0000]"），跳过主题查找
    Arbitrary(ArbitraryValue),
}

/// 任意值表示
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArbitraryValue {
    /// 原始值（包含方括号）
    pub raw: String,

    /// 解析后的内容（去除方括号，下划线转空格）
    pub content: String,
}

impl ParsedClass {
    /// 创建一个新的 ParsedClass（raw 与 body 相同）
    pub fn new(body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            raw: body.clone(),
            modifiers: Vec::new(),
            negative: false,
            body,
            important: false,
        }
    }

    /// 添加修饰符（追加到最内层，即紧挨主体的位置）
    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self.raw = self.rebuild_raw();
        self
    }

    /// 设置负值标记
    pub fn with_negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self.raw = self.rebuild_raw();
        self
    }

    /// 设置重要性
    pub fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self.raw = self.rebuild_raw();
        self
    }

    fn rebuild_raw(&self) -> String {
        let mut raw = String::new();
        for modifier in &self.modifiers {
            raw.push_str(modifier);
            raw.push(':');
        }
        if self.important {
            raw.push('!');
        }
        if self.negative {
            raw.push('-');
        }
        raw.push_str(&self.body);
        raw
    }

    /// 按最长前缀优先列出主体的所有拆分方式
    ///
    /// 第一项总是整个主体（无值）；之后依次在方括号外的每个 `-` 处拆分，
    /// 从最右边的 `-` 开始，因此 utility 名越长越靠前。
    ///
    /// ```
    /// use crosswind_parse::ParsedClass;
    ///
    /// let class = ParsedClass::new("border-t-2");
    /// let names: Vec<&str> = class.splits().iter().map(|s| s.name).collect();
    /// assert_eq!(names, vec!["border-t-2", "border-t", "border"]);
    /// ```
    pub fn splits(&self) -> Vec<UtilitySplit<'_>> {
        let mut splits = vec![UtilitySplit {
            name: &self.body,
            value: None,
        }];

        let mut depth = 0usize;
        let mut dashes = Vec::new();
        for (i, ch) in self.body.char_indices() {
            match ch {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '-' if depth == 0 && i > 0 => dashes.push(i),
                _ => {}
            }
        }

        for &i in dashes.iter().rev() {
            let name = &self.body[..i];
            let rest = &self.body[i + 1..];
            if rest.is_empty() || name.ends_with('-') {
                continue;
            }
            splits.push(UtilitySplit {
                name,
                value: Some(ParsedValue::from_suffix(rest)),
            });
        }

        splits
    }

    /// 任意属性语法：`[mask-type:luminance]` → ("mask-type", "luminance")
    pub fn arbitrary_property(&self) -> Option<(&str, String)> {
        let inner = self.body.strip_prefix('[')?.strip_suffix(']')?;
        let (property, value) = inner.split_once(':')?;
        let valid_property = !property.is_empty()
            && property
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '-');
        if !valid_property || value.is_empty() {
            return None;
        }
        Some((property, convert_underscores(value)))
    }
}

impl ParsedValue {
    /// 根据后缀文本判断值类型
    pub fn from_suffix(suffix: &str) -> Self {
        if suffix.len() >= 2 && suffix.starts_with('[') && suffix.ends_with(']') {
            ParsedValue::Arbitrary(ArbitraryValue::new(suffix.to_string()))
        } else {
            ParsedValue::Standard(suffix.to_string())
        }
    }

    /// 判断是否为任意值
    pub fn is_arbitrary(&self) -> bool {
        matches!(self, ParsedValue::Arbitrary(_))
    }
}

impl std::fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParsedValue::Standard(s) => write!(f, "{}", s),
            ParsedValue::Arbitrary(arb) => write!(f, "{}", arb.raw),
        }
    }
}

impl ArbitraryValue {
    /// 创建新的任意值
    ///
    /// 任意值中的 `_` 会转换为空格，`\_` 会保留为字面下划线。
    pub fn new(raw: String) -> Self {
        let stripped = raw
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(&raw);

        let content = convert_underscores(stripped);

        Self { raw, content }
    }
}

/// 将任意值中的下划线转换为空格
///
/// 规则：
/// - `_` → 空格
/// - `\_` → 字面下划线 `_`
fn convert_underscores(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' && chars.peek() == Some(&'_') {
            chars.next();
            result.push('_');
        } else if ch == '_' {
            result.push(' ');
        } else {
            result.push(ch);
        }
    }

    result
}
