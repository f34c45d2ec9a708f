//! 类名抽取：字节 → 候选 token
//!
//! 抽取是词法层面的，宁多勿少：看起来像类名的都成为候选，
//! 解析器会丢掉无法匹配的部分。

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crosswind_core::{ConfigError, ScanWarning};
use indexmap::IndexMap;

/// 未配置时使用的词法抽取器名称
pub const DEFAULT_EXTRACTOR: &str = "default";
/// 只读取 `class` 类属性值的抽取器名称
pub const CLASS_ATTRIBUTE_EXTRACTOR: &str = "class-attributes";

/// 把解码后的文件文本切分为候选 token
pub trait Extractor: Send + Sync {
    fn extract(&self, text: &str) -> BTreeSet<String>;
}

/// 按引号、标记分隔符和空白切分；方括号内的片段
/// 保持完整
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl Extractor for DefaultExtractor {
    fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();
        lex(text, &mut tokens);
        tokens
    }
}

/// 只读取 `class="..."`、`className="..."`、`:class="..."` 的值
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassAttributeExtractor;

const CLASS_ATTRIBUTES: [&str; 3] = ["className", ":class", "class"];

impl Extractor for ClassAttributeExtractor {
    fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();
        for attr in CLASS_ATTRIBUTES {
            for (idx, _) in text.match_indices(attr) {
                if !is_attr_start(text, idx) {
                    continue;
                }
                if let Some(value) = attribute_value(&text[idx + attr.len()..]) {
                    lex(value, &mut tokens);
                }
            }
        }
        tokens
    }
}

/// 方括号外可出现在 token 中的字符
fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(ch, '-' | '_' | ':' | '/' | '.' | '%' | '!' | '#' | '[' | ']')
}

/// `[...]` 内可出现的字符
fn is_bracket_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '"' | '`' | '<' | '{' | '}')
}

/// 词法切分
fn lex(text: &str, out: &mut BTreeSet<String>) {
    let mut start: Option<usize> = None;
    let mut depth = 0usize;
    let mut broken = false;

    for (i, ch) in text.char_indices() {
        let keep = if depth > 0 {
            is_bracket_char(ch)
        } else {
            is_token_char(ch)
        };

        if !keep {
            if let Some(s) = start.take() {
                if depth == 0 && !broken {
                    push_candidate(&text[s..i], out);
                }
            }
            depth = 0;
            broken = false;
            continue;
        }

        if start.is_none() {
            start = Some(i);
        }
        match ch {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            ']' => broken = true,
            _ => {}
        }
    }

    if let Some(s) = start {
        if depth == 0 && !broken {
            push_candidate(&text[s..], out);
        }
    }
}

fn push_candidate(raw: &str, out: &mut BTreeSet<String>) {
    // 句末的点号不属于类名
    let token = raw.trim_end_matches('.');
    if token.is_empty()
        || !token.chars().any(|c| c.is_ascii_alphabetic())
        || token.ends_with(':')
        || token.ends_with('-')
        || token.starts_with(':')
        || token.starts_with('/')
    {
        return;
    }
    out.insert(token.to_string());
}

fn is_attr_start(text: &str, idx: usize) -> bool {
    text[..idx]
        .chars()
        .next_back()
        .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'))
}

/// `="a b"`、`='a b'`、`={"a b"}` → `a b`
fn attribute_value(rest: &str) -> Option<&str> {
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let mut chars = rest.char_indices();
    let (_, open) = chars.next()?;
    let close = match open {
        '"' | '\'' | '`' => open,
        '{' => '}',
        _ => return None,
    };
    let body = &rest[open.len_utf8()..];
    let end = body.find(close)?;
    Some(&body[..end])
}

/// 解码文件字节，二进制文件报告为警告
pub fn decode<'a>(path: &Path, bytes: &'a [u8]) -> Result<&'a str, ScanWarning> {
    std::str::from_utf8(bytes).map_err(|err| ScanWarning::decode(path, err.to_string()))
}

/// 使用默认抽取器抽取
pub fn extract(path: &Path, bytes: &[u8]) -> Result<BTreeSet<String>, ScanWarning> {
    let text = decode(path, bytes)?;
    Ok(DefaultExtractor.extract(text))
}

/// 按文件扩展名选择抽取器
#[derive(Clone)]
pub struct ExtractorSet {
    by_extension: IndexMap<String, Arc<dyn Extractor>>,
    fallback: Arc<dyn Extractor>,
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self {
            by_extension: IndexMap::new(),
            fallback: Arc::new(DefaultExtractor),
        }
    }
}

impl std::fmt::Debug for ExtractorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorSet")
            .field("extensions", &self.by_extension.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ExtractorSet {
    /// 根据 `content.extract` 构建扩展名表
    ///
    /// 名称在内置抽取器与 `custom` 中查找；同名时
    /// 自定义抽取器覆盖内置抽取器。
    pub fn configure(
        extract: &IndexMap<String, String>,
        custom: &IndexMap<String, Arc<dyn Extractor>>,
    ) -> Result<Self, ConfigError> {
        let mut set = Self::default();
        for (extension, name) in extract {
            let extractor: Arc<dyn Extractor> = match custom.get(name) {
                Some(extractor) => Arc::clone(extractor),
                None => match name.as_str() {
                    DEFAULT_EXTRACTOR => Arc::new(DefaultExtractor),
                    CLASS_ATTRIBUTE_EXTRACTOR => Arc::new(ClassAttributeExtractor),
                    _ => {
                        return Err(ConfigError::UnknownExtractor {
                            extension: extension.clone(),
                            name: name.clone(),
                        })
                    }
                },
            };
            let extension = extension.trim_start_matches('.').to_ascii_lowercase();
            set.by_extension.insert(extension, extractor);
        }
        Ok(set)
    }

    fn for_path(&self, path: &Path) -> &dyn Extractor {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.by_extension.get(&ext.to_ascii_lowercase()))
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// 解码并抽取单个文件
    pub fn extract(&self, path: &Path, bytes: &[u8]) -> Result<BTreeSet<String>, ScanWarning> {
        let text = decode(path, bytes)?;
        Ok(self.for_path(path).extract(text))
    }
}
