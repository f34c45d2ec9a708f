use crate::types::ParsedClass;
use thiserror::Error;

/// 解析 utility class 字符串
///
/// 语法：`(modifier ':')* '!'? '-'? body '!'?`
///
/// 支持的格式：
/// - 简单类：`container`, `p-4`, `bg-red-500`
/// - 修饰符：`sm:container`, `md:hover:bg-blue-500`
/// - 负值：`-m-4`, `md:-top-1`
/// - 任意值：`w-[13px]`, `min-[800px]:p-4`
/// - 重要性：`!p-4`, `p-4!`
///
/// # 示例
///
/// ```
/// use crosswind_parse::parse_class;
///
/// let parsed = parse_class("md:hover:!-mt-4").unwrap();
/// assert_eq!(parsed.modifiers, vec!["md", "hover"]);
/// assert!(parsed.important);
/// assert!(parsed.negative);
/// assert_eq!(parsed.body, "mt-4");
/// ```
pub fn parse_class(input: &str) -> Result<ParsedClass, ParseError> {
    if input.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut parser = Parser::new(input);
    parser.parse()
}

/// 解析错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("unmatched bracket")]
    UnmatchedBracket,
    #[error("missing utility name")]
    MissingUtility,
}

/// 内部解析器
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Result<ParsedClass, ParseError> {
        // 0. 方括号必须成对出现
        self.check_brackets()?;

        // 1. 解析修饰符（modifier:modifier:...）
        let modifiers = self.parse_modifiers()?;

        // 2. 前置重要性标记
        let mut important = self.consume_if('!');

        // 3. 负值标记
        let negative = self.consume_if('-');

        // 4. 主体（末尾的 ! 也表示重要性）
        let mut body = &self.input[self.pos..];
        if let Some(stripped) = body.strip_suffix('!') {
            important = true;
            body = stripped;
        }

        if body.is_empty() {
            return Err(ParseError::MissingUtility);
        }
        if body.starts_with('-') || body.starts_with('!') || body.ends_with('-') {
            return Err(ParseError::InvalidFormat(format!(
                "unexpected '{}' around utility '{}'",
                if body.ends_with('-') { '-' } else { body.chars().next().unwrap_or('-') },
                body
            )));
        }

        Ok(ParsedClass {
            raw: self.input.to_string(),
            modifiers,
            negative,
            body: body.to_string(),
            important,
        })
    }

    /// 校验方括号配对
    fn check_brackets(&self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        for ch in self.input.chars() {
            match ch {
                '[' => depth += 1,
                ']' => {
                    if depth == 0 {
                        return Err(ParseError::UnmatchedBracket);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(ParseError::UnmatchedBracket);
        }
        Ok(())
    }

    /// 解析修饰符列表
    ///
    /// 只在方括号外的 `:` 处分割，`min-[800px]:`、`[&>*]:` 里的内容保持原样
    fn parse_modifiers(&mut self) -> Result<Vec<String>, ParseError> {
        let mut modifiers = Vec::new();
        let mut depth = 0usize;
        let mut start = self.pos;

        for (offset, ch) in self.input[self.pos..].char_indices() {
            let i = self.pos + offset;
            match ch {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                ':' if depth == 0 => {
                    let modifier = &self.input[start..i];
                    if modifier.is_empty() {
                        return Err(ParseError::InvalidFormat(format!(
                            "empty modifier at position {}",
                            i
                        )));
                    }
                    modifiers.push(modifier.to_string());
                    start = i + 1;
                }
                _ => {}
            }
        }

        if start >= self.input.len() {
            return Err(ParseError::InvalidFormat(
                "class ends with ':'".to_string(),
            ));
        }

        self.pos = start;
        Ok(modifiers)
    }

    /// 消费指定字符（如果存在）
    fn consume_if(&mut self, expected: char) -> bool {
        if self.input[self.pos..].starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }
}
