//! 配置文件
//!
//! 常见 utility-CSS 配置对象的 JSON 形式：
//!
//! ```json
//! {
//!   "content": { "relative": true, "files": ["./templates/**/*.html"] },
//!   "theme": {
//!     "container": { "padding": { "DEFAULT": "1rem", "sm": "2rem" } },
//!     "extend": {}
//!   },
//!   "plugins": []
//! }
//! ```

use std::path::{Path, PathBuf};

use crosswind_core::ConfigError;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::content::ContentSpec;
use crate::theme::{theme_map_from_json, ThemeMap};
use crate::variant::DarkMode;

/// `content` 可以是模式列表，也可以是完整对象
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ContentConfig {
    Files(Vec<String>),
    Spec {
        #[serde(default)]
        relative: bool,
        #[serde(default)]
        files: Vec<String>,
        #[serde(default)]
        extract: IndexMap<String, String>,
    },
}

impl Default for ContentConfig {
    fn default() -> Self {
        ContentConfig::Files(Vec::new())
    }
}

impl ContentConfig {
    pub fn to_spec(&self) -> ContentSpec {
        match self {
            ContentConfig::Files(files) => ContentSpec::new(files.iter().cloned()),
            ContentConfig::Spec {
                relative,
                files,
                extract,
            } => ContentSpec {
                relative: *relative,
                files: files.clone(),
                extract: extract.clone(),
            },
        }
    }
}

fn empty_theme() -> Value {
    Value::Object(Default::default())
}

/// 配置文件
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default = "empty_theme")]
    pub theme: Value,
    #[serde(default)]
    pub plugins: Vec<Value>,
    /// 总是生成，无论内容中是否出现
    #[serde(default)]
    pub safelist: Vec<String>,
    /// 从不生成
    #[serde(default)]
    pub blocklist: Vec<String>,
    #[serde(default)]
    pub dark_mode: DarkMode,
    #[serde(default)]
    pub important: bool,
    /// 加载来源文件所在目录
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            theme: empty_theme(),
            plugins: Vec::new(),
            safelist: Vec::new(),
            blocklist: Vec::new(),
            dark_mode: DarkMode::default(),
            important: false,
            root: None,
        }
    }
}

impl Config {
    /// 解析并校验 JSON 文档
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 读取 JSON 配置文件；所在目录作为
    /// `content.relative` 的根目录
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json_str(&json)?;
        config.root = path.parent().map(Path::to_path_buf);
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn content_spec(&self) -> ContentSpec {
        self.content.to_spec()
    }

    /// 用户主题树；`theme` 不是映射时报错
    pub fn theme_map(&self) -> Result<ThemeMap, ConfigError> {
        theme_map_from_json("theme", &self.theme)
    }

    /// 校验所有不依赖文件系统的内容
    ///
    /// 内容为空的错误最先报告。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let content = self.content_spec();
        content.validate()?;
        self.theme_map()?;
        Ok(())
    }
}
