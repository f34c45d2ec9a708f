//! 内置工具类
//!
//! 单条声明的静态类放在 phf 表里；带值的工具类由 [`DYNAMIC_UTILITIES`] 描述，
//! 值在解析时从主题命名空间查找。`container` 依赖主题断点，按主题单独构建。

use crosswind_core::Declaration;
use phf::phf_map;
use tracing::{debug, warn};

use super::{
    Category, DynamicUtility, Origin, RuleBody, ScreenBlock, UtilityDefinition, UtilityRegistry,
    ValueKind,
};
use crate::rule::Condition;
use crate::theme::screens::{is_length, MediaOrder};
use crate::theme::{ResolvedTheme, ThemeValue, DEFAULT_KEY};

/// 静态工具类 → (类别, 属性, 值)
static STATIC_UTILITIES: phf::Map<&'static str, (Category, &'static str, &'static str)> = phf_map! {
    // Display
    "block" => (Category::Layout, "display", "block"),
    "inline-block" => (Category::Layout, "display", "inline-block"),
    "inline" => (Category::Layout, "display", "inline"),
    "flex" => (Category::Layout, "display", "flex"),
    "inline-flex" => (Category::Layout, "display", "inline-flex"),
    "grid" => (Category::Layout, "display", "grid"),
    "inline-grid" => (Category::Layout, "display", "inline-grid"),
    "table" => (Category::Layout, "display", "table"),
    "flow-root" => (Category::Layout, "display", "flow-root"),
    "contents" => (Category::Layout, "display", "contents"),
    "list-item" => (Category::Layout, "display", "list-item"),
    "hidden" => (Category::Layout, "display", "none"),

    // Position
    "static" => (Category::Layout, "position", "static"),
    "fixed" => (Category::Layout, "position", "fixed"),
    "absolute" => (Category::Layout, "position", "absolute"),
    "relative" => (Category::Layout, "position", "relative"),
    "sticky" => (Category::Layout, "position", "sticky"),

    // Visibility
    "visible" => (Category::Layout, "visibility", "visible"),
    "invisible" => (Category::Layout, "visibility", "hidden"),
    "collapse" => (Category::Layout, "visibility", "collapse"),

    // Box / overflow / float
    "box-border" => (Category::Layout, "box-sizing", "border-box"),
    "box-content" => (Category::Layout, "box-sizing", "content-box"),
    "isolate" => (Category::Layout, "isolation", "isolate"),
    "overflow-auto" => (Category::Layout, "overflow", "auto"),
    "overflow-hidden" => (Category::Layout, "overflow", "hidden"),
    "overflow-visible" => (Category::Layout, "overflow", "visible"),
    "overflow-scroll" => (Category::Layout, "overflow", "scroll"),
    "overflow-x-auto" => (Category::Layout, "overflow-x", "auto"),
    "overflow-y-auto" => (Category::Layout, "overflow-y", "auto"),
    "overflow-x-hidden" => (Category::Layout, "overflow-x", "hidden"),
    "overflow-y-hidden" => (Category::Layout, "overflow-y", "hidden"),
    "float-left" => (Category::Layout, "float", "left"),
    "float-right" => (Category::Layout, "float", "right"),
    "float-none" => (Category::Layout, "float", "none"),
    "object-cover" => (Category::Layout, "object-fit", "cover"),
    "object-contain" => (Category::Layout, "object-fit", "contain"),

    // Flexbox & alignment
    "flex-row" => (Category::Layout, "flex-direction", "row"),
    "flex-row-reverse" => (Category::Layout, "flex-direction", "row-reverse"),
    "flex-col" => (Category::Layout, "flex-direction", "column"),
    "flex-col-reverse" => (Category::Layout, "flex-direction", "column-reverse"),
    "flex-wrap" => (Category::Layout, "flex-wrap", "wrap"),
    "flex-wrap-reverse" => (Category::Layout, "flex-wrap", "wrap-reverse"),
    "flex-nowrap" => (Category::Layout, "flex-wrap", "nowrap"),
    "items-start" => (Category::Layout, "align-items", "flex-start"),
    "items-end" => (Category::Layout, "align-items", "flex-end"),
    "items-center" => (Category::Layout, "align-items", "center"),
    "items-baseline" => (Category::Layout, "align-items", "baseline"),
    "items-stretch" => (Category::Layout, "align-items", "stretch"),
    "justify-start" => (Category::Layout, "justify-content", "flex-start"),
    "justify-end" => (Category::Layout, "justify-content", "flex-end"),
    "justify-center" => (Category::Layout, "justify-content", "center"),
    "justify-between" => (Category::Layout, "justify-content", "space-between"),
    "justify-around" => (Category::Layout, "justify-content", "space-around"),
    "justify-evenly" => (Category::Layout, "justify-content", "space-evenly"),
    "content-start" => (Category::Layout, "align-content", "flex-start"),
    "content-center" => (Category::Layout, "align-content", "center"),
    "content-between" => (Category::Layout, "align-content", "space-between"),
    "self-auto" => (Category::Layout, "align-self", "auto"),
    "self-start" => (Category::Layout, "align-self", "flex-start"),
    "self-end" => (Category::Layout, "align-self", "flex-end"),
    "self-center" => (Category::Layout, "align-self", "center"),
    "self-stretch" => (Category::Layout, "align-self", "stretch"),

    // Typography
    "text-left" => (Category::Typography, "text-align", "left"),
    "text-center" => (Category::Typography, "text-align", "center"),
    "text-right" => (Category::Typography, "text-align", "right"),
    "text-justify" => (Category::Typography, "text-align", "justify"),
    "italic" => (Category::Typography, "font-style", "italic"),
    "not-italic" => (Category::Typography, "font-style", "normal"),
    "uppercase" => (Category::Typography, "text-transform", "uppercase"),
    "lowercase" => (Category::Typography, "text-transform", "lowercase"),
    "capitalize" => (Category::Typography, "text-transform", "capitalize"),
    "normal-case" => (Category::Typography, "text-transform", "none"),
    "underline" => (Category::Typography, "text-decoration-line", "underline"),
    "line-through" => (Category::Typography, "text-decoration-line", "line-through"),
    "no-underline" => (Category::Typography, "text-decoration-line", "none"),
    "whitespace-normal" => (Category::Typography, "white-space", "normal"),
    "whitespace-nowrap" => (Category::Typography, "white-space", "nowrap"),
    "whitespace-pre" => (Category::Typography, "white-space", "pre"),
    "break-words" => (Category::Typography, "overflow-wrap", "break-word"),
    "break-all" => (Category::Typography, "word-break", "break-all"),

    // Border style
    "border-solid" => (Category::Border, "border-style", "solid"),
    "border-dashed" => (Category::Border, "border-style", "dashed"),
    "border-dotted" => (Category::Border, "border-style", "dotted"),
    "border-double" => (Category::Border, "border-style", "double"),
    "border-none" => (Category::Border, "border-style", "none"),

    // Interactivity
    "cursor-auto" => (Category::Interactivity, "cursor", "auto"),
    "cursor-default" => (Category::Interactivity, "cursor", "default"),
    "cursor-pointer" => (Category::Interactivity, "cursor", "pointer"),
    "cursor-wait" => (Category::Interactivity, "cursor", "wait"),
    "cursor-text" => (Category::Interactivity, "cursor", "text"),
    "cursor-move" => (Category::Interactivity, "cursor", "move"),
    "cursor-not-allowed" => (Category::Interactivity, "cursor", "not-allowed"),
    "pointer-events-none" => (Category::Interactivity, "pointer-events", "none"),
    "pointer-events-auto" => (Category::Interactivity, "pointer-events", "auto"),
    "select-none" => (Category::Interactivity, "user-select", "none"),
    "select-text" => (Category::Interactivity, "user-select", "text"),
    "select-all" => (Category::Interactivity, "user-select", "all"),
    "select-auto" => (Category::Interactivity, "user-select", "auto"),
    "resize" => (Category::Interactivity, "resize", "both"),
    "resize-none" => (Category::Interactivity, "resize", "none"),
};

/// 多条声明的静态类
static COMPOUND_UTILITIES: &[(&str, Category, &[(&str, &str)])] = &[
    (
        "truncate",
        Category::Typography,
        &[
            ("overflow", "hidden"),
            ("text-overflow", "ellipsis"),
            ("white-space", "nowrap"),
        ],
    ),
    (
        "antialiased",
        Category::Typography,
        &[
            ("-webkit-font-smoothing", "antialiased"),
            ("-moz-osx-font-smoothing", "grayscale"),
        ],
    ),
    (
        "sr-only",
        Category::Layout,
        &[
            ("position", "absolute"),
            ("width", "1px"),
            ("height", "1px"),
            ("padding", "0"),
            ("margin", "-1px"),
            ("overflow", "hidden"),
            ("clip", "rect(0, 0, 0, 0)"),
            ("white-space", "nowrap"),
            ("border-width", "0"),
        ],
    ),
];

/// 带值工具类的描述
struct DynamicSpec {
    name: &'static str,
    category: Category,
    namespaces: &'static [&'static str],
    properties: &'static [&'static str],
    kind: ValueKind,
    negative: bool,
    suffix: Option<&'static str>,
}

impl DynamicSpec {
    const fn new(
        name: &'static str,
        category: Category,
        namespaces: &'static [&'static str],
        properties: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            category,
            namespaces,
            properties,
            kind: ValueKind::Any,
            negative: false,
            suffix: None,
        }
    }

    const fn negative(mut self) -> Self {
        self.negative = true;
        self
    }

    const fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    const fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = Some(suffix);
        self
    }

    fn to_utility(&self) -> DynamicUtility {
        let mut utility =
            DynamicUtility::properties(self.namespaces, self.properties).with_kind(self.kind);
        if self.negative {
            utility = utility.with_negative();
        }
        if let Some(suffix) = self.suffix {
            utility = utility.with_suffix(suffix);
        }
        utility
    }
}

use Category::{Background, Border, Effects, Layout, Sizing, Spacing, Typography};

const PADDING: &[&str] = &["padding", "spacing"];
const MARGIN: &[&str] = &["margin", "spacing"];
const INSET: &[&str] = &["inset", "spacing"];
const SPACE_BETWEEN: &str = " > :not([hidden]) ~ :not([hidden])";

/// 同名的多个条目按顺序作为重载候选
static DYNAMIC_UTILITIES: &[DynamicSpec] = &[
    // Spacing
    DynamicSpec::new("p", Spacing, PADDING, &["padding"]),
    DynamicSpec::new("px", Spacing, PADDING, &["padding-left", "padding-right"]),
    DynamicSpec::new("py", Spacing, PADDING, &["padding-top", "padding-bottom"]),
    DynamicSpec::new("pt", Spacing, PADDING, &["padding-top"]),
    DynamicSpec::new("pr", Spacing, PADDING, &["padding-right"]),
    DynamicSpec::new("pb", Spacing, PADDING, &["padding-bottom"]),
    DynamicSpec::new("pl", Spacing, PADDING, &["padding-left"]),
    DynamicSpec::new("m", Spacing, MARGIN, &["margin"]).negative(),
    DynamicSpec::new("mx", Spacing, MARGIN, &["margin-left", "margin-right"]).negative(),
    DynamicSpec::new("my", Spacing, MARGIN, &["margin-top", "margin-bottom"]).negative(),
    DynamicSpec::new("mt", Spacing, MARGIN, &["margin-top"]).negative(),
    DynamicSpec::new("mr", Spacing, MARGIN, &["margin-right"]).negative(),
    DynamicSpec::new("mb", Spacing, MARGIN, &["margin-bottom"]).negative(),
    DynamicSpec::new("ml", Spacing, MARGIN, &["margin-left"]).negative(),
    DynamicSpec::new("gap", Spacing, &["gap", "spacing"], &["gap"]),
    DynamicSpec::new("gap-x", Spacing, &["gap", "spacing"], &["column-gap"]),
    DynamicSpec::new("gap-y", Spacing, &["gap", "spacing"], &["row-gap"]),
    DynamicSpec::new("space-x", Spacing, &["space", "spacing"], &["margin-left"])
        .negative()
        .suffix(SPACE_BETWEEN),
    DynamicSpec::new("space-y", Spacing, &["space", "spacing"], &["margin-top"])
        .negative()
        .suffix(SPACE_BETWEEN),
    // Sizing
    DynamicSpec::new("w", Sizing, &["width", "spacing"], &["width"]),
    DynamicSpec::new("h", Sizing, &["height", "spacing"], &["height"]),
    DynamicSpec::new("size", Sizing, &["size", "width", "spacing"], &["width", "height"]),
    DynamicSpec::new("min-w", Sizing, &["minWidth"], &["min-width"]),
    DynamicSpec::new("min-h", Sizing, &["minHeight"], &["min-height"]),
    DynamicSpec::new("max-w", Sizing, &["maxWidth"], &["max-width"]),
    DynamicSpec::new("max-h", Sizing, &["maxHeight", "spacing"], &["max-height"]),
    // Layout
    DynamicSpec::new("inset", Layout, INSET, &["inset"]).negative(),
    DynamicSpec::new("inset-x", Layout, INSET, &["left", "right"]).negative(),
    DynamicSpec::new("inset-y", Layout, INSET, &["top", "bottom"]).negative(),
    DynamicSpec::new("top", Layout, INSET, &["top"]).negative(),
    DynamicSpec::new("right", Layout, INSET, &["right"]).negative(),
    DynamicSpec::new("bottom", Layout, INSET, &["bottom"]).negative(),
    DynamicSpec::new("left", Layout, INSET, &["left"]).negative(),
    DynamicSpec::new("z", Layout, &["zIndex"], &["z-index"]).negative(),
    DynamicSpec::new("order", Layout, &["order"], &["order"]).negative(),
    DynamicSpec::new("flex", Layout, &["flex"], &["flex"]),
    DynamicSpec::new("basis", Layout, &["flexBasis", "spacing"], &["flex-basis"]),
    DynamicSpec::new("grow", Layout, &["flexGrow"], &["flex-grow"]),
    DynamicSpec::new("shrink", Layout, &["flexShrink"], &["flex-shrink"]),
    // Typography
    DynamicSpec::new("text", Typography, &["textColor", "colors"], &["color"])
        .kind(ValueKind::Color),
    DynamicSpec::new("text", Typography, &["fontSize"], &["font-size"]).kind(ValueKind::Length),
    DynamicSpec::new("font", Typography, &["fontFamily"], &["font-family"]),
    DynamicSpec::new("font", Typography, &["fontWeight"], &["font-weight"]),
    DynamicSpec::new("leading", Typography, &["lineHeight"], &["line-height"]),
    DynamicSpec::new("tracking", Typography, &["letterSpacing"], &["letter-spacing"]).negative(),
    // Background
    DynamicSpec::new("bg", Background, &["backgroundColor", "colors"], &["background-color"])
        .kind(ValueKind::Color),
    // Border
    DynamicSpec::new("border", Border, &["borderWidth"], &["border-width"])
        .kind(ValueKind::Length),
    DynamicSpec::new("border", Border, &["borderColor", "colors"], &["border-color"])
        .kind(ValueKind::Color),
    DynamicSpec::new("border-x", Border, &["borderWidth"], &["border-left-width", "border-right-width"]),
    DynamicSpec::new("border-y", Border, &["borderWidth"], &["border-top-width", "border-bottom-width"]),
    DynamicSpec::new("border-t", Border, &["borderWidth"], &["border-top-width"]),
    DynamicSpec::new("border-r", Border, &["borderWidth"], &["border-right-width"]),
    DynamicSpec::new("border-b", Border, &["borderWidth"], &["border-bottom-width"]),
    DynamicSpec::new("border-l", Border, &["borderWidth"], &["border-left-width"]),
    DynamicSpec::new("rounded", Border, &["borderRadius"], &["border-radius"]),
    DynamicSpec::new("rounded-t", Border, &["borderRadius"], &["border-top-left-radius", "border-top-right-radius"]),
    DynamicSpec::new("rounded-r", Border, &["borderRadius"], &["border-top-right-radius", "border-bottom-right-radius"]),
    DynamicSpec::new("rounded-b", Border, &["borderRadius"], &["border-bottom-right-radius", "border-bottom-left-radius"]),
    DynamicSpec::new("rounded-l", Border, &["borderRadius"], &["border-top-left-radius", "border-bottom-left-radius"]),
    DynamicSpec::new("rounded-tl", Border, &["borderRadius"], &["border-top-left-radius"]),
    DynamicSpec::new("rounded-tr", Border, &["borderRadius"], &["border-top-right-radius"]),
    DynamicSpec::new("rounded-br", Border, &["borderRadius"], &["border-bottom-right-radius"]),
    DynamicSpec::new("rounded-bl", Border, &["borderRadius"], &["border-bottom-left-radius"]),
    // Effects
    DynamicSpec::new("opacity", Effects, &["opacity"], &["opacity"]),
    DynamicSpec::new("shadow", Effects, &["boxShadow"], &["box-shadow"]),
];

/// 构建内置注册表
pub fn builtin_registry(theme: &ResolvedTheme) -> UtilityRegistry {
    let mut registry = UtilityRegistry::new();

    registry.register(
        "container",
        UtilityDefinition::Static(container(theme)),
        Category::Layout,
        Origin::Builtin,
    );

    for (name, (category, property, value)) in STATIC_UTILITIES.entries() {
        registry.register(
            *name,
            UtilityDefinition::Static(RuleBody::single(property, value)),
            *category,
            Origin::Builtin,
        );
    }

    for (name, category, declarations) in COMPOUND_UTILITIES {
        let declarations = declarations
            .iter()
            .map(|(property, value)| Declaration::new(*property, *value))
            .collect();
        registry.register(
            *name,
            UtilityDefinition::Static(RuleBody::new(declarations)),
            *category,
            Origin::Builtin,
        );
    }

    // 同名条目合并为一个重载列表
    let mut grouped: indexmap::IndexMap<&str, (Category, Vec<DynamicUtility>)> =
        indexmap::IndexMap::new();
    for spec in DYNAMIC_UTILITIES {
        grouped
            .entry(spec.name)
            .or_insert_with(|| (spec.category, Vec::new()))
            .1
            .push(spec.to_utility());
    }
    for (name, (category, candidates)) in grouped {
        registry.register(
            name,
            UtilityDefinition::Dynamic(candidates),
            category,
            Origin::Builtin,
        );
    }

    debug!(utilities = registry.len(), "built-in utilities registered");
    registry
}

/// `container`：基础规则 + 每个断点一条 max-width 规则
///
/// 内边距取自 `theme.container.padding`，`DEFAULT` 用于基础规则，
/// 断点名对应的值放进该断点的规则。长度形式的键视为自定义断点。
fn container(theme: &ResolvedTheme) -> RuleBody {
    let center = theme
        .get("container.center")
        .and_then(ThemeValue::as_str)
        .is_some_and(|c| c == "true");
    let padding = theme
        .get("container.padding")
        .and_then(ThemeValue::as_map);
    let padding_for = |key: &str| {
        padding
            .and_then(|p| p.get(key))
            .and_then(ThemeValue::as_str)
            .map(horizontal_padding)
    };

    let mut base = vec![Declaration::new("width", "100%")];
    if center {
        base.push(Declaration::new("margin-right", "auto"));
        base.push(Declaration::new("margin-left", "auto"));
    }
    if let Some(declarations) = padding_for(DEFAULT_KEY) {
        base.extend(declarations);
    }

    let mut blocks: Vec<ScreenBlock> = theme
        .screens()
        .iter()
        .map(|screen| {
            let mut declarations = vec![Declaration::new("max-width", screen.min_width.as_str())];
            if let Some(padding) = padding_for(&screen.name) {
                declarations.extend(padding);
            }
            ScreenBlock {
                condition: screen.condition(),
                declarations,
            }
        })
        .collect();

    if let Some(padding) = padding {
        let custom = padding
            .keys()
            .filter(|key| key.as_str() != DEFAULT_KEY && theme.screen(key).is_none());
        for (index, key) in custom.enumerate() {
            if !is_length(key) {
                warn!(breakpoint = %key, "container padding for unknown screen ignored");
                continue;
            }
            let Some(declarations) = padding_for(key) else {
                continue;
            };
            let order = MediaOrder::from_width(key, theme.screens().len() + index);
            blocks.push(ScreenBlock {
                condition: Condition::new(format!("@media (min-width: {})", key), order),
                declarations,
            });
        }
    }

    blocks.sort_by_key(|block| block.condition.order);

    let mut body = RuleBody::new(base);
    for block in blocks {
        body = body.with_screen(block);
    }
    body
}

fn horizontal_padding(value: &str) -> Vec<Declaration> {
    vec![
        Declaration::new("padding-right", value),
        Declaration::new("padding-left", value),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{default_theme, theme_map_from_json, ResolvedTheme};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn theme_with(container: serde_json::Value) -> ResolvedTheme {
        let mut root = default_theme();
        root.insert(
            "container".to_string(),
            ThemeValue::Map(theme_map_from_json("theme.container", &container).unwrap()),
        );
        ResolvedTheme::new(root).unwrap()
    }

    fn container_body(theme: &ResolvedTheme) -> RuleBody {
        match &builtin_registry(theme).get_static("container").unwrap().definition {
            UtilityDefinition::Static(body) => body.clone(),
            other => panic!("expected static container, got {:?}", other),
        }
    }

    #[test]
    fn test_container_without_padding() {
        let body = container_body(&ResolvedTheme::new(default_theme()).unwrap());
        assert_eq!(body.declarations, vec![Declaration::new("width", "100%")]);
        assert_eq!(body.screens.len(), 5);
        assert_eq!(
            body.screens[0].declarations,
            vec![Declaration::new("max-width", "640px")]
        );
    }

    #[test]
    fn test_container_breakpoint_padding() {
        let theme = theme_with(json!({
            "padding": {"DEFAULT": "1rem", "sm": "2rem", "md": "4rem", "lg": "8rem", "xl": "16rem"}
        }));
        let body = container_body(&theme);

        assert_eq!(
            body.declarations,
            vec![
                Declaration::new("width", "100%"),
                Declaration::new("padding-right", "1rem"),
                Declaration::new("padding-left", "1rem"),
            ]
        );

        let widths: Vec<&str> = body
            .screens
            .iter()
            .map(|b| b.declarations[0].value.as_str())
            .collect();
        assert_eq!(widths, vec!["640px", "768px", "1024px", "1280px", "1536px"]);

        assert_eq!(
            body.screens[1].declarations,
            vec![
                Declaration::new("max-width", "768px"),
                Declaration::new("padding-right", "4rem"),
                Declaration::new("padding-left", "4rem"),
            ]
        );
        // 2xl 没有配置内边距
        assert_eq!(body.screens[4].declarations.len(), 1);
    }

    #[test]
    fn test_container_center() {
        let body = container_body(&theme_with(json!({"center": true})));
        assert!(body
            .declarations
            .contains(&Declaration::new("margin-left", "auto")));
    }

    #[test]
    fn test_container_custom_length_breakpoint() {
        let body = container_body(&theme_with(json!({"padding": {"900px": "3rem"}})));
        let at_rules: Vec<&str> = body
            .screens
            .iter()
            .map(|b| b.condition.at_rule.as_str())
            .collect();
        assert_eq!(
            at_rules,
            vec![
                "@media (min-width: 640px)",
                "@media (min-width: 768px)",
                "@media (min-width: 900px)",
                "@media (min-width: 1024px)",
                "@media (min-width: 1280px)",
                "@media (min-width: 1536px)",
            ]
        );
    }

    #[test]
    fn test_container_padding_for_unknown_screen_ignored() {
        let body = container_body(&theme_with(json!({
            "padding": {"DEFAULT": "1rem", "tablet": "3rem"}
        })));
        assert_eq!(body.screens.len(), 5);
        assert!(body
            .screens
            .iter()
            .flat_map(|b| &b.declarations)
            .all(|d| d.value != "3rem"));
        assert!(body
            .screens
            .iter()
            .all(|b| !b.condition.at_rule.contains("tablet")));
    }

    #[test]
    fn test_overloads_grouped() {
        let registry = builtin_registry(&ResolvedTheme::new(default_theme()).unwrap());
        match &registry.get_dynamic("text").unwrap().definition {
            UtilityDefinition::Dynamic(candidates) => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[0].kind, ValueKind::Color);
            }
            other => panic!("expected dynamic, got {:?}", other),
        }
        assert!(registry.get_static("flex").is_some());
        assert!(registry.get_dynamic("flex").is_some());
    }
}
