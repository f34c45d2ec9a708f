//! 内置默认主题
//!
//! 静态表在编译期生成，[`default_theme`] 把它们组装成可合并的 [`ThemeMap`]。
//! 断点与调色板沿用常见的 utility-first 默认值。

use phf::phf_map;

use super::{ThemeMap, ThemeValue};

/// `screens` → 最小宽度
static SCREENS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
    ("2xl", "1536px"),
];

/// `spacing` → 长度
pub static SPACING: phf::Map<&'static str, &'static str> = phf_map! {
    "px" => "1px",
    "0" => "0px",
    "0.5" => "0.125rem",
    "1" => "0.25rem",
    "1.5" => "0.375rem",
    "2" => "0.5rem",
    "2.5" => "0.625rem",
    "3" => "0.75rem",
    "3.5" => "0.875rem",
    "4" => "1rem",
    "5" => "1.25rem",
    "6" => "1.5rem",
    "7" => "1.75rem",
    "8" => "2rem",
    "9" => "2.25rem",
    "10" => "2.5rem",
    "11" => "2.75rem",
    "12" => "3rem",
    "14" => "3.5rem",
    "16" => "4rem",
    "20" => "5rem",
    "24" => "6rem",
    "28" => "7rem",
    "32" => "8rem",
    "36" => "9rem",
    "40" => "10rem",
    "44" => "11rem",
    "48" => "12rem",
    "52" => "13rem",
    "56" => "14rem",
    "60" => "15rem",
    "64" => "16rem",
    "72" => "18rem",
    "80" => "20rem",
    "96" => "24rem",
};

/// 分数值，供 width / height / inset / flexBasis 共用
static FRACTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "1/2" => "50%",
    "1/3" => "33.333333%",
    "2/3" => "66.666667%",
    "1/4" => "25%",
    "2/4" => "50%",
    "3/4" => "75%",
    "1/5" => "20%",
    "2/5" => "40%",
    "3/5" => "60%",
    "4/5" => "80%",
    "1/6" => "16.666667%",
    "5/6" => "83.333333%",
    "full" => "100%",
};

static SIZING_KEYWORDS: phf::Map<&'static str, &'static str> = phf_map! {
    "auto" => "auto",
    "min" => "min-content",
    "max" => "max-content",
    "fit" => "fit-content",
};

static MAX_WIDTH: phf::Map<&'static str, &'static str> = phf_map! {
    "none" => "none",
    "xs" => "20rem",
    "sm" => "24rem",
    "md" => "28rem",
    "lg" => "32rem",
    "xl" => "36rem",
    "2xl" => "42rem",
    "3xl" => "48rem",
    "4xl" => "56rem",
    "5xl" => "64rem",
    "6xl" => "72rem",
    "7xl" => "80rem",
    "full" => "100%",
    "prose" => "65ch",
};

/// `text-{size}` → font-size 值
pub static TEXT_SIZE: phf::Map<&'static str, &'static str> = phf_map! {
    "xs" => "0.75rem",
    "sm" => "0.875rem",
    "base" => "1rem",
    "lg" => "1.125rem",
    "xl" => "1.25rem",
    "2xl" => "1.5rem",
    "3xl" => "1.875rem",
    "4xl" => "2.25rem",
    "5xl" => "3rem",
    "6xl" => "3.75rem",
    "7xl" => "4.5rem",
    "8xl" => "6rem",
    "9xl" => "8rem",
};

static FONT_WEIGHT: phf::Map<&'static str, &'static str> = phf_map! {
    "thin" => "100",
    "extralight" => "200",
    "light" => "300",
    "normal" => "400",
    "medium" => "500",
    "semibold" => "600",
    "bold" => "700",
    "extrabold" => "800",
    "black" => "900",
};

/// `font-{family}` → font-family 值
static FONT_FAMILY: phf::Map<&'static str, &'static str> = phf_map! {
    "sans" => "ui-sans-serif, system-ui, sans-serif, \"Apple Color Emoji\", \"Segoe UI Emoji\"",
    "serif" => "ui-serif, Georgia, Cambria, \"Times New Roman\", Times, serif",
    "mono" => "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, \"Liberation Mono\", monospace",
};

static LINE_HEIGHT: phf::Map<&'static str, &'static str> = phf_map! {
    "none" => "1",
    "tight" => "1.25",
    "snug" => "1.375",
    "normal" => "1.5",
    "relaxed" => "1.625",
    "loose" => "2",
    "3" => ".75rem",
    "4" => "1rem",
    "5" => "1.25rem",
    "6" => "1.5rem",
    "7" => "1.75rem",
    "8" => "2rem",
    "9" => "2.25rem",
    "10" => "2.5rem",
};

static LETTER_SPACING: phf::Map<&'static str, &'static str> = phf_map! {
    "tighter" => "-0.05em",
    "tight" => "-0.025em",
    "normal" => "0em",
    "wide" => "0.025em",
    "wider" => "0.05em",
    "widest" => "0.1em",
};

static BORDER_WIDTH: phf::Map<&'static str, &'static str> = phf_map! {
    "DEFAULT" => "1px",
    "0" => "0px",
    "2" => "2px",
    "4" => "4px",
    "8" => "8px",
};

static BORDER_RADIUS: phf::Map<&'static str, &'static str> = phf_map! {
    "none" => "0px",
    "sm" => "0.125rem",
    "DEFAULT" => "0.25rem",
    "md" => "0.375rem",
    "lg" => "0.5rem",
    "xl" => "0.75rem",
    "2xl" => "1rem",
    "3xl" => "1.5rem",
    "full" => "9999px",
};

static BOX_SHADOW: phf::Map<&'static str, &'static str> = phf_map! {
    "sm" => "0 1px 2px 0 rgb(0 0 0 / 0.05)",
    "DEFAULT" => "0 1px 3px 0 rgb(0 0 0 / 0.1), 0 1px 2px -1px rgb(0 0 0 / 0.1)",
    "md" => "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)",
    "lg" => "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)",
    "xl" => "0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1)",
    "2xl" => "0 25px 50px -12px rgb(0 0 0 / 0.25)",
    "inner" => "inset 0 2px 4px 0 rgb(0 0 0 / 0.05)",
    "none" => "none",
};

static OPACITY: phf::Map<&'static str, &'static str> = phf_map! {
    "0" => "0",
    "5" => "0.05",
    "10" => "0.1",
    "20" => "0.2",
    "25" => "0.25",
    "30" => "0.3",
    "40" => "0.4",
    "50" => "0.5",
    "60" => "0.6",
    "70" => "0.7",
    "75" => "0.75",
    "80" => "0.8",
    "90" => "0.9",
    "95" => "0.95",
    "100" => "1",
};

static Z_INDEX: phf::Map<&'static str, &'static str> = phf_map! {
    "auto" => "auto",
    "0" => "0",
    "10" => "10",
    "20" => "20",
    "30" => "30",
    "40" => "40",
    "50" => "50",
};

static ORDER: phf::Map<&'static str, &'static str> = phf_map! {
    "first" => "-9999",
    "last" => "9999",
    "none" => "0",
    "1" => "1",
    "2" => "2",
    "3" => "3",
    "4" => "4",
    "5" => "5",
    "6" => "6",
    "7" => "7",
    "8" => "8",
    "9" => "9",
    "10" => "10",
    "11" => "11",
    "12" => "12",
};

static FLEX: phf::Map<&'static str, &'static str> = phf_map! {
    "1" => "1 1 0%",
    "auto" => "1 1 auto",
    "initial" => "0 1 auto",
    "none" => "none",
};

static FLEX_FACTOR: phf::Map<&'static str, &'static str> = phf_map! {
    "DEFAULT" => "1",
    "0" => "0",
};

static BASE_COLORS: &[(&str, &str)] = &[
    ("inherit", "inherit"),
    ("current", "currentColor"),
    ("transparent", "transparent"),
    ("black", "#000"),
    ("white", "#fff"),
];

const SHADES: [&str; 10] = ["50", "100", "200", "300", "400", "500", "600", "700", "800", "900"];

/// 调色板：色系 → 按 [`SHADES`] 顺序排列的色值
static PALETTE: &[(&str, [&str; 10])] = &[
    ("gray", ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827"]),
    ("red", ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d"]),
    ("yellow", ["#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207", "#854d0e", "#713f12"]),
    ("green", ["#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d"]),
    ("blue", ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a"]),
    ("indigo", ["#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca", "#3730a3", "#312e81"]),
    ("purple", ["#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea", "#7e22ce", "#6b21a8", "#581c87"]),
    ("pink", ["#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d", "#9d174d", "#831843"]),
];

fn table<'a>(entries: impl IntoIterator<Item = (&'a &'static str, &'a &'static str)>) -> ThemeValue {
    ThemeValue::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), ThemeValue::str(*v)))
            .collect(),
    )
}

fn ordered(entries: &[(&str, &str)]) -> ThemeValue {
    ThemeValue::Map(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), ThemeValue::str(*v)))
            .collect(),
    )
}

fn colors() -> ThemeValue {
    let mut map: ThemeMap = BASE_COLORS
        .iter()
        .map(|(k, v)| (k.to_string(), ThemeValue::str(*v)))
        .collect();
    for (family, hexes) in PALETTE {
        let shades = SHADES
            .iter()
            .zip(hexes.iter())
            .map(|(shade, hex)| (shade.to_string(), ThemeValue::str(*hex)))
            .collect();
        map.insert(family.to_string(), ThemeValue::Map(shades));
    }
    ThemeValue::Map(map)
}

/// width / height 共享：spacing + 分数 + 关键字，再加视口单位
fn sizing(viewport: &'static str) -> ThemeValue {
    let mut map = ThemeMap::new();
    for (k, v) in SPACING.entries().chain(FRACTIONS.entries()).chain(SIZING_KEYWORDS.entries()) {
        map.insert(k.to_string(), ThemeValue::str(*v));
    }
    map.insert("screen".to_string(), ThemeValue::str(viewport));
    ThemeValue::Map(map)
}

/// 组装默认主题
pub fn default_theme() -> ThemeMap {
    let mut theme = ThemeMap::new();
    theme.insert("screens".to_string(), ordered(SCREENS));
    theme.insert("container".to_string(), ThemeValue::Map(ThemeMap::new()));
    theme.insert("spacing".to_string(), table(SPACING.entries()));
    theme.insert("colors".to_string(), colors());
    theme.insert("margin".to_string(), ordered(&[("auto", "auto")]));
    theme.insert("width".to_string(), sizing("100vw"));
    theme.insert("height".to_string(), sizing("100vh"));
    theme.insert(
        "minWidth".to_string(),
        table(SIZING_KEYWORDS.entries().chain(FRACTIONS.entries())),
    );
    theme.insert(
        "minHeight".to_string(),
        ordered(&[("0", "0px"), ("full", "100%"), ("screen", "100vh")]),
    );
    theme.insert("maxWidth".to_string(), table(MAX_WIDTH.entries()));
    theme.insert(
        "maxHeight".to_string(),
        ordered(&[("none", "none"), ("full", "100%"), ("screen", "100vh")]),
    );
    theme.insert(
        "inset".to_string(),
        table(FRACTIONS.entries().chain([(&"auto", &"auto")])),
    );
    theme.insert("fontSize".to_string(), table(TEXT_SIZE.entries()));
    theme.insert("fontWeight".to_string(), table(FONT_WEIGHT.entries()));
    theme.insert("fontFamily".to_string(), table(FONT_FAMILY.entries()));
    theme.insert("lineHeight".to_string(), table(LINE_HEIGHT.entries()));
    theme.insert("letterSpacing".to_string(), table(LETTER_SPACING.entries()));
    theme.insert("borderWidth".to_string(), table(BORDER_WIDTH.entries()));
    theme.insert("borderRadius".to_string(), table(BORDER_RADIUS.entries()));
    theme.insert("boxShadow".to_string(), table(BOX_SHADOW.entries()));
    theme.insert("opacity".to_string(), table(OPACITY.entries()));
    theme.insert("zIndex".to_string(), table(Z_INDEX.entries()));
    theme.insert("order".to_string(), table(ORDER.entries()));
    theme.insert("flex".to_string(), table(FLEX.entries()));
    theme.insert(
        "flexBasis".to_string(),
        table(FRACTIONS.entries().chain([(&"auto", &"auto")])),
    );
    theme.insert("flexGrow".to_string(), table(FLEX_FACTOR.entries()));
    theme.insert("flexShrink".to_string(), table(FLEX_FACTOR.entries()));
    theme
}
