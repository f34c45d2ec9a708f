use std::fs;
use std::path::Path;

use crosswind_engine::{
    CancellationToken, Config, ConfigError, Engine, Error, ResolvedRule, ScanCache, ScanError,
    WarningKind,
};
use pretty_assertions::assert_eq;

const REFERENCE_CONFIG: &str = r#"{
    "content": { "relative": true, "files": ["./templates/**/*.html"] },
    "theme": {
        "container": {
            "padding": { "DEFAULT": "1rem", "sm": "2rem", "md": "4rem", "lg": "8rem", "xl": "16rem" }
        },
        "extend": {}
    },
    "plugins": []
}"#;

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project(config: &str, files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "crosswind.json", config.as_bytes());
    for (path, contents) in files {
        write(dir.path(), path, contents.as_bytes());
    }
    dir
}

fn engine(dir: &Path) -> Engine {
    let config = Config::from_path(dir.join("crosswind.json")).unwrap();
    Engine::builder(config).jobs(2).build().unwrap()
}

fn declarations(rule: &ResolvedRule) -> Vec<(&str, &str)> {
    rule.declarations
        .iter()
        .map(|d| (d.property.as_str(), d.value.as_str()))
        .collect()
}

fn conditions(rule: &ResolvedRule) -> Vec<&str> {
    rule.conditions.iter().map(|c| c.at_rule.as_str()).collect()
}

#[test]
fn test_container_end_to_end() {
    let dir = project(
        REFERENCE_CONFIG,
        &[
            ("templates/index.html", r#"<div class="container sm:container"></div>"#),
            ("templates/pages/about.html", r#"<main class="container"><p class="sm:container">"#),
        ],
    );
    let output = engine(dir.path()).build().unwrap();
    assert!(output.warnings.is_empty());
    assert_eq!(output.stats.files_scanned, 2);

    let base: Vec<&ResolvedRule> = output
        .rules
        .iter()
        .filter(|r| r.selector == ".container" && r.conditions.is_empty())
        .collect();
    assert_eq!(base.len(), 1);
    assert_eq!(
        declarations(base[0]),
        vec![("width", "100%"), ("padding-right", "1rem"), ("padding-left", "1rem")]
    );

    let container_sm = output
        .rules
        .iter()
        .find(|r| r.selector == ".container" && conditions(r) == ["@media (min-width: 640px)"])
        .unwrap();
    assert_eq!(
        declarations(container_sm),
        vec![("max-width", "640px"), ("padding-right", "2rem"), ("padding-left", "2rem")]
    );

    let scoped: Vec<&ResolvedRule> = output
        .rules
        .iter()
        .filter(|r| r.selector == ".sm\\:container" && conditions(r) == ["@media (min-width: 640px)"])
        .collect();
    assert_eq!(scoped.len(), 1);
    assert_eq!(
        declarations(scoped[0]),
        vec![
            ("width", "100%"),
            ("padding-right", "2rem"),
            ("padding-left", "2rem"),
            ("max-width", "640px"),
        ]
    );

    let mut identities: Vec<_> = output.rules.iter().map(ResolvedRule::identity).collect();
    let total = identities.len();
    identities.sort();
    identities.dedup();
    assert_eq!(identities.len(), total);
}

fn min_width(at_rule: &str) -> u32 {
    at_rule
        .trim_start_matches("@media (min-width: ")
        .trim_end_matches("px)")
        .parse()
        .unwrap()
}

#[test]
fn test_container_under_breakpoint_uses_outer_screen() {
    let dir = project(REFERENCE_CONFIG, &[("templates/index.html", "container")]);
    let engine = engine(dir.path());

    for (token, width, padding) in [
        ("md:container", "768px", "4rem"),
        ("lg:container", "1024px", "8rem"),
    ] {
        let outer = format!("@media (min-width: {})", width);
        let rules = engine.generate_for([token]);
        let base: Vec<&ResolvedRule> = rules
            .iter()
            .filter(|r| conditions(r) == [outer.as_str()])
            .collect();
        assert_eq!(base.len(), 1, "{}", token);
        assert_eq!(
            declarations(base[0]),
            vec![
                ("width", "100%"),
                ("padding-right", padding),
                ("padding-left", padding),
                ("max-width", width),
            ]
        );

        for rule in rules.iter().filter(|r| r.conditions.len() == 2) {
            assert!(min_width(&rule.conditions[1].at_rule) > min_width(&outer), "{:?}", rule);
        }
        assert!(rules.iter().all(|r| r.conditions.len() <= 2));
    }
}

#[test]
fn test_container_breakpoints_ascend_regardless_of_declaration_order() {
    let dir = project(
        r#"{
            "content": { "relative": true, "files": ["index.html"] },
            "theme": {
                "screens": { "lg": "1024px", "sm": "640px", "md": "48rem" },
                "container": { "padding": { "lg": "3rem", "DEFAULT": "1rem" } }
            }
        }"#,
        &[("index.html", "container")],
    );
    let output = engine(dir.path()).build().unwrap();
    let widths: Vec<Vec<&str>> = output.rules.iter().map(conditions).collect();
    assert_eq!(
        widths,
        vec![
            vec![],
            vec!["@media (min-width: 640px)"],
            vec!["@media (min-width: 48rem)"],
            vec!["@media (min-width: 1024px)"],
        ]
    );
    assert_eq!(
        declarations(&output.rules[3]),
        vec![("max-width", "1024px"), ("padding-right", "3rem"), ("padding-left", "3rem")]
    );
}

#[test]
fn test_builds_are_deterministic() {
    let files: Vec<(String, String)> = (0..12)
        .map(|i| {
            (
                format!("templates/page-{}.html", i),
                format!(
                    r#"<div class="p-{} md:m-{} hover:bg-blue-500 lg:container text-lg -mt-2 w-1/2">"#,
                    i % 5,
                    i % 3
                ),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();
    let dir = project(REFERENCE_CONFIG, &borrowed);

    let first = engine(dir.path()).build().unwrap();
    let second = Engine::builder(Config::from_path(dir.path().join("crosswind.json")).unwrap())
        .jobs(1)
        .build()
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        serde_json::to_string(&first.rules).unwrap(),
        serde_json::to_string(&second.rules).unwrap()
    );
}

#[test]
fn test_regeneration_is_idempotent() {
    let dir = project(
        REFERENCE_CONFIG,
        &[("templates/index.html", r#"<a class="container sm:p-4 focus:underline dark:bg-gray-900">"#)],
    );
    let engine = engine(dir.path());
    let output = engine.build().unwrap();

    let tokens: Vec<String> = output.rules.iter().map(|r| r.token.clone()).collect();
    assert_eq!(engine.generate_for(tokens), output.rules);
}

#[test]
fn test_unknown_tokens_drop_silently() {
    let dir = project(REFERENCE_CONFIG, &[("templates/index.html", "foo bar baz")]);
    let output = engine(dir.path()).build().unwrap();
    assert!(output.rules.is_empty());
    assert!(output.warnings.is_empty());
    assert_eq!(output.stats.tokens, 3);
    assert_eq!(output.stats.resolved_tokens, 0);
}

#[test]
fn test_override_replaces_and_extend_adds() {
    let dir = project(
        r##"{
            "content": { "relative": true, "files": ["index.html"] },
            "theme": {
                "spacing": { "1": "1px" },
                "extend": { "colors": { "brand": { "DEFAULT": "#0ea5e9", "dark": "#0369a1" } } }
            }
        }"##,
        &[("index.html", "p-1 p-4 bg-brand bg-brand-dark bg-red-500")],
    );
    let output = engine(dir.path()).build().unwrap();
    let tokens: Vec<&str> = output.rules.iter().map(|r| r.token.as_str()).collect();
    assert_eq!(tokens, vec!["p-1", "bg-brand", "bg-brand-dark", "bg-red-500"]);
    assert_eq!(declarations(&output.rules[0]), vec![("padding", "1px")]);
}

#[test]
fn test_safelist_and_blocklist() {
    let dir = project(
        r#"{
            "content": { "relative": true, "files": ["index.html"] },
            "safelist": ["hidden"],
            "blocklist": ["flex"]
        }"#,
        &[("index.html", "flex block")],
    );
    let output = engine(dir.path()).build().unwrap();
    let selectors: Vec<&str> = output.rules.iter().map(|r| r.selector.as_str()).collect();
    assert_eq!(selectors, vec![".block", ".hidden"]);
}

#[test]
fn test_empty_content_fails_before_scanning() {
    let err = Config::from_json_str(r#"{"content": {"relative": true, "files": []}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyContent));
}

#[test]
fn test_binary_file_is_a_warning() {
    let dir = project(REFERENCE_CONFIG, &[("templates/index.html", "container")]);
    write(dir.path(), "templates/logo.html", &[0xff, 0xfe, 0x00, 0x89]);

    let output = engine(dir.path()).build().unwrap();
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].kind, WarningKind::Decode);
    assert!(output.warnings[0].path.ends_with("templates/logo.html"));
    assert!(!output.rules.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_aborts_build() {
    let dir = project(REFERENCE_CONFIG, &[("templates/index.html", "container")]);
    std::os::unix::fs::symlink(dir.path().join("templates"), dir.path().join("templates/again"))
        .unwrap();

    let err = engine(dir.path()).build().unwrap_err();
    assert!(matches!(err, Error::Scan(ScanError::SymlinkCycle { .. })), "{:?}", err);
}

#[test]
fn test_cancelled_build() {
    let dir = project(REFERENCE_CONFIG, &[("templates/index.html", "container")]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = engine(dir.path()).build_with(None, &cancel).unwrap_err();
    assert!(matches!(err, Error::Scan(ScanError::Cancelled)));
}

#[test]
fn test_cache_does_not_change_output() {
    let dir = project(
        REFERENCE_CONFIG,
        &[
            ("templates/a.html", "container p-4"),
            ("templates/b.html", "sm:container m-2"),
        ],
    );
    let engine = engine(dir.path());
    let mut cache = ScanCache::new();
    let cancel = CancellationToken::new();

    let cold = engine.build_with(Some(&mut cache), &cancel).unwrap();
    let warm = engine.build_with(Some(&mut cache), &cancel).unwrap();
    assert_eq!(cold.stats.cache_hits, 0);
    assert_eq!(warm.stats.cache_hits, 2);
    assert_eq!(cold.rules, warm.rules);

    write(dir.path(), "templates/b.html", b"m-2");
    let changed = engine.build_with(Some(&mut cache), &cancel).unwrap();
    assert_eq!(changed.stats.cache_hits, 1);
    assert!(!changed.rules.iter().any(|r| r.token == "sm:container"));
    assert_eq!(changed.rules, engine.build().unwrap().rules);
}

#[test]
fn test_plugin_override_in_config() {
    let dir = project(
        r#"{
            "content": { "relative": true, "files": ["index.html"] },
            "plugins": [
                { "name": "wide", "utilities": { "container": { "declarations": { "width": "90vw" } } } }
            ]
        }"#,
        &[("index.html", "container")],
    );
    let output = engine(dir.path()).build().unwrap();
    assert_eq!(output.rules.len(), 1);
    assert_eq!(declarations(&output.rules[0]), vec![("width", "90vw")]);
}
