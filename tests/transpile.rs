use std::path::PathBuf;

use pretty_assertions::assert_eq;

use luats::config::TranspileOptions;
use luats::transpile::{transpile_files, transpile_source, TranspileError};

fn transpile(src: &str) -> String {
    transpile_source(src, &TranspileOptions::default())
        .expect("Failed to transpile")
        .code
}

fn assert_transpiles(cases: &[(&str, &str)]) {
    for (lua, ts) in cases {
        assert_eq!(transpile(lua), format!("{ts}\n"), "transpiling {lua:?}");
    }
}

#[test]
fn local_statements() {
    assert_transpiles(&[
        ("local a", "let a;"),
        ("local a = 1", "let a = 1;"),
        ("local a = 'string'", "let a = \"string\";"),
        ("local a, b = 1, 2", "let [a, b] = [1, 2];"),
        ("local a, b = xy()", "let [a, b] = xy();"),
    ]);
}

#[test]
fn assignment_statements() {
    assert_transpiles(&[
        ("a = 1", "a = 1;"),
        ("a.b = 1", "a.b = 1;"),
        ("table[index] = 1", "table[index] = 1;"),
        ("a, b = xy()", "[a, b] = xy();"),
        ("a.b, a.c = xy()", "[a.b, a.c] = xy();"),
        (
            "table[index], table[index] = 1, 2",
            "[table[index], table[index]] = [1, 2];",
        ),
    ]);
}

#[test]
fn table_constructors() {
    assert_transpiles(&[
        ("a = { b, c }", "a = [b, c];"),
        ("a = { b = 1, c = 2 }", "a = { b: 1, c: 2 };"),
        ("a = { [b] = 1, [c] = 2 }", "a = { [b]: 1, [c]: 2 };"),
    ]);
}

#[test]
fn documented_module() {
    let src = "\
--- Small helpers
-- @module util
local util = {}

--- Add two numbers
-- @tparam number a
-- @tparam number b
-- @treturn number
function util.add(a, b)
  return a + b
end

--- Greet someone
-- @tparam string name
function util.greet(name)
  print('hello ' .. name)
end

return util
";
    let options = TranspileOptions {
        module: true,
        ..Default::default()
    };
    let file = transpile_source(src, &options).unwrap();

    assert_eq!(
        file.code,
        "\
export function add(a: number, b: number): number {
    return a + b;
}
export function greet(name: string): void {
    print(\"hello \" + name);
}
export = util;
"
    );
    assert!(file.diagnostics.is_empty());
}

#[test]
fn documented_class() {
    let src = "\
-- @classmod Counter
local Counter = {}

-- @treturn number
function Counter:get()
  return self.count
end

-- @tparam number step
function Counter:bump(step)
  self.count = self.count + step
end

return Counter
";
    let options = TranspileOptions {
        classmod: true,
        ..Default::default()
    };

    assert_eq!(
        transpile_source(src, &options).unwrap().code,
        "\
class Counter {
    get(): number {
        return self.count;
    }
    bump(step: number): void {
        self.count = self.count + step;
    }
}
export = Counter;
"
    );
}

#[test]
fn diagnostics_are_collected() {
    let file = transpile_source(
        "function f(a, b) end",
        &TranspileOptions::default(),
    )
    .unwrap();

    assert_eq!(file.diagnostics.len(), 2);
    assert!(file.diagnostics[0].contains("Parameter a does not have a type signature"));
}

#[test]
fn semantic_findings_follow_transformer_diagnostics() {
    let src = "function f(a) end\n-- @type number\nlocal x = 'string'";

    let without = transpile_source(src, &TranspileOptions::default()).unwrap();
    assert_eq!(without.diagnostics.len(), 1);

    let options = TranspileOptions {
        semantic_diagnostics: true,
        ..Default::default()
    };
    let with = transpile_source(src, &options).unwrap();
    assert_eq!(
        with.diagnostics.last().map(String::as_str),
        Some("3:0 Type 'string' is not assignable to type 'number'.")
    );
    assert_eq!(with.diagnostics.len(), 2);
}

#[test]
fn source_map_points_at_lua_lines() {
    let options = TranspileOptions {
        source_map: true,
        ..Default::default()
    };
    let file = transpile_source("local a = 1\n\n\nb = 2", &options).unwrap();
    let mappings = file.source_map.expect("Expected a source map");

    let lines: Vec<(usize, usize)> = mappings
        .iter()
        .map(|m| (m.generated_line, m.source_line))
        .collect();
    assert_eq!(lines, vec![(1, 1), (2, 4)]);

    let without = transpile_source("local a = 1", &TranspileOptions::default()).unwrap();
    assert!(without.source_map.is_none());
}

#[test]
fn errors_stop_the_file() {
    let options = TranspileOptions::default();

    assert!(matches!(
        transpile_source("local = 1", &options),
        Err(TranspileError::Syntax(_))
    ));
    assert!(matches!(
        transpile_source("x = { 1, a = 2 }", &options),
        Err(TranspileError::Transform(_))
    ));
}

#[test]
fn missing_files_are_skipped() {
    let dir = std::env::temp_dir().join(format!("luats-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let present = dir.join("present.lua");
    std::fs::write(&present, "local a = 1\n").unwrap();
    let missing: PathBuf = dir.join("missing.lua");

    let results = transpile_files(&[missing, present.clone()], &TranspileOptions::default());

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, present);
    assert_eq!(results[0].1.as_ref().unwrap().code, "let a = 1;\n");

    std::fs::remove_dir_all(&dir).unwrap();
}
