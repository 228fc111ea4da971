#[cfg(test)]
use super::*;
use std::collections::HashMap;
use std::io::{self, Cursor};

use crate::value::{Value, ValueKind, ValueType};

fn parse(input: &str) -> Result<Section, ForgeError> {
    Parser::new(input).parse_document()
}

/// In-memory include resolver: patterns map straight to file names.
#[derive(Default)]
struct MemoryResolver {
    files: HashMap<String, String>,
    patterns: HashMap<String, Vec<String>>,
}

impl MemoryResolver {
    fn file(mut self, name: &str, contents: &str) -> Self {
        self.files.insert(name.to_string(), contents.to_string());
        self
    }

    fn pattern(mut self, pattern: &str, names: &[&str]) -> Self {
        self.patterns
            .insert(pattern.to_string(), names.iter().map(|s| s.to_string()).collect());
        self
    }
}

impl IncludeResolver for MemoryResolver {
    fn matches(&self, pattern: &str, _base_dir: Option<&Path>) -> Result<Vec<PathBuf>, String> {
        if pattern.contains('[') {
            return Err("unclosed character class".into());
        }
        Ok(self
            .patterns
            .get(pattern)
            .map(|names| names.iter().map(PathBuf::from).collect())
            .unwrap_or_default())
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        let name = path.to_string_lossy().to_string();
        match self.files.get(&name) {
            Some(contents) => Ok(Box::new(Cursor::new(contents.clone().into_bytes()))),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
        }
    }
}

fn parse_with(input: &str, resolver: MemoryResolver) -> Result<Section, ForgeError> {
    Parser::new(input).with_resolver(resolver).parse_document()
}

#[test]
fn test_parser_basic_document() {
    let input = r#"
# Global stuff
global = "global value";
primary {
  string = "primary string value";
  integer = 500;
  float = 80.80;
  negative = -50;
  negative_float = -0.5;
  boolean = true;
  not_true = FALSE;
  nothing = NULL;
  sub {
    key = "primary sub key value";  # trailing comment
  }
}
"#;

    let root = parse(input).expect("Failed to parse document");

    assert_eq!(root.keys(), vec!["global", "primary"]);
    assert_eq!(root.get_string("global").unwrap(), "global value");
    assert_eq!(root.get_string("primary.string").unwrap(), "primary string value");
    assert_eq!(root.get_integer("primary.integer").unwrap(), 500);
    assert_eq!(root.get_float("primary.float").unwrap(), 80.80);
    assert_eq!(root.get_integer("primary.negative").unwrap(), -50);
    assert_eq!(root.get_float("primary.negative_float").unwrap(), -0.5);
    assert!(root.get_boolean("primary.boolean").unwrap());
    assert!(!root.get_boolean("primary.not_true").unwrap());
    assert!(root.resolve("primary.nothing").unwrap().is_null());
    assert_eq!(root.get_string("primary.sub.key").unwrap(), "primary sub key value");

    let sub = root.get_section("primary.sub").unwrap();
    assert_eq!(sub.parent().unwrap().name().as_deref(), Some("primary"));
}

#[test]
fn test_value_types() {
    let root = parse("s = \"x\"; i = 1; f = 1.5; b = true; n = null; sect { }").unwrap();
    let types: Vec<ValueType> = root.entries().iter().map(|(_, v)| v.value_type()).collect();
    assert_eq!(
        types,
        vec![
            ValueType::String,
            ValueType::Integer,
            ValueType::Float,
            ValueType::Boolean,
            ValueType::Null,
            ValueType::Section,
        ]
    );
}

#[test]
fn test_empty_document() {
    let root = parse("  # only a comment\n").unwrap();
    assert!(root.is_empty());
}

#[test]
fn test_parsing_is_deterministic() {
    let input = "a = 1; b { c = a; d = \"x\"; e { f = .d; } }";
    assert_eq!(parse(input).unwrap(), parse(input).unwrap());
}

#[test]
fn test_last_write_wins() {
    let root = parse("a = 1; a = \"two\";").unwrap();
    assert_eq!(root.len(), 1);
    assert_eq!(root.get_string("a").unwrap(), "two");
}

#[test]
fn test_string_escapes_and_single_quotes() {
    let input = r#"
string_with_quote = "some \"quoted\" str\\ing";
single = 'hello world';
single_with_quote = '\'hello\' "world"';
"#;
    let root = parse(input).unwrap();
    assert_eq!(root.get_string("string_with_quote").unwrap(), "some \"quoted\" str\\ing");
    assert_eq!(root.get_string("single").unwrap(), "hello world");
    assert_eq!(root.get_string("single_with_quote").unwrap(), "'hello' \"world\"");
}

// ===== References =====

#[test]
fn test_global_reference_from_nested_section() {
    let root = parse("a = 1; b { c = a; }").unwrap();
    assert_eq!(root.get_integer("b.c").unwrap(), 1);
}

#[test]
fn test_global_dotted_reference() {
    let root = parse("primary { sub { key = \"k\"; } } secondary { k = primary.sub.key; }").unwrap();
    assert_eq!(root.get_string("secondary.k").unwrap(), "k");
}

#[test]
fn test_local_reference() {
    let root = parse("s { x = 1; y = .x; }").unwrap();
    assert_eq!(root.get_integer("s.y").unwrap(), 1);
}

#[test]
fn test_local_reference_into_child_section() {
    let root = parse("s { inner { v = 3.5; } y = .inner.v; }").unwrap();
    assert_eq!(root.get_float("s.y").unwrap(), 3.5);
}

#[test]
fn test_local_reference_does_not_see_root() {
    let err = parse("x = 1; s { y = .x; }").unwrap_err();
    assert!(matches!(err, ForgeError::ReferenceMissing { .. }));
}

#[test]
fn test_forward_local_reference_fails() {
    let err = parse("s { y = .x; x = 1; }").unwrap_err();
    match err {
        ForgeError::ReferenceMissing { reference, visited, key, line, column, .. } => {
            assert_eq!(reference, ".x");
            assert_eq!(visited, "");
            assert_eq!(key, "x");
            assert_eq!((line, column), (1, 9));
        }
        other => panic!("Expected ReferenceMissing, got {:?}", other),
    }
}

#[test]
fn test_forward_global_reference_fails() {
    let err = parse("primary { r = secondary.v; } secondary { v = 50; }").unwrap_err();
    assert!(matches!(err, ForgeError::ReferenceMissing { ref key, .. } if key == "secondary"));
}

#[test]
fn test_reference_through_primitive_is_type_error() {
    let err = parse("a = 1; b = a.c;").unwrap_err();
    match err {
        ForgeError::ReferenceType { reference, visited, found, line, column, .. } => {
            assert_eq!(reference, "a.c");
            assert_eq!(visited, "a");
            assert_eq!(found, ValueType::Integer);
            assert_eq!((line, column), (1, 12));
        }
        other => panic!("Expected ReferenceType, got {:?}", other),
    }
}

#[test]
fn test_reference_shares_the_value() {
    let root = parse("a = 1; b = a;").unwrap();
    let a = root.get("a").unwrap();
    let b = root.get("b").unwrap();
    assert!(a.ptr_eq(&b));

    // In-place updates show through the alias
    a.update(ValueKind::String("changed".into()));
    assert_eq!(root.get_string("b").unwrap(), "changed");

    // Rebinding the original name does not
    root.set("a", Value::new(2i64));
    assert_eq!(root.get_string("b").unwrap(), "changed");
    assert_eq!(root.get_integer("a").unwrap(), 2);
}

#[test]
fn test_section_reference_aliases_section() {
    let root = parse("base { port = 80; } copy = base;").unwrap();
    let base = root.get_section("base").unwrap();
    let copy = root.get_section("copy").unwrap();
    assert!(base.ptr_eq(&copy));

    base.set_integer("port", 8080);
    assert_eq!(root.get_integer("copy.port").unwrap(), 8080);
}

#[test]
fn test_reference_to_enclosing_section_is_rejected() {
    let err = parse("a { b = a; }").unwrap_err();
    assert!(matches!(err, ForgeError::ReferenceCycle { ref reference, .. } if reference == "a"));

    let err = parse("a { inner { up = a; } }").unwrap_err();
    assert!(matches!(err, ForgeError::ReferenceCycle { .. }));
}

#[test]
fn test_reference_to_closed_sibling_section_is_fine() {
    let root = parse("a { x = 1; } b { a = a; }").unwrap();
    assert_eq!(root.get_integer("b.a.x").unwrap(), 1);
}

#[test]
fn test_deep_alias_chain_parses_quickly() {
    // Each level aliases the previous one twice, so the shared tree fans out 2^64 ways
    let mut input = String::from("s0 { v = 1; }\n");
    for i in 1..=64 {
        input.push_str(&format!("s{i} {{ a = s{prev}; b = s{prev}; }}\n", prev = i - 1));
    }
    input.push_str("top { deep = s64; }\n");

    let root = parse(&input).unwrap();
    assert_eq!(root.get_integer("s3.a.b.a.v").unwrap(), 1);
    assert!(root.get_section("top.deep").unwrap().ptr_eq(&root.get_section("s64").unwrap()));
}

#[test]
fn test_alias_of_enclosing_section_through_closed_sibling_is_rejected() {
    let err = parse("outer { inner { } copy = inner; nested { up = outer; } }").unwrap_err();
    assert!(matches!(err, ForgeError::ReferenceCycle { ref reference, .. } if reference == "outer"));
}

#[test]
fn test_reference_syntax_errors() {
    for input in ["a = 1; b = a.;", "b = .;", "a = 1; b = a c;", "a { x = 1; } b = a..x;"] {
        let err = parse(input).unwrap_err();
        assert!(matches!(err, ForgeError::Syntax { .. }), "{} gave {:?}", input, err);
    }
}

// ===== Syntax errors =====

#[test]
fn test_unmatched_close_brace() {
    let err = parse("a = 1;\n}").unwrap_err();
    match err {
        ForgeError::Syntax { message, line, column, .. } => {
            assert_eq!(message, "unexpected section end '}'");
            assert_eq!((line, column), (2, 1));
        }
        other => panic!("Expected Syntax, got {:?}", other),
    }
}

#[test]
fn test_unmatched_open_brace() {
    let err = parse("s {\n  a = 1;\n").unwrap_err();
    match err {
        ForgeError::Syntax { message, .. } => {
            assert_eq!(message, "expected end of section, instead found EOF");
        }
        other => panic!("Expected Syntax, got {:?}", other),
    }
}

#[test]
fn test_missing_semicolon() {
    let err = parse("a = 1\nb = 2;").unwrap_err();
    match err {
        ForgeError::Syntax { message, line, column, .. } => {
            assert_eq!(message, "expected ';' instead found 'b'");
            assert_eq!((line, column), (2, 1));
        }
        other => panic!("Expected Syntax, got {:?}", other),
    }
}

#[test]
fn test_illegal_character() {
    let err = parse("a = 1;\nb = @;").unwrap_err();
    match err {
        ForgeError::Syntax { message, line, column, .. } => {
            assert!(message.contains("'@'"));
            assert_eq!((line, column), (2, 5));
        }
        other => panic!("Expected Syntax, got {:?}", other),
    }

    let err = parse("%").unwrap_err();
    assert!(matches!(err, ForgeError::Syntax { ref message, .. } if message == "illegal token '%'"));
}

#[test]
fn test_other_grammar_violations() {
    for input in [
        "a;",
        "= 1;",
        "a = ;",
        "a = {",
        "a = - x;",
        "a = \"unterminated",
        "a = 99999999999999999999;",
        "include name;",
        "include \"x\"",
        "a = $;",
    ] {
        let err = parse(input).unwrap_err();
        assert!(matches!(err, ForgeError::Syntax { .. }), "{} gave {:?}", input, err);
    }
}

#[test]
fn test_i64_min_literal() {
    let root = parse("min = -9223372036854775808;").unwrap();
    assert_eq!(root.get_integer("min").unwrap(), i64::MIN);
}

#[test]
fn test_environment_value() {
    // SAFETY: the variable name is unique to this test
    unsafe {
        std::env::set_var("FORGE_PARSER_TEST_ENV", "hello_world");
    }
    let root = parse("path = $FORGE_PARSER_TEST_ENV; unset = $FORGE_PARSER_TEST_UNSET;").unwrap();
    assert_eq!(root.get_string("path").unwrap(), "hello_world");
    assert_eq!(root.get_string("unset").unwrap(), "");
}

#[test]
fn test_partial_tree_after_failure() {
    let mut parser = Parser::new("a = 1; b = missing;");
    assert!(parser.parse_document().is_err());
    let partial = parser.settings();
    assert_eq!(partial.get_integer("a").unwrap(), 1);
    assert!(!partial.contains("b"));
}

#[test]
fn test_read_failure_mid_document_is_file_error() {
    let mut bytes = b"a = 1;\ns { b = \"long value without a newline\"; }".to_vec();
    bytes.extend_from_slice(&[b' ', 0xc3, b'(']);

    let err = Parser::from_reader(bytes.as_slice()).parse_document().unwrap_err();
    match err {
        ForgeError::File { path, message } => {
            assert_eq!(path, "<input>");
            assert!(message.starts_with("Failed to read input"));
        }
        other => panic!("Expected File, got {:?}", other),
    }
}

#[test]
fn test_reader_input() {
    let root = Parser::from_reader("a = \"v\";".as_bytes()).parse_document().unwrap();
    assert_eq!(root.get_string("a").unwrap(), "v");
}

// ===== Includes =====

#[test]
fn test_include_without_matches_is_noop() {
    let root = parse_with("a = 1; include \"nothing/*.cfg\"; b = 2;", MemoryResolver::default()).unwrap();
    assert_eq!(root.keys(), vec!["a", "b"]);
}

#[test]
fn test_include_splices_at_site() {
    let resolver = MemoryResolver::default()
        .file("inc.cfg", "included_setting = \"included\"; nested { deep = 1; }")
        .pattern("inc.cfg", &["inc.cfg"]);

    let input = r#"
primary {
  sub {
    key = "k";
    include "inc.cfg";
    after = .included_setting;
  }
}
"#;
    let root = parse_with(input, resolver).unwrap();
    assert_eq!(root.get_string("primary.sub.included_setting").unwrap(), "included");
    assert_eq!(root.get_integer("primary.sub.nested.deep").unwrap(), 1);
    assert_eq!(root.get_string("primary.sub.after").unwrap(), "included");
    assert_eq!(
        root.get_section("primary.sub").unwrap().keys(),
        vec!["key", "included_setting", "nested", "after"]
    );
    assert!(!root.contains("included_setting"));
}

#[test]
fn test_included_file_can_reference_includer() {
    let resolver = MemoryResolver::default()
        .file("ref.cfg", "copy = top; local = .here;")
        .pattern("ref.cfg", &["ref.cfg"]);
    let root = parse_with("top = 5; s { here = true; include \"ref.cfg\"; }", resolver).unwrap();
    assert_eq!(root.get_integer("s.copy").unwrap(), 5);
    assert!(root.get_boolean("s.local").unwrap());
}

#[test]
fn test_include_multiple_matches_in_order() {
    let resolver = MemoryResolver::default()
        .file("a.cfg", "order = \"a\"; first = 1;")
        .file("b.cfg", "order = \"b\"; second = first;")
        .pattern("*.cfg", &["a.cfg", "b.cfg"]);

    let root = parse_with("include \"*.cfg\"; tail = order;", resolver).unwrap();
    assert_eq!(root.get_string("order").unwrap(), "b");
    assert_eq!(root.get_integer("second").unwrap(), 1);
    assert_eq!(root.get_string("tail").unwrap(), "b");
}

#[test]
fn test_nested_includes() {
    let resolver = MemoryResolver::default()
        .file("outer.cfg", "outer { include \"inner.cfg\"; }")
        .file("inner.cfg", "value = 42;")
        .pattern("outer.cfg", &["outer.cfg"])
        .pattern("inner.cfg", &["inner.cfg"]);
    let root = parse_with("include \"outer.cfg\";", resolver).unwrap();
    assert_eq!(root.get_integer("outer.value").unwrap(), 42);
}

#[test]
fn test_include_unclosed_section_is_local_error() {
    let resolver = MemoryResolver::default()
        .file("open.cfg", "dangling {\n  a = 1;\n")
        .pattern("open.cfg", &["open.cfg"]);
    let err = parse_with("s { include \"open.cfg\"; }", resolver).unwrap_err();
    match err {
        ForgeError::Syntax { message, origin, line, .. } => {
            assert_eq!(message, "expected end of section, instead found EOF");
            assert_eq!(origin.as_deref(), Some("open.cfg"));
            assert_eq!(line, 3);
        }
        other => panic!("Expected Syntax, got {:?}", other),
    }
}

#[test]
fn test_include_closing_outer_section_is_error() {
    let resolver = MemoryResolver::default()
        .file("close.cfg", "a = 1; }")
        .pattern("close.cfg", &["close.cfg"]);
    let err = parse_with("s { include \"close.cfg\"; }", resolver).unwrap_err();
    match err {
        ForgeError::Syntax { message, origin, column, .. } => {
            assert_eq!(message, "unexpected section end '}'");
            assert_eq!(origin.as_deref(), Some("close.cfg"));
            assert_eq!(column, 8);
        }
        other => panic!("Expected Syntax, got {:?}", other),
    }
}

#[test]
fn test_error_inside_include_aborts_parse() {
    let resolver = MemoryResolver::default()
        .file("bad.cfg", "x = ;")
        .pattern("bad.cfg", &["bad.cfg"]);
    let err = parse_with("include \"bad.cfg\"; after = 1;", resolver).unwrap_err();
    assert!(matches!(err, ForgeError::Syntax { ref origin, .. } if origin.as_deref() == Some("bad.cfg")));
}

#[test]
fn test_include_cycle_is_detected() {
    let resolver = MemoryResolver::default()
        .file("a.cfg", "include \"b.cfg\";")
        .file("b.cfg", "include \"a.cfg\";")
        .pattern("a.cfg", &["a.cfg"])
        .pattern("b.cfg", &["b.cfg"]);
    let err = parse_with("include \"a.cfg\";", resolver).unwrap_err();
    match err {
        ForgeError::Include { message, pattern, origin, .. } => {
            assert!(message.contains("a.cfg -> b.cfg -> a.cfg"), "{}", message);
            assert_eq!(pattern, "a.cfg");
            assert_eq!(origin.as_deref(), Some("b.cfg"));
        }
        other => panic!("Expected Include, got {:?}", other),
    }
}

#[test]
fn test_include_depth_limit() {
    let resolver = MemoryResolver::default()
        .file("one.cfg", "include \"two.cfg\";")
        .file("two.cfg", "v = 2;")
        .pattern("one.cfg", &["one.cfg"])
        .pattern("two.cfg", &["two.cfg"]);
    let err = Parser::new("include \"one.cfg\";")
        .with_resolver(resolver)
        .with_options(ParseOptions::default().with_max_include_depth(1))
        .parse_document()
        .unwrap_err();
    assert!(matches!(err, ForgeError::Include { .. }));
}

#[test]
fn test_malformed_include_pattern() {
    let err = parse_with("\n  include \"[oops\";", MemoryResolver::default()).unwrap_err();
    match err {
        ForgeError::Include { pattern, line, column, .. } => {
            assert_eq!(pattern, "[oops");
            assert_eq!((line, column), (2, 11));
        }
        other => panic!("Expected Include, got {:?}", other),
    }
}

#[test]
fn test_unopenable_include_is_file_error() {
    let resolver = MemoryResolver::default().pattern("ghost.cfg", &["ghost.cfg"]);
    let err = parse_with("include \"ghost.cfg\";", resolver).unwrap_err();
    assert!(matches!(err, ForgeError::File { ref path, .. } if path == "ghost.cfg"));
}
