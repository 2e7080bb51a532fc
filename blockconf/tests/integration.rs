use blockconf::parser::{ParseErrorKind, sanitize};
use blockconf::{Block, Parsed, Parser, Setting};

fn parse(source: &str) -> Block {
    Block::parse("root", source)
}

fn parse_with_diagnostics(source: &str) -> Parsed {
    Parser::new(source.to_string(), 0).parse("root")
}

fn pairs(block: &Block) -> Vec<(&str, &str)> {
    block
        .settings()
        .iter()
        .map(|s| (s.key(), s.value()))
        .collect()
}

fn names(block: &Block) -> Vec<&str> {
    block.blocks().iter().map(Block::name).collect()
}

// ---------------------------------------------------------------------------
// Sanitizing
// ---------------------------------------------------------------------------

#[test]
fn line_comments_cut_at_first_marker() {
    assert_eq!(sanitize("k=1; // c"), "k=1;");
    assert_eq!(sanitize("k=1; # c"), "k=1;");
    assert_eq!(sanitize("k=1; ! c"), "k=1;");
    assert_eq!(sanitize("a=1; ! note # more\nb=2;"), "a=1;b=2;");
    assert_eq!(sanitize("a=1; # x // y ! z\nb=2;"), "a=1;b=2;");
}

#[test]
fn line_comment_markers_have_no_precedence() {
    // `//` inside a value still starts a comment.
    assert_eq!(sanitize("url = http://example.org;"), "url=http:");
    assert_eq!(sanitize("x = a!b#c;"), "x=a");
}

#[test]
fn block_comments_removed_across_lines() {
    assert_eq!(sanitize("/* a\nb */k=1;"), "k=1;");
    assert_eq!(sanitize("a=1; /* one */ b=2; /* two */"), "a=1;b=2;");
}

#[test]
fn block_comments_do_not_nest() {
    assert_eq!(sanitize("a=1;/* x /* y */ b=2; */c=3;"), "a=1;b=2;*/c=3;");
}

#[test]
fn unterminated_block_comment_drops_rest() {
    assert_eq!(sanitize("a=1;/* b=2;\nc=3;"), "a=1;");

    let parsed = parse_with_diagnostics("a=1;/* b=2;\nc=3;");
    assert_eq!(pairs(&parsed.root), vec![("a", "1")]);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].kind, ParseErrorKind::UnterminatedComment);
    assert_eq!(parsed.diagnostics[0].span.start, 4);
}

#[test]
fn whitespace_and_quotes_removed() {
    assert_eq!(sanitize("name = \"two words\";\n\tq = 'x';"), "name=twowords;q=x;");
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

#[test]
fn settings_in_order() {
    let root = parse("a = 1; b = 2; a = 3;");
    assert_eq!(pairs(&root), vec![("a", "1"), ("b", "2"), ("a", "3")]);
}

#[test]
fn setting_without_equals_has_empty_value() {
    let root = parse("flag; k = ;");
    assert_eq!(pairs(&root), vec![("flag", ""), ("k", "")]);
}

#[test]
fn value_split_at_first_equals() {
    let root = parse("expr = a=b;");
    assert_eq!(pairs(&root), vec![("expr", "a=b")]);
}

#[test]
fn stray_semicolons_skipped() {
    let root = parse("a=1;; ;b=2;");
    assert_eq!(pairs(&root), vec![("a", "1"), ("b", "2")]);
}

#[test]
fn nested_blocks() {
    let root = parse(
        "
        Dog {
          mass = 12.5;
          Puppy { mass = 2; }
        }
        Cat { mass = 4; }
        ",
    );
    assert_eq!(names(&root), vec!["Dog", "Cat"]);
    let dog = root.find_block("Dog").unwrap();
    assert_eq!(pairs(dog), vec![("mass", "12.5")]);
    assert_eq!(pairs(dog.find_block("Puppy").unwrap()), vec![("mass", "2")]);
}

#[test]
fn empty_block() {
    let root = parse("empty {} after = 1;");
    assert!(root.find_block("empty").unwrap().is_empty());
    assert_eq!(pairs(&root), vec![("after", "1")]);
}

#[test]
fn documented_scenario() {
    let source =
        "block{key1=v1; key2=val2; //key3=val3;\n name{k1=v1;}k4=v4;}block{key4=v4;}";
    let root = parse(source);

    assert!(root.settings().is_empty());
    assert_eq!(names(&root), vec!["block"]);
    let block = &root.blocks()[0];
    assert_eq!(
        pairs(block),
        vec![("key1", "v1"), ("key2", "val2"), ("k4", "v4"), ("key4", "v4")]
    );
    assert_eq!(names(block), vec!["name"]);
    assert_eq!(pairs(&block.blocks()[0]), vec![("k1", "v1")]);
}

// ---------------------------------------------------------------------------
// Consolidation
// ---------------------------------------------------------------------------

#[test]
fn duplicate_blocks_merge_in_order_of_appearance() {
    let root = parse("B{a=1;} C{c=0;} B{b=2;} B{d=3;}");
    assert_eq!(names(&root), vec!["B", "C"]);
    assert_eq!(
        pairs(root.find_block("B").unwrap()),
        vec![("a", "1"), ("b", "2"), ("d", "3")]
    );
}

#[test]
fn duplicate_blocks_merge_at_every_depth() {
    let root = parse("outer{ inner{x=1;} inner{y=2;} } outer{ inner{z=3;} other{w=4;} }");
    assert_eq!(names(&root), vec!["outer"]);
    let outer = root.find_block("outer").unwrap();
    assert_eq!(names(outer), vec!["inner", "other"]);
    assert_eq!(
        pairs(outer.find_block("inner").unwrap()),
        vec![("x", "1"), ("y", "2"), ("z", "3")]
    );
}

#[test]
fn add_block_merges_same_name() {
    let mut root = Block::new("root");
    root.add_block(Block::with_settings("A", [("keyA", "valA")]));
    root.add_block(Block::with_settings("B", [("a", "1")]));
    root.add_block(Block::with_settings("B", [("b", "2")]));

    assert_eq!(names(&root), vec!["A", "B"]);
    assert_eq!(pairs(&root.blocks()[1]), vec![("a", "1"), ("b", "2")]);
}

#[test]
fn merge_text_into_existing_block() {
    let mut root = parse("Dog { mass = 1; } g = 9.8;");
    let diagnostics = root.merge_text("Dog { speed = 3; } Cat { mass = 4; }");
    assert!(diagnostics.is_empty());
    assert_eq!(names(&root), vec!["Dog", "Cat"]);
    assert_eq!(
        pairs(root.find_block("Dog").unwrap()),
        vec![("mass", "1"), ("speed", "3")]
    );
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[test]
fn unclosed_brace_keeps_partial_tree() {
    let parsed = parse_with_diagnostics("a { b = 1;");
    let a = parsed.root.find_block("a").unwrap();
    assert_eq!(pairs(a), vec![("b", "1")]);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].kind, ParseErrorKind::UnclosedBrace);
    assert_eq!(parsed.diagnostics[0].span, 2..3);
}

#[test]
fn unclosed_inner_brace_terminates() {
    let parsed = parse_with_diagnostics("a{b=1;c{d=2;");
    let a = parsed.root.find_block("a").unwrap();
    assert_eq!(a.get_str("b"), Some("1"));
    assert!(
        parsed
            .diagnostics
            .iter()
            .any(|d| d.kind == ParseErrorKind::UnclosedBrace)
    );
}

#[test]
fn excessive_nesting_is_cut_off() {
    let source = format!("deep{}{}", "{".repeat(102), "}".repeat(102));
    let parsed = parse_with_diagnostics(&source);
    assert!(parsed.root.find_block("deep").is_some());
    assert!(
        parsed
            .diagnostics
            .iter()
            .any(|d| d.kind == ParseErrorKind::NestingTooDeep)
    );
}

#[test]
fn nesting_at_the_limit_is_accepted() {
    let source = format!("{}k=v;{}", "b{".repeat(100), "}".repeat(100));
    let parsed = parse_with_diagnostics(&source);
    assert!(parsed.diagnostics.is_empty());

    let path = vec!["b"; 100];
    assert_eq!(parsed.root.get_in::<String, _>(&path, "k").as_deref(), Some("v"));
}

#[test]
fn trailing_text_reported() {
    let parsed = parse_with_diagnostics("a = 1;\nb = 2");
    assert_eq!(pairs(&parsed.root), vec![("a", "1")]);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].kind, ParseErrorKind::TrailingText);
    assert_eq!(parsed.diagnostics[0].span, 7..12);
}

#[test]
fn diagnostic_spans_point_into_original_source() {
    let source = "x = 1;\nDog {\n  mass = 3;\n";
    let parsed = parse_with_diagnostics(source);
    assert_eq!(parsed.diagnostics.len(), 1);
    let open = source.find('{').unwrap();
    assert_eq!(parsed.diagnostics[0].span, open..open + 1);
}

// ---------------------------------------------------------------------------
// Printing
// ---------------------------------------------------------------------------

#[test]
fn print_layout() {
    let root = parse("g = 9.8; Dog { mass = 12; speed = 3; Puppy { mass = 2; } } Cat { mass = 4; } Empty {}");
    assert_eq!(
        root.to_string(),
        "g = 9.8;\n\
         Dog {\n\
         \x20 mass = 12;\n\
         \x20 speed = 3;\n\
         \x20 Puppy { mass = 2; }\n\
         }\n\
         Cat { mass = 4; }\n\
         Empty { }\n"
    );
}

#[test]
fn print_then_parse_gives_same_tree() {
    let source = "
        top = 1;
        A { x = 1; x = 2; B { y = 3; C { z = 4; w = 5; } } }
        D { }
        A { extra = yes; }
    ";
    let first = parse(source);
    let second = parse(&first.to_string());
    assert_eq!(first, second);
}

#[test]
fn built_tree_prints_and_reparses() {
    let mut root = Block::with_settings("name1", [("key1", "1"), ("key2", "3.7")]);
    root.add_setting(Setting::new("key3", "hello"));
    root.add_block(Block::with_settings("blockB", [("keyB1", "valB"), ("keyB2", "valB2")]));
    root.add_block(Block::with_settings("blockB", [("keyB2", "17"), ("keyB3", "16.3")]));

    let reparsed = Block::parse("name1", &root.to_string());
    assert_eq!(reparsed, root);
    assert_eq!(reparsed.get_in::<i32, _>(["blockB"], "keyB2"), Some(17));
}
