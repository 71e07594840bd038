//! End-to-end tests for `path` (rewrite without copying) and `list`.

mod common;

use common::{Workspace, go_file, imports_in};
use std::fs;
use vend::commands::list::imports;
use vend::commands::update;
use vend::{ListOptions, Options};

fn fixture() -> Workspace {
    let ws = Workspace::new();
    ws.write_src(
        "example.com/x/x.go",
        "package x\n\nimport (\n\t\"fmt\"\n\t\"go/ast\"    // syntax tree\n\t\"go/build\"  // packages\n\t\"go/parser\" // parsing\n\t\"os\"\n)\n\nfunc F() { fmt.Println(ast.File{}, build.Default, parser.Mode(0), os.Args) }\n",
    );
    ws.write_src("example.com/x/other.go", "package x\n\nimport \"os\"\n\nvar   Y = os.Args\n");
    ws.write_src("example.com/x/y/y.go", &go_file("y", &["go/ast", "go/parser"]));
    ws.write_src("example.com/x/.hidden/h.go", &go_file("h", &["go/ast"]));
    ws
}

#[test]
fn test_path_updates_single_package() {
    let ws = fixture();
    let ctx = ws.ctx("example.com/x");
    let other = ws.read_src("example.com/x/other.go");

    let written = update(&ctx, &ctx.cwd, "go", "mygo", &Options::default()).unwrap();
    assert_eq!(written, 1);
    assert_eq!(
        ws.read_src("example.com/x/x.go"),
        "package x\n\nimport (\n\t\"fmt\"\n\t\"mygo/ast\"    // syntax tree\n\t\"mygo/build\"  // packages\n\t\"mygo/parser\" // parsing\n\t\"os\"\n)\n\nfunc F() { fmt.Println(ast.File{}, build.Default, parser.Mode(0), os.Args) }\n"
    );
    assert_eq!(ws.read_src("example.com/x/other.go"), other);
    assert_eq!(imports_in(&ws.src("example.com/x/y")), vec!["go/ast", "go/parser"]);
}

#[test]
fn test_path_recursive_skips_hidden() {
    let ws = fixture();
    let ctx = ws.ctx("example.com/x");
    let opts = Options {
        recurse: true,
        ..Options::default()
    };

    let written = update(&ctx, &ctx.cwd, "go", "mygo", &opts).unwrap();
    assert_eq!(written, 2);
    assert_eq!(imports_in(&ws.src("example.com/x/y")), vec!["mygo/ast", "mygo/parser"]);
    assert_eq!(imports_in(&ws.src("example.com/x/.hidden")), vec!["go/ast"]);
}

#[test]
fn test_path_leaves_unrelated_prefixes() {
    let ws = fixture();
    ws.write_src("example.com/p/p.go", &go_file("p", &["gopkg.in/yaml.v2", "gopher/x", "go/ast"]));
    let ctx = ws.ctx("example.com/p");

    update(&ctx, &ctx.cwd, "go", "mygo", &Options::default()).unwrap();
    assert_eq!(
        ws.read_src("example.com/p/p.go"),
        go_file("p", &["gopkg.in/yaml.v2", "gopher/x", "mygo/ast"])
    );
}

#[test]
fn test_path_without_go_files_is_a_no_op() {
    let ws = fixture();
    fs::create_dir_all(ws.src("example.com/empty")).unwrap();
    let ctx = ws.ctx("example.com/empty");
    assert_eq!(update(&ctx, &ctx.cwd, "go", "mygo", &Options::default()).unwrap(), 0);
}

#[test]
fn test_path_parse_error_leaves_directory_untouched() {
    let ws = fixture();
    ws.write_src("example.com/x/broken.go", "package x\n\nfunc F( {\n");
    let ctx = ws.ctx("example.com/x");
    let before = ws.read_src("example.com/x/x.go");

    assert!(update(&ctx, &ctx.cwd, "go", "mygo", &Options::default()).is_err());
    assert_eq!(ws.read_src("example.com/x/x.go"), before);
}

#[test]
fn test_path_recursive_passes_over_invalid_files() {
    let ws = fixture();
    ws.write_src("example.com/x/testdata/bad.go", "this is not go\n");
    ws.write_src("example.com/x/testdata/_skip.go", "neither is this\n");
    let ctx = ws.ctx("example.com/x");
    let opts = Options {
        recurse: true,
        ..Options::default()
    };

    let written = update(&ctx, &ctx.cwd, "go", "mygo", &opts).unwrap();
    assert_eq!(written, 2);
    assert_eq!(imports_in(&ws.src("example.com/x/y")), vec!["mygo/ast", "mygo/parser"]);
    assert_eq!(ws.read_src("example.com/x/testdata/bad.go"), "this is not go\n");

    let ctx = ws.ctx("example.com/x/testdata");
    assert_eq!(update(&ctx, &ctx.cwd, "go", "mygo", &Options::default()).unwrap(), 0);
}

#[test]
fn test_list_filters() {
    let ws = fixture();
    ws.write_src("example.com/x/x_test.go", &go_file("x", &["example.com/x/y", "testing"]));
    let ctx = ws.ctx("example.com/x");

    let all = imports(&ctx, ".", &ListOptions::default()).unwrap();
    assert_eq!(all, vec!["fmt", "go/ast", "go/build", "go/parser", "os"]);

    let opts = ListOptions {
        tests: true,
        ..ListOptions::default()
    };
    let with_tests = imports(&ctx, ".", &opts).unwrap();
    assert_eq!(
        with_tests,
        vec!["example.com/x/y", "fmt", "go/ast", "go/build", "go/parser", "os", "testing"]
    );

    let opts = ListOptions {
        tests: true,
        omit_standard: true,
        ..ListOptions::default()
    };
    assert_eq!(imports(&ctx, ".", &opts).unwrap(), vec!["example.com/x/y"]);

    let opts = ListOptions {
        tests: true,
        omit_child: true,
        omit_standard: true,
        ..ListOptions::default()
    };
    assert!(imports(&ctx, ".", &opts).unwrap().is_empty());
}

#[test]
fn test_list_by_import_path_and_recursive() {
    let ws = fixture();
    let ctx = ws.ctx("");

    let opts = ListOptions {
        recurse: true,
        ..ListOptions::default()
    };
    let all = imports(&ctx, "example.com/x/y", &ListOptions::default()).unwrap();
    assert_eq!(all, vec!["go/ast", "go/parser"]);

    let all = imports(&ctx, "example.com/x", &opts).unwrap();
    assert_eq!(all, vec!["fmt", "go/ast", "go/build", "go/parser", "os"]);
}
