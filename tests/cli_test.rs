//! Smoke tests for the `vend` binary.

mod common;

use common::{Workspace, go_file};
use std::path::Path;
use std::process::{Command, Output};

fn get_vend_binary() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_vend"))
}

fn run_vend(ws: &Workspace, cwd: &Path, args: &[&str]) -> Output {
    Command::new(get_vend_binary())
        .args(args)
        .current_dir(cwd)
        .env("GOROOT", ws.root().join("goroot"))
        .env("GOPATH", ws.root().join("gopath"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run vend")
}

fn output_text(output: &Output) -> String {
    format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn fixture() -> Workspace {
    let ws = Workspace::new();
    ws.write_src(
        "other.com/y/b/b.go",
        "// Package b says hello. It has a second sentence.\npackage b // import \"other.com/y/b\"\n",
    );
    ws.write_src("example.com/x/x.go", &go_file("x", &["fmt", "other.com/y/b"]));
    ws
}

#[test]
fn test_no_subcommand_fails() {
    let ws = fixture();
    let output = run_vend(&ws, ws.root(), &[]);
    let text = output_text(&output);
    assert!(!output.status.success(), "{text}");
    assert!(text.contains("Error : subcommand not specified"), "{text}");
}

#[test]
fn test_info_and_list() {
    let ws = fixture();
    let x = ws.src("example.com/x");

    let output = run_vend(&ws, &x, &["info", "-v", "other.com/y/b"]);
    let text = output_text(&output);
    assert!(output.status.success(), "{text}");
    assert!(text.contains("other.com/y/b\nPackage b says hello.\n"), "{text}");
    assert!(text.contains("  Standard :  false"), "{text}");

    let output = run_vend(&ws, &x, &["info", "C"]);
    let text = output_text(&output);
    assert!(output.status.success(), "{text}");
    assert!(text.contains("Package C is a pseudo package"), "{text}");

    let output = run_vend(&ws, &x, &["list", "-q", "-s"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "other.com/y/b\n");
}

#[test]
fn test_cp_and_errors() {
    let ws = fixture();
    let x = ws.src("example.com/x");

    let output = run_vend(&ws, &x, &["cp", "other.com/y/b", "lib/b"]);
    assert!(output.status.success(), "{}", output_text(&output));
    assert_eq!(ws.read_src("example.com/x/lib/b/b.go"), "// Package b says hello. It has a second sentence.\npackage b\n");
    assert_eq!(
        ws.read_src("example.com/x/x.go"),
        go_file("x", &["fmt", "example.com/x/lib/b"])
    );

    let output = run_vend(&ws, &x, &["cp", "other.com/y/b", "lib/b"]);
    let text = output_text(&output);
    assert_eq!(output.status.code(), Some(1), "{text}");
    assert!(text.contains("Error : destination already exists"), "{text}");

    let output = run_vend(&ws, &x, &["mv", "fmt", "myfmt"]);
    let text = output_text(&output);
    assert!(text.contains("standard package specified : fmt"), "{text}");
}

#[test]
fn test_update_alias() {
    let ws = fixture();
    let x = ws.src("example.com/x");

    let output = run_vend(&ws, &x, &["update", "-v", "other.com/y", "mirror.com/y"]);
    let text = output_text(&output);
    assert!(output.status.success(), "{text}");
    assert!(text.contains("other.com/y/b => mirror.com/y/b"), "{text}");
    assert_eq!(
        ws.read_src("example.com/x/x.go"),
        go_file("x", &["fmt", "mirror.com/y/b"])
    );
}
