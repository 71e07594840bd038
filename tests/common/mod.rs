//! Shared fixtures: a throwaway GOROOT and GOPATH inside a temp directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vend::Context;

const STANDARD: &[(&str, &str)] = &[
    ("fmt/print.go", "// Package fmt implements formatted I/O.\npackage fmt\n"),
    ("os/file.go", "package os\n"),
    ("testing/testing.go", "package testing\n"),
    ("go/ast/ast.go", "package ast\n"),
    ("go/build/build.go", "package build\n"),
    ("go/parser/parser.go", "package parser\n"),
    ("unicode/letter.go", "package unicode\n"),
    ("unicode/utf8/utf8.go", "package utf8\n"),
];

pub struct Workspace {
    pub tmp: TempDir,
    root: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        // Spawned binaries see the canonical working directory.
        let root = tmp.path().canonicalize().expect("Failed to resolve temp dir");
        let ws = Self { tmp, root };
        for (rel, content) in STANDARD {
            ws.write(&format!("goroot/src/{rel}"), content);
        }
        fs::create_dir_all(ws.src("")).expect("Failed to create GOPATH");
        ws
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `GOPATH/src/<rel>`.
    pub fn src(&self, rel: &str) -> PathBuf {
        self.root().join("gopath/src").join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Writes `GOPATH/src/<rel>`.
    pub fn write_src(&self, rel: &str, content: &str) {
        self.write(&format!("gopath/src/{rel}"), content);
    }

    pub fn read_src(&self, rel: &str) -> String {
        fs::read_to_string(self.src(rel))
            .unwrap_or_else(|e| panic!("Failed to read {rel}: {e}"))
    }

    /// Context whose working directory is the package `import_path`.
    pub fn ctx(&self, import_path: &str) -> Context {
        Context::new(
            self.root().join("goroot"),
            vec![self.root().join("gopath")],
            self.src(import_path),
        )
    }
}

/// Go source importing `imports` in one parenthesized block.
pub fn go_file(package: &str, imports: &[&str]) -> String {
    let mut out = format!("package {package}\n");
    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for import in imports {
            out.push_str(&format!("\t\"{import}\"\n"));
        }
        out.push_str(")\n");
    }
    out
}

/// Import paths declared by every `.go` file directly inside `dir`.
pub fn imports_in(dir: &Path) -> Vec<String> {
    let mut all = Vec::new();
    let mut entries: Vec<_> = fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect();
    entries.sort();
    for path in entries {
        if path.extension().is_some_and(|e| e == "go") {
            let src = fs::read(&path).unwrap();
            let file = vend::golang::parse_file(&src).unwrap();
            all.extend(file.imports.into_iter().map(|i| i.path));
        }
    }
    all.sort();
    all.dedup();
    all
}
