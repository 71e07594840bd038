use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vend::golang::{Scanner, parse_file, rewrite_imports};
use vend::vendor::{find_canonical_import_comment, plan_rewrites};

const MOCK_SOURCE: &str = r#"// Package server serves things.
package server // import "github.com/acme/server"

import (
	"context"
	"fmt"
	"net/http"

	"github.com/acme/server/internal/auth"  // tokens
	"github.com/acme/server/internal/store" // storage
	log "github.com/sirupsen/logrus"
)

type Server struct {
	store *store.Store
	auth  auth.Checker
}

func (s *Server) ServeHTTP(w http.ResponseWriter, r *http.Request) {
	ctx := context.Background()
	if err := s.auth.Check(ctx, r); err != nil {
		log.Warnf("denied: %v", err)
		http.Error(w, fmt.Sprintf("forbidden: %v", err), http.StatusForbidden)
		return
	}
	for i := 0; i < 10; i++ {
		s.store.Touch(ctx, i)
	}
}
"#;

fn bench_scanner(c: &mut Criterion) {
    c.bench_function("scan_source", |b| {
        b.iter(|| Scanner::new(black_box(MOCK_SOURCE.as_bytes())).count())
    });
}

fn bench_canonical(c: &mut Criterion) {
    c.bench_function("find_canonical_import_comment", |b| {
        b.iter(|| find_canonical_import_comment(black_box(MOCK_SOURCE.as_bytes())))
    });
}

fn bench_plan(c: &mut Criterion) {
    let imports: Vec<String> = (0..200)
        .map(|i| format!("github.com/acme/server/pkg{}/sub{}", i % 20, i))
        .chain((0..200).map(|i| format!("github.com/acme/serverless/pkg{i}")))
        .collect();

    c.bench_function("plan_rewrites_400", |b| {
        b.iter(|| {
            plan_rewrites(
                black_box("github.com/acme/server"),
                black_box("example.com/vendor/server"),
                imports.iter().map(String::as_str),
            )
        })
    });
}

fn bench_rewrite(c: &mut Criterion) {
    let src = MOCK_SOURCE.as_bytes();
    let file = parse_file(src).expect("mock source parses");
    let plan = plan_rewrites(
        "github.com/acme/server",
        "example.com/vendor/server",
        file.imports.iter().map(|i| i.path.as_str()),
    )
    .expect("plan");

    c.bench_function("parse_and_rewrite", |b| {
        b.iter(|| {
            let file = parse_file(black_box(src)).expect("mock source parses");
            rewrite_imports(src, &file, plan.as_map())
        })
    });
}

criterion_group!(benches, bench_scanner, bench_canonical, bench_plan, bench_rewrite);
criterion_main!(benches);
