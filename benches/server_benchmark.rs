use criterion::{black_box, criterion_group, criterion_main, Criterion};
use raw_http_server::{Request, Response, Router, StaticFileConfig, Status};
use std::io::Cursor;
use std::sync::Arc;

fn benchmark_http_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("http_parser");

    let simple_request = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";

    group.bench_function("parse_simple_request", |b| {
        b.iter(|| {
            let request = Request::read_from(Cursor::new(black_box(&simple_request[..]))).unwrap();
            assert_eq!(request.path, "/");
        })
    });

    let complex_request = b"GET /user-agent HTTP/1.1\r\n\
                            Host: localhost\r\n\
                            User-Agent: Mozilla/5.0 (X11; Linux x86_64)\r\n\
                            Accept: text/html,application/xhtml+xml\r\n\
                            Accept-Language: en-US,en;q=0.9\r\n\
                            Accept-Encoding: gzip, deflate\r\n\
                            Connection: close\r\n\
                            \r\n";

    group.bench_function("parse_complex_request", |b| {
        b.iter(|| {
            let request = Request::read_from(Cursor::new(black_box(&complex_request[..]))).unwrap();
            assert_eq!(request.headers.len(), 6);
        })
    });

    group.finish();
}

fn benchmark_response_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("http_response");

    group.bench_function("serialize_small_response", |b| {
        let mut response = Response::new(Status::Ok);
        response.set_body("text/plain", "Hello, World!");
        b.iter(|| black_box(response.serialize()))
    });

    group.bench_function("serialize_large_response", |b| {
        let mut response = Response::new(Status::Ok);
        response.set_body("application/octet-stream", vec![b'x'; 64 * 1024]);
        b.iter(|| black_box(response.serialize()))
    });

    group.finish();
}

fn benchmark_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("router");
    let router = Router::with_default_routes(Arc::new(StaticFileConfig::default()));

    let echo = Request::new("GET", "/echo/benchmark");
    group.bench_function("route_echo", |b| {
        b.iter(|| router.handle_request(black_box(&echo)).unwrap())
    });

    let missing = Request::new("GET", "/does/not/exist");
    group.bench_function("route_not_found", |b| {
        b.iter(|| router.handle_request(black_box(&missing)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_http_parsing,
    benchmark_response_serialization,
    benchmark_routing
);
criterion_main!(benches);
