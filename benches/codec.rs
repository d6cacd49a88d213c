use criterion::{Criterion, criterion_group, criterion_main};
use microrpc::protocol::{Request, Response};
use std::hint::black_box;

fn sample_request(payload_len: usize) -> Request {
    let mut request = Request::new("user-service", "GetById");
    request.message_id = 1;
    request.serializer = 1;
    request.meta.insert("trace-id".into(), "4bf92f3577b34da6".into());
    request.data = vec![b'x'; payload_len];
    request.calculate_lengths();
    request
}

fn bench_request_codec(c: &mut Criterion) {
    for payload_len in [64usize, 4096] {
        let request = sample_request(payload_len);
        let encoded = request.encode();

        c.bench_function(&format!("request_encode_{payload_len}"), |b| {
            b.iter(|| black_box(request.encode()))
        });

        c.bench_function(&format!("request_decode_{payload_len}"), |b| {
            b.iter(|| black_box(Request::decode(black_box(&encoded)).unwrap()))
        });
    }
}

fn bench_response_codec(c: &mut Criterion) {
    let mut response = Response::new();
    response.set_error("mock error");
    response.data = vec![b'y'; 1024];
    response.calculate_lengths();
    let encoded = response.encode();

    c.bench_function("response_decode_1024", |b| {
        b.iter(|| black_box(Response::decode(black_box(&encoded)).unwrap()))
    });
}

criterion_group!(benches, bench_request_codec, bench_response_codec);
criterion_main!(benches);
