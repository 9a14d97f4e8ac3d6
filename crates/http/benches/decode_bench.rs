use std::hint::black_box;
use std::io::{Cursor, Read};

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use trawl_http::codec::read_message;

fn chunked_message(chunks: usize) -> Vec<u8> {
    let mut raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
    let data = [b'x'; 256];
    for _ in 0..chunks {
        raw.extend_from_slice(format!("{:x}\r\n", data.len()).as_bytes());
        raw.extend_from_slice(&data);
        raw.extend_from_slice(b"\r\n");
    }
    raw.extend_from_slice(b"0\r\n\r\n");
    raw
}

fn fixed_message(len: usize) -> Vec<u8> {
    let mut raw = format!("HTTP/1.1 200 OK\r\nContent-Length: {len}\r\n\r\n").into_bytes();
    raw.extend(std::iter::repeat_n(b'x', len));
    raw
}

fn benchmark_read_message(criterion: &mut Criterion) {
    let cases = [("chunked_64x256", chunked_message(64)), ("fixed_16k", fixed_message(16 * 1024))];

    let mut group = criterion.benchmark_group("read_message");

    for (name, bytes) in cases {
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter_batched(
                || Cursor::new(bytes.clone()),
                |cursor| {
                    let mut message = read_message(cursor).expect("input should be a valid message");
                    let mut sink = Vec::with_capacity(bytes.len());
                    message.body_mut().read_to_end(&mut sink).expect("body should decode");
                    black_box(sink);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(decode, benchmark_read_message);
criterion_main!(decode);
