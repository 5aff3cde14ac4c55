use chatstream::{DecodeError, EventSink, StreamDecoder, Usage};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

struct NullSink {
    bytes_seen: usize,
}

impl EventSink for NullSink {
    fn on_delta(&mut self, text: &str) {
        self.bytes_seen += black_box(text).len();
    }

    fn on_complete(&mut self, _usage: Option<Usage>) {}

    fn on_error(&mut self, _err: DecodeError) {}
}

fn sample_sse_transcript(lines: usize) -> String {
    let mut out = String::new();
    for i in 0..lines {
        out.push_str(&format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"token {i} of the answer \"}}}}]}}\n"
        ));
    }
    out.push_str("data: [DONE]\n");
    out
}

fn sample_ndjson_transcript(lines: usize) -> String {
    let mut out = String::new();
    for i in 0..lines {
        out.push_str(&format!("{{\"type\":\"item\",\"content\":\"token {i} \"}}\n"));
    }
    out.push_str("{\"type\":\"end\",\"usage\":{\"total_tokens\":4096}}\n");
    out
}

fn decode_in_chunks(transcript: &str, chunk_bytes: usize) -> usize {
    let mut decoder = StreamDecoder::new(NullSink { bytes_seen: 0 });
    let mut rest = transcript;
    while !rest.is_empty() {
        let mut cut = chunk_bytes.min(rest.len());
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let (head, tail) = rest.split_at(cut);
        decoder.feed(head);
        rest = tail;
    }
    decoder.end();
    decoder.into_sink().bytes_seen
}

fn bench_decode(c: &mut Criterion) {
    let sse = sample_sse_transcript(1024);
    let ndjson = sample_ndjson_transcript(1024);

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(sse.len() as u64));
    group.bench_function("sse_64b_chunks", |b| {
        b.iter(|| decode_in_chunks(black_box(&sse), 64));
    });
    group.bench_function("sse_whole_body", |b| {
        b.iter(|| decode_in_chunks(black_box(&sse), usize::MAX));
    });
    group.throughput(Throughput::Bytes(ndjson.len() as u64));
    group.bench_function("ndjson_64b_chunks", |b| {
        b.iter(|| decode_in_chunks(black_box(&ndjson), 64));
    });
    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
