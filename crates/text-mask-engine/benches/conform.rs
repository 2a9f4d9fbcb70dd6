use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use text_mask_engine::{ConformConfig, MaskOptions, MaskedInput, adjust_caret_position, conform_to_mask};

const PHONE: &str = "(111) 111-1111";

fn bench_conform(c: &mut Criterion) {
    let mut group = c.benchmark_group("conform");

    group.bench_function("single_keystroke", |b| {
        let config = ConformConfig::default().with_previous("(555) 12_-____");
        b.iter(|| {
            let result = conform_to_mask(black_box("(555) 123_-____"), PHONE, &config).unwrap();
            black_box(adjust_caret_position("(555) 12_-____", &result, 9))
        });
    });

    group.bench_function("paste", |b| {
        let config = ConformConfig::default().with_previous("(___) ___-____");
        b.iter(|| {
            let result =
                conform_to_mask(black_box("5551234567(___) ___-____"), PHONE, &config).unwrap();
            black_box(adjust_caret_position("(___) ___-____", &result, 10))
        });
    });

    let long_mask = "1111 ".repeat(64);
    group.bench_function("long_mask", |b| {
        let input = "1234".repeat(64);
        b.iter(|| black_box(conform_to_mask(black_box(&input), &long_mask, &ConformConfig::default())))
    });

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    c.bench_function("type_phone_number", |b| {
        b.iter(|| {
            let mut field = MaskedInput::new(PHONE, MaskOptions::default()).unwrap();
            let mut text = String::new();
            let mut caret = 0;
            for digit in "5551234567".chars() {
                let at = text.char_indices().nth(caret).map_or(text.len(), |(i, _)| i);
                text.insert(at, digit);
                caret += 1;
                if let Some(patch) = field.update(text.as_str(), caret).unwrap() {
                    text = patch.value;
                    caret = patch.caret;
                }
            }
            black_box(text)
        });
    });
}

criterion_group!(benches, bench_conform, bench_session);
criterion_main!(benches);
