use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use eegload::curry::{parse_rs3, samples_from_bytes, ParseMode};
use eegload::filter::{butter_bandpass, sosfiltfilt_inplace};
use eegload::read_curry;
use ndarray::Array2;
use std::path::{Path, PathBuf};

const N_CH: usize = 32;
const SFREQ: usize = 500;
const SECONDS: usize = 60;

fn labels() -> Vec<String> {
    (0..N_CH - 1).map(|c| format!("E{c}")).chain(["Trigger".to_string()]).collect()
}

fn rs3_text() -> String {
    let labels = labels();
    let mut s = String::from("NUMBERS START_LIST\n");
    (1..=labels.len()).for_each(|i| s.push_str(&format!("{i}\n")));
    s.push_str("NUMBERS END_LIST\nLABELS START_LIST\n");
    labels.iter().for_each(|l| s.push_str(&format!("{l}\n")));
    s.push_str("LABELS END_LIST\n");
    s
}

fn dat_bytes() -> Vec<u8> {
    (0..SFREQ * SECONDS * N_CH)
        .flat_map(|i| ((i % 997) as f32 * 0.1).to_le_bytes())
        .collect()
}

fn write_triplet(dir: &Path) -> PathBuf {
    let base = dir.join("bench");
    std::fs::write(base.with_extension("dat"), dat_bytes()).unwrap();
    std::fs::write(base.with_extension("rs3"), rs3_text()).unwrap();
    std::fs::write(
        base.with_extension("dap"),
        format!("NumSamples = {}\nNumTrials = 1\nSampleFreqHz = {SFREQ}\n", SFREQ * SECONDS),
    )
    .unwrap();
    base
}

fn bench_read_curry(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let base = write_triplet(dir.path());
    c.bench_function("read_curry [30000×32 f32]", |b| {
        b.iter(|| {
            let rec = read_curry(black_box(&base)).unwrap();
            black_box(rec.n_channels())
        })
    });
}

fn bench_parse_rs3(c: &mut Criterion) {
    let text = rs3_text();
    c.bench_function("parse_rs3 32 channels", |b| {
        b.iter(|| black_box(parse_rs3(black_box(&text), ParseMode::Lenient).unwrap().len()))
    });
}

fn bench_dat_reshape(c: &mut Criterion) {
    let bytes = dat_bytes();
    c.bench_function("samples_from_bytes [30000×32]", |b| {
        b.iter(|| black_box(samples_from_bytes(black_box(&bytes), N_CH, SFREQ * SECONDS).unwrap().nrows()))
    });
}

fn bench_bandpass(c: &mut Criterion) {
    let data = Array2::from_shape_fn((SFREQ * 10, N_CH), |(t, ch)| ((t * (ch + 1)) as f32 * 0.01).sin());
    let sos = butter_bandpass(5, 1.0, 40.0, SFREQ as f32).unwrap();
    c.bench_function("sosfiltfilt 10 s × 32 ch", |b| {
        b.iter(|| {
            let mut d = data.clone();
            sosfiltfilt_inplace(&mut d, &sos);
            black_box(d[[0, 0]])
        })
    });
}

criterion_group!(benches, bench_read_curry, bench_parse_rs3, bench_dat_reshape, bench_bandpass);
criterion_main!(benches);
