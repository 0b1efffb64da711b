use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mrt_recall::data::catalog::StationCatalog;
use mrt_recall::data::station::RawStationRecord;
use mrt_recall::game::index::{GuessIndex, GuessLanguage};

fn synthetic_records(count: usize) -> Vec<RawStationRecord> {
    (0..count)
        .map(|i| RawStationRecord {
            stn_code: format!("NS{i}"),
            mrt_station_english: format!("Station Number {i}"),
            mrt_station_pinyin: format!("zhan {i}"),
            mrt_station_chinese: format!("站{i}"),
            abbreviation: Some(format!("S{i:02}")),
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let records = synthetic_records(200);
    let catalog = StationCatalog::build(&records);
    let index = GuessIndex::build(&catalog);

    c.bench_function("resolve_hit_english", |b| {
        b.iter(|| index.resolve(GuessLanguage::English, black_box("Station Number 137")))
    });

    c.bench_function("resolve_miss_english", |b| {
        b.iter(|| index.resolve(GuessLanguage::English, black_box("Not A Real Station")))
    });

    c.bench_function("index_build_200_stations", |b| {
        b.iter(|| GuessIndex::build(black_box(&catalog)))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
