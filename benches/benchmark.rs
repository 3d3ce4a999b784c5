//! パフォーマンスベンチマーク
//!
//! シート数・行数の異なるワークブックを生成し、逐次変換と並列変換の処理時間を比較します。
//! 縦長シートでは行数に対する処理時間の伸び方を測定します。
//!
//! メモリ使用量の測定は別途、valgrindやheaptrackなどのツールを使用してください。

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_xlsxwriter::{Workbook, XlsxError};
use sheetzip::{Converter, ConverterBuilder};

/// ベンチマーク用のワークブックを生成
fn generate_workbook(sheets: usize, rows: u32) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    for s in 0..sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(format!("Sheet {}", s + 1))?;
        worksheet.write_string(0, 0, "id")?;
        worksheet.write_string(0, 1, "name")?;
        worksheet.write_string(0, 2, "amount")?;
        for r in 1..=rows {
            worksheet.write_number(r, 0, r as f64)?;
            worksheet.write_string(r, 1, format!("item, {}", r))?;
            worksheet.write_number(r, 2, r as f64 * 1.25)?;
        }
    }
    workbook.save_to_buffer()
}

fn converter(parallel: bool) -> Converter {
    ConverterBuilder::new()
        .with_max_payload_size(64 * 1024 * 1024)
        .with_accepted_extensions([".xlsx"])
        .with_parallel(parallel)
        .build()
        .unwrap()
}

/// 小さなワークブック1件あたりの処理時間
fn benchmark_small_workbook(c: &mut Criterion) {
    let data = generate_workbook(3, 100).unwrap();
    let converter = converter(false);

    let mut group = c.benchmark_group("small_workbook");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("3_sheets_100_rows", |b| {
        b.iter(|| {
            let archive = converter
                .convert(black_box(&data), black_box("small.xlsx"))
                .unwrap();
            black_box(archive)
        })
    });
    group.finish();
}

/// 逐次変換と並列変換の比較
fn benchmark_sequential_vs_parallel(c: &mut Criterion) {
    let data = generate_workbook(8, 5_000).unwrap();
    let sequential = converter(false);
    let parallel = converter(true);

    let mut group = c.benchmark_group("many_sheets");
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for (label, converter) in [("sequential", &sequential), ("parallel", &parallel)] {
        group.bench_with_input(BenchmarkId::new(label, "8x5000"), &data, |b, data| {
            b.iter(|| {
                let archive = converter.convert(black_box(data), "many.xlsx").unwrap();
                black_box(archive)
            })
        });
    }
    group.finish();
}

/// 1列だけの縦長シート（行数に対して処理時間が線形に伸びることを確認）
fn benchmark_tall_sheet(c: &mut Criterion) {
    let converter = converter(false);

    let mut group = c.benchmark_group("tall_sheet");
    group.sample_size(10);

    for rows in [20_000u32, 80_000] {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for r in 0..rows {
            worksheet.write_number(r, 0, r as f64).unwrap();
        }
        let data = workbook.save_to_buffer().unwrap();

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| {
                let archive = converter.convert(black_box(data), "tall.xlsx").unwrap();
                black_box(archive)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_small_workbook,
    benchmark_sequential_vs_parallel,
    benchmark_tall_sheet
);
criterion_main!(benches);
