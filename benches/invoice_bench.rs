use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use ubl_invoice::core::*;
use ubl_invoice::ubl;

fn lines(n: usize) -> Vec<LineInput> {
    (1..=n)
        .map(|i| {
            LineInput::new(dec!(2), dec!(9.99), dec!(21), format!("Item {i}"), "Bench item")
                .unit("C62")
        })
        .collect()
}

fn build_invoice(n: usize) -> Invoice {
    let mut inv = Invoice::with_issue_date("BENCH-001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    inv.set_supplier("Benchmark BV", "BE0123456789");
    inv.set_supplier_address(PostalAddress::new("Hoofdstraat 1", "Brussel", "1000", "BE"));
    inv.set_customer("Klant NV", "BE9876543210");
    inv.set_customer_address(PostalAddress::new("Kerkstraat 42", "Gent", "9000", "BE"));
    inv.set_payment_means("BE71096123456769", "GKCCBEBB");
    inv.add_lines(&lines(n));
    inv
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_lines");
    for n in [10usize, 1000] {
        let input = lines(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| black_box(aggregate_lines(black_box(input), dec!(21), "EUR")));
        });
    }
    group.finish();
}

fn bench_ubl_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("ubl_serialize");
    for n in [10usize, 1000] {
        let invoice = build_invoice(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &invoice, |b, invoice| {
            b.iter(|| black_box(ubl::to_ubl_xml(black_box(invoice))));
        });
    }
    group.finish();
}

fn bench_ubl_parse(c: &mut Criterion) {
    let xml = ubl::to_ubl_xml(&build_invoice(10)).unwrap();
    c.bench_function("ubl_parse", |b| {
        b.iter(|| black_box(ubl::from_ubl_xml(black_box(&xml))));
    });
}

fn bench_attach(c: &mut Criterion) {
    let payload = vec![0x25u8; 256 * 1024];
    let mut invoice = build_invoice(1);
    c.bench_function("attach_256k", |b| {
        b.iter(|| invoice.attach_bytes(black_box(&payload), "blob.bin", "Blob"));
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_ubl_serialize,
    bench_ubl_parse,
    bench_attach,
);
criterion_main!(benches);
