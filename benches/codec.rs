use std::hint::black_box;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use gridcode::{DataMatrixBuilder, DataMatrixReader, ECLevel, QRBuilder, QRReader, SymbolShape};

const ROUNDS: u32 = 200;

fn time<F: FnMut()>(mut f: F) -> Duration {
    let start = Instant::now();
    for _ in 0..ROUNDS {
        f();
    }
    start.elapsed() / ROUNDS
}

fn print_row(name: &str, encode: Duration, decode: Duration) {
    println!("| {name:<24}| {:>12.1?} | {:>12.1?} |", encode, decode);
}

fn benchmark_qr() {
    for (name, len) in [("short", 20), ("medium", 400), ("long", 2000)] {
        let data = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ abcdefghij".repeat(len / 46 + 1);
        let data = &data.as_bytes()[..len];
        for ecl in ECLevel::ALL {
            let Ok(qr) = QRBuilder::new(data).ec_level(ecl).build() else { continue };
            let m = qr.to_bit_matrix();
            let enc = time(|| {
                black_box(QRBuilder::new(black_box(data)).ec_level(ecl).build().ok());
            });
            let dec = time(|| {
                black_box(QRReader::read(black_box(&m)).ok());
            });
            print_row(&format!("QR {name} {ecl:?} v{}", *qr.version()), enc, dec);
        }
    }
}

fn benchmark_data_matrix() {
    for (name, len) in [("short", 20), ("medium", 400), ("long", 1500)] {
        let data: Vec<u8> = (0..len).map(|i| b'0' + (i % 10) as u8).collect();
        for shape in [SymbolShape::Square, SymbolShape::Any] {
            let Ok(dm) = DataMatrixBuilder::new(&data).shape(shape).build() else { continue };
            let m = dm.to_bit_matrix();
            let enc = time(|| {
                black_box(DataMatrixBuilder::new(black_box(&data)).shape(shape).build().ok());
            });
            let dec = time(|| {
                black_box(DataMatrixReader::read(black_box(&m)).ok());
            });
            print_row(&format!("DM {name} {}x{}", dm.height(), dm.width()), enc, dec);
        }
    }
}

fn benchmark_parallel_decode() {
    let symbols: Vec<_> = (0..1000)
        .map(|i| QRBuilder::new(format!("Parallel {i}").as_bytes()).build().map(|q| q.to_bit_matrix()))
        .collect::<Result<_, _>>()
        .unwrap_or_default();

    let start = Instant::now();
    let ok = symbols.par_iter().filter(|m| QRReader::read(m).is_ok()).count();
    println!("Parallel decode: {ok}/{} symbols in {:?}", symbols.len(), start.elapsed());
}

fn main() {
    println!("Running gridcode codec benchmarks");
    println!("=================================\n");

    let divider = "-".repeat(57);
    println!("{divider}");
    println!("| {:<24}| {:>12} | {:>12} |", "Case", "Encode", "Decode");
    println!("{divider}");
    benchmark_qr();
    benchmark_data_matrix();
    println!("{divider}\n");

    benchmark_parallel_decode();
}
