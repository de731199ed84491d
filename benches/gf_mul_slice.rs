use cm256_rs::kernel;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_mem_mac(c: &mut Criterion) {
    kernel::init_gf_tables();
    let src: Vec<u8> = (0..1400u32).map(|i| i as u8).collect();
    let mut dst = vec![0xAAu8; src.len()];

    c.bench_function("mem_mac_1400b", |bencher| {
        bencher.iter(|| {
            kernel::mem_mac(black_box(&mut dst), black_box(0x53), black_box(&src), src.len());
        });
    });
}

fn bench_mem_mul(c: &mut Criterion) {
    kernel::init_gf_tables();
    let src: Vec<u8> = (0..1400u32).map(|i| i as u8).collect();
    let mut dst = vec![0u8; src.len()];

    c.bench_function("mem_mul_1400b", |bencher| {
        bencher.iter(|| {
            kernel::mem_mul(black_box(&mut dst), black_box(0x53), black_box(&src), src.len());
        });
    });
}

criterion_group!(benches, bench_mem_mac, bench_mem_mul);
criterion_main!(benches);
