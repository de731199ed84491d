use cm256_rs::{decode, encode, Block, Params};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn fill(k: usize, block_bytes: usize) -> Vec<Vec<u8>> {
    (0..k)
        .map(|i| (0..block_bytes).map(|j| ((i + 13 * j) % 256) as u8).collect())
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for &(k, m, block_bytes) in &[(10usize, 4usize, 1400usize), (100, 30, 1296), (48, 96, 1400)] {
        let params = Params::new(block_bytes as u32, k as u8, m as u8);
        let originals = fill(k, block_bytes);
        let original_refs: Vec<&[u8]> = originals.iter().map(|v| v.as_slice()).collect();
        let mut recovery = vec![0u8; m * block_bytes];
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("k{k}_m{m}_b{block_bytes}")),
            &params,
            |b, &params| {
                b.iter(|| {
                    encode(params, black_box(&original_refs), black_box(&mut recovery)).unwrap();
                });
            },
        );
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for &(k, m, block_bytes) in &[(10usize, 4usize, 1400usize), (100, 30, 1296), (48, 96, 1400)] {
        let params = Params::new(block_bytes as u32, k as u8, m as u8);
        let originals = fill(k, block_bytes);
        let original_refs: Vec<&[u8]> = originals.iter().map(|v| v.as_slice()).collect();
        let mut recovery = vec![0u8; m * block_bytes];
        encode(params, &original_refs, &mut recovery).unwrap();

        let erase = m.min(k);
        let recovery_rows: Vec<&[u8]> = recovery.chunks(block_bytes).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("k{k}_m{m}_b{block_bytes}_erase{erase}")),
            &params,
            |b, &params| {
                b.iter(|| {
                    let mut owned: Vec<Vec<u8>> = Vec::with_capacity(k);
                    let mut tags: Vec<u8> = Vec::with_capacity(k);
                    for i in erase..k {
                        owned.push(originals[i].clone());
                        tags.push(i as u8);
                    }
                    for r in 0..erase {
                        owned.push(recovery_rows[r].to_vec());
                        tags.push((k + r) as u8);
                    }
                    let mut blocks: Vec<Block> = owned
                        .iter_mut()
                        .zip(tags.iter())
                        .map(|(d, &t)| Block::new(d.as_mut_slice(), t))
                        .collect();
                    decode(params, black_box(&mut blocks)).unwrap();
                });
            },
        );
    }
    group.finish();
}

criterion_group!(encode_decode_benches, bench_encode, bench_decode);
criterion_main!(encode_decode_benches);
