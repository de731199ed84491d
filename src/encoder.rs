//! # Encoder
//!
//! Produces `m` recovery blocks from `k` original blocks. Row-outermost
//! iteration the way the teacher's repair-packet generator streams source
//! packets per output row: each recovery row keeps its own accumulator
//! register/vector live across the inner loop over originals, rather than
//! re-touching every original row once per output column.

use crate::cauchy;
use crate::error::Error;
use crate::kernel;
use crate::params::Params;
use rayon::prelude::*;

/// Recovery blocks under `k + m` originals-plus-row-count worth of work are
/// cheap enough sequentially that handing them to `rayon` costs more in
/// scheduling overhead than it saves; above it, per-row work parallelizes
/// cleanly since every recovery row writes disjoint output bytes.
const PARALLEL_ROW_BYTES_THRESHOLD: usize = 8192;

/// Encodes `originals` (exactly `k` blocks of `params.block_bytes` each)
/// into `recovery_out`, which must hold `m * block_bytes` bytes laid out as
/// `m` contiguous rows in row-major order. Rejects invalid params or
/// mismatched buffer lengths before writing anything.
pub fn encode(params: Params, originals: &[&[u8]], recovery_out: &mut [u8]) -> Result<(), Error> {
    params.validate()?;
    crate::init()?;

    let k = params.k();
    let m = params.m();
    let block_bytes = params.block_bytes as usize;

    if originals.len() != k {
        log::error!(
            "encode rejected: expected {} original blocks, got {}",
            k,
            originals.len()
        );
        return Err(Error::ParamsInvalid("originals length must equal original_count"));
    }
    for (i, block) in originals.iter().enumerate() {
        if block.len() != block_bytes {
            log::error!(
                "encode rejected: original block {} has length {}, expected {}",
                i,
                block.len(),
                block_bytes
            );
            return Err(Error::ParamsInvalid("original block length must equal block_bytes"));
        }
    }
    let expected_out = m * block_bytes;
    if recovery_out.len() != expected_out {
        log::error!(
            "encode rejected: recovery_out has length {}, expected {}",
            recovery_out.len(),
            expected_out
        );
        return Err(Error::ParamsInvalid("recovery_out length must equal recovery_count * block_bytes"));
    }

    log::debug!("encode: k={} m={} block_bytes={}", k, m, block_bytes);

    // Degenerate m=1 fast path: the single recovery row is the XOR of every
    // original, no Cauchy coefficients involved.
    if m == 1 {
        let row = &mut recovery_out[..block_bytes];
        row.copy_from_slice(originals[0]);
        for original in &originals[1..] {
            kernel::mem_xor(row, original, block_bytes);
        }
        return Ok(());
    }

    let rows = recovery_out.chunks_mut(block_bytes);
    if block_bytes * m >= PARALLEL_ROW_BYTES_THRESHOLD {
        rows.collect::<Vec<_>>()
            .into_par_iter()
            .enumerate()
            .for_each(|(r, row)| encode_row(row, r, k, block_bytes, originals));
    } else {
        for (r, row) in rows.enumerate() {
            encode_row(row, r, k, block_bytes, originals);
        }
    }

    Ok(())
}

fn encode_row(row: &mut [u8], r: usize, k: usize, block_bytes: usize, originals: &[&[u8]]) {
    let coeff0 = cauchy::recovery_coeff(k as u16, r as u16, 0);
    kernel::mem_mul(row, coeff0, originals[0], block_bytes);
    for (c, original) in originals.iter().enumerate().skip(1) {
        let coeff = cauchy::recovery_coeff(k as u16, r as u16, c as u16);
        kernel::mem_mac(row, coeff, original, block_bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_k3_m1_b4() {
        let params = Params::new(4, 3, 1);
        let originals: Vec<&[u8]> = vec![&[1, 2, 3, 4], &[5, 6, 7, 8], &[9, 10, 11, 12]];
        let mut recovery = vec![0u8; 4];
        encode(params, &originals, &mut recovery).unwrap();
        assert_eq!(recovery, vec![13, 14, 15, 0]);
    }

    #[test]
    fn rejects_wrong_original_count() {
        let params = Params::new(4, 3, 1);
        let originals: Vec<&[u8]> = vec![&[1, 2, 3, 4], &[5, 6, 7, 8]];
        let mut recovery = vec![0u8; 4];
        assert!(encode(params, &originals, &mut recovery).is_err());
    }

    #[test]
    fn rejects_mismatched_block_length() {
        let params = Params::new(4, 2, 1);
        let originals: Vec<&[u8]> = vec![&[1, 2, 3, 4], &[5, 6, 7]];
        let mut recovery = vec![0u8; 4];
        assert!(encode(params, &originals, &mut recovery).is_err());
    }

    #[test]
    fn rejects_undersized_recovery_out() {
        let params = Params::new(4, 3, 2);
        let originals: Vec<&[u8]> = vec![&[1, 2, 3, 4], &[5, 6, 7, 8], &[9, 10, 11, 12]];
        let mut recovery = vec![0u8; 4];
        assert!(encode(params, &originals, &mut recovery).is_err());
    }

    #[test]
    fn k1_m1_recovery_equals_original() {
        let params = Params::new(7, 1, 1);
        let original: &[u8] = &[1, 2, 3, 4, 5, 6, 7];
        let mut recovery = vec![0u8; 7];
        encode(params, &[original], &mut recovery).unwrap();
        assert_eq!(recovery, original);
    }
}
