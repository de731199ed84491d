//! # Decoder
//!
//! Reconstructs missing originals from any `k` surviving blocks (originals,
//! recoveries, or a mix) by reducing each recovery payload to a combination
//! over only the missing columns, then solving the resulting `e x e` system
//! over GF(256) by Gauss-Jordan elimination with leftmost-nonzero pivoting —
//! the same row-reduction shape the teacher's sparse solver uses, applied
//! here to the dense `e x e` submatrix this problem always produces.

use crate::cauchy;
use crate::error::Error;
use crate::kernel;
use crate::params::{Block, Params};

/// Recovers every missing original in `blocks` (exactly `k` descriptors,
/// mixing present originals and recoveries, tags pairwise distinct) in
/// place. Descriptors that were already present originals are left
/// untouched; descriptors that were recoveries are rewritten to hold the
/// missing original they resolve to, with `index` updated to match.
///
/// Returns before mutating anything if params are invalid or the tags
/// don't form a legal input (duplicates, out of range, wrong count).
pub fn decode(params: Params, blocks: &mut [Block]) -> Result<(), Error> {
    params.validate()?;
    crate::init()?;

    let k = params.k();
    let m = params.m();
    let total = params.total();
    let block_bytes = params.block_bytes as usize;

    if blocks.len() != k {
        log::error!(
            "decode rejected: expected {} blocks, got {}",
            k,
            blocks.len()
        );
        return Err(Error::ParamsInvalid("blocks length must equal original_count"));
    }

    let mut seen = [false; 256];
    for block in blocks.iter() {
        if block.data.len() != block_bytes {
            log::error!(
                "decode rejected: block tag {} has length {}, expected {}",
                block.index,
                block.data.len(),
                block_bytes
            );
            return Err(Error::ParamsInvalid("block length must equal block_bytes"));
        }
        if block.index as usize >= total {
            log::error!("decode rejected: tag {} is out of range [0, {})", block.index, total);
            return Err(Error::BlockIndexInvalid("tag out of range"));
        }
        if seen[block.index as usize] {
            log::error!("decode rejected: duplicate tag {}", block.index);
            return Err(Error::BlockIndexInvalid("duplicate tag"));
        }
        seen[block.index as usize] = true;
    }

    // Which blocks[] positions are present originals vs. recoveries, in the
    // order they appear in `blocks`.
    let mut present_positions: Vec<usize> = Vec::new();
    let mut recovery_positions: Vec<usize> = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if (block.index as usize) < k {
            present_positions.push(i);
        } else {
            recovery_positions.push(i);
        }
    }

    let e = recovery_positions.len();
    if e == 0 {
        log::debug!("decode: no erasures, nothing to do");
        return Ok(());
    }
    log::debug!("decode: k={} m={} erasures={}", k, m, e);

    let present_tags: Vec<u8> = present_positions.iter().map(|&i| blocks[i].index).collect();
    let present_data: Vec<Vec<u8>> = present_positions
        .iter()
        .map(|&i| blocks[i].data.to_vec())
        .collect();
    let recovery_rows: Vec<u8> = recovery_positions
        .iter()
        .map(|&i| blocks[i].index - params.original_count)
        .collect();

    // `seen` already marks every tag that appears among `blocks`; a missing
    // original is exactly a tag in [0, k) that never showed up there.
    let mut missing: Vec<u8> = Vec::with_capacity(e);
    for c in 0..k as u8 {
        if !seen[c as usize] {
            missing.push(c);
        }
    }
    debug_assert_eq!(missing.len(), e);

    // Coefficient the encoder actually used for (recovery row r, original
    // column c): the m=1 degenerate path used 1 everywhere rather than the
    // general Cauchy formula, so decode must mirror that exactly.
    let coeff = |r: u8, c: u8| -> u8 {
        if m == 1 {
            1
        } else {
            cauchy::recovery_coeff(k as u16, r as u16, c as u16)
        }
    };

    let mut final_positions = recovery_positions.clone();
    {
        let mut recovery_bufs: Vec<&mut [u8]> = blocks
            .iter_mut()
            .filter(|b| (b.index as usize) >= k)
            .map(|b| &mut b.data[..])
            .collect();

        // Step b: subtract every present original's contribution so each
        // recovery payload holds only the sum over missing columns.
        for (row, buf) in recovery_bufs.iter_mut().enumerate() {
            let r = recovery_rows[row];
            for (j, &tag) in present_tags.iter().enumerate() {
                let c = coeff(r, tag);
                kernel::mem_mac(buf, c, &present_data[j], block_bytes);
            }
        }

        if e == 1 {
            let a00 = coeff(recovery_rows[0], missing[0]);
            if a00 != 1 {
                let inv_a = kernel::inv(a00);
                for b in recovery_bufs[0].iter_mut() {
                    *b = kernel::mul(inv_a, *b);
                }
            }
        } else {
            let mut matrix: Vec<Vec<u8>> = (0..e)
                .map(|row| {
                    (0..e)
                        .map(|col| coeff(recovery_rows[row], missing[col]))
                        .collect()
                })
                .collect();
            gauss_jordan_solve(&mut matrix, &mut recovery_bufs, &mut final_positions, e, block_bytes)?;
        }
    }

    for (row, &pos) in final_positions.iter().enumerate() {
        blocks[pos].index = missing[row];
    }

    Ok(())
}

/// Reduces `matrix` (`n x n` over GF(256)) to the identity by Gauss-Jordan
/// elimination, applying every row operation simultaneously to `bufs`
/// (block_bytes-wide payload rows) and `positions` (which `blocks[]` slot
/// each row currently tracks) so payload and bookkeeping stay in lockstep
/// across pivot swaps. On return, `bufs[i]` holds the column-`i` unknown.
fn gauss_jordan_solve(
    matrix: &mut [Vec<u8>],
    bufs: &mut [&mut [u8]],
    positions: &mut [usize],
    n: usize,
    block_bytes: usize,
) -> Result<(), Error> {
    for col in 0..n {
        let pivot = (col..n).find(|&r| matrix[r][col] != 0);
        let pivot = match pivot {
            Some(p) => p,
            None => {
                log::error!("decode: singular coefficient matrix at column {}", col);
                return Err(Error::BlockIndexInvalid("singular coefficient matrix"));
            }
        };
        log::trace!("decode: pivot for column {} is row {}", col, pivot);
        if pivot != col {
            matrix.swap(pivot, col);
            bufs.swap(pivot, col);
            positions.swap(pivot, col);
        }

        let pivot_val = matrix[col][col];
        if pivot_val != 1 {
            let inv_p = kernel::inv(pivot_val);
            for v in matrix[col].iter_mut() {
                *v = kernel::mul(*v, inv_p);
            }
            for b in bufs[col].iter_mut() {
                *b = kernel::mul(inv_p, *b);
            }
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = matrix[row][col];
            if factor == 0 {
                continue;
            }
            let pivot_row: Vec<u8> = matrix[col].clone();
            for (c, pv) in pivot_row.iter().enumerate() {
                matrix[row][c] ^= kernel::mul(factor, *pv);
            }
            mac_row_from_col(bufs, row, col, factor, block_bytes);
        }
    }
    Ok(())
}

/// `bufs[row] ^= factor * bufs[col]`, for `row != col`, via a disjoint
/// split of the slice so both a mutable and a read-only view of the same
/// backing slice coexist safely.
fn mac_row_from_col(bufs: &mut [&mut [u8]], row: usize, col: usize, factor: u8, n: usize) {
    if row < col {
        let (lo, hi) = bufs.split_at_mut(col);
        kernel::mem_mac(&mut *lo[row], factor, &*hi[0], n);
    } else {
        let (lo, hi) = bufs.split_at_mut(row);
        kernel::mem_mac(&mut *hi[0], factor, &*lo[col], n);
    }
}
