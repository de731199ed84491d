// Copyright (c) 2024, The QuicFuscate Project Authors.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are
// met:
//
//     * Redistributions of source code must retain the above copyright
//       notice, this list of conditions and the following disclaimer.
//
//     * Redistributions in binary form must reproduce the above
//       copyright notice, this list of conditions and the following disclaimer
//       in the documentation and/or other materials provided with the
//       distribution.
//
//     * Neither the name of the copyright holder nor the names of its
//       contributors may be used to endorse or promote products derived from
//       this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
// "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
// LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT
// OWNER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
// SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
// LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE,
// DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY
// THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
// (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! # cm256-rs — GF(256) Cauchy Reed-Solomon erasure coding
//!
//! Given `k` equal-sized original blocks, [`encode`] produces `m` recovery
//! blocks such that any `k` of the combined `k + m` blocks let [`decode`]
//! reconstruct every original. The core is synchronous, allocation-light on
//! the hot path, and reentrant after a one-time [`init`] that builds the
//! GF(256) field tables and detects the best available SIMD dispatch path.
//!
//! ```
//! use cm256_rs::{encode, decode, Params, Block};
//!
//! let params = Params::new(4, 3, 1);
//! let originals: [&[u8]; 3] = [&[1, 2, 3, 4], &[5, 6, 7, 8], &[9, 10, 11, 12]];
//! let mut recovery = [0u8; 4];
//! encode(params, &originals, &mut recovery).unwrap();
//! assert_eq!(recovery, [13, 14, 15, 0]);
//!
//! let mut a = originals[0].to_vec();
//! let mut c = originals[2].to_vec();
//! let mut r = recovery.to_vec();
//! let mut blocks = [Block::new(&mut a, 0), Block::new(&mut c, 2), Block::new(&mut r, 3)];
//! decode(params, &mut blocks).unwrap();
//! let recovered = blocks.iter().find(|b| b.index == 1).unwrap();
//! assert_eq!(recovered.data, &[5, 6, 7, 8]);
//! ```

pub mod cauchy;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod kernel;
pub mod params;
pub mod simd;

pub use decoder::decode;
pub use encoder::encode;
pub use error::Error;
pub use params::{original_index_tag, recovery_index_tag, Block, Params};

/// Builds the GF(256) field tables and warms up SIMD feature detection.
/// Idempotent and safe to call concurrently or repeatedly; only the first
/// call does any work. `encode`/`decode` call this themselves, so using
/// them directly never requires a prior explicit call — call it yourself
/// only to pay the one-time cost ahead of a latency-sensitive first call.
///
/// Always succeeds on a conformant CPU; the `Result` is reserved for
/// [`Error::InitUnavailable`], which this implementation never returns.
pub fn init() -> Result<(), Error> {
    kernel::init_gf_tables();
    simd::warm_up();
    Ok(())
}
