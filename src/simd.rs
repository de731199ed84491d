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

//! # Runtime CPU Feature Dispatch
//!
//! Detects SSSE3/AVX2/NEON once and caches the result behind a `SimdPolicy`
//! marker, the way the kernel's bulk GF(256) ops pick their widest safe
//! vector path. This is intentionally narrower than a general-purpose
//! dispatch framework: the kernel only ever needs to know "do I have a
//! byte-shuffle-capable vector unit or not", so there is one bit of policy
//! that matters (`is_vectorized`) behind marker types for documentation.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Once;

#[cfg(target_arch = "aarch64")]
use std::arch::is_aarch64_feature_detected;
#[cfg(target_arch = "x86_64")]
use std::arch::is_x86_feature_detected;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuFeature {
    Ssse3,
    Avx2,
    Neon,
}

struct FeatureDetector {
    features: HashMap<CpuFeature, bool>,
}

static INIT: Once = Once::new();
static mut DETECTOR: Option<FeatureDetector> = None;

impl FeatureDetector {
    fn instance() -> &'static Self {
        INIT.call_once(|| {
            let mut features = HashMap::new();
            #[cfg(target_arch = "x86_64")]
            {
                features.insert(CpuFeature::Ssse3, is_x86_feature_detected!("ssse3"));
                features.insert(CpuFeature::Avx2, is_x86_feature_detected!("avx2"));
            }
            #[cfg(target_arch = "aarch64")]
            {
                features.insert(CpuFeature::Neon, is_aarch64_feature_detected!("neon"));
            }
            unsafe {
                DETECTOR = Some(FeatureDetector { features });
            }
        });
        unsafe { DETECTOR.as_ref().unwrap() }
    }

    fn has_feature(&self, feature: CpuFeature) -> bool {
        *self.features.get(&feature).unwrap_or(&false)
    }
}

/// Execution policy selected at init time for the bulk GF(256) ops.
pub trait SimdPolicy: Any {
    fn as_any(&self) -> &dyn Any;
}

pub struct Avx2;
impl SimdPolicy for Avx2 {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct Ssse3;
impl SimdPolicy for Ssse3 {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct Neon;
impl SimdPolicy for Neon {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct Scalar;
impl SimdPolicy for Scalar {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Dispatches to the best available policy for this CPU. The selection
/// itself runs once (cached by `FeatureDetector::instance`); this call is
/// just a cheap match over the cached result.
pub fn dispatch<F, R>(f: F) -> R
where
    F: FnOnce(&dyn SimdPolicy) -> R,
{
    let detector = FeatureDetector::instance();
    if detector.has_feature(CpuFeature::Avx2) {
        f(&Avx2)
    } else if detector.has_feature(CpuFeature::Ssse3) {
        f(&Ssse3)
    } else if detector.has_feature(CpuFeature::Neon) {
        f(&Neon)
    } else {
        f(&Scalar)
    }
}

/// Whether `policy` represents a byte-shuffle-capable vector unit, as
/// opposed to the scalar fallback.
pub fn is_vectorized(policy: &dyn SimdPolicy) -> bool {
    policy.as_any().is::<Avx2>() || policy.as_any().is::<Ssse3>() || policy.as_any().is::<Neon>()
}

/// Forces detection to run (idempotent); called from `init()` so the first
/// `encode`/`decode` call never pays the detection cost.
pub fn warm_up() {
    FeatureDetector::instance();
}
