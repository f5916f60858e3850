// Dot product and norm kernels used by cosine similarity.
// Embedding models emit 384..3072 dimensions, so wide registers pay off;
// short vectors go straight to the scalar loop.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

#[cfg(target_arch = "x86_64")]
const MIN_DIM_AVX: usize = 32;

#[cfg(target_arch = "aarch64")]
const MIN_DIM_NEON: usize = 16;

/// Dot product of two equally sized slices.
///
/// Callers check the lengths; in debug builds a mismatch panics, in release
/// builds the shorter length wins.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "dot product of unequal slices");
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    #[cfg(target_arch = "x86_64")]
    {
        if len >= MIN_DIM_AVX
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
        {
            // SAFETY: both features were detected at runtime and the slices
            // have the same length.
            return unsafe { dot_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if len >= MIN_DIM_NEON && std::arch::is_aarch64_feature_detected!("neon") {
            // SAFETY: NEON was detected at runtime and the slices have the
            // same length.
            return unsafe { dot_neon(a, b) };
        }
    }

    dot_scalar(a, b)
}

/// Squared Euclidean norm
#[inline]
pub fn squared_norm(v: &[f32]) -> f32 {
    dot(v, v)
}

/// Euclidean norm
#[inline]
pub fn norm(v: &[f32]) -> f32 {
    squared_norm(v).sqrt()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn dot_avx2(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let mut i = 0;

    let mut acc1 = _mm256_setzero_ps();
    let mut acc2 = _mm256_setzero_ps();

    while i + 16 <= len {
        let x1 = _mm256_loadu_ps(a.as_ptr().add(i));
        let y1 = _mm256_loadu_ps(b.as_ptr().add(i));
        let x2 = _mm256_loadu_ps(a.as_ptr().add(i + 8));
        let y2 = _mm256_loadu_ps(b.as_ptr().add(i + 8));

        acc1 = _mm256_fmadd_ps(x1, y1, acc1);
        acc2 = _mm256_fmadd_ps(x2, y2, acc2);

        i += 16;
    }

    let combined = _mm256_add_ps(acc1, acc2);
    let high = _mm256_extractf128_ps(combined, 1);
    let low = _mm256_castps256_ps128(combined);
    let mut sum = _mm_add_ps(high, low);
    sum = _mm_hadd_ps(sum, sum);
    sum = _mm_hadd_ps(sum, sum);

    let mut total = _mm_cvtss_f32(sum);
    while i < len {
        total += a[i] * b[i];
        i += 1;
    }
    total
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn dot_neon(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let mut i = 0;

    let mut acc1 = vdupq_n_f32(0.0);
    let mut acc2 = vdupq_n_f32(0.0);

    while i + 8 <= len {
        let x1 = vld1q_f32(a.as_ptr().add(i));
        let y1 = vld1q_f32(b.as_ptr().add(i));
        let x2 = vld1q_f32(a.as_ptr().add(i + 4));
        let y2 = vld1q_f32(b.as_ptr().add(i + 4));

        acc1 = vfmaq_f32(acc1, x1, y1);
        acc2 = vfmaq_f32(acc2, x2, y2);

        i += 8;
    }

    let mut total = vaddvq_f32(vaddq_f32(acc1, acc2));
    while i < len {
        total += a[i] * b[i];
        i += 1;
    }
    total
}

/// Two accumulators so the adds can pipeline.
#[inline]
fn dot_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut even = 0.0f32;
    let mut odd = 0.0f32;

    let a_pairs = a.chunks_exact(2);
    let tail = a_pairs.remainder();
    for (x, y) in a_pairs.zip(b.chunks_exact(2)) {
        even += x[0] * y[0];
        odd += x[1] * y[1];
    }
    if let (Some(x), Some(y)) = (tail.first(), b.last()) {
        even += x * y;
    }

    even + odd
}
