/*
 * // Copyright (c) the scatlet developers 08/2026. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */

//! Quad-to-complex mapping and 2x2 pooling, the two resolution-halving
//! steps of a decomposition stage.
//!
//! A real highpass plane with even dimensions holds four polyphase samples
//! per output location,
//!
//! ```text
//!   a b
//!   c d
//! ```
//!
//! which pair into two approximately analytic complex responses with
//! opposite orientations,
//!
//! ```text
//!   z1 = ((a - d) + j(b + c)) / sqrt(2)
//!   z2 = ((a + d) + j(b - c)) / sqrt(2)
//! ```
//!
//! Both mappings are linear, so their adjoints are plain scatters with the
//! same weights.

use crate::ScatSample;

/// Splits a full-resolution plane into the two half-resolution complex
/// responses of an oriented pair.
#[allow(clippy::too_many_arguments)]
pub(crate) fn quad_to_complex<T: ScatSample>(
    src: &[T],
    height: usize,
    width: usize,
    re1: &mut [T],
    im1: &mut [T],
    re2: &mut [T],
    im2: &mut [T],
) {
    debug_assert_eq!(src.len(), height * width);
    debug_assert!(height % 2 == 0 && width % 2 == 0);
    let (h2, w2) = (height / 2, width / 2);
    debug_assert_eq!(re1.len(), h2 * w2);
    let scale = T::from_f64(0.5).sqrt();
    for u in 0..h2 {
        let top = &src[2 * u * width..2 * u * width + width];
        let bottom = &src[(2 * u + 1) * width..(2 * u + 1) * width + width];
        let row = u * w2;
        for v in 0..w2 {
            let a = top[2 * v];
            let b = top[2 * v + 1];
            let c = bottom[2 * v];
            let d = bottom[2 * v + 1];
            re1[row + v] = (a - d) * scale;
            im1[row + v] = (b + c) * scale;
            re2[row + v] = (a + d) * scale;
            im2[row + v] = (b - c) * scale;
        }
    }
}

/// Adjoint of [`quad_to_complex`]: scatters the complex-pair gradient back
/// onto the full-resolution plane.
#[allow(clippy::too_many_arguments)]
pub(crate) fn complex_to_quad<T: ScatSample>(
    grad_re1: &[T],
    grad_im1: &[T],
    grad_re2: &[T],
    grad_im2: &[T],
    height: usize,
    width: usize,
    grad_src: &mut [T],
) {
    debug_assert_eq!(grad_src.len(), height * width);
    let (h2, w2) = (height / 2, width / 2);
    let scale = T::from_f64(0.5).sqrt();
    for u in 0..h2 {
        let row = u * w2;
        for v in 0..w2 {
            let g1r = grad_re1[row + v];
            let g1i = grad_im1[row + v];
            let g2r = grad_re2[row + v];
            let g2i = grad_im2[row + v];
            grad_src[2 * u * width + 2 * v] = (g1r + g2r) * scale;
            grad_src[2 * u * width + 2 * v + 1] = (g1i + g2i) * scale;
            grad_src[(2 * u + 1) * width + 2 * v] = (g1i - g2i) * scale;
            grad_src[(2 * u + 1) * width + 2 * v + 1] = (g2r - g1r) * scale;
        }
    }
}

/// 2x2 mean pooling of a plane with even dimensions.
pub(crate) fn avg_pool2<T: ScatSample>(src: &[T], height: usize, width: usize, dst: &mut [T]) {
    debug_assert!(height % 2 == 0 && width % 2 == 0);
    let (h2, w2) = (height / 2, width / 2);
    debug_assert_eq!(dst.len(), h2 * w2);
    let quarter = T::from_f64(0.25);
    for u in 0..h2 {
        let top = &src[2 * u * width..2 * u * width + width];
        let bottom = &src[(2 * u + 1) * width..(2 * u + 1) * width + width];
        let row = u * w2;
        for v in 0..w2 {
            dst[row + v] =
                (top[2 * v] + top[2 * v + 1] + bottom[2 * v] + bottom[2 * v + 1]) * quarter;
        }
    }
}

/// Adjoint of [`avg_pool2`]: spreads a quarter of each pooled gradient onto
/// the four source samples.
pub(crate) fn avg_pool2_adjoint<T: ScatSample>(
    grad_dst: &[T],
    height: usize,
    width: usize,
    grad_src: &mut [T],
) {
    let (h2, w2) = (height / 2, width / 2);
    debug_assert_eq!(grad_dst.len(), h2 * w2);
    debug_assert_eq!(grad_src.len(), height * width);
    let quarter = T::from_f64(0.25);
    for u in 0..h2 {
        let row = u * w2;
        for v in 0..w2 {
            let g = grad_dst[row + v] * quarter;
            grad_src[2 * u * width + 2 * v] = g;
            grad_src[2 * u * width + 2 * v + 1] = g;
            grad_src[(2 * u + 1) * width + 2 * v] = g;
            grad_src[(2 * u + 1) * width + 2 * v + 1] = g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcg(seed: &mut u64) -> f64 {
        *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((*seed >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }

    fn dot(a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_quad_energy_preserved() {
        // The mapping is orthonormal per quad, so energy is preserved.
        let mut seed = 3u64;
        let src: Vec<f64> = (0..8 * 8).map(|_| lcg(&mut seed)).collect();
        let mut re1 = vec![0.0; 16];
        let mut im1 = vec![0.0; 16];
        let mut re2 = vec![0.0; 16];
        let mut im2 = vec![0.0; 16];
        quad_to_complex(&src, 8, 8, &mut re1, &mut im1, &mut re2, &mut im2);
        let out_energy = dot(&re1, &re1) + dot(&im1, &im1) + dot(&re2, &re2) + dot(&im2, &im2);
        assert!((dot(&src, &src) - out_energy).abs() < 1e-12);
    }

    #[test]
    fn test_quad_adjoint_identity() {
        let mut seed = 5u64;
        let src: Vec<f64> = (0..6 * 4).map(|_| lcg(&mut seed)).collect();
        let y: Vec<f64> = (0..4 * 6).map(|_| lcg(&mut seed)).collect();
        let (y1r, rest) = y.split_at(6);
        let (y1i, rest) = rest.split_at(6);
        let (y2r, y2i) = rest.split_at(6);
        let mut re1 = vec![0.0; 6];
        let mut im1 = vec![0.0; 6];
        let mut re2 = vec![0.0; 6];
        let mut im2 = vec![0.0; 6];
        quad_to_complex(&src, 6, 4, &mut re1, &mut im1, &mut re2, &mut im2);
        let forward = dot(&re1, y1r) + dot(&im1, y1i) + dot(&re2, y2r) + dot(&im2, y2i);
        let mut back = vec![0.0; 6 * 4];
        complex_to_quad(y1r, y1i, y2r, y2i, 6, 4, &mut back);
        assert!((forward - dot(&src, &back)).abs() < 1e-12);
    }

    #[test]
    fn test_pool_and_adjoint() {
        let src = vec![1.0f64, 3.0, 5.0, 7.0, 2.0, 2.0, 6.0, 6.0];
        let mut dst = vec![0.0; 2];
        avg_pool2(&src, 2, 4, &mut dst);
        assert_eq!(dst, vec![2.0, 6.0]);
        let mut back = vec![0.0; 8];
        avg_pool2_adjoint(&[4.0, 8.0], 2, 4, &mut back);
        assert_eq!(back, vec![1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 2.0, 2.0]);
    }
}
