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

//! Same-size separable convolution over a spatial plane, with the exact
//! adjoint of every border rule.
//!
//! The filter centre sits at tap `(len - 1) / 2` so that
//! `out[i] = sum_k taps[k] * src[i + k - centre]`, and out-of-range reads are
//! resolved by the [`BorderMode`]. The adjoint runs the identical index
//! arithmetic in scatter direction: a forward read from a replicated edge
//! sample becomes an additive fold onto that edge sample, and a read from
//! zero padding contributes nothing.

use crate::ScatSample;
use crate::border_mode::BorderMode;

#[inline]
pub(crate) fn filter_centre(len: usize) -> isize {
    ((len - 1) / 2) as isize
}

/// Convolves every row of a `height x width` plane with `taps`.
pub(crate) fn conv_rows<T: ScatSample>(
    src: &[T],
    height: usize,
    width: usize,
    taps: &[T],
    mode: BorderMode,
    dst: &mut [T],
) {
    debug_assert_eq!(src.len(), height * width);
    debug_assert_eq!(dst.len(), src.len());
    let centre = filter_centre(taps.len());
    for (src_row, dst_row) in src.chunks_exact(width).zip(dst.chunks_exact_mut(width)) {
        for (i, out) in dst_row.iter_mut().enumerate() {
            let mut acc = T::zero();
            for (k, &c) in taps.iter().enumerate() {
                let position = i as isize + k as isize - centre;
                if let Some(read) = mode.resolve(position, width) {
                    acc = c.mul_add(src_row[read], acc);
                }
            }
            *out = acc;
        }
    }
}

/// Adjoint of [`conv_rows`]: accumulates into `grad_src`.
pub(crate) fn conv_rows_adjoint<T: ScatSample>(
    grad_dst: &[T],
    height: usize,
    width: usize,
    taps: &[T],
    mode: BorderMode,
    grad_src: &mut [T],
) {
    debug_assert_eq!(grad_dst.len(), height * width);
    debug_assert_eq!(grad_src.len(), grad_dst.len());
    let centre = filter_centre(taps.len());
    for (gd_row, gs_row) in grad_dst
        .chunks_exact(width)
        .zip(grad_src.chunks_exact_mut(width))
    {
        for (i, &g) in gd_row.iter().enumerate() {
            for (k, &c) in taps.iter().enumerate() {
                let position = i as isize + k as isize - centre;
                if let Some(read) = mode.resolve(position, width) {
                    gs_row[read] = c.mul_add(g, gs_row[read]);
                }
            }
        }
    }
}

/// Convolves every column of a `height x width` plane with `taps`.
///
/// Works row-at-a-time so the inner loop stays contiguous.
pub(crate) fn conv_cols<T: ScatSample>(
    src: &[T],
    height: usize,
    width: usize,
    taps: &[T],
    mode: BorderMode,
    dst: &mut [T],
) {
    debug_assert_eq!(src.len(), height * width);
    debug_assert_eq!(dst.len(), src.len());
    let centre = filter_centre(taps.len());
    for (j, dst_row) in dst.chunks_exact_mut(width).enumerate() {
        for v in dst_row.iter_mut() {
            *v = T::zero();
        }
        for (k, &c) in taps.iter().enumerate() {
            let position = j as isize + k as isize - centre;
            if let Some(read) = mode.resolve(position, height) {
                let src_row = &src[read * width..read * width + width];
                for (out, &s) in dst_row.iter_mut().zip(src_row.iter()) {
                    *out = c.mul_add(s, *out);
                }
            }
        }
    }
}

/// Adjoint of [`conv_cols`]: accumulates into `grad_src`.
pub(crate) fn conv_cols_adjoint<T: ScatSample>(
    grad_dst: &[T],
    height: usize,
    width: usize,
    taps: &[T],
    mode: BorderMode,
    grad_src: &mut [T],
) {
    debug_assert_eq!(grad_dst.len(), height * width);
    debug_assert_eq!(grad_src.len(), grad_dst.len());
    let centre = filter_centre(taps.len());
    for (j, gd_row) in grad_dst.chunks_exact(width).enumerate() {
        for (k, &c) in taps.iter().enumerate() {
            let position = j as isize + k as isize - centre;
            if let Some(read) = mode.resolve(position, height) {
                let gs_row = &mut grad_src[read * width..read * width + width];
                for (gs, &g) in gs_row.iter_mut().zip(gd_row.iter()) {
                    *gs = c.mul_add(g, *gs);
                }
            }
        }
    }
}
