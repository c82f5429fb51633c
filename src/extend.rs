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

//! Boundary extension to the alignment a decomposition scale requires.
//!
//! For a spatial remainder `rem` from the target multiple `m`, the pad split
//! is `before = (m - rem) / 2`, `after = (m - rem) - before`. The leading pad
//! is a copy of the first `before` rows/columns and the trailing pad a copy
//! of the last `after`, so an aligned tensor passes through untouched and the
//! operation is idempotent. Input is never truncated.

use crate::ScatSample;
use crate::err::ScatError;
use crate::tensor::ImageTensor;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct PadSplit {
    pub(crate) before: usize,
    pub(crate) after: usize,
}

impl PadSplit {
    pub(crate) fn for_size(size: usize, multiple: usize) -> Self {
        let rem = size % multiple;
        if rem == 0 {
            return PadSplit { before: 0, after: 0 };
        }
        let before = (multiple - rem) / 2;
        PadSplit {
            before,
            after: (multiple - rem) - before,
        }
    }

    #[inline]
    fn padded(&self, size: usize) -> usize {
        self.before + size + self.after
    }

    /// Maps a padded index back onto the source index it was copied from.
    #[inline]
    fn source(&self, padded_index: usize, size: usize) -> usize {
        if padded_index < self.before {
            padded_index
        } else if padded_index < self.before + size {
            padded_index - self.before
        } else {
            size - self.after + (padded_index - self.before - size)
        }
    }

    fn validate(&self, size: usize) -> Result<(), ScatError> {
        let required = self.before.max(self.after);
        if size < required {
            return Err(ScatError::InputTooSmall(size, required));
        }
        Ok(())
    }
}

/// Pads the spatial dimensions of `x` until both are multiples of
/// `multiple`. Returns a copy even when already aligned.
pub(crate) fn pad_to_multiple<T: ScatSample>(
    x: &ImageTensor<T>,
    multiple: usize,
) -> Result<ImageTensor<T>, ScatError> {
    let rows = PadSplit::for_size(x.height, multiple);
    let cols = PadSplit::for_size(x.width, multiple);
    rows.validate(x.height)?;
    cols.validate(x.width)?;

    let (ph, pw) = (rows.padded(x.height), cols.padded(x.width));
    let mut out = ImageTensor::zeros(x.batch, x.channels, ph, pw)?;
    for b in 0..x.batch {
        for c in 0..x.channels {
            let src = x.plane(b, c);
            let dst = out.plane_mut(b, c);
            for (pj, dst_row) in dst.chunks_exact_mut(pw).enumerate() {
                let sj = rows.source(pj, x.height);
                let src_row = &src[sj * x.width..sj * x.width + x.width];
                for (pi, v) in dst_row.iter_mut().enumerate() {
                    *v = src_row[cols.source(pi, x.width)];
                }
            }
        }
    }
    Ok(out)
}

/// Exact adjoint of [`pad_to_multiple`]: gradient landing on a copied
/// boundary row/column is added back onto its source row/column.
pub(crate) fn fold_grad<T: ScatSample>(
    grad_padded: &ImageTensor<T>,
    height: usize,
    width: usize,
    multiple: usize,
) -> Result<ImageTensor<T>, ScatError> {
    let rows = PadSplit::for_size(height, multiple);
    let cols = PadSplit::for_size(width, multiple);
    let (ph, pw) = (rows.padded(height), cols.padded(width));
    if grad_padded.height != ph || grad_padded.width != pw {
        return Err(ScatError::GradientShapeMismatch(
            ph * pw,
            grad_padded.height * grad_padded.width,
        ));
    }

    let mut out = ImageTensor::zeros(grad_padded.batch, grad_padded.channels, height, width)?;
    for b in 0..grad_padded.batch {
        for c in 0..grad_padded.channels {
            let src = grad_padded.plane(b, c);
            let dst = out.plane_mut(b, c);
            for (pj, src_row) in src.chunks_exact(pw).enumerate() {
                let sj = rows.source(pj, height);
                let dst_row = &mut dst[sj * width..sj * width + width];
                for (pi, &g) in src_row.iter().enumerate() {
                    let si = cols.source(pi, width);
                    dst_row[si] = dst_row[si] + g;
                }
            }
        }
    }
    Ok(out)
}
