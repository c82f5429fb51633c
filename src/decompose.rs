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

//! One decomposition scale: separable filtering, the quad-to-complex split
//! into six oriented complex sub-bands, the smoothed magnitude, and the
//! pooled lowpass. The backward pass walks the same graph in reverse with
//! the exact adjoint of every linear step.
//!
//! Band indices follow the usual dual-tree ordering of orientations at
//! roughly 15, 45, 75, 105, 135 and 165 degrees. The three filter branches
//! each produce one conjugate pair: bands (0, 5) from row-bandpass with
//! column-lowpass, bands (2, 3) from row-lowpass with column-bandpass, and
//! bands (1, 4) from the diagonal branch.

use crate::ScatSample;
use crate::border_mode::BorderMode;
use crate::convolve::{conv_cols, conv_cols_adjoint, conv_rows, conv_rows_adjoint};
use crate::err::{ScatError, try_vec};
use crate::filter_bank::FilterBank;
use crate::magnitude::{
    magnitude_backward, magnitude_backward_pooled, magnitude_forward, magnitude_forward_pooled,
};
use crate::quad::{avg_pool2, avg_pool2_adjoint, complex_to_quad, quad_to_complex};
use crate::tensor::{BandTensor, ImageTensor, ScatCoeffs};

pub(crate) const ORIENTATIONS: usize = 6;

/// The conjugate-pair band slots produced by each filter branch.
const BRANCH_SLOTS: [(usize, usize); 3] = [(0, 5), (2, 3), (1, 4)];

/// Saved pre-magnitude responses of one forward pass, consumed by the
/// matching backward pass.
pub(crate) struct StageContext<T> {
    re: BandTensor<T>,
    im: BandTensor<T>,
    input_height: usize,
    input_width: usize,
}

impl<T> StageContext<T> {
    /// Channel count of the stage input this context was saved from.
    pub(crate) fn channels(&self) -> usize {
        self.re.channels
    }
}

/// Executes one scale of the scattering transform over a prepared filter
/// bank.
pub(crate) struct Decomposer<T> {
    bank: FilterBank<T>,
    mode: BorderMode,
    bias: T,
    combine_colour: bool,
}

impl<T: ScatSample> Decomposer<T> {
    pub(crate) fn new(
        bank: FilterBank<T>,
        mode: BorderMode,
        bias: T,
        combine_colour: bool,
    ) -> Self {
        Self {
            bank,
            mode,
            bias,
            combine_colour,
        }
    }

    fn check_input(&self, x: &ImageTensor<T>) -> Result<(), ScatError> {
        if x.height % 2 != 0 {
            return Err(ScatError::InputNotAligned(x.height, 2));
        }
        if x.width % 2 != 0 {
            return Err(ScatError::InputNotAligned(x.width, 2));
        }
        if self.combine_colour && x.channels != 3 {
            return Err(ScatError::CombineColourChannels(x.channels));
        }
        Ok(())
    }

    /// Row taps, column taps and band slots of each of the three branches.
    fn branches(&self) -> [(&[T], &[T], (usize, usize)); 3] {
        let h0 = self.bank.lowpass();
        let h1 = self.bank.bandpass();
        let h2 = self.bank.diagonal();
        [
            (h1, h0, BRANCH_SLOTS[0]),
            (h0, h1, BRANCH_SLOTS[1]),
            (h2, h2, BRANCH_SLOTS[2]),
        ]
    }

    /// Decomposes `x` into the pooled lowpass and six magnitude bands at
    /// half resolution, returning the coefficients together with the saved
    /// responses the backward pass needs.
    pub(crate) fn forward(
        &self,
        x: &ImageTensor<T>,
    ) -> Result<(ScatCoeffs<T>, StageContext<T>), ScatError> {
        self.check_input(x)?;
        let (h, w) = (x.height, x.width);
        let (h2, w2) = (h / 2, w / 2);

        let mut lowpass = ImageTensor::zeros(x.batch, x.channels, h2, w2)?;
        let mut re = BandTensor::zeros(x.batch, ORIENTATIONS, x.channels, h2, w2)?;
        let mut im = BandTensor::zeros(x.batch, ORIENTATIONS, x.channels, h2, w2)?;

        let mut rows = try_vec![T::zero(); h * w];
        let mut full = try_vec![T::zero(); h * w];
        let mut re1 = try_vec![T::zero(); h2 * w2];
        let mut im1 = try_vec![T::zero(); h2 * w2];
        let mut re2 = try_vec![T::zero(); h2 * w2];
        let mut im2 = try_vec![T::zero(); h2 * w2];

        for b in 0..x.batch {
            for c in 0..x.channels {
                let src = x.plane(b, c);

                conv_rows(src, h, w, self.bank.lowpass(), self.mode, &mut rows);
                conv_cols(&rows, h, w, self.bank.lowpass(), self.mode, &mut full);
                avg_pool2(&full, h, w, lowpass.plane_mut(b, c));

                for (row_taps, col_taps, (slot_a, slot_b)) in self.branches() {
                    conv_rows(src, h, w, row_taps, self.mode, &mut rows);
                    conv_cols(&rows, h, w, col_taps, self.mode, &mut full);
                    quad_to_complex(&full, h, w, &mut re1, &mut im1, &mut re2, &mut im2);
                    re.plane_mut(b, slot_a, c).copy_from_slice(&re1);
                    im.plane_mut(b, slot_a, c).copy_from_slice(&im1);
                    re.plane_mut(b, slot_b, c).copy_from_slice(&re2);
                    im.plane_mut(b, slot_b, c).copy_from_slice(&im2);
                }
            }
        }

        let mag_channels = if self.combine_colour { 1 } else { x.channels };
        let mut magnitudes = BandTensor::zeros(x.batch, ORIENTATIONS, mag_channels, h2, w2)?;
        for b in 0..x.batch {
            for band in 0..ORIENTATIONS {
                if self.combine_colour {
                    let planes: Vec<(&[T], &[T])> = (0..x.channels)
                        .map(|c| (re.plane(b, band, c), im.plane(b, band, c)))
                        .collect();
                    magnitude_forward_pooled(&planes, self.bias, magnitudes.plane_mut(b, band, 0));
                } else {
                    for c in 0..x.channels {
                        magnitude_forward(
                            re.plane(b, band, c),
                            im.plane(b, band, c),
                            self.bias,
                            magnitudes.plane_mut(b, band, c),
                        );
                    }
                }
            }
        }

        let coeffs = ScatCoeffs {
            lowpass,
            magnitudes,
            combined_colour: self.combine_colour,
        };
        let ctx = StageContext {
            re,
            im,
            input_height: h,
            input_width: w,
        };
        Ok((coeffs, ctx))
    }

    /// Back-propagates a coefficient gradient to the stage input. Consumes
    /// the saved context; one backward per forward.
    pub(crate) fn backward(
        &self,
        ctx: StageContext<T>,
        grad: &ScatCoeffs<T>,
    ) -> Result<ImageTensor<T>, ScatError> {
        let StageContext {
            re,
            im,
            input_height: h,
            input_width: w,
        } = ctx;
        let (h2, w2) = (h / 2, w / 2);
        let (batch, channels) = (re.batch, re.channels);

        let expected_low = batch * channels * h2 * w2;
        if grad.lowpass.batch != batch
            || grad.lowpass.channels != channels
            || grad.lowpass.height != h2
            || grad.lowpass.width != w2
        {
            return Err(ScatError::GradientShapeMismatch(
                expected_low,
                grad.lowpass.data.len(),
            ));
        }
        let mag_channels = if self.combine_colour { 1 } else { channels };
        let expected_mag = batch * ORIENTATIONS * mag_channels * h2 * w2;
        if grad.magnitudes.batch != batch
            || grad.magnitudes.bands != ORIENTATIONS
            || grad.magnitudes.channels != mag_channels
            || grad.magnitudes.height != h2
            || grad.magnitudes.width != w2
        {
            return Err(ScatError::GradientShapeMismatch(
                expected_mag,
                grad.magnitudes.data.len(),
            ));
        }

        // Magnitude adjoint first, band by band.
        let mut grad_re = BandTensor::zeros(batch, ORIENTATIONS, channels, h2, w2)?;
        let mut grad_im = BandTensor::zeros(batch, ORIENTATIONS, channels, h2, w2)?;
        for b in 0..batch {
            for band in 0..ORIENTATIONS {
                if self.combine_colour {
                    let planes: Vec<(&[T], &[T])> = (0..channels)
                        .map(|c| (re.plane(b, band, c), im.plane(b, band, c)))
                        .collect();
                    let mut grads: Vec<(Vec<T>, Vec<T>)> = Vec::new();
                    for _ in 0..channels {
                        grads.push((try_vec![T::zero(); h2 * w2], try_vec![T::zero(); h2 * w2]));
                    }
                    magnitude_backward_pooled(
                        &planes,
                        self.bias,
                        grad.magnitudes.plane(b, band, 0),
                        &mut grads,
                    );
                    for (c, (gre, gim)) in grads.into_iter().enumerate() {
                        grad_re.plane_mut(b, band, c).copy_from_slice(&gre);
                        grad_im.plane_mut(b, band, c).copy_from_slice(&gim);
                    }
                } else {
                    for c in 0..channels {
                        magnitude_backward(
                            re.plane(b, band, c),
                            im.plane(b, band, c),
                            self.bias,
                            grad.magnitudes.plane(b, band, c),
                            grad_re.plane_mut(b, band, c),
                            grad_im.plane_mut(b, band, c),
                        );
                    }
                }
            }
        }

        // Then the linear graph in reverse.
        let mut grad_input = ImageTensor::zeros(batch, channels, h, w)?;
        let mut full = try_vec![T::zero(); h * w];
        let mut mid = try_vec![T::zero(); h * w];
        for b in 0..batch {
            for c in 0..channels {
                let grad_plane = grad_input.plane_mut(b, c);

                avg_pool2_adjoint(grad.lowpass.plane(b, c), h, w, &mut full);
                for v in mid.iter_mut() {
                    *v = T::zero();
                }
                conv_cols_adjoint(&full, h, w, self.bank.lowpass(), self.mode, &mut mid);
                conv_rows_adjoint(&mid, h, w, self.bank.lowpass(), self.mode, grad_plane);

                for (row_taps, col_taps, (slot_a, slot_b)) in self.branches() {
                    complex_to_quad(
                        grad_re.plane(b, slot_a, c),
                        grad_im.plane(b, slot_a, c),
                        grad_re.plane(b, slot_b, c),
                        grad_im.plane(b, slot_b, c),
                        h,
                        w,
                        &mut full,
                    );
                    for v in mid.iter_mut() {
                        *v = T::zero();
                    }
                    conv_cols_adjoint(&full, h, w, col_taps, self.mode, &mut mid);
                    conv_rows_adjoint(&mid, h, w, row_taps, self.mode, grad_plane);
                }
            }
        }
        Ok(grad_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biort::BiortFamily;

    fn lcg(seed: &mut u64) -> f64 {
        *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((*seed >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }

    fn random_tensor(seed: &mut u64, b: usize, c: usize, h: usize, w: usize) -> ImageTensor<f64> {
        let data = (0..b * c * h * w).map(|_| lcg(seed)).collect();
        ImageTensor::new(data, b, c, h, w).unwrap()
    }

    fn decomposer(combine: bool) -> Decomposer<f64> {
        Decomposer::new(
            FilterBank::from_biort(BiortFamily::LeGall53),
            BorderMode::Replicate,
            0.01,
            combine,
        )
    }

    #[test]
    fn test_output_shapes_halve() {
        let x = random_tensor(&mut 11u64, 2, 3, 12, 16);
        let (coeffs, _) = decomposer(false).forward(&x).unwrap();
        assert_eq!(coeffs.lowpass.height, 6);
        assert_eq!(coeffs.lowpass.width, 8);
        assert_eq!(coeffs.lowpass.channels, 3);
        assert_eq!(coeffs.magnitudes.bands, 6);
        assert_eq!(coeffs.magnitudes.channels, 3);
        assert_eq!(coeffs.magnitudes.height, 6);
        assert_eq!(coeffs.subband_width(), 7);
    }

    #[test]
    fn test_combine_colour_shapes() {
        let x = random_tensor(&mut 13u64, 1, 3, 8, 8);
        let (coeffs, _) = decomposer(true).forward(&x).unwrap();
        assert_eq!(coeffs.lowpass.channels, 3);
        assert_eq!(coeffs.magnitudes.channels, 1);
        assert_eq!(coeffs.subband_width(), 2);
    }

    #[test]
    fn test_combine_colour_needs_three_channels() {
        let x = random_tensor(&mut 17u64, 1, 4, 8, 8);
        assert!(matches!(
            decomposer(true).forward(&x),
            Err(ScatError::CombineColourChannels(4))
        ));
    }

    #[test]
    fn test_odd_input_rejected() {
        let x = random_tensor(&mut 19u64, 1, 1, 7, 8);
        assert!(matches!(
            decomposer(false).forward(&x),
            Err(ScatError::InputNotAligned(7, 2))
        ));
    }

    #[test]
    fn test_zero_input_gives_zero_magnitudes() {
        let x = ImageTensor::<f64>::zeros(1, 2, 4, 4).unwrap();
        let (coeffs, _) = decomposer(false).forward(&x).unwrap();
        assert!(coeffs.magnitudes.data.iter().all(|&v| v == 0.0));
        assert!(coeffs.lowpass.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_constant_image_mean_preserved() {
        // Unit-DC lowpass plus mean pooling keeps a constant image constant,
        // and DC-free bandpasses leave no magnitude response away from the
        // (replicated, hence still constant) borders.
        let x = ImageTensor::new(vec![0.75f64; 64], 1, 1, 8, 8).unwrap();
        let (coeffs, _) = decomposer(false).forward(&x).unwrap();
        for &v in coeffs.lowpass.data.iter() {
            assert!((v - 0.75).abs() < 1e-12);
        }
        for &v in coeffs.magnitudes.data.iter() {
            assert!(v.abs() < 1e-9);
        }
    }

    fn finite_difference_check(combine: bool, channels: usize) {
        let dec = decomposer(combine);
        let mut seed = 23u64;
        let x = random_tensor(&mut seed, 1, channels, 8, 8);
        let (coeffs, ctx) = dec.forward(&x).unwrap();

        // A fixed random cotangent turns the output into a scalar loss.
        let low_cot: Vec<f64> = (0..coeffs.lowpass.data.len()).map(|_| lcg(&mut seed)).collect();
        let mag_cot: Vec<f64> = (0..coeffs.magnitudes.data.len())
            .map(|_| lcg(&mut seed))
            .collect();
        let loss = |c: &ScatCoeffs<f64>| -> f64 {
            let l: f64 = c.lowpass.data.iter().zip(low_cot.iter()).map(|(a, b)| a * b).sum();
            let m: f64 = c
                .magnitudes
                .data
                .iter()
                .zip(mag_cot.iter())
                .map(|(a, b)| a * b)
                .sum();
            l + m
        };

        let mut grad_out = coeffs.clone();
        grad_out.lowpass.data.copy_from_slice(&low_cot);
        grad_out.magnitudes.data.copy_from_slice(&mag_cot);
        let grad_in = dec.backward(ctx, &grad_out).unwrap();

        let eps = 1e-6;
        for idx in [0usize, 5, 17, 31, 63] {
            let mut bumped = x.clone();
            bumped.data[idx] += eps;
            let (up, _) = dec.forward(&bumped).unwrap();
            bumped.data[idx] -= 2.0 * eps;
            let (down, _) = dec.forward(&bumped).unwrap();
            let fd = (loss(&up) - loss(&down)) / (2.0 * eps);
            assert!(
                (grad_in.data[idx] - fd).abs() < 1e-6,
                "idx {idx}: analytic {} vs fd {fd}",
                grad_in.data[idx]
            );
        }
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        finite_difference_check(false, 2);
    }

    #[test]
    fn test_gradient_matches_finite_difference_combined() {
        finite_difference_check(true, 3);
    }

    #[test]
    fn test_backward_rejects_wrong_gradient_shape() {
        let dec = decomposer(false);
        let x = random_tensor(&mut 31u64, 1, 1, 8, 8);
        let (coeffs, ctx) = dec.forward(&x).unwrap();
        let mut bad = coeffs.clone();
        bad.lowpass = ImageTensor::zeros(1, 1, 2, 2).unwrap();
        assert!(matches!(
            dec.backward(ctx, &bad),
            Err(ScatError::GradientShapeMismatch(_, _))
        ));
    }

    #[test]
    fn test_shifted_input_shifts_magnitudes() {
        // A one-sample translation changes raw complex responses a lot but
        // moves the smoothed magnitudes only slightly away from borders.
        let mut seed = 41u64;
        let base: Vec<f64> = (0..20 * 20).map(|_| lcg(&mut seed)).collect();
        let x = ImageTensor::new(base.clone(), 1, 1, 20, 20).unwrap();
        let mut shifted_data = vec![0.0f64; 20 * 20];
        for j in 0..20 {
            for i in 0..20 {
                let si = if i == 0 { 0 } else { i - 1 };
                shifted_data[j * 20 + i] = base[j * 20 + si];
            }
        }
        let shifted = ImageTensor::new(shifted_data, 1, 1, 20, 20).unwrap();
        let dec = decomposer(false);
        let (a, ctx_a) = dec.forward(&x).unwrap();
        let (b, ctx_b) = dec.forward(&shifted).unwrap();
        // Compare interior samples only, relative to each signal's own
        // energy, and require the magnitudes to be the stabler of the two.
        let mut mag_diff = 0.0f64;
        let mut mag_norm = 0.0f64;
        let mut raw_diff = 0.0f64;
        let mut raw_norm = 0.0f64;
        for band in 0..ORIENTATIONS {
            let pa = a.magnitudes.plane(0, band, 0);
            let pb = b.magnitudes.plane(0, band, 0);
            let (ra, ia) = (ctx_a.re.plane(0, band, 0), ctx_a.im.plane(0, band, 0));
            let (rb, ib) = (ctx_b.re.plane(0, band, 0), ctx_b.im.plane(0, band, 0));
            for j in 2..8 {
                for i in 2..8 {
                    let at = j * 10 + i;
                    mag_diff += (pa[at] - pb[at]) * (pa[at] - pb[at]);
                    mag_norm += pa[at] * pa[at];
                    raw_diff += (ra[at] - rb[at]) * (ra[at] - rb[at])
                        + (ia[at] - ib[at]) * (ia[at] - ib[at]);
                    raw_norm += ra[at] * ra[at] + ia[at] * ia[at];
                }
            }
        }
        let mag_ratio = mag_diff / mag_norm;
        let raw_ratio = raw_diff / raw_norm;
        assert!(mag_ratio < raw_ratio, "{mag_ratio} vs {raw_ratio}");
        assert!(mag_ratio < 0.6, "{mag_ratio}");
    }
}
