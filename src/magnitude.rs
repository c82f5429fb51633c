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

//! Smoothed complex magnitude and its analytic adjoint.
//!
//! The nonlinearity is `sqrt(re^2 + im^2 + bias^2) - bias` with a strictly
//! positive bias. It equals the true complex magnitude up to an `O(bias)`
//! deviation and keeps the gradient finite and continuous at the origin,
//! where the true magnitude is non-differentiable.

use crate::ScatSample;

/// Smoothed magnitude of a single complex sample.
///
/// Evaluated as `(re^2 + im^2) / (sqrt(re^2 + im^2 + bias^2) + bias)`, which
/// is algebraically identical to `sqrt(re^2 + im^2 + bias^2) - bias` but
/// returns an exact zero for a zero input and loses no precision when the
/// energy is far below `bias^2`.
#[inline]
pub(crate) fn smooth_magnitude<T: ScatSample>(re: T, im: T, bias: T) -> T {
    let energy = re * re + im * im;
    energy / ((energy + bias * bias).sqrt() + bias)
}

/// Magnitude of one complex plane.
pub(crate) fn magnitude_forward<T: ScatSample>(re: &[T], im: &[T], bias: T, out: &mut [T]) {
    debug_assert_eq!(re.len(), im.len());
    debug_assert_eq!(re.len(), out.len());
    for ((dst, &r), &i) in out.iter_mut().zip(re.iter()).zip(im.iter()) {
        *dst = smooth_magnitude(r, i, bias);
    }
}

/// Back-propagates through the magnitude of one complex plane.
///
/// `d mag / d re = re / sqrt(re^2 + im^2 + bias^2)`, symmetric for `im`.
/// Gradients are accumulated into `grad_re` / `grad_im`.
pub(crate) fn magnitude_backward<T: ScatSample>(
    re: &[T],
    im: &[T],
    bias: T,
    grad_mag: &[T],
    grad_re: &mut [T],
    grad_im: &mut [T],
) {
    debug_assert_eq!(re.len(), grad_mag.len());
    for (idx, &g) in grad_mag.iter().enumerate() {
        let r = re[idx];
        let i = im[idx];
        let den = (r * r + i * i + bias * bias).sqrt();
        grad_re[idx] = grad_re[idx] + g * r / den;
        grad_im[idx] = grad_im[idx] + g * i / den;
    }
}

/// Magnitude pooled across colour channels: the energies of all planes are
/// summed under the square root, producing one greyscale magnitude plane.
pub(crate) fn magnitude_forward_pooled<T: ScatSample>(planes: &[(&[T], &[T])], bias: T, out: &mut [T]) {
    for (idx, dst) in out.iter_mut().enumerate() {
        let mut energy = T::zero();
        for (re, im) in planes.iter() {
            let r = re[idx];
            let i = im[idx];
            energy = energy + r * r + i * i;
        }
        *dst = energy / ((energy + bias * bias).sqrt() + bias);
    }
}

/// Adjoint of [`magnitude_forward_pooled`]: routes the greyscale magnitude
/// gradient back onto every colour plane's real/imaginary responses.
pub(crate) fn magnitude_backward_pooled<T: ScatSample>(
    planes: &[(&[T], &[T])],
    bias: T,
    grad_mag: &[T],
    grads: &mut [(Vec<T>, Vec<T>)],
) {
    debug_assert_eq!(planes.len(), grads.len());
    for (idx, &g) in grad_mag.iter().enumerate() {
        let mut energy = T::zero();
        for (re, im) in planes.iter() {
            let r = re[idx];
            let i = im[idx];
            energy = energy + r * r + i * i;
        }
        let den = (energy + bias * bias).sqrt();
        for ((re, im), (gre, gim)) in planes.iter().zip(grads.iter_mut()) {
            gre[idx] = gre[idx] + g * re[idx] / den;
            gim[idx] = gim[idx] + g * im[idx] / den;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_input_is_exactly_zero() {
        assert_eq!(smooth_magnitude(0f64, 0f64, 0.01), 0.0);
        assert_eq!(smooth_magnitude(0f32, 0f32, 0.01), 0.0);
    }

    #[test]
    fn test_bias_convergence() {
        // |smooth - true| <= bias for any input, so shrinking the bias
        // converges pointwise to the true magnitude.
        let samples = [(0.3f64, -0.4), (1.5, 2.5), (1e-4, 3e-4), (-0.7, 0.0)];
        for &(r, i) in samples.iter() {
            let truth = (r * r + i * i).sqrt();
            for bias in [1e-2, 1e-6] {
                let m = smooth_magnitude(r, i, bias);
                assert!(m <= truth + 1e-15);
                assert!(
                    (m - truth).abs() <= bias,
                    "bias {bias}: {m} vs {truth}"
                );
            }
        }
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let bias = 0.01f64;
        let (r, i) = (0.37, -0.22);
        let re = [r];
        let im = [i];
        let mut gr = [0.0];
        let mut gi = [0.0];
        magnitude_backward(&re, &im, bias, &[1.0], &mut gr, &mut gi);
        let eps = 1e-7;
        let fd_r =
            (smooth_magnitude(r + eps, i, bias) - smooth_magnitude(r - eps, i, bias)) / (2.0 * eps);
        let fd_i =
            (smooth_magnitude(r, i + eps, bias) - smooth_magnitude(r, i - eps, bias)) / (2.0 * eps);
        assert!((gr[0] - fd_r).abs() < 1e-8);
        assert!((gi[0] - fd_i).abs() < 1e-8);
    }

    #[test]
    fn test_gradient_finite_at_origin() {
        let mut gr = [0.0f64];
        let mut gi = [0.0f64];
        magnitude_backward(&[0.0], &[0.0], 0.01, &[1.0], &mut gr, &mut gi);
        assert_eq!(gr[0], 0.0);
        assert_eq!(gi[0], 0.0);
    }
}
