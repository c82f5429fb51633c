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

//! End-to-end scattering pipelines.
//!
//! The first-order pipeline pads to even dimensions, runs one decomposition
//! over the biorthogonal bank and flattens. The second-order pipeline pads
//! to multiples of 8, flattens the first stage and feeds the entire flat
//! stack, lowpass and magnitudes alike, through a second decomposition over
//! the quarter-shift bank; for `C` input channels this yields `7 C` channels
//! at half resolution and `49 C` at quarter resolution respectively.
//!
//! Backward passes retrace the pipeline through the saved per-stage
//! contexts and finish by folding the padding gradient back onto the
//! original support.

use crate::ScatSample;
use crate::assemble::{assemble, split};
use crate::decompose::{Decomposer, ORIENTATIONS, StageContext};
use crate::err::ScatError;
use crate::extend::{fold_grad, pad_to_multiple};
use crate::tensor::ImageTensor;
use std::sync::atomic::{AtomicU64, Ordering};

/// Alignment required by one scale; the second order needs one further
/// halving after the first, on top of the even quad split.
const ORDER1_MULTIPLE: usize = 2;
const ORDER2_MULTIPLE: usize = 8;

static NEXT_EXECUTOR_ID: AtomicU64 = AtomicU64::new(0);

/// A process-unique stamp tying every saved context to the executor that
/// produced it. Saved responses only invert the transform they came from,
/// so a context presented to any other executor, including one of the same
/// order with different filters or bias, is refused.
fn next_executor_id() -> u64 {
    NEXT_EXECUTOR_ID.fetch_add(1, Ordering::Relaxed)
}

pub(crate) struct Order1Context<T> {
    executor_id: u64,
    stage: StageContext<T>,
    height: usize,
    width: usize,
}

pub(crate) struct Order2Context<T> {
    executor_id: u64,
    stage1: StageContext<T>,
    stage2: StageContext<T>,
    height: usize,
    width: usize,
}

pub(crate) struct Order1Scattering<T> {
    id: u64,
    stage: Decomposer<T>,
    combine_colour: bool,
}

impl<T: ScatSample> Order1Scattering<T> {
    pub(crate) fn new(stage: Decomposer<T>, combine_colour: bool) -> Self {
        Self {
            id: next_executor_id(),
            stage,
            combine_colour,
        }
    }

    pub(crate) fn execute(
        &self,
        x: &ImageTensor<T>,
    ) -> Result<(ImageTensor<T>, Order1Context<T>), ScatError> {
        let padded = pad_to_multiple(x, ORDER1_MULTIPLE)?;
        let (coeffs, stage) = self.stage.forward(&padded)?;
        let flat = assemble(&coeffs)?;
        Ok((
            flat,
            Order1Context {
                executor_id: self.id,
                stage,
                height: x.height,
                width: x.width,
            },
        ))
    }

    pub(crate) fn execute_backward(
        &self,
        ctx: Order1Context<T>,
        grad: &ImageTensor<T>,
    ) -> Result<ImageTensor<T>, ScatError> {
        if ctx.executor_id != self.id {
            return Err(ScatError::ForeignContext);
        }
        let channels = ctx.stage.channels();
        let mag_channels = if self.combine_colour { 1 } else { channels };
        let coeff_grad = split(grad, channels, mag_channels, self.combine_colour)?;
        let padded_grad = self.stage.backward(ctx.stage, &coeff_grad)?;
        fold_grad(&padded_grad, ctx.height, ctx.width, ORDER1_MULTIPLE)
    }
}

pub(crate) struct Order2Scattering<T> {
    id: u64,
    stage1: Decomposer<T>,
    stage2: Decomposer<T>,
    combine_colour: bool,
}

impl<T: ScatSample> Order2Scattering<T> {
    pub(crate) fn new(stage1: Decomposer<T>, stage2: Decomposer<T>, combine_colour: bool) -> Self {
        Self {
            id: next_executor_id(),
            stage1,
            stage2,
            combine_colour,
        }
    }

    fn stage1_flat_channels(&self, channels: usize) -> usize {
        let mag = if self.combine_colour { 1 } else { channels };
        channels + ORIENTATIONS * mag
    }

    pub(crate) fn execute(
        &self,
        x: &ImageTensor<T>,
    ) -> Result<(ImageTensor<T>, Order2Context<T>), ScatError> {
        let padded = pad_to_multiple(x, ORDER2_MULTIPLE)?;
        let (coeffs1, stage1) = self.stage1.forward(&padded)?;
        let flat1 = assemble(&coeffs1)?;
        let (coeffs2, stage2) = self.stage2.forward(&flat1)?;
        let flat2 = assemble(&coeffs2)?;
        Ok((
            flat2,
            Order2Context {
                executor_id: self.id,
                stage1,
                stage2,
                height: x.height,
                width: x.width,
            },
        ))
    }

    pub(crate) fn execute_backward(
        &self,
        ctx: Order2Context<T>,
        grad: &ImageTensor<T>,
    ) -> Result<ImageTensor<T>, ScatError> {
        if ctx.executor_id != self.id {
            return Err(ScatError::ForeignContext);
        }
        let channels = ctx.stage1.channels();
        let flat1_channels = self.stage1_flat_channels(channels);

        // Stage 2 never pools colour, so its lowpass and magnitude blocks
        // both span the full flat stack.
        let grad2 = split(grad, flat1_channels, flat1_channels, false)?;
        let grad_flat1 = self.stage2.backward(ctx.stage2, &grad2)?;

        let mag_channels = if self.combine_colour { 1 } else { channels };
        let grad1 = split(&grad_flat1, channels, mag_channels, self.combine_colour)?;
        let padded_grad = self.stage1.backward(ctx.stage1, &grad1)?;
        fold_grad(&padded_grad, ctx.height, ctx.width, ORDER2_MULTIPLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biort::BiortFamily;
    use crate::border_mode::BorderMode;
    use crate::filter_bank::FilterBank;
    use crate::qshift::QshiftFamily;

    fn lcg(seed: &mut u64) -> f64 {
        *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((*seed >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }

    fn random_tensor(seed: &mut u64, b: usize, c: usize, h: usize, w: usize) -> ImageTensor<f64> {
        let data = (0..b * c * h * w).map(|_| lcg(seed)).collect();
        ImageTensor::new(data, b, c, h, w).unwrap()
    }

    fn order1(combine: bool) -> Order1Scattering<f64> {
        Order1Scattering::new(
            Decomposer::new(
                FilterBank::from_biort(BiortFamily::LeGall53),
                BorderMode::Replicate,
                0.01,
                combine,
            ),
            combine,
        )
    }

    fn order2(combine: bool) -> Order2Scattering<f64> {
        Order2Scattering::new(
            Decomposer::new(
                FilterBank::from_biort(BiortFamily::LeGall53),
                BorderMode::Replicate,
                0.01,
                combine,
            ),
            Decomposer::new(
                FilterBank::from_qshift(QshiftFamily::Qshift10),
                BorderMode::Replicate,
                0.01,
                false,
            ),
            combine,
        )
    }

    #[test]
    fn test_order1_shapes() {
        let x = random_tensor(&mut 3u64, 2, 3, 32, 32);
        let (y, _) = order1(false).execute(&x).unwrap();
        assert_eq!(y.batch, 2);
        assert_eq!(y.channels, 21);
        assert_eq!(y.height, 16);
        assert_eq!(y.width, 16);
    }

    #[test]
    fn test_order1_pads_odd_input() {
        let x = random_tensor(&mut 5u64, 1, 1, 31, 29);
        let (y, _) = order1(false).execute(&x).unwrap();
        assert_eq!(y.height, 16);
        assert_eq!(y.width, 15);
    }

    #[test]
    fn test_order2_shapes() {
        let x = random_tensor(&mut 7u64, 1, 3, 32, 24);
        let (y, _) = order2(false).execute(&x).unwrap();
        assert_eq!(y.channels, 49 * 3);
        assert_eq!(y.height, 8);
        assert_eq!(y.width, 6);
    }

    #[test]
    fn test_order2_pads_to_multiple_of_eight() {
        let x = random_tensor(&mut 9u64, 1, 1, 30, 27);
        let (y, _) = order2(false).execute(&x).unwrap();
        assert_eq!(y.height, 8);
        assert_eq!(y.width, 8);
    }

    #[test]
    fn test_order2_combine_colour_channels() {
        let x = random_tensor(&mut 11u64, 1, 3, 16, 16);
        let (y, _) = order2(true).execute(&x).unwrap();
        // 9 flat channels out of stage 1, 7x that out of stage 2.
        assert_eq!(y.channels, 63);
    }

    #[test]
    fn test_order2_rejects_tiny_input() {
        let x = random_tensor(&mut 13u64, 1, 1, 2, 16);
        assert!(matches!(
            order2(false).execute(&x),
            Err(ScatError::InputTooSmall(2, 3))
        ));
    }

    #[test]
    fn test_order1_gradient_matches_finite_difference() {
        let net = order1(false);
        let mut seed = 211u64;
        let x = random_tensor(&mut seed, 1, 2, 10, 12);
        let (y, ctx) = net.execute(&x).unwrap();
        let cot: Vec<f64> = (0..y.data.len()).map(|_| lcg(&mut seed)).collect();
        let mut grad_out = y.clone();
        grad_out.data.copy_from_slice(&cot);
        let grad_in = net.execute_backward(ctx, &grad_out).unwrap();

        let loss = |input: &ImageTensor<f64>| -> f64 {
            let (out, _) = net.execute(input).unwrap();
            out.data.iter().zip(cot.iter()).map(|(a, b)| a * b).sum()
        };
        let eps = 1e-6;
        for idx in [0usize, 13, 47, 80, 119] {
            let mut bumped = x.clone();
            bumped.data[idx] += eps;
            let up = loss(&bumped);
            bumped.data[idx] -= 2.0 * eps;
            let down = loss(&bumped);
            let fd = (up - down) / (2.0 * eps);
            assert!(
                (grad_in.data[idx] - fd).abs() < 2e-6,
                "idx {idx}: analytic {} vs fd {fd}",
                grad_in.data[idx]
            );
        }
    }

    #[test]
    fn test_order2_gradient_matches_finite_difference() {
        let net = order2(false);
        let mut seed = 223u64;
        let x = random_tensor(&mut seed, 1, 1, 10, 12);
        let (y, ctx) = net.execute(&x).unwrap();
        let cot: Vec<f64> = (0..y.data.len()).map(|_| lcg(&mut seed)).collect();
        let mut grad_out = y.clone();
        grad_out.data.copy_from_slice(&cot);
        let grad_in = net.execute_backward(ctx, &grad_out).unwrap();

        let loss = |input: &ImageTensor<f64>| -> f64 {
            let (out, _) = net.execute(input).unwrap();
            out.data.iter().zip(cot.iter()).map(|(a, b)| a * b).sum()
        };
        let eps = 1e-6;
        for idx in [0usize, 21, 60, 95, 119] {
            let mut bumped = x.clone();
            bumped.data[idx] += eps;
            let up = loss(&bumped);
            bumped.data[idx] -= 2.0 * eps;
            let down = loss(&bumped);
            let fd = (up - down) / (2.0 * eps);
            assert!(
                (grad_in.data[idx] - fd).abs() < 2e-6,
                "idx {idx}: analytic {} vs fd {fd}",
                grad_in.data[idx]
            );
        }
    }

    #[test]
    fn test_context_bound_to_producing_executor() {
        // A context only inverts the executor that saved it, so a swap
        // between same-order executors is refused even when their
        // configurations happen to agree.
        let a = order1(false);
        let b = order1(false);
        let x = random_tensor(&mut 311u64, 1, 1, 8, 8);
        let (y, ctx) = a.execute(&x).unwrap();
        assert!(matches!(
            b.execute_backward(ctx, &y),
            Err(ScatError::ForeignContext)
        ));
        let (y2, ctx2) = order2(false).execute(&x).unwrap();
        assert!(matches!(
            order2(false).execute_backward(ctx2, &y2),
            Err(ScatError::ForeignContext)
        ));
    }

    #[test]
    fn test_order1_backward_rejects_wrong_channels() {
        let net = order1(false);
        let x = random_tensor(&mut 307u64, 1, 2, 8, 8);
        let (_, ctx) = net.execute(&x).unwrap();
        let bad = ImageTensor::<f64>::zeros(1, 10, 4, 4).unwrap();
        assert!(matches!(
            net.execute_backward(ctx, &bad),
            Err(ScatError::GradientShapeMismatch(_, _))
        ));
    }
}
