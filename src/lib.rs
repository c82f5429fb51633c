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
#![allow(clippy::excessive_precision)]

//! Dual-tree complex wavelet scattering for image batches.
//!
//! The transform decomposes each channel into six oriented, approximately
//! analytic complex sub-bands, takes a smoothed magnitude and pools the
//! lowpass residual. One scale maps `C` channels to `7 C` at half
//! resolution; a second scale over the flattened first-order stack maps to
//! `49 C` at quarter resolution. Every executor also exposes an exact
//! analytic backward pass, so the transform can sit as a fixed front end
//! inside a gradient-trained model.

use num_traits::Float;
use std::fmt::Debug;
use std::sync::Arc;

mod assemble;
mod biort;
mod border_mode;
mod convolve;
mod decompose;
mod err;
mod extend;
mod filter_bank;
mod magnitude;
mod order2;
mod qshift;
mod quad;
mod tensor;

use crate::decompose::Decomposer;
use crate::filter_bank::{FilterBank, validate_pairing};
use crate::order2::{Order1Context, Order1Scattering, Order2Context, Order2Scattering};
pub use biort::BiortFamily;
pub use border_mode::BorderMode;
pub use err::ScatError;
pub use qshift::QshiftFamily;
pub use tensor::{BandTensor, ImageTensor, ScatCoeffs};

/// Sample types the transform operates on.
///
/// Implemented for `f32` and `f64`. The bound carries everything the
/// numeric kernels need so that signatures throughout the crate stay short.
pub trait ScatSample: Float + Debug + Default + Send + Sync + 'static {
    /// Converts a filter-table or configuration constant to the working
    /// precision.
    fn from_f64(value: f64) -> Self;
}

impl ScatSample for f32 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl ScatSample for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Configuration of a scattering executor.
///
/// The defaults match the common choice for classification front ends:
/// LeGall 5/3 at the first scale, the 10-tap quarter-shift pair at the
/// second, replicated borders and a magnitude bias of `1e-2`.
#[derive(Clone, Debug)]
pub struct ScatConfig {
    /// Filter family of the first decomposition scale.
    pub biort: BiortFamily,
    /// Filter family of the second decomposition scale.
    pub qshift: QshiftFamily,
    /// How out-of-range reads at image borders are resolved.
    pub border_mode: BorderMode,
    /// Smoothing bias of the magnitude nonlinearity; must be strictly
    /// positive.
    pub magnitude_bias: f64,
    /// Pool magnitude energy across the 3 colour channels of an RGB input,
    /// keeping the lowpass per colour.
    pub combine_colour: bool,
}

impl Default for ScatConfig {
    fn default() -> Self {
        Self {
            biort: BiortFamily::LeGall53,
            qshift: QshiftFamily::Qshift10,
            border_mode: BorderMode::Replicate,
            magnitude_bias: 1e-2,
            combine_colour: false,
        }
    }
}

enum ContextInner<T> {
    Order1(Order1Context<T>),
    Order2(Order2Context<T>),
}

/// Opaque state saved by [`ScatteringTransform::forward_with_grad`].
///
/// Holds the pre-magnitude responses the backward pass needs. It is
/// consumed by [`ScatteringTransform::backward`], so each forward pass
/// supports exactly one backward pass, and it is bound to the executor
/// that produced it; every other executor refuses it with
/// [`ScatError::ForeignContext`].
pub struct SavedContext<T>(ContextInner<T>);

/// A fixed-weight scattering feature extractor with an analytic gradient.
///
/// # Type Parameters
/// - `T`: The numeric type of the samples (`f32` or `f64`).
pub trait ScatteringTransform<T>: Send + Sync {
    /// Computes scattering features for a batch.
    ///
    /// # Parameters
    /// - `x`: Input batch, `[batch, channel, height, width]`. Spatial
    ///   dimensions are boundary-extended to the required alignment, never
    ///   truncated.
    ///
    /// # Returns
    /// The flattened feature tensor, or a `ScatError` if the input shape is
    /// unusable.
    fn forward(&self, x: &ImageTensor<T>) -> Result<ImageTensor<T>, ScatError>;

    /// Like [`ScatteringTransform::forward`], additionally returning the
    /// saved state a later [`ScatteringTransform::backward`] call consumes.
    fn forward_with_grad(
        &self,
        x: &ImageTensor<T>,
    ) -> Result<(ImageTensor<T>, SavedContext<T>), ScatError>;

    /// Back-propagates a feature gradient to the input.
    ///
    /// # Parameters
    /// - `ctx`: State saved by the matching `forward_with_grad` call.
    /// - `grad`: Gradient with the exact shape of the forward output.
    ///
    /// # Returns
    /// The input gradient with the shape of the original input, or a
    /// `ScatError` if `grad` is mis-shaped or `ctx` came from another
    /// executor.
    fn backward(
        &self,
        ctx: SavedContext<T>,
        grad: &ImageTensor<T>,
    ) -> Result<ImageTensor<T>, ScatError>;
}

impl<T: ScatSample> ScatteringTransform<T> for Order1Scattering<T> {
    fn forward(&self, x: &ImageTensor<T>) -> Result<ImageTensor<T>, ScatError> {
        self.execute(x).map(|(y, _)| y)
    }

    fn forward_with_grad(
        &self,
        x: &ImageTensor<T>,
    ) -> Result<(ImageTensor<T>, SavedContext<T>), ScatError> {
        let (y, ctx) = self.execute(x)?;
        Ok((y, SavedContext(ContextInner::Order1(ctx))))
    }

    fn backward(
        &self,
        ctx: SavedContext<T>,
        grad: &ImageTensor<T>,
    ) -> Result<ImageTensor<T>, ScatError> {
        match ctx.0 {
            ContextInner::Order1(inner) => self.execute_backward(inner, grad),
            ContextInner::Order2(_) => Err(ScatError::ForeignContext),
        }
    }
}

impl<T: ScatSample> ScatteringTransform<T> for Order2Scattering<T> {
    fn forward(&self, x: &ImageTensor<T>) -> Result<ImageTensor<T>, ScatError> {
        self.execute(x).map(|(y, _)| y)
    }

    fn forward_with_grad(
        &self,
        x: &ImageTensor<T>,
    ) -> Result<(ImageTensor<T>, SavedContext<T>), ScatError> {
        let (y, ctx) = self.execute(x)?;
        Ok((y, SavedContext(ContextInner::Order2(ctx))))
    }

    fn backward(
        &self,
        ctx: SavedContext<T>,
        grad: &ImageTensor<T>,
    ) -> Result<ImageTensor<T>, ScatError> {
        match ctx.0 {
            ContextInner::Order2(inner) => self.execute_backward(inner, grad),
            ContextInner::Order1(_) => Err(ScatError::ForeignContext),
        }
    }
}

/// Factory for scattering executors.
///
/// Validates the configuration once and returns a thread-safe executor
/// that can be shared across worker threads.
pub struct Scatlet {}

impl Scatlet {
    fn validate(config: &ScatConfig) -> Result<(), ScatError> {
        if config.magnitude_bias.is_nan() || config.magnitude_bias <= 0.0 {
            return Err(ScatError::NonPositiveMagnitudeBias);
        }
        Ok(())
    }

    fn make_order1_impl<T: ScatSample>(
        config: &ScatConfig,
    ) -> Result<Arc<dyn ScatteringTransform<T> + Send + Sync>, ScatError> {
        Self::validate(config)?;
        let stage = Decomposer::new(
            FilterBank::from_biort(config.biort),
            config.border_mode,
            T::from_f64(config.magnitude_bias),
            config.combine_colour,
        );
        Ok(Arc::new(Order1Scattering::new(stage, config.combine_colour)))
    }

    fn make_order2_impl<T: ScatSample>(
        config: &ScatConfig,
    ) -> Result<Arc<dyn ScatteringTransform<T> + Send + Sync>, ScatError> {
        Self::validate(config)?;
        validate_pairing(config.biort, config.qshift)?;
        let bias = T::from_f64(config.magnitude_bias);
        let stage1 = Decomposer::new(
            FilterBank::from_biort(config.biort),
            config.border_mode,
            bias,
            config.combine_colour,
        );
        // The second stage decomposes the whole flat stack; colour was
        // already pooled, if at all, by the first.
        let stage2 = Decomposer::new(
            FilterBank::from_qshift(config.qshift),
            config.border_mode,
            bias,
            false,
        );
        Ok(Arc::new(Order2Scattering::new(
            stage1,
            stage2,
            config.combine_colour,
        )))
    }

    /// Creates a first-order scattering executor for `f32` samples.
    ///
    /// # Parameters
    /// - `config`: Filter families, border handling, magnitude bias and
    ///   colour pooling.
    ///
    /// # Returns
    /// An executor mapping `C` channels to `7 C` at half resolution, or a
    /// `ScatError` if the configuration is invalid.
    pub fn make_order1_f32(
        config: &ScatConfig,
    ) -> Result<Arc<dyn ScatteringTransform<f32> + Send + Sync>, ScatError> {
        Self::make_order1_impl(config)
    }

    /// Creates a first-order scattering executor for `f64` samples.
    ///
    /// Same as [`Scatlet::make_order1_f32`], but for double precision.
    pub fn make_order1_f64(
        config: &ScatConfig,
    ) -> Result<Arc<dyn ScatteringTransform<f64> + Send + Sync>, ScatError> {
        Self::make_order1_impl(config)
    }

    /// Creates a second-order scattering executor for `f32` samples.
    ///
    /// # Parameters
    /// - `config`: Filter families, border handling, magnitude bias and
    ///   colour pooling. The two families must agree on the diagonal
    ///   bandpass variant.
    ///
    /// # Returns
    /// An executor mapping `C` channels to `49 C` at quarter resolution, or
    /// a `ScatError` if the configuration is invalid.
    pub fn make_order2_f32(
        config: &ScatConfig,
    ) -> Result<Arc<dyn ScatteringTransform<f32> + Send + Sync>, ScatError> {
        Self::make_order2_impl(config)
    }

    /// Creates a second-order scattering executor for `f64` samples.
    ///
    /// Same as [`Scatlet::make_order2_f32`], but for double precision.
    pub fn make_order2_f64(
        config: &ScatConfig,
    ) -> Result<Arc<dyn ScatteringTransform<f64> + Send + Sync>, ScatError> {
        Self::make_order2_impl(config)
    }
}
