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

use std::error::Error;
use std::fmt::Formatter;

/// Errors raised by the scattering transform.
///
/// Variants fall into two classes: configuration errors (bad filter family
/// name or pairing, non-positive bias) detected at executor construction, and
/// shape errors (misaligned or mis-sized tensors) detected at call time.
/// Every failure is raised synchronously and is permanent for the given
/// inputs; nothing is retried and no partial results are returned.
#[derive(Clone, Debug)]
pub enum ScatError {
    /// A filter family name did not match any known table.
    UnknownFilterFamily(String),
    /// The order-1 and order-2 families disagree on the diagonal variant.
    IncompatibleFamilies(&'static str, &'static str),
    /// The magnitude bias must be strictly positive.
    NonPositiveMagnitudeBias,
    /// Combine-colour mode requires exactly 3 input channels.
    CombineColourChannels(usize),
    /// A spatial dimension was not a multiple of the required alignment.
    InputNotAligned(usize, usize),
    /// An incoming gradient tensor did not match the forward output shape.
    GradientShapeMismatch(usize, usize),
    /// A tensor's buffer length did not match its declared dimensions.
    InputSizeMismatch(usize, usize),
    /// A spatial dimension was too small for the requested boundary extension.
    InputTooSmall(usize, usize),
    /// A saved context was handed to an executor that did not produce it.
    ForeignContext,
    /// A tensor dimension was zero.
    ZeroedBaseSize,
    /// Cannot allocate an intermediate buffer.
    OutOfMemory(usize),
}

impl Error for ScatError {}

impl std::fmt::Display for ScatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScatError::UnknownFilterFamily(name) => {
                f.write_fmt(format_args!("Unknown filter family '{name}'"))
            }
            ScatError::IncompatibleFamilies(biort, qshift) => f.write_fmt(format_args!(
                "Filter families {biort} and {qshift} disagree on the diagonal bandpass variant"
            )),
            ScatError::NonPositiveMagnitudeBias => {
                f.write_str("Magnitude bias must be strictly positive")
            }
            ScatError::CombineColourChannels(channels) => f.write_fmt(format_args!(
                "Combine-colour mode requires exactly 3 channels, but input has {channels}"
            )),
            ScatError::InputNotAligned(size, multiple) => f.write_fmt(format_args!(
                "Spatial size {size} must be a multiple of {multiple}"
            )),
            ScatError::GradientShapeMismatch(expected, actual) => f.write_fmt(format_args!(
                "Gradient length {actual} does not match forward output length {expected}"
            )),
            ScatError::InputSizeMismatch(expected, actual) => f.write_fmt(format_args!(
                "Tensor buffer length {actual} does not match its dimensions product {expected}"
            )),
            ScatError::InputTooSmall(size, required) => f.write_fmt(format_args!(
                "Spatial size {size} is too small, boundary extension needs at least {required}"
            )),
            ScatError::ForeignContext => {
                f.write_str("Saved context was produced by a different executor")
            }
            ScatError::ZeroedBaseSize => f.write_str("Tensor dimensions must be non-zero"),
            ScatError::OutOfMemory(length) => {
                f.write_fmt(format_args!("Cannot allocate {length} bytes to vector"))
            }
        }
    }
}

macro_rules! try_vec {
    () => {
        Vec::new()
    };
    ($elem:expr; $n:expr) => {{
        let mut v = Vec::new();
        v.try_reserve_exact($n)
            .map_err(|_| crate::err::ScatError::OutOfMemory($n))?;
        v.resize($n, $elem);
        v
    }};
}

pub(crate) use try_vec;
