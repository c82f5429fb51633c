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
use std::fmt::{Display, Formatter};

/// Declares an edge handling mode for the wavelet convolutions.
///
/// The backward pass applies the exact adjoint of the chosen rule: gradient
/// contributions that fell on replicated edge samples are folded back onto
/// the edge sample, and contributions that fell on zero padding are dropped.
#[repr(C)]
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Default)]
pub enum BorderMode {
    /// If the filter goes out of bounds the edge sample is replicated,
    /// `aaaaaa|abcdefgh|hhhhhh`
    #[default]
    Replicate,
    /// If the filter goes out of bounds the signal is extended with zeros,
    /// `000000|abcdefgh|000000`
    Zero,
}

impl Display for BorderMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BorderMode::Replicate => f.write_str("Replicate"),
            BorderMode::Zero => f.write_str("Zero"),
        }
    }
}

impl BorderMode {
    /// Maps an out-of-range sample position onto a real index, or `None`
    /// when the position reads as zero.
    #[inline]
    pub(crate) fn resolve(self, position: isize, len: usize) -> Option<usize> {
        if position >= 0 && (position as usize) < len {
            return Some(position as usize);
        }
        match self {
            BorderMode::Replicate => Some(position.clamp(0, len as isize - 1) as usize),
            BorderMode::Zero => None,
        }
    }
}
