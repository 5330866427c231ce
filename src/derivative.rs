// Derivative estimators operating on a history of feedback samples
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::fmt::Debug;

use num_traits::float::FloatCore;

/// A trait for objects that estimate the time-derivative of a sampled signal.
///
/// The PID controller pushes every feedback sample through an estimator and uses the returned
/// value as the derivative term. Estimators own whatever sample history they need.
pub trait DerivativeEstimator<F: FloatCore>: Clone + Debug {
    /// Pushes a new sample into the history and returns the derivative estimate.
    ///
    /// `delta_x` is the spacing between samples, i.e. the sampling time. A spacing of exactly zero
    /// is treated as one so the estimate never divides by zero.
    #[must_use]
    fn estimate(&mut self, sample: F, delta_x: F) -> F;

    /// Zero-fills the sample history.
    fn reset(&mut self);
}

fn nonzero_spacing<F: FloatCore>(delta_x: F) -> F {
    if delta_x == F::zero() {
        F::one()
    } else {
        delta_x
    }
}

/// Central difference over a two-slot circular buffer.
///
/// Each call reads the sample pushed two calls ago (`u0`), overwrites it with the current sample
/// (`u2`) and returns `(u2 - u0) / (2 * delta_x)`. Since the stencil is centered on the previous
/// sample, the estimate is the derivative at the previous sample instant, lagging the freshest
/// input by one sample.
///
/// The buffer starts zero-filled, so the first two estimates after construction or a reset treat
/// `u0` as zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CentralDifference<F: FloatCore> {
    buffer: [F; 2],
    index: usize,
}

impl<F: FloatCore> CentralDifference<F> {
    /// Creates an estimator with a zero-filled history.
    pub fn new() -> Self {
        Self {
            buffer: [F::zero(); 2],
            index: 0,
        }
    }

    /// Returns the slot that the next sample will be written to, which holds the sample from two
    /// calls ago.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the raw history buffer.
    pub fn history(&self) -> &[F; 2] {
        &self.buffer
    }
}

impl<F: FloatCore> Default for CentralDifference<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FloatCore + Debug> DerivativeEstimator<F> for CentralDifference<F> {
    fn estimate(&mut self, sample: F, delta_x: F) -> F {
        let u0 = self.buffer[self.index];
        self.buffer[self.index] = sample;
        self.index = (self.index + 1) % self.buffer.len();

        let two = F::one() + F::one();
        (sample - u0) / (two * nonzero_spacing(delta_x))
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Finite difference with an arbitrary `N`-tap kernel.
///
/// The estimator keeps the last `N` samples, the current one included. Kernel coefficients are
/// ordered from the oldest sample to the newest, and the estimate is
/// `sum(kernel[k] * sample[k]) / delta_x`.
///
/// [`FiniteDifference::central`] is numerically equivalent to [`CentralDifference`], which remains
/// the cheaper choice for that stencil.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FiniteDifference<F: FloatCore, const N: usize> {
    buffer: [F; N],
    kernel: [F; N],
    next_index: usize,
}

impl<F: FloatCore, const N: usize> FiniteDifference<F, N> {
    /// Creates an estimator with the given kernel and a zero-filled history.
    pub fn new(kernel: [F; N]) -> Self {
        Self {
            buffer: [F::zero(); N],
            kernel,
            next_index: 0,
        }
    }

    /// Returns the kernel coefficients, oldest sample first.
    pub fn kernel(&self) -> &[F; N] {
        &self.kernel
    }
}

impl<F: FloatCore> FiniteDifference<F, 2> {
    /// First-order backward difference, `(u[n] - u[n-1]) / dx`.
    pub fn backward() -> Self {
        Self::new([-F::one(), F::one()])
    }
}

impl<F: FloatCore> FiniteDifference<F, 3> {
    /// Three-tap central difference, `(u[n] - u[n-2]) / (2 dx)`.
    pub fn central() -> Self {
        let half = F::one() / (F::one() + F::one());
        Self::new([-half, F::zero(), half])
    }
}

impl<F: FloatCore + Debug, const N: usize> DerivativeEstimator<F> for FiniteDifference<F, N> {
    fn estimate(&mut self, sample: F, delta_x: F) -> F {
        if N == 0 {
            return F::zero();
        }

        self.buffer[self.next_index] = sample;
        self.next_index = (self.next_index + 1) % N;

        // After the push, next_index points at the oldest sample
        let weighted = self
            .kernel
            .iter()
            .enumerate()
            .fold(F::zero(), |acc, (k, coeff)| {
                acc + *coeff * self.buffer[(self.next_index + k) % N]
            });

        weighted / nonzero_spacing(delta_x)
    }

    fn reset(&mut self) {
        self.buffer = [F::zero(); N];
        self.next_index = 0;
    }
}
