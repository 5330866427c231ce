// Discrete PID controller with derivative on measurement and bumpless integral gain changes
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

use core::fmt;
use core::fmt::Debug;

use num_traits::float::FloatCore;

use crate::derivative::{CentralDifference, DerivativeEstimator};

/// Names the parameter that failed validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    /// The sampling period was not strictly positive and finite.
    SampleTime,
    /// The lower output bound was not strictly positive.
    OutputMin,
    /// The upper output bound did not exceed the lower bound.
    OutputMax,
    /// The proportional gain was negative or not finite.
    ProportionalGain,
    /// The integral gain was negative or not finite.
    IntegralGain,
    /// The derivative gain was negative or not finite.
    DerivativeGain,
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Argument::SampleTime => "sample time must be positive and finite",
            Argument::OutputMin => "output minimum must be positive",
            Argument::OutputMax => "output maximum must exceed the output minimum",
            Argument::ProportionalGain => "proportional gain must be non-negative and finite",
            Argument::IntegralGain => "integral gain must be non-negative and finite",
            Argument::DerivativeGain => "derivative gain must be non-negative and finite",
        };
        f.write_str(name)
    }
}

/// Errors raised by PID controller configuration.
///
/// Validation always happens before any state is touched, so a failed call leaves the
/// controller exactly as it was.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum PidError {
    /// A parameter was out of its admissible range.
    #[cfg_attr(feature = "std", error("invalid argument: {0}"))]
    InvalidArgument(Argument),
}

#[cfg(not(feature = "std"))]
impl fmt::Display for PidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PidError::InvalidArgument(arg) => write!(f, "invalid argument: {}", arg),
        }
    }
}

fn reject<T>(argument: Argument) -> Result<T, PidError> {
    log::warn!("Rejected PID parameter: {}", argument);
    Err(PidError::InvalidArgument(argument))
}

// NOTE: The lower bound must be strictly positive. This rejects negative actuator ranges such
// as [-100, 100]; see `PidController::initialize`.
fn validate_timing<F: FloatCore>(
    sample_time: F,
    output_min: F,
    output_max: F,
) -> Result<(), PidError> {
    if sample_time <= F::zero() || !sample_time.is_finite() {
        return reject(Argument::SampleTime);
    }
    if output_min <= F::zero() || output_min.is_nan() {
        return reject(Argument::OutputMin);
    }
    if output_max <= output_min || output_max.is_nan() {
        return reject(Argument::OutputMax);
    }
    Ok(())
}

fn validate_gains<F: FloatCore>(kp: F, ki: F, kd: F) -> Result<(), PidError> {
    let admissible = |gain: F| gain >= F::zero() && gain.is_finite();
    if !admissible(kp) {
        return reject(Argument::ProportionalGain);
    }
    if !admissible(ki) {
        return reject(Argument::IntegralGain);
    }
    if !admissible(kd) {
        return reject(Argument::DerivativeGain);
    }
    Ok(())
}

/// Validated PID parameters.
///
/// A `PidConfig` can only be obtained from [`PidConfigBuilder::build`] and is read-only
/// afterwards. Gains of a running controller are changed through
/// [`PidController::set_gains`] so that the integral sum is rescaled consistently.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidConfig<F: FloatCore> {
    /// Proportional gain coefficient.
    kp: F,

    /// Integral gain coefficient, applied to the time-integral of the error.
    ki: F,

    /// Derivative gain coefficient, applied to the time-derivative of the feedback.
    kd: F,

    /// Lower output bound. Only enforced when `clamp_output` is set.
    output_min: F,

    /// Upper output bound. Only enforced when `clamp_output` is set.
    output_max: F,

    /// Time between two calls to `update`, in seconds.
    sample_time: F,

    /// Whether `update` saturates its result to `[output_min, output_max]`.
    /// Defaults to false.
    clamp_output: bool,
}

impl<F: FloatCore> PidConfig<F> {
    fn zeroed() -> Self {
        Self {
            kp: F::zero(),
            ki: F::zero(),
            kd: F::zero(),
            output_min: F::zero(),
            output_max: F::zero(),
            sample_time: F::zero(),
            clamp_output: false,
        }
    }

    fn with_timing(sample_time: F, output_min: F, output_max: F) -> Self {
        Self {
            kp: F::one(),
            output_min,
            output_max,
            sample_time,
            ..Self::zeroed()
        }
    }

    /// Returns the proportional gain.
    pub fn kp(&self) -> F {
        self.kp
    }

    /// Returns the integral gain.
    pub fn ki(&self) -> F {
        self.ki
    }

    /// Returns the derivative gain.
    pub fn kd(&self) -> F {
        self.kd
    }

    /// Convenience method that returns the proportional, integral, and derivative gains together as a tuple.
    pub fn gains(&self) -> (F, F, F) {
        (self.kp, self.ki, self.kd)
    }

    /// Returns the sampling period.
    pub fn sample_time(&self) -> F {
        self.sample_time
    }

    /// Returns the lower output bound.
    pub fn output_min(&self) -> F {
        self.output_min
    }

    /// Returns the upper output bound.
    pub fn output_max(&self) -> F {
        self.output_max
    }

    /// Returns the flag indicating whether the output is saturated to the output bounds.
    pub fn clamp_output(&self) -> bool {
        self.clamp_output
    }
}

/// Builds a [`PidConfig`], validating every parameter in [`PidConfigBuilder::build`].
///
/// Sampling period and output bounds are mandatory. Gains default to `kp = 1, ki = 0, kd = 0`,
/// i.e. what [`PidController::initialize`] leaves behind.
#[derive(Copy, Clone, Debug)]
pub struct PidConfigBuilder<F: FloatCore> {
    config: PidConfig<F>,
}

impl<F: FloatCore> PidConfigBuilder<F> {
    /// Starts a builder with the given sampling period and output bounds.
    pub fn new(sample_time: F, output_min: F, output_max: F) -> Self {
        Self {
            config: PidConfig::with_timing(sample_time, output_min, output_max),
        }
    }

    /// Sets the proportional gain.
    pub fn kp(mut self, kp: F) -> Self {
        self.config.kp = kp;
        self
    }

    /// Sets the integral gain.
    pub fn ki(mut self, ki: F) -> Self {
        self.config.ki = ki;
        self
    }

    /// Sets the derivative gain.
    pub fn kd(mut self, kd: F) -> Self {
        self.config.kd = kd;
        self
    }

    /// Sets all three gains at once.
    pub fn gains(self, kp: F, ki: F, kd: F) -> Self {
        self.kp(kp).ki(ki).kd(kd)
    }

    /// Sets whether the output is saturated to the output bounds.
    pub fn clamp_output(mut self, clamp_output: bool) -> Self {
        self.config.clamp_output = clamp_output;
        self
    }

    /// Validates the parameters and returns the config.
    ///
    /// # Errors
    /// - [`PidError::InvalidArgument`] naming the first parameter that is out of range.
    pub fn build(self) -> Result<PidConfig<F>, PidError> {
        let c = &self.config;
        validate_timing(c.sample_time, c.output_min, c.output_max)?;
        validate_gains(c.kp, c.ki, c.kd)?;
        Ok(self.config)
    }
}

/// A stateful implementation of a discrete PID (Proportional-Integral-Derivative) controller.
///
/// The controller is meant to be called once per sampling period with the latest feedback
/// sample. It computes
///
/// ```text
/// output = kp * e[n] + ki * S[n] - kd * dy[n]
/// ```
///
/// where `e[n] = setpoint - y[n]`, `S[n] = S[n-1] + Ts * e[n]` is the discrete integral of the
/// error, and `dy[n]` is the derivative of the feedback `y` reported by the estimator `D`
/// (a one-sample-lagged central difference by default). Differentiating the feedback instead of
/// the error avoids derivative kick on setpoint steps.
///
/// The controller does not measure time: the caller must call [`PidController::update`] at the
/// configured sampling period. One instance belongs to one control loop.
#[derive(Clone, Debug)]
pub struct PidController<F: FloatCore, D: DerivativeEstimator<F> = CentralDifference<F>> {
    config: PidConfig<F>,
    setpoint: F,
    error_sum: F,
    estimator: D,
    initialized: bool,
}

impl<F: FloatCore + Debug> PidController<F> {
    /// Creates an uninitialized controller.
    ///
    /// All gains, bounds and the sampling period are zero, so [`PidController::update`] returns
    /// zero until gains are set, after which it computes with unit derivative spacing and no
    /// integral accumulation.
    pub fn new_uninit() -> Self {
        Self::uninit_with_estimator(CentralDifference::new())
    }

    /// Creates an initialized controller from a validated config, with a zero setpoint, an empty
    /// integral and an empty feedback history.
    pub fn new(config: PidConfig<F>) -> Self {
        Self::with_estimator(config, CentralDifference::new())
    }
}

impl<F: FloatCore + Debug> Default for PidController<F> {
    fn default() -> Self {
        Self::new_uninit()
    }
}

impl<F: FloatCore + Debug, D: DerivativeEstimator<F>> PidController<F, D> {
    /// Creates an uninitialized controller using a custom derivative estimator.
    pub fn uninit_with_estimator(mut estimator: D) -> Self {
        estimator.reset();
        Self {
            config: PidConfig::zeroed(),
            setpoint: F::zero(),
            error_sum: F::zero(),
            estimator,
            initialized: false,
        }
    }

    /// Creates an initialized controller from a validated config using a custom derivative
    /// estimator. The estimator's history is cleared.
    pub fn with_estimator(config: PidConfig<F>, mut estimator: D) -> Self {
        estimator.reset();
        Self {
            config,
            setpoint: F::zero(),
            error_sum: F::zero(),
            estimator,
            initialized: true,
        }
    }

    /// (Re)initializes the controller.
    ///
    /// On success every piece of state is reset: the integral sum and the feedback history are
    /// zeroed, the setpoint becomes zero, `kp` becomes one, `ki` and `kd` become zero, and output
    /// clamping is disabled. The sampling period and output bounds are set to the given values.
    ///
    /// # Arguments
    /// - `sample_time`: Time between two calls to `update`, in seconds.
    /// - `output_min`: Lower output bound. Must be strictly positive, so a symmetric range such
    ///   as `[-100, 100]` is rejected.
    /// - `output_max`: Upper output bound. Must exceed `output_min`.
    ///
    /// # Errors
    /// - [`PidError::InvalidArgument`] if any argument is out of range. The controller is left
    ///   untouched. Besides `sample_time <= 0`, `output_min <= 0` and `output_max <= output_min`,
    ///   a NaN or infinite `sample_time` and NaN bounds are rejected as well.
    pub fn initialize(
        &mut self,
        sample_time: F,
        output_min: F,
        output_max: F,
    ) -> Result<(), PidError> {
        validate_timing(sample_time, output_min, output_max)?;

        self.config = PidConfig::with_timing(sample_time, output_min, output_max);
        self.setpoint = F::zero();
        self.error_sum = F::zero();
        self.estimator.reset();
        self.initialized = true;

        log::debug!(
            "PID initialized: sample time {:?}, output limits [{:?}, {:?}]",
            sample_time,
            output_min,
            output_max
        );
        Ok(())
    }

    /// Sets the proportional, integral, and derivative gains.
    ///
    /// If both the current and the new integral gains are nonzero, the integral sum is rescaled by
    /// `old_ki / ki` so that the integral term `ki * error_sum` is continuous across the change
    /// and retuning does not jolt the output. If either gain is zero the sum is kept as-is.
    ///
    /// # Errors
    /// - [`PidError::InvalidArgument`] if any gain is negative, and also if any gain is NaN or
    ///   infinite. Neither the gains nor the integral sum are changed.
    pub fn set_gains(&mut self, kp: F, ki: F, kd: F) -> Result<(), PidError> {
        validate_gains(kp, ki, kd)?;

        let old_ki = self.config.ki;
        if old_ki != F::zero() && ki != F::zero() {
            let rescaled = self.error_sum * (old_ki / ki);
            log::debug!(
                "Integral gain {:?} -> {:?}, rescaled error sum {:?} -> {:?}",
                old_ki,
                ki,
                self.error_sum,
                rescaled
            );
            self.error_sum = rescaled;
        }

        self.config.kp = kp;
        self.config.ki = ki;
        self.config.kd = kd;
        Ok(())
    }

    /// Sets the setpoint. Any value is accepted and takes effect on the next `update`.
    pub fn set_setpoint(&mut self, setpoint: F) {
        self.setpoint = setpoint;
    }

    /// Sets whether `update` saturates its result to the output bounds.
    ///
    /// While the output is saturated, the integral sum stops accumulating errors that would push
    /// it further into saturation, so the controller recovers as soon as the error reverses.
    pub fn set_output_clamping(&mut self, clamp_output: bool) {
        self.config.clamp_output = clamp_output;
    }

    /// Clears the integral sum.
    pub fn reset_integral(&mut self) {
        self.error_sum = F::zero();
    }

    /// Computes the next actuator command from the latest feedback sample.
    ///
    /// This pushes `feedback` into the derivative estimator and adds `sample_time * error` to the
    /// integral sum, so it must be called exactly once per sampling period.
    ///
    /// The result is NOT saturated to the output bounds unless clamping was enabled with
    /// [`PidController::set_output_clamping`] or [`PidConfigBuilder::clamp_output`].
    ///
    /// A controller that was never initialized still computes on its zero-filled state. With a
    /// zero sampling period the integral does not accumulate and the derivative uses unit
    /// spacing. See [`update`] for a control loop whose controller may be absent.
    pub fn update(&mut self, feedback: F) -> F {
        let sample_time = self.config.sample_time;
        let error = self.setpoint - feedback;

        // Differentiate the feedback rather than the error to avoid derivative kick
        let derivative = self.estimator.estimate(feedback, sample_time);
        let previous_sum = self.error_sum;
        self.error_sum = self.error_sum + sample_time * error;

        let raw_output =
            self.config.kp * error + self.config.ki * self.error_sum - self.config.kd * derivative;
        let output = if self.config.clamp_output {
            let (lb, ub) = (self.config.output_min, self.config.output_max);
            // Hold the integral while it winds further into saturation
            if (raw_output > ub && error > F::zero()) || (raw_output < lb && error < F::zero()) {
                self.error_sum = previous_sum;
            }
            num_traits::clamp(raw_output, lb, ub)
        } else {
            raw_output
        };

        log::trace!(
            "PID update: error {:?}, error sum {:?}, derivative {:?}, output {:?}",
            error,
            self.error_sum,
            derivative,
            output
        );
        output
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PidConfig<F> {
        &self.config
    }

    /// Returns the setpoint.
    pub fn setpoint(&self) -> F {
        self.setpoint
    }

    /// Returns the accumulated `sample_time * error` sum.
    pub fn error_sum(&self) -> F {
        self.error_sum
    }

    /// Returns the derivative estimator and, through it, the feedback history.
    pub fn estimator(&self) -> &D {
        &self.estimator
    }

    /// Checks if [`PidController::initialize`] has succeeded or the controller was built from a
    /// config.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Runs [`PidController::update`] on a controller that may be absent.
///
/// Returns zero without computing anything when `pid` is `None`, so a control loop that starts
/// before its controller exists commands nothing instead of crashing.
pub fn update<F, D>(pid: Option<&mut PidController<F, D>>, feedback: F) -> F
where
    F: FloatCore + Debug,
    D: DerivativeEstimator<F>,
{
    match pid {
        Some(pid) => pid.update(feedback),
        None => {
            log::trace!("PID update without a controller, commanding zero");
            F::zero()
        }
    }
}
