#![warn(missing_docs)]

//! # rpid
//!
//! This library provides a discrete-time PID (Proportional-Integral-Derivative) controller in Rust,
//! meant to be called once per sampling period from a control loop.
//!
//! ## Features
//!
//! - Validated configuration: non-negative gains, a strictly positive sampling period and output
//!   bounds with `0 < min < max`. Invalid arguments never mutate the controller.
//! - Derivative on measurement: the derivative term differentiates the feedback, not the error,
//!   so setpoint steps do not cause derivative kick.
//! - Central-difference derivative over a two-sample history, or any custom estimator through the
//!   [`derivative::DerivativeEstimator`] trait.
//! - Bumpless integral retuning: changing the integral gain rescales the accumulated error so the
//!   integral term stays continuous.
//! - `no_std` and generic over `f32`/`f64`.
//!
//! ## Usage
//!
//! ```rust
//! use rpid::pid::PidController;
//!
//! let mut pid = PidController::<f64>::new_uninit();
//!
//! // An uninitialized controller has all gains zeroed and commands nothing
//! assert_eq!(pid.update(3.0), 0.0);
//!
//! // Sample every 10ms, actuator range [1, 100]
//! assert!(pid.initialize(0.01, 1.0, 100.0).is_ok());
//! assert!(pid.set_gains(2.0, 0.5, 0.0).is_ok());
//! pid.set_setpoint(10.0);
//!
//! let feedback = 4.0;
//! let output = pid.update(feedback);
//! assert!(output > 0.0);
//! ```
//!
//! ### Building from a config
//!
//! ```rust
//! use rpid::pid::{PidConfigBuilder, PidController};
//!
//! let config = PidConfigBuilder::new(0.01, 1.0, 100.0)
//!     .kp(2.0)
//!     .ki(0.5)
//!     .clamp_output(true)
//!     .build()
//!     .expect("Invalid PID config");
//!
//! let mut pid = PidController::new(config);
//! pid.set_setpoint(1000.0);
//!
//! // Clamping was requested, so the output saturates at the upper bound
//! assert_eq!(pid.update(0.0), 100.0);
//! ```
//!
//! ### Plugging in your derivative estimator
//!
//! ```rust
//! use rpid::derivative::FiniteDifference;
//! use rpid::pid::{PidConfigBuilder, PidController};
//!
//! let config = PidConfigBuilder::new(0.1, 1.0, 10.0)
//!     .kd(1.0)
//!     .build()
//!     .unwrap();
//!
//! // Backward difference instead of the default lagged central difference
//! let mut pid = PidController::with_estimator(config, FiniteDifference::backward());
//! let _ = pid.update(0.0);
//! ```
//!
//! ## License
//!
//! MIT
#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// The main module for the PID controller library.
pub mod pid;

/// The module containing derivative estimators used for the derivative term.
pub mod derivative;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
