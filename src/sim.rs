use nalgebra as na;

pub enum WaveForm {
    Sine,
    Square,
}

pub struct SignalGenerator {
    fcn: fn(f64) -> f64,
    amplitude: f64,
    offset: f64,
}

impl SignalGenerator {
    pub fn new(waveform: WaveForm, amplitude: f64, offset: f64) -> Self {
        Self {
            fcn: match waveform {
                WaveForm::Sine => f64::sin,
                WaveForm::Square => |x| x.sin().signum(),
            },
            amplitude,
            offset,
        }
    }

    /// Evaluates the signal `time` seconds after the start of the simulation
    pub fn generate(&self, time: f64) -> f64 {
        self.amplitude * (self.fcn)(time) + self.offset
    }
}

/// Advances `x' = f(x)` by one classic fourth-order Runge-Kutta step of size `dt`
pub fn rk4_step<const D: usize>(
    f: impl Fn(na::SVector<f64, D>) -> na::SVector<f64, D>,
    x: na::SVector<f64, D>,
    dt: f64,
) -> na::SVector<f64, D> {
    let k1 = f(x);
    let k2 = f(x + k1 * (0.5 * dt));
    let k3 = f(x + k2 * (0.5 * dt));
    let k4 = f(x + k3 * dt);
    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}

pub struct MassSpringDamper {
    pub natural_frequency: f64,
    pub damping_ratio: f64,
}

impl MassSpringDamper {
    /// Implements the state-space realization of the mass-spring-damper system:
    /// ┌     ┐   ┌              ┐┌    ┐   ┌     ┐
    /// │ p'  │ = │  0     1     ││ p  │ + │ 0   │ u
    /// │ p'' │   │  -ωₙ²  -2ζωₙ ││ p' │   │ ωₙ² │
    /// └     ┘   └              ┘└    ┘   └     ┘
    ///     ┌      ┐┌    ┐
    /// p = │ 1  0 ││ p  │
    ///     └      ┘│ p' │
    ///             └    ┘
    pub fn f(&self, x: na::Vector2<f64>, u: f64) -> na::Vector2<f64> {
        let omega_sq = self.natural_frequency.powi(2);
        let two_zeta_omega = 2.0 * self.natural_frequency * self.damping_ratio;

        let mat_a = na::Matrix2::new(0.0, 1.0, -omega_sq, -two_zeta_omega);
        let mat_b = na::Vector2::new(0.0, omega_sq);

        mat_a * x + mat_b * u
    }

    pub fn h(&self, x: na::Vector2<f64>) -> f64 {
        x[0]
    }
}

/// First-order lag `τ T' = K u - T`, e.g. a heater driving a thermal mass relative to ambient
pub struct FirstOrderLag {
    pub gain: f64,
    pub time_constant: f64,
}

impl FirstOrderLag {
    pub fn f(&self, x: na::Vector1<f64>, u: f64) -> na::Vector1<f64> {
        (na::Vector1::new(self.gain * u) - x) / self.time_constant
    }

    pub fn h(&self, x: na::Vector1<f64>) -> f64 {
        x[0]
    }
}
