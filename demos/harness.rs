//! Demonstration harness: configures a controller and closes the loop around a simulated plant
//! This example requires the `--features simulation` flag to be enabled.
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

use nalgebra as na;

use rpid::pid::{PidController, PidError};
use rpid::sim;

const SAMPLE_TIME_S: f64 = 0.01;
const STEPS: usize = 1000;

fn configure(pid: &mut PidController<f64>, output_min: f64) -> Result<(), PidError> {
    pid.initialize(SAMPLE_TIME_S, output_min, 100.0)?;
    pid.set_gains(1.0, 2.0, 4.0)?;
    pid.set_setpoint(10.0);
    Ok(())
}

pub fn main() {
    let mut pid = PidController::new_uninit();

    // A symmetric actuator range is rejected, the lower bound has to be positive
    if let Err(err) = configure(&mut pid, -100.0) {
        eprintln!("Rejected configuration: {err}");
        configure(&mut pid, 1e-3).expect("Fallback configuration must be valid");
    }

    let mdl = sim::MassSpringDamper {
        natural_frequency: 0.5 * std::f64::consts::PI,
        damping_ratio: 0.2,
    };
    let setpoint = sim::SignalGenerator::new(sim::WaveForm::Square, 5.0, 10.0);

    let mut state = na::Vector2::<f64>::zeros();
    for step in 0..STEPS {
        let time = step as f64 * SAMPLE_TIME_S;
        pid.set_setpoint(setpoint.generate(time));

        let feedback = mdl.h(state);
        let control = pid.update(feedback);
        state = sim::rk4_step(|x| mdl.f(x, control), state, SAMPLE_TIME_S);

        if step % 50 == 0 {
            println!(
                "t = {time:5.2}s  setpoint = {:6.2}  feedback = {feedback:8.4}  control = {control:9.3}",
                pid.setpoint()
            );
        }
    }
}
