// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Stepper Driver Chips
//!
//! Device-level drivers sitting between the motion core and the motor
//! hardware. The tick routine in [`crate::Controller`] talks to every axis
//! through the [`StepperDriver`] capability so the same core runs against
//! real driver chips on target and against recorders in the test suite.
//!
//! ## Existing drivers
//!
//! - [`a4982`] – Allegro A4982 step/direction driver with microstep select

pub mod a4982;

pub use a4982::{Microstepping, A4982};

use crate::motion::Direction;

/// Pin-level capability of one axis's stepper driver.
///
/// Step pulses are coordinated across axes by the caller: it raises every
/// stepping axis, holds the minimum pulse width once, then lowers all step
/// lines, so simultaneous steps stay simultaneous.
pub trait StepperDriver {
    /// Latch the travel direction onto the direction pin. Called while the
    /// step line is low, before the segment is armed.
    fn set_direction(&mut self, direction: Direction);

    /// Raise the step line.
    fn step_high(&mut self);

    /// Lower the step line.
    fn step_low(&mut self);

    /// Power the motor coils.
    fn enable(&mut self);

    /// Release the motor coils.
    fn disable(&mut self);
}
