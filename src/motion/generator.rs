// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bresenham-in-time step generator.
//!
//! The classical line algorithm with clock time in place of the major axis:
//! every tick adds an axis's step count to its accumulator, and a crossing
//! of the half-duration threshold emits a step and subtracts the full
//! duration. An axis asked for `K` steps over `T` ticks therefore steps `K`
//! times, uniformly spread across the segment, for any `K <= T`.
//!
//! Driving the algorithm with raw time rather than a virtual major axis is
//! what lets heterogeneous nodes hold lock-step over the network: they
//! share only a tick phase, not a step counter, and absolute position
//! targets become possible because the host no longer pre-divides moves.
//!
//! This module is pure state: the caller (the tick routine in
//! [`crate::Controller`]) owns the pins and applies the returned step mask.

use crate::motion::segment::Direction;

/// Per-axis execution state for the active segment.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisState {
    /// Step count this axis contributes to the active segment.
    target_steps: u32,
    /// Countdown of steps left. Advisory, for reporting only; segment
    /// termination is decided by time, never by this field.
    steps_remaining: u32,
    /// Bresenham accumulator; gains `target_steps` per tick.
    accumulator: i32,
    /// Position ledger increment per emitted step.
    direction: i32,
}

impl AxisState {
    const IDLE: Self = Self {
        target_steps: 0,
        steps_remaining: 0,
        accumulator: 0,
        direction: -1,
    };
}

/// The single segment currently being executed.
///
/// `time_remaining == 0` means idle: the tick routine emits no steps and
/// attempts to load the next buffered segment instead. Arming writes
/// `time_remaining` last, after every other field, so a partially loaded
/// segment can never start stepping.
pub struct StepGenerator<const AXES: usize> {
    axes: [AxisState; AXES],
    /// Step-trigger threshold, half the segment duration.
    threshold: i32,
    /// Full segment duration, subtracted from an accumulator on each step.
    total_time: u32,
    /// Ticks left in the active segment. Zero when idle.
    time_remaining: u32,
    /// Key of the active segment, echoed in status replies.
    key: u8,
}

impl<const AXES: usize> StepGenerator<AXES> {
    pub const fn new() -> Self {
        Self {
            axes: [AxisState::IDLE; AXES],
            threshold: 0,
            total_time: 0,
            time_remaining: 0,
            key: 0,
        }
    }

    /// Idle: no segment armed, next tick will try a load.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.time_remaining == 0
    }

    /// Ticks left in the active segment.
    #[inline]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Key of the segment being executed.
    #[inline]
    pub fn key(&self) -> u8 {
        self.key
    }

    /// Steps not yet emitted on `axis` in the active segment. Advisory.
    #[inline]
    pub fn steps_remaining(&self, axis: usize) -> u32 {
        self.axes[axis].steps_remaining
    }

    /// Arm the generator with a resolved segment: per-axis step magnitudes
    /// and directions, plus the duration and key.
    ///
    /// The `time_remaining` store comes last: it is what wakes the tick
    /// routine, and every other field must be in place before it lands.
    pub fn arm(
        &mut self,
        steps: &[u32; AXES],
        directions: &[Direction; AXES],
        duration: u32,
        key: u8,
    ) {
        for axis in 0..AXES {
            self.axes[axis] = AxisState {
                target_steps: steps[axis],
                steps_remaining: steps[axis],
                accumulator: 0,
                direction: directions[axis].sign(),
            };
        }
        self.key = key;
        self.threshold = (duration >> 1) as i32;
        self.total_time = duration;
        self.time_remaining = duration; // arming store, keep last
    }

    /// Advance one tick.
    ///
    /// Returns a bitmask of axes that step on this tick; bit `i` is axis
    /// `i`. The position ledger is updated here, exactly once per emitted
    /// step. Calling while idle is a no-op returning an empty mask.
    pub fn advance(&mut self, positions: &mut [i32; AXES]) -> u8 {
        if self.time_remaining == 0 {
            return 0;
        }
        self.time_remaining -= 1;

        let mut step_mask: u8 = 0;
        for axis in 0..AXES {
            let state = &mut self.axes[axis];
            state.accumulator += state.target_steps as i32;
            if state.accumulator > self.threshold {
                state.accumulator -= self.total_time as i32;
                step_mask |= 1 << axis;
                state.steps_remaining = state.steps_remaining.wrapping_sub(1);
                positions[axis] += state.direction;
            }
        }
        step_mask
    }
}

impl<const AXES: usize> Default for StepGenerator<AXES> {
    fn default() -> Self {
        Self::new()
    }
}
