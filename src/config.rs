// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Node sizing and identity constants.
//!
//! Axis count and buffer capacity are const-generic parameters of
//! [`crate::MotionBuffer`] and [`crate::Controller`]; the constants here pin
//! them down for the two shipped node variants and collect the remaining
//! compile-time parameters of the step generator.

/// Microstepping bits used purely for motion smoothing. Host-visible
/// positions are quarter-steps; the generator runs `SMOOTHING_BITS` finer.
pub const SMOOTHING_BITS: u32 = 2;

/// Nominal step-generator tick rate. One tick is 62.5 µs.
pub const TICK_RATE_HZ: u32 = 16_000;

/// Minimum step-pulse high time in microseconds, per the A4982 datasheet.
pub const STEP_PULSE_US: u32 = 1;

/// Motion buffer length on the single-axis node. One slot always stays
/// open, so 47 segments (~0.75 s of shortest moves) can be in flight.
pub const SINGLE_AXIS_SEGMENTS: usize = 48;

/// Motion buffer length on the three-axis node, sized for the larger
/// per-slot target array on the same 2 KB part.
pub const TRI_AXIS_SEGMENTS: usize = 32;

/// Virtual-node protocol descriptor advertised to the host by the
/// single-axis node. The spelling is frozen: deployed hosts resolve it
/// byte-for-byte.
pub const SINGLE_AXIS_URL: &str = "http://www.fabuint.com/vn/086-005b.py";

/// Virtual-node protocol descriptor advertised by the three-axis node.
pub const TRI_AXIS_URL: &str = "http://www.fabuint.com/vn/096-001b.py";
