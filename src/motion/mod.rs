// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Motion Pipeline
//!
//! The queued-segment pipeline between the packet services and the step
//! pins: segment records, the circular motion buffer, and the
//! Bresenham-in-time generator that executes one segment at a time.
//!
//! ## Modules
//!
//! - [`segment`] - The motion segment record and axis direction.
//! - [`buffer`] - Fixed-capacity producer/consumer segment ring.
//! - [`generator`] - Time-domain Bresenham step generator state.

pub mod buffer;
pub mod generator;
pub mod segment;

pub use buffer::{BufferFull, Dequeue, MotionBuffer};
pub use generator::StepGenerator;
pub use segment::{Direction, MotionSegment};
