// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # fabnode
//!
//! Motion core for networked stepper-driver nodes: a time-synchronised
//! multi-axis step generator with its motion buffer and packet services.
//! Nodes hang off a shared RS-485 bus; the host streams pre-planned
//! constant-velocity segments to each node, and a broadcast sync packet
//! phase-locks the step timers so all axes in the network move in
//! lock-step time.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | ------- |
//! | [`protocol`] | Payload codec, port map, link-layer contract |
//! | [`motion`] | Segment records, circular motion buffer, Bresenham-in-time generator |
//! | [`drivers`] | Stepper driver chips behind the [`StepperDriver`] capability |
//! | [`node`] | The [`Controller`] aggregate: services, loader, tick routine |
//! | [`config`] | Node sizing and identity constants |
//!
//! ## Execution model
//!
//! Two contexts share one [`Controller`] through a critical section: the
//! foreground packet callback ([`Controller::dispatch`]) produces motion
//! segments into the buffer, and the fixed-period timer interrupt
//! ([`Controller::on_tick`]) consumes them, emitting step pulses with the
//! Bresenham line algorithm run in the time domain. There is no planner in
//! here and no heap anywhere: capacities are const generics, and the host
//! is told in-band when the buffer is full.
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Run the suite (the core is hardware-free; tests drive the tick routine
//! from a virtual clock):
//!
//! ```bash
//! cargo test
//! ```

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod drivers;
pub mod motion;
pub mod node;
pub mod protocol;

#[cfg(test)]
mod testutil;

pub use drivers::{Microstepping, StepperDriver, A4982};
pub use motion::{BufferFull, Dequeue, Direction, MotionBuffer, MotionSegment, StepGenerator};
pub use node::{
    Controller, SharedController, SingleAxisController, TickClock, TriAxisController,
};
pub use protocol::Link;
