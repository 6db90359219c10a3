// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Node controller: the aggregate the timer interrupt and the packet
//! handlers share.
//!
//! One [`Controller`] owns the whole motion state of a node: motion
//! buffer, active segment, position ledger, and the per-axis driver chips.
//! The link layer calls [`Controller::dispatch`] from its packet callback;
//! the step timer calls [`Controller::on_tick`] from its interrupt. Both
//! contexts reach the controller through a critical section (see
//! [`SharedController`]), so each holds an exclusive borrow for the few
//! microseconds it needs and the buffer's publication ordering degenerates
//! to plain program order.
//!
//! The tick routine must finish well inside one tick period (62.5 µs): its
//! cost is one Bresenham update per axis plus a single 1 µs step pulse
//! shared by all axes.

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;

use crate::config::{SMOOTHING_BITS, STEP_PULSE_US};
use crate::drivers::StepperDriver;
use crate::motion::{Dequeue, Direction, MotionBuffer, MotionSegment, StepGenerator};
use crate::protocol::codec;
use crate::protocol::ports;
use crate::protocol::Link;

/// Hardware tick timer, as far as synchronisation is concerned.
///
/// The step timer free-runs in compare-match mode; sync packets zero its
/// counter so that every node's next tick lands one full period after the
/// broadcast, phase-locking the network.
pub trait TickClock {
    /// Zero the tick counter. The next tick fires one full period from now.
    fn realign(&mut self);
}

/// A controller shared between the main loop and the step-timer interrupt.
///
/// The interrupt side borrows the controller for exactly one
/// [`Controller::on_tick`]; packet callbacks borrow it for one dispatch.
pub type SharedController<A, D, const AXES: usize, const CAP: usize> =
    critical_section::Mutex<RefCell<Controller<A, D, AXES, CAP>>>;

/// Single-axis node: one motor, 48 buffer slots.
pub type SingleAxisController<A, D> =
    Controller<A, D, 1, { crate::config::SINGLE_AXIS_SEGMENTS }>;

/// Three-axis node: coordinated gantry, 32 buffer slots.
pub type TriAxisController<A, D> = Controller<A, D, 3, { crate::config::TRI_AXIS_SEGMENTS }>;

/// Motion core of one node.
pub struct Controller<A, D, const AXES: usize, const CAP: usize> {
    buffer: MotionBuffer<AXES, CAP>,
    generator: StepGenerator<AXES>,
    /// Absolute position of each axis, internal microsteps.
    positions: [i32; AXES],
    drivers: [A; AXES],
    delay: D,
    /// The next buffered segment is gated and the node is holding for a
    /// synchronisation packet.
    waiting_for_sync: bool,
}

impl<A, D, const AXES: usize, const CAP: usize> Controller<A, D, AXES, CAP>
where
    A: StepperDriver,
    D: DelayNs,
{
    /// Build a controller over the axis drivers. Motors start disabled;
    /// the first loaded segment (or an enable-drivers packet) wakes them.
    pub fn new(mut drivers: [A; AXES], delay: D) -> Self {
        for driver in drivers.iter_mut() {
            driver.disable();
        }
        Self {
            buffer: MotionBuffer::new(),
            generator: StepGenerator::new(),
            positions: [0; AXES],
            drivers,
            delay,
            waiting_for_sync: false,
        }
    }

    /// Absolute position of `axis` in internal microsteps.
    pub fn position(&self, axis: usize) -> i32 {
        self.positions[axis]
    }

    /// Key of the segment currently executing (or last executed).
    pub fn active_key(&self) -> u8 {
        self.generator.key()
    }

    /// Ticks left in the active segment; zero when idle.
    pub fn time_remaining(&self) -> u32 {
        self.generator.time_remaining()
    }

    /// Segments currently queued in the motion buffer.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Holding for a synchronisation packet.
    pub fn is_waiting_for_sync(&self) -> bool {
        self.waiting_for_sync
    }

    /// Power all motor coils.
    pub fn enable_all(&mut self) {
        for driver in self.drivers.iter_mut() {
            driver.enable();
        }
    }

    /// Release all motor coils.
    pub fn disable_all(&mut self) {
        for driver in self.drivers.iter_mut() {
            driver.disable();
        }
    }

    /// Step-timer interrupt body. Runs once per tick.
    pub fn on_tick(&mut self) {
        if !self.generator.is_idle() {
            let step_mask = self.generator.advance(&mut self.positions);
            self.pulse(step_mask);
        }
        // the decrement above may just have finished the segment; load the
        // next one in the same tick so back-to-back segments stay gapless
        if self.generator.is_idle() && self.try_load() {
            self.enable_all();
        }
    }

    /// Route an inbound packet to its service. Returns `false` for ports
    /// this core does not own (vRef, PWM, unknown) so board-level code can
    /// service them; such packets are otherwise ignored.
    pub fn dispatch<L: Link, C: TickClock>(
        &mut self,
        port: u8,
        link: &mut L,
        clock: &mut C,
    ) -> bool {
        match port {
            ports::PORT_ENABLE_DRIVERS => self.svc_enable_drivers(link),
            ports::PORT_STEP_REQUEST => self.svc_step_request(link),
            ports::PORT_GET_POSITION => self.svc_get_position(link),
            ports::PORT_GET_STATUS => self.svc_get_status(link),
            ports::PORT_SYNC => self.svc_sync(clock),
            _ => return false,
        }
        true
    }

    /// Raise the step line of every axis in `step_mask`, hold the
    /// datasheet minimum, then clear every step line.
    fn pulse(&mut self, step_mask: u8) {
        for (axis, driver) in self.drivers.iter_mut().enumerate() {
            if step_mask & (1 << axis) != 0 {
                driver.step_high();
            }
        }
        self.delay.delay_us(STEP_PULSE_US);
        for driver in self.drivers.iter_mut() {
            driver.step_low();
        }
    }

    /// Try to move the next buffered segment into the step generator.
    ///
    /// Absolute targets are resolved against the position ledger *now*, at
    /// load time, so earlier segments have already left their mark and the
    /// axis lands where the host planned. Direction pins are latched before
    /// the generator is armed.
    fn try_load(&mut self) -> bool {
        let segment = match self.buffer.try_next() {
            Dequeue::Empty => return false,
            Dequeue::AwaitingSync => {
                self.waiting_for_sync = true;
                return false;
            }
            Dequeue::Segment(segment) => segment,
        };
        self.waiting_for_sync = false;

        let mut steps = [0u32; AXES];
        let mut directions = [Direction::Reverse; AXES];
        for axis in 0..AXES {
            let mut delta = segment.target[axis];
            if segment.absolute {
                delta -= self.positions[axis];
            }
            if delta > 0 {
                steps[axis] = delta as u32;
                directions[axis] = Direction::Forward;
            } else {
                steps[axis] = delta.unsigned_abs();
                directions[axis] = Direction::Reverse;
            }
            self.drivers[axis].set_direction(directions[axis]);
        }
        self.generator
            .arm(&steps, &directions, segment.duration, segment.key);
        true
    }

    /// enableDrivers: payload byte zero disables, anything else enables.
    /// Replies with an empty ACK.
    fn svc_enable_drivers<L: Link>(&mut self, link: &mut L) {
        if link.rx_payload()[0] != 0 {
            self.enable_all();
        } else {
            self.disable_all();
        }
        link.transmit_unicast(ports::PORT_ENABLE_DRIVERS, 0);
    }

    /// stepRequest: decode a segment, shift targets to internal microsteps,
    /// queue it. The reply is a status whose code is the enqueue result.
    fn svc_step_request<L: Link>(&mut self, link: &mut L) {
        let segment = {
            let rx = link.rx_payload();
            let mut target = [0i32; AXES];
            let mut offset = 0;
            for value in target.iter_mut() {
                *value = codec::read_i24(rx, offset) << SMOOTHING_BITS;
                offset += 3;
            }
            MotionSegment {
                target,
                duration: codec::read_u24(rx, offset),
                key: rx[offset + 3],
                absolute: rx[offset + 4] != 0,
                wait_for_sync: rx[offset + 5] != 0,
            }
        };
        let code = if self.buffer.enqueue(segment).is_ok() { 1 } else { 0 };
        self.reply_status(link, ports::PORT_STEP_REQUEST, code);
    }

    /// getPosition: one `i24` per axis, in host-visible steps.
    fn svc_get_position<L: Link>(&mut self, link: &mut L) {
        let positions = self.positions;
        let tx = link.tx_payload();
        let mut offset = 0;
        for position in positions {
            codec::write_i24(tx, offset, position >> SMOOTHING_BITS);
            offset += 3;
        }
        link.transmit_unicast(ports::PORT_GET_POSITION, offset);
    }

    /// getStatus: status reply with code 1.
    fn svc_get_status<L: Link>(&mut self, link: &mut L) {
        self.reply_status(link, ports::PORT_GET_STATUS, 1);
    }

    /// sync: realign the tick phase if this node is holding, then release
    /// the oldest still-gated segment. Broadcast; no reply.
    fn svc_sync<C: TickClock>(&mut self, clock: &mut C) {
        if self.waiting_for_sync {
            clock.realign();
        }
        self.buffer.release_next_waiting();
    }

    /// Status payload: `[code, key, timeRemaining u24, read, write]`.
    fn reply_status<L: Link>(&mut self, link: &mut L, port: u8, code: u8) {
        let key = self.generator.key();
        let remaining = self.generator.time_remaining();
        let read = self.buffer.read_position() as u8;
        let write = self.buffer.write_position() as u8;

        let tx = link.tx_payload();
        tx[0] = code;
        tx[1] = key;
        codec::write_u24(tx, 2, remaining);
        tx[5] = read;
        tx[6] = write;
        link.transmit_unicast(port, ports::STATUS_LEN);
    }
}
