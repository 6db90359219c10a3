//! Test fakes: recorder pins and drivers, a fake packet link, and a fake
//! tick clock. The suite drives [`crate::Controller::on_tick`] from plain
//! loops, so "one tick" is one loop iteration and the whole node runs on a
//! virtual clock.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::drivers::StepperDriver;
use crate::motion::Direction;
use crate::node::TickClock;
use crate::protocol::Link;

#[derive(Default)]
struct PinState {
    level: bool,
    edges: Vec<bool>,
}

/// Shared recorder behind a set of named [`RecorderPin`]s.
#[derive(Default, Clone)]
pub struct PinLog {
    pins: Rc<RefCell<HashMap<&'static str, PinState>>>,
}

impl PinLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a pin that records into this log under `name`.
    pub fn pin(&self, name: &'static str) -> RecorderPin {
        self.pins.borrow_mut().entry(name).or_default();
        RecorderPin {
            name,
            pins: self.pins.clone(),
        }
    }

    /// Current level of `name`.
    pub fn level(&self, name: &'static str) -> bool {
        self.pins.borrow()[name].level
    }

    /// Every level written to `name` since the last [`PinLog::clear`].
    pub fn edges(&self, name: &'static str) -> Vec<bool> {
        self.pins.borrow()[name].edges.clone()
    }

    /// Forget recorded writes; levels are kept.
    pub fn clear(&self) {
        for state in self.pins.borrow_mut().values_mut() {
            state.edges.clear();
        }
    }
}

/// An output pin that records every write.
pub struct RecorderPin {
    name: &'static str,
    pins: Rc<RefCell<HashMap<&'static str, PinState>>>,
}

impl RecorderPin {
    fn record(&mut self, level: bool) {
        let mut pins = self.pins.borrow_mut();
        let state = pins.get_mut(self.name).expect("pin registered in log");
        state.level = level;
        state.edges.push(level);
    }
}

impl ErrorType for RecorderPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for RecorderPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true);
        Ok(())
    }
}

/// Delay provider that only counts the time it was asked to burn.
#[derive(Default)]
pub struct TickDelay {
    elapsed_ns: u64,
}

impl TickDelay {
    pub fn total_us(&self) -> u64 {
        self.elapsed_ns / 1_000
    }
}

impl DelayNs for TickDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}

#[derive(Default)]
struct AxisRecord {
    steps: u32,
    step_line: bool,
    direction: Option<Direction>,
    enabled: bool,
}

/// Observer side of one [`RecorderDriver`].
#[derive(Default, Clone)]
pub struct AxisHandle {
    record: Rc<RefCell<AxisRecord>>,
}

impl AxisHandle {
    /// Rising edges seen on the step line.
    pub fn steps(&self) -> u32 {
        self.record.borrow().steps
    }

    /// Last direction latched.
    pub fn direction(&self) -> Option<Direction> {
        self.record.borrow().direction
    }

    pub fn enabled(&self) -> bool {
        self.record.borrow().enabled
    }
}

/// Stepper driver standing in for one axis's driver chip.
pub struct RecorderDriver {
    record: Rc<RefCell<AxisRecord>>,
}

impl StepperDriver for RecorderDriver {
    fn set_direction(&mut self, direction: Direction) {
        self.record.borrow_mut().direction = Some(direction);
    }

    fn step_high(&mut self) {
        let mut record = self.record.borrow_mut();
        if !record.step_line {
            record.steps += 1;
        }
        record.step_line = true;
    }

    fn step_low(&mut self) {
        self.record.borrow_mut().step_line = false;
    }

    fn enable(&mut self) {
        self.record.borrow_mut().enabled = true;
    }

    fn disable(&mut self) {
        self.record.borrow_mut().enabled = false;
    }
}

/// A bank of recorder drivers plus the handles to inspect them.
pub fn recorder_axes<const N: usize>() -> ([RecorderDriver; N], [AxisHandle; N]) {
    let handles: [AxisHandle; N] = core::array::from_fn(|_| AxisHandle::default());
    let drivers: [RecorderDriver; N] = core::array::from_fn(|axis| RecorderDriver {
        record: handles[axis].record.clone(),
    });
    (drivers, handles)
}

/// In-memory stand-in for the RS-485 link layer.
pub struct FakeLink {
    rx: Vec<u8>,
    tx: [u8; 64],
    sent: Vec<(u8, Vec<u8>)>,
}

impl FakeLink {
    pub fn new() -> Self {
        Self {
            rx: Vec::new(),
            tx: [0; 64],
            sent: Vec::new(),
        }
    }

    /// Stage an inbound payload, as the link layer would before routing.
    pub fn receive(&mut self, payload: &[u8]) {
        self.rx = payload.to_vec();
    }

    /// Port and payload of the most recent outbound packet.
    pub fn last_reply(&self) -> (u8, Vec<u8>) {
        self.sent.last().cloned().expect("a packet was transmitted")
    }

    pub fn nothing_sent(&self) -> bool {
        self.sent.is_empty()
    }
}

impl Link for FakeLink {
    fn rx_payload(&self) -> &[u8] {
        &self.rx
    }

    fn tx_payload(&mut self) -> &mut [u8] {
        &mut self.tx
    }

    fn transmit_unicast(&mut self, port: u8, length: usize) {
        self.sent.push((port, self.tx[..length].to_vec()));
    }
}

/// Tick timer whose realignments are merely counted.
#[derive(Default)]
pub struct FakeClock {
    realigns: u32,
}

impl FakeClock {
    pub fn realigns(&self) -> u32 {
        self.realigns
    }
}

impl TickClock for FakeClock {
    fn realign(&mut self) {
        self.realigns += 1;
    }
}
