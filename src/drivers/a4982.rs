//! Allegro A4982 stepper driver.
//!
//! Step/direction driver with two microstep-select lines and active-low
//! enable and reset inputs. One instance owns the six control pins of one
//! axis; on multi-axis boards the pins are type-erased so all axes share a
//! concrete pin type and the controller can hold them in an array.
//!
//! Pulse timing is owned by the caller: the datasheet minimum step-high
//! time is 1 µs, and the reset pulse needs 400 ns, rounded up to 1 µs here.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::motion::Direction;
use crate::drivers::StepperDriver;

/// Microstep resolution on the MS0/MS1 select pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Microstepping {
    Full,
    Half,
    Quarter,
    Sixteenth,
}

impl Microstepping {
    /// (MS0, MS1) pin levels for this resolution.
    fn select_bits(self) -> (bool, bool) {
        match self {
            Microstepping::Full => (false, false),
            Microstepping::Half => (true, false),
            Microstepping::Quarter => (false, true),
            Microstepping::Sixteenth => (true, true),
        }
    }
}

/// One axis's A4982, owning its six control pins.
pub struct A4982<P: OutputPin> {
    step: P,
    direction: P,
    n_enable: P,
    n_reset: P,
    ms0: P,
    ms1: P,
}

impl<P: OutputPin> A4982<P> {
    /// Wrap the control pins and drive them to the power-on state:
    /// disabled, out of reset, step low, reverse, sixteenth stepping.
    pub fn new(step: P, direction: P, n_enable: P, n_reset: P, ms0: P, ms1: P) -> Self {
        let mut driver = Self {
            step,
            direction,
            n_enable,
            n_reset,
            ms0,
            ms1,
        };
        driver.n_enable.set_high().ok(); // active low
        driver.n_reset.set_high().ok();
        driver.step.set_low().ok();
        driver.direction.set_low().ok();
        driver.set_microstepping(Microstepping::Sixteenth);
        driver
    }

    /// Select the microstep resolution.
    pub fn set_microstepping(&mut self, mode: Microstepping) {
        let (ms0, ms1) = mode.select_bits();
        if ms0 {
            self.ms0.set_high().ok();
        } else {
            self.ms0.set_low().ok();
        }
        if ms1 {
            self.ms1.set_high().ok();
        } else {
            self.ms1.set_low().ok();
        }
    }

    /// Hold the driver in reset.
    pub fn enter_reset(&mut self) {
        self.n_reset.set_low().ok();
    }

    /// Release the driver from reset.
    pub fn exit_reset(&mut self) {
        self.n_reset.set_high().ok();
    }

    /// Pulse the reset line to clear the chip's internal translator.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        self.enter_reset();
        delay.delay_us(1); // datasheet asks for 400 ns
        self.exit_reset();
    }

    /// Give the pins back.
    pub fn free(self) -> (P, P, P, P, P, P) {
        (
            self.step,
            self.direction,
            self.n_enable,
            self.n_reset,
            self.ms0,
            self.ms1,
        )
    }
}

impl<P: OutputPin> StepperDriver for A4982<P> {
    fn set_direction(&mut self, direction: Direction) {
        match direction {
            Direction::Forward => self.direction.set_high().ok(),
            Direction::Reverse => self.direction.set_low().ok(),
        };
    }

    fn step_high(&mut self) {
        self.step.set_high().ok();
    }

    fn step_low(&mut self) {
        self.step.set_low().ok();
    }

    fn enable(&mut self) {
        self.n_enable.set_low().ok(); // active low
    }

    fn disable(&mut self) {
        self.n_enable.set_high().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{PinLog, RecorderPin, TickDelay};

    fn driver_with_log() -> (A4982<RecorderPin>, PinLog) {
        let log = PinLog::new();
        let driver = A4982::new(
            log.pin("step"),
            log.pin("dir"),
            log.pin("n_enable"),
            log.pin("n_reset"),
            log.pin("ms0"),
            log.pin("ms1"),
        );
        (driver, log)
    }

    #[test]
    fn power_on_state_is_disabled_sixteenth() {
        let (_driver, log) = driver_with_log();
        assert!(log.level("n_enable")); // active low: high = disabled
        assert!(log.level("n_reset")); // out of reset
        assert!(!log.level("step"));
        assert!(log.level("ms0"));
        assert!(log.level("ms1"));
    }

    #[test]
    fn enable_is_active_low() {
        let (mut driver, log) = driver_with_log();
        driver.enable();
        assert!(!log.level("n_enable"));
        driver.disable();
        assert!(log.level("n_enable"));
    }

    #[test]
    fn direction_pin_mapping() {
        let (mut driver, log) = driver_with_log();
        driver.set_direction(Direction::Forward);
        assert!(log.level("dir"));
        driver.set_direction(Direction::Reverse);
        assert!(!log.level("dir"));
    }

    #[test]
    fn microstep_select_bits() {
        let (mut driver, log) = driver_with_log();
        driver.set_microstepping(Microstepping::Full);
        assert!(!log.level("ms0"));
        assert!(!log.level("ms1"));
        driver.set_microstepping(Microstepping::Quarter);
        assert!(!log.level("ms0"));
        assert!(log.level("ms1"));
        driver.set_microstepping(Microstepping::Half);
        assert!(log.level("ms0"));
        assert!(!log.level("ms1"));
    }

    #[test]
    fn reset_pulses_low_then_high() {
        let (mut driver, log) = driver_with_log();
        let mut delay = TickDelay::default();
        log.clear(); // drop the construction writes
        driver.reset(&mut delay);
        assert!(log.level("n_reset"));
        // low edge then high edge were both recorded
        assert_eq!(log.edges("n_reset"), vec![false, true]);
        assert!(delay.total_us() >= 1);
    }
}
