// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Port map and payload layout of the node protocol.
//!
//! Port numbers are frozen for wire compatibility with deployed host
//! software. Ports [`PORT_SET_VREF`]/[`PORT_GET_VREF`] and [`PORT_PWM`] are
//! serviced by board-level code, not by the motion core; they are listed
//! here so the numbers stay reserved.

/// Broadcast synchronisation trigger, a proxy for a dedicated sync line.
pub const PORT_SYNC: u8 = 8;

/// Read the motor current reference (single-axis node hardware).
pub const PORT_GET_VREF: u8 = 11;

/// Set the motor current references (three-axis node hardware).
pub const PORT_SET_VREF: u8 = 11;

/// Enable or disable all stepper drivers.
pub const PORT_ENABLE_DRIVERS: u8 = 12;

/// Enqueue a motion segment (relative steps or an absolute position).
pub const PORT_STEP_REQUEST: u8 = 13;

/// Report the absolute position of every axis.
pub const PORT_GET_POSITION: u8 = 14;

/// Report the node status.
pub const PORT_GET_STATUS: u8 = 15;

/// Adjust the PWM MOSFET output (three-axis node hardware).
pub const PORT_PWM: u8 = 16;

/// Length of the status reply payload.
pub const STATUS_LEN: usize = 7;

/// stepRequest payload length for a node with `axes` motors:
/// one `i24` target per axis, then `u24` segment time, `u8` key,
/// `u8` absolute flag, `u8` wait-for-sync flag.
pub const fn step_request_len(axes: usize) -> usize {
    3 * axes + 6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_request_lengths() {
        assert_eq!(step_request_len(1), 9);
        assert_eq!(step_request_len(3), 15);
    }
}
