//! Two-wire interface (TWI) abstractions
//!
//! Two layers live here:
//!
//! - [`TwiRegisters`] exposes the raw control, status, data and bit rate
//!   registers of a TWI peripheral. Chip support implements this and
//!   nothing else.
//! - [`TwoWireBus`] exposes the bus primitives (start, stop, byte send,
//!   byte receive with or without acknowledge) that device drivers
//!   sequence into transactions.

/// Control register bits
pub mod control {
    /// Interrupt flag: set by hardware when the current operation is done,
    /// cleared by writing a one to start the next operation
    pub const TWINT: u8 = 1 << 7;
    /// Enable acknowledge on received bytes
    pub const TWEA: u8 = 1 << 6;
    /// Generate a start condition
    pub const TWSTA: u8 = 1 << 5;
    /// Generate a stop condition
    pub const TWSTO: u8 = 1 << 4;
    /// Write collision flag
    pub const TWWC: u8 = 1 << 3;
    /// Peripheral enable
    pub const TWEN: u8 = 1 << 2;
    /// Interrupt enable (unused, the drivers poll)
    pub const TWIE: u8 = 1 << 0;
}

/// Master-mode status codes (status register with prescaler bits masked)
pub mod status {
    /// Mask removing the prescaler bits from the status register
    pub const MASK: u8 = 0xF8;

    pub const START: u8 = 0x08;
    pub const REPEATED_START: u8 = 0x10;
    pub const SLA_W_ACK: u8 = 0x18;
    pub const SLA_W_NACK: u8 = 0x20;
    pub const DATA_TX_ACK: u8 = 0x28;
    pub const DATA_TX_NACK: u8 = 0x30;
    pub const ARBITRATION_LOST: u8 = 0x38;
    pub const SLA_R_ACK: u8 = 0x40;
    pub const SLA_R_NACK: u8 = 0x48;
    pub const DATA_RX_ACK: u8 = 0x50;
    pub const DATA_RX_NACK: u8 = 0x58;
    /// Illegal start/stop detected on the bus
    pub const BUS_ERROR: u8 = 0x00;
}

/// Errors from two-wire bus operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Completion flag never set within the configured poll budget
    Timeout,
    /// Addressed device (or data byte) was not acknowledged
    Nack,
    /// Another master won arbitration
    ArbitrationLost,
    /// Byte operation attempted without a preceding start condition
    NoTransaction,
    /// Hardware reported a status code that does not fit the operation
    UnexpectedStatus(u8),
}

/// Transfer direction encoded in the R/W bit of the address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// Build the address byte sent after a start condition
///
/// # Arguments
/// * `address` - 7-bit device address
/// * `direction` - Value of the R/W bit
pub const fn address_byte(address: u8, direction: Direction) -> u8 {
    (address << 1) | direction as u8
}

/// Raw TWI peripheral registers
///
/// Implementations map these onto the chip's memory-mapped registers.
/// Reads take `&mut self` because status and data reads have hardware
/// side effects on some parts.
pub trait TwiRegisters {
    /// Write the control register (TWCR)
    fn write_control(&mut self, value: u8);

    /// Read the control register (TWCR)
    fn read_control(&mut self) -> u8;

    /// Read the status register (TWSR), prescaler bits included
    fn read_status(&mut self) -> u8;

    /// Write the status register (only the prescaler bits are writable)
    fn write_status(&mut self, value: u8);

    /// Write the bit rate register (TWBR)
    fn write_bit_rate(&mut self, value: u8);

    /// Write the data register (TWDR)
    fn write_data(&mut self, value: u8);

    /// Read the data register (TWDR)
    fn read_data(&mut self) -> u8;

    /// Enable the internal pull-ups on the SDA and SCL pins
    fn enable_pullups(&mut self);
}

/// Two-wire bus primitives
///
/// A register read from a device is sequenced as
/// `start, send(addr|W), send(reg), start, send(addr|R), read_ack, read_no_ack, stop`.
/// Every successful `start` must eventually be paired with one `stop`,
/// including when a later primitive fails.
pub trait TwoWireBus {
    /// Issue a start (or repeated start) condition and wait for completion
    fn start(&mut self) -> Result<(), BusError>;

    /// Issue a stop condition
    ///
    /// Does not wait: stop completion is not signalled by the completion flag.
    fn stop(&mut self);

    /// Transmit one byte and wait for completion
    fn send(&mut self, byte: u8) -> Result<(), BusError>;

    /// Receive one byte, acknowledging it (more bytes follow)
    fn read_ack(&mut self) -> Result<u8, BusError>;

    /// Receive one byte without acknowledging it (last byte)
    fn read_no_ack(&mut self) -> Result<u8, BusError>;
}

impl<T: TwoWireBus + ?Sized> TwoWireBus for &mut T {
    fn start(&mut self) -> Result<(), BusError> {
        T::start(self)
    }

    fn stop(&mut self) {
        T::stop(self)
    }

    fn send(&mut self, byte: u8) -> Result<(), BusError> {
        T::send(self, byte)
    }

    fn read_ack(&mut self) -> Result<u8, BusError> {
        T::read_ack(self)
    }

    fn read_no_ack(&mut self) -> Result<u8, BusError> {
        T::read_no_ack(self)
    }
}
