//! I2C bus abstractions
//!
//! Provides the whole-transfer I2C master trait and the bus clock
//! configuration used to program the two-wire peripheral.

/// I2C bus master
///
/// Provides basic I2C read/write operations for communicating with
/// peripheral devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write_data` - Bytes to write (typically register address)
    /// * `read_buf` - Buffer to read into
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Clock configuration that cannot be programmed into the peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Requested SCL frequency needs fewer than 16 CPU cycles per bit
    TooFast,
    /// Requested SCL frequency is below what the largest prescaler reaches
    TooSlow,
}

/// Bit rate prescaler (low two bits of the status register)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    Div1 = 0b00,
    Div4 = 0b01,
    Div16 = 0b10,
    Div64 = 0b11,
}

impl Prescaler {
    /// Division factor applied to the bit rate register
    pub const fn factor(self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div4 => 4,
            Prescaler::Div16 => 16,
            Prescaler::Div64 => 64,
        }
    }
}

/// Bit rate register value plus prescaler selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitRate {
    /// Bit rate register (TWBR) value
    pub divisor: u8,
    /// Prescaler bits for the status register
    pub prescaler: Prescaler,
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// CPU (peripheral reference) clock in Hz
    pub cpu_hz: u32,
    /// Completion-flag polls before an operation times out
    ///
    /// `None` waits forever, which hangs the caller on a stuck bus.
    pub timeout_polls: Option<u32>,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Default poll budget, a few bytes' worth of time at 100 kHz on 8 MHz
    pub const DEFAULT_TIMEOUT_POLLS: u32 = 10_000;

    /// Standard mode (100 kHz) on an 8 MHz CPU
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        cpu_hz: 8_000_000,
        timeout_polls: Some(Self::DEFAULT_TIMEOUT_POLLS),
    };

    /// Fast mode (400 kHz) on an 8 MHz CPU
    pub const FAST: Self = Self {
        frequency: 400_000,
        cpu_hz: 8_000_000,
        timeout_polls: Some(Self::DEFAULT_TIMEOUT_POLLS),
    };

    /// Same configuration with a different CPU clock
    pub const fn with_cpu_hz(self, cpu_hz: u32) -> Self {
        Self { cpu_hz, ..self }
    }

    /// Same configuration with a different timeout policy
    pub const fn with_timeout_polls(self, timeout_polls: Option<u32>) -> Self {
        Self {
            timeout_polls,
            ..self
        }
    }

    /// Compute the bit rate register and prescaler for this configuration
    ///
    /// SCL = CPU / (16 + 2 * TWBR * prescaler). The smallest prescaler
    /// that fits the divisor in eight bits is chosen.
    pub fn bit_rate(&self) -> Result<BitRate, ClockError> {
        if self.frequency == 0 {
            return Err(ClockError::TooSlow);
        }

        let cycles = self.cpu_hz / self.frequency;
        if cycles < 16 {
            return Err(ClockError::TooFast);
        }

        let half = (cycles - 16) / 2;
        for prescaler in [
            Prescaler::Div1,
            Prescaler::Div4,
            Prescaler::Div16,
            Prescaler::Div64,
        ] {
            let divisor = half / prescaler.factor();
            if divisor <= u8::MAX as u32 {
                return Ok(BitRate {
                    divisor: divisor as u8,
                    prescaler,
                });
            }
        }

        Err(ClockError::TooSlow)
    }
}
