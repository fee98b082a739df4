//! HD44780 character LCD driver (4-bit mode)
//!
//! Drives 16x2 to 20x4 modules built on the Hitachi HD44780 (or a
//! compatible controller) over six GPIO lines: register select, enable and
//! data lines D4-D7. Every byte goes out as two nibbles, high nibble first,
//! each latched by a pulse on the enable line.
//!
//! The busy flag is never read (R/W is tied low), so the fixed delays
//! from the controller data sheet are the only completion signal and must
//! not be shortened.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use thermostat_core::config::{ConfigError, DisplayConfig};
use thermostat_core::traits::{DisplayError, TextDisplay};

/// HD44780 commands
pub mod cmd {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    /// Entry mode: increment address, no display shift
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    /// Display on, cursor off, no blink
    pub const DISPLAY_ON_CURSOR_OFF: u8 = 0x0C;
    /// Display on, underline cursor, no blink
    pub const DISPLAY_ON_CURSOR_ON: u8 = 0x0E;
    /// Function set: 8-bit interface (power-on reset value)
    pub const FUNCTION_SET_8BIT: u8 = 0x30;
    /// Function set: 4-bit interface, two lines, 5x7 font
    pub const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
    /// Two nibbles of 0x3: forces 8-bit mode from any state
    pub const INIT_8BIT_TWICE: u8 = 0x33;
    /// Nibble 0x3 then 0x2: leaves the controller in 4-bit mode
    pub const INIT_SWITCH_4BIT: u8 = 0x32;
    /// Set DDRAM address (OR with the address)
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// DDRAM address of the first column of each row
pub const ROW_BASE: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Highest DDRAM address
pub const DDRAM_ADDR_MAX: u8 = 0x7F;

/// Width of the enable pulse (µs)
pub const ENABLE_PULSE_US: u32 = 40;

/// Wait after power-on before the first command (ms)
const POWER_ON_DELAY_MS: u32 = 15;
/// Wait after the first reset command (ms)
const RESET_DELAY_1_MS: u32 = 5;
/// Wait after the second reset command (µs)
const RESET_DELAY_2_US: u32 = 150;
/// Wait after the third reset command (µs)
const RESET_DELAY_3_US: u32 = 50;
/// Clear display execution time (ms)
const CLEAR_DELAY_MS: u32 = 3;

/// DDRAM address of a cursor position
///
/// Fails with [`DisplayError::AddressOutOfRange`] if the position is
/// outside the configured grid or beyond the 7-bit DDRAM address space.
pub fn cursor_address(column: u8, row: u8, config: &DisplayConfig) -> Result<u8, DisplayError> {
    if column >= config.columns || row >= config.rows {
        return Err(DisplayError::AddressOutOfRange);
    }
    let base = ROW_BASE
        .get(row as usize)
        .ok_or(DisplayError::AddressOutOfRange)?;
    base.checked_add(column)
        .filter(|&address| address <= DDRAM_ADDR_MAX)
        .ok_or(DisplayError::AddressOutOfRange)
}

/// GPIO lines connected to the LCD, by role
pub struct LcdPins<P> {
    /// Register select: low = command, high = character data
    pub rs: P,
    /// Enable: data is latched on the falling edge
    pub enable: P,
    pub d4: P,
    pub d5: P,
    pub d6: P,
    pub d7: P,
}

/// Register-select mode for a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Command,
    Character,
}

/// HD44780 driver
pub struct Hd44780<P, D> {
    pins: LcdPins<P>,
    delay: D,
    config: DisplayConfig,
}

fn pin<E>(result: Result<(), E>) -> Result<(), DisplayError> {
    result.map_err(|_| DisplayError::Pin)
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Create a new driver
    ///
    /// Fails if the geometry does not fit the controller's memory map.
    /// Nothing is sent until [`init`](Self::init).
    pub fn new(pins: LcdPins<P>, delay: D, config: DisplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pins,
            delay,
            config,
        })
    }

    /// Run the power-on initialization sequence
    ///
    /// Follows the software reset procedure from the data sheet, then
    /// switches to 4-bit mode, two lines, display on, auto-increment and
    /// clears the screen. Call once after power-up.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        pin(self.pins.rs.set_low())?;
        pin(self.pins.enable.set_low())?;

        self.delay.delay_ms(POWER_ON_DELAY_MS);
        self.send_command(cmd::FUNCTION_SET_8BIT)?;
        self.delay.delay_ms(RESET_DELAY_1_MS);
        self.send_command(cmd::FUNCTION_SET_8BIT)?;
        self.delay.delay_us(RESET_DELAY_2_US);
        self.send_command(cmd::FUNCTION_SET_8BIT)?;
        self.delay.delay_us(RESET_DELAY_3_US);

        self.send_command(cmd::INIT_8BIT_TWICE)?;
        self.send_command(cmd::INIT_SWITCH_4BIT)?;
        self.send_command(cmd::FUNCTION_SET_4BIT_2LINE)?;
        self.send_command(self.display_control())?;
        self.send_command(cmd::ENTRY_MODE_INCREMENT)?;
        self.clear()?;

        debug!(
            "HD44780 ready: {}x{}",
            self.config.columns,
            self.config.rows
        );
        Ok(())
    }

    fn display_control(&self) -> u8 {
        if self.config.cursor_visible {
            cmd::DISPLAY_ON_CURSOR_ON
        } else {
            cmd::DISPLAY_ON_CURSOR_OFF
        }
    }

    /// Send a command byte
    pub fn send_command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.send(Mode::Command, command)
    }

    /// Send a character code to display at the cursor
    pub fn send_character(&mut self, character: u8) -> Result<(), DisplayError> {
        self.send(Mode::Character, character)
    }

    /// Send a byte in the given mode
    pub fn send(&mut self, mode: Mode, byte: u8) -> Result<(), DisplayError> {
        let rs = match mode {
            Mode::Command => PinState::Low,
            Mode::Character => PinState::High,
        };
        pin(self.pins.rs.set_state(rs))?;
        self.send_nibble(byte)?;
        self.send_nibble(byte << 4)
    }

    /// Put the upper four bits of `data` on D4-D7 and latch them
    fn send_nibble(&mut self, data: u8) -> Result<(), DisplayError> {
        pin(self.pins.d4.set_state(PinState::from(data & 0x10 != 0)))?;
        pin(self.pins.d5.set_state(PinState::from(data & 0x20 != 0)))?;
        pin(self.pins.d6.set_state(PinState::from(data & 0x40 != 0)))?;
        pin(self.pins.d7.set_state(PinState::from(data & 0x80 != 0)))?;
        self.pulse_enable()
    }

    fn pulse_enable(&mut self) -> Result<(), DisplayError> {
        pin(self.pins.enable.set_high())?;
        self.delay.delay_us(ENABLE_PULSE_US);
        pin(self.pins.enable.set_low())
    }

    /// Show or hide the underline cursor
    pub fn set_cursor_visible(&mut self, visible: bool) -> Result<(), DisplayError> {
        self.config.cursor_visible = visible;
        self.send_command(self.display_control())
    }

    /// Write a single character code at the cursor
    pub fn write_char(&mut self, character: u8) -> Result<(), DisplayError> {
        self.send_character(character)
    }

    /// Get the display configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Release the pins and delay
    pub fn release(self) -> (LcdPins<P>, D) {
        (self.pins, self.delay)
    }
}

impl<P: OutputPin, D: DelayNs> TextDisplay for Hd44780<P, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.send_command(cmd::CLEAR_DISPLAY)?;
        self.delay.delay_ms(CLEAR_DELAY_MS);
        Ok(())
    }

    fn home(&mut self) -> Result<(), DisplayError> {
        // Address 0 through set-DDRAM: no erase, no 1.5 ms return-home wait
        self.send_command(cmd::SET_DDRAM_ADDR)
    }

    fn set_cursor(&mut self, column: u8, row: u8) -> Result<(), DisplayError> {
        let address = cursor_address(column, row, &self.config)?;
        self.send_command(cmd::SET_DDRAM_ADDR | address)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        for &byte in bytes {
            self.send_character(byte)?;
        }
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (self.config.columns, self.config.rows)
    }
}
