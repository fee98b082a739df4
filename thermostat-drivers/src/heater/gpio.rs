//! GPIO heater output
//!
//! Switches the heater relay (or SSR) from a single output pin.

use embedded_hal::digital::{OutputPin, PinState};
use thermostat_core::traits::{HeaterError, HeaterOutput};

/// GPIO heater output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioHeater<P> {
    pin: P,
    /// If true, heater ON = pin LOW
    inverted: bool,
    /// Current logical state (true = heater on)
    on: bool,
}

impl<P: OutputPin> GpioHeater<P> {
    /// Create a new GPIO heater output
    ///
    /// The pin is driven to the OFF level immediately.
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, heater is ON when pin is LOW (for active-low relays)
    pub fn new(pin: P, inverted: bool) -> Result<Self, HeaterError> {
        let mut heater = Self {
            pin,
            inverted,
            on: false,
        };
        heater.set_on(false)?;
        Ok(heater)
    }

    /// Create a new GPIO heater with active-high output
    pub fn new_active_high(pin: P) -> Result<Self, HeaterError> {
        Self::new(pin, false)
    }

    /// Create a new GPIO heater with active-low output
    pub fn new_active_low(pin: P) -> Result<Self, HeaterError> {
        Self::new(pin, true)
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> HeaterOutput for GpioHeater<P> {
    fn set_on(&mut self, on: bool) -> Result<(), HeaterError> {
        // on XOR inverted gives the electrical level
        let level = PinState::from(on != self.inverted);
        self.pin.set_state(level).map_err(|_| HeaterError::Pin)?;
        self.on = on;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
