//! Hysteresis thermostat
//!
//! Ties a temperature sensor, the heater output and a text display
//! together. One call to [`Thermostat::update`] is one control cycle:
//!
//! 1. Read the temperature in the configured unit
//! 2. Apply the hysteresis policy and switch the heater
//! 3. Show the reading on the first display row
//! 4. Show the heater state on the second row
//!
//! The relay is switched before anything is drawn, so a failing display
//! never leaves the heater in a stale state. [`Thermostat::pause`] waits
//! the configured refresh interval between cycles.

use embedded_hal::delay::DelayNs;
use thermostat_core::config::{ConfigError, ThermostatConfig};
use thermostat_core::control::{HeaterState, HysteresisPolicy, ThermostatError};
use thermostat_core::temperature::TemperatureUnit;
use thermostat_core::traits::{
    HeaterError, HeaterOutput, SensorError, TemperatureSensor, TextDisplay,
};

use crate::display::status::{render_heater_state, render_splash, render_temperature};

/// Outcome of one control cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cycle {
    /// Reading in the configured unit
    pub reading: f32,
    /// Heater state after the policy was applied
    pub state: HeaterState,
}

/// Hysteresis thermostat
pub struct Thermostat<S, H, L> {
    sensor: S,
    heater: H,
    display: L,
    policy: HysteresisPolicy,
    unit: TemperatureUnit,
    refresh_ms: u32,
    splash_ms: u32,
}

impl<S, H, L> Thermostat<S, H, L>
where
    S: TemperatureSensor,
    H: HeaterOutput,
    L: TextDisplay,
{
    /// Create a thermostat
    ///
    /// Fails if the configured thresholds do not form a band.
    pub fn new(
        sensor: S,
        heater: H,
        display: L,
        config: &ThermostatConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = HysteresisPolicy::from_config(config)?;
        Ok(Self {
            sensor,
            heater,
            display,
            policy,
            unit: config.unit,
            refresh_ms: config.refresh_ms,
            splash_ms: config.splash_ms,
        })
    }

    /// Show the start-up banner and hold it for the splash time
    pub fn splash<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), ThermostatError> {
        render_splash(&mut self.display)?;
        delay.delay_ms(self.splash_ms);
        Ok(())
    }

    /// Wait the refresh interval between two cycles
    pub fn pause<D: DelayNs>(&self, delay: &mut D) {
        delay.delay_ms(self.refresh_ms);
    }

    /// Read the temperature in the configured unit
    pub fn read_temperature(&mut self) -> Result<f32, SensorError> {
        match self.unit {
            TemperatureUnit::Celsius => self.sensor.read_celsius(),
            TemperatureUnit::Fahrenheit => self.sensor.read_fahrenheit(),
        }
    }

    /// Run one control cycle starting from `state`
    ///
    /// On a sensor failure nothing is switched or drawn; the caller
    /// decides whether to retry or call [`fail_safe`](Self::fail_safe).
    /// A display failure is reported after the heater has been switched.
    pub fn update(&mut self, state: HeaterState) -> Result<Cycle, ThermostatError> {
        let reading = self.read_temperature()?;

        let next = self.policy.next(state, reading);
        if next != state {
            info!("Heater {} -> {}", state, next);
        }
        self.heater.apply(next)?;

        render_temperature(&mut self.display, reading, self.unit)?;
        render_heater_state(&mut self.display, next)?;
        Ok(Cycle {
            reading,
            state: next,
        })
    }

    /// Switch the heater off regardless of the current state
    pub fn fail_safe(&mut self) -> Result<HeaterState, HeaterError> {
        warn!("Thermostat fail-safe: heater off");
        self.heater.apply(HeaterState::Idle)?;
        Ok(HeaterState::Idle)
    }

    /// Get the threshold policy
    pub fn policy(&self) -> &HysteresisPolicy {
        &self.policy
    }

    /// Get the display and comparison unit
    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Get access to the underlying heater
    pub fn heater(&self) -> &H {
        &self.heater
    }

    /// Get access to the underlying display
    pub fn display(&self) -> &L {
        &self.display
    }

    /// Release the sensor, heater and display
    pub fn release(self) -> (S, H, L) {
        (self.sensor, self.heater, self.display)
    }
}
