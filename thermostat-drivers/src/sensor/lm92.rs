//! LM92 digital temperature sensor
//!
//! 12-bit plus sign temperature sensor with a two-wire interface and
//! window comparator. Readings are 16-bit big-endian words: bits 15..3
//! hold the temperature in 0.0625 °C steps, bits 2..0 hold the T_CRIT,
//! T_HIGH and T_LOW comparator flags.
//!
//! Every register read is one transaction with a repeated start:
//!
//! ```text
//! START, addr|W, register, START, addr|R, high (ACK), low (NACK), STOP
//! ```

use thermostat_core::traits::{SensorError, TemperatureSensor};
use thermostat_hal::twi::{address_byte, Direction};
use thermostat_hal::{BusError, TwoWireBus};

/// LM92 register pointers
pub mod reg {
    /// Temperature (read only, 16 bit)
    pub const TEMPERATURE: u8 = 0x00;
    /// Configuration (8 bit)
    pub const CONFIGURATION: u8 = 0x01;
    /// Hysteresis (16 bit)
    pub const T_HYST: u8 = 0x02;
    /// Critical trip point (16 bit)
    pub const T_CRIT: u8 = 0x03;
    /// Window low limit (16 bit)
    pub const T_LOW: u8 = 0x04;
    /// Window high limit (16 bit)
    pub const T_HIGH: u8 = 0x05;
    /// Manufacturer identification (read only, 16 bit)
    pub const MANUFACTURER_ID: u8 = 0x07;
}

/// Device address with A0 and A1 tied low
pub const DEFAULT_ADDRESS: u8 = 0x48;

/// Value of the manufacturer identification register
pub const MANUFACTURER_ID: u16 = 0x8001;

/// Temperature resolution (°C per LSB after removing the flag bits)
pub const CELSIUS_PER_LSB: f32 = 0.0625;

/// Number of low-order flag bits in temperature words
const FLAG_BITS: u32 = 3;

/// Interpretation of the 13-bit temperature field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureEncoding {
    /// Logical shift: the word is treated as unsigned, so sub-zero
    /// readings come out as large positive values
    #[default]
    Magnitude,
    /// Arithmetic shift: the sign bit is honoured as in the data sheet
    TwosComplement,
}

/// Decode a temperature word with logical shift
pub fn decode_celsius(raw: u16) -> f32 {
    (raw >> FLAG_BITS) as f32 * CELSIUS_PER_LSB
}

/// Decode a temperature word honouring the sign bit
pub fn decode_celsius_signed(raw: u16) -> f32 {
    ((raw as i16) >> FLAG_BITS) as f32 * CELSIUS_PER_LSB
}

/// Encode a Celsius value for the threshold registers
///
/// Truncates toward zero to the 0.0625 °C grid and saturates at the
/// 13-bit range (-256 °C to +255.9375 °C).
pub fn encode_celsius(celsius: f32) -> u16 {
    let steps = (celsius / CELSIUS_PER_LSB) as i32;
    let steps = steps.clamp(-4096, 4095) as i16;
    (steps << FLAG_BITS) as u16
}

/// Comparator flags carried in the low bits of the temperature word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lm92Status {
    /// Temperature below T_LOW
    pub low: bool,
    /// Temperature above T_HIGH
    pub high: bool,
    /// Temperature above T_CRIT
    pub critical: bool,
}

impl Lm92Status {
    /// Extract the flags from a temperature word
    pub fn from_raw(raw: u16) -> Self {
        Self {
            low: raw & 0b001 != 0,
            high: raw & 0b010 != 0,
            critical: raw & 0b100 != 0,
        }
    }
}

/// Writable threshold registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Threshold {
    Hysteresis,
    Critical,
    Low,
    High,
}

impl Threshold {
    /// Register pointer for this threshold
    pub const fn register(self) -> u8 {
        match self {
            Threshold::Hysteresis => reg::T_HYST,
            Threshold::Critical => reg::T_CRIT,
            Threshold::Low => reg::T_LOW,
            Threshold::High => reg::T_HIGH,
        }
    }
}

/// LM92 driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lm92Config {
    /// 7-bit device address
    pub address: u8,
    /// How the temperature field is decoded
    pub encoding: TemperatureEncoding,
}

impl Default for Lm92Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            encoding: TemperatureEncoding::Magnitude,
        }
    }
}

/// LM92 driver
pub struct Lm92<B> {
    bus: B,
    config: Lm92Config,
}

impl<B: TwoWireBus> Lm92<B> {
    /// Create a driver for a sensor at the default address
    ///
    /// The bus must already be initialized.
    pub fn new(bus: B) -> Self {
        Self::with_config(bus, Lm92Config::default())
    }

    /// Create a driver with explicit configuration
    pub fn with_config(bus: B, config: Lm92Config) -> Self {
        Self { bus, config }
    }

    /// Get the driver configuration
    pub fn config(&self) -> &Lm92Config {
        &self.config
    }

    /// Release the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Run `f` as one bus transaction, always finishing with a stop
    fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut B) -> Result<T, BusError>,
    ) -> Result<T, SensorError> {
        let result = f(&mut self.bus);
        self.bus.stop();
        result.map_err(|e| {
            warn!("LM92 transaction failed: {}", e);
            SensorError::from(e)
        })
    }

    /// Read a 16-bit register
    pub fn read_word(&mut self, register: u8) -> Result<u16, SensorError> {
        let write = address_byte(self.config.address, Direction::Write);
        let read = address_byte(self.config.address, Direction::Read);

        self.transaction(|bus| {
            bus.start()?;
            bus.send(write)?;
            bus.send(register)?;
            bus.start()?;
            bus.send(read)?;
            let high = bus.read_ack()?;
            let low = bus.read_no_ack()?;
            Ok(u16::from_be_bytes([high, low]))
        })
    }

    /// Read an 8-bit register
    pub fn read_byte(&mut self, register: u8) -> Result<u8, SensorError> {
        let write = address_byte(self.config.address, Direction::Write);
        let read = address_byte(self.config.address, Direction::Read);

        self.transaction(|bus| {
            bus.start()?;
            bus.send(write)?;
            bus.send(register)?;
            bus.start()?;
            bus.send(read)?;
            bus.read_no_ack()
        })
    }

    /// Write a 16-bit register
    pub fn write_word(&mut self, register: u8, value: u16) -> Result<(), SensorError> {
        let write = address_byte(self.config.address, Direction::Write);
        let [high, low] = value.to_be_bytes();

        self.transaction(|bus| {
            bus.start()?;
            bus.send(write)?;
            bus.send(register)?;
            bus.send(high)?;
            bus.send(low)
        })
    }

    /// Write an 8-bit register
    pub fn write_byte(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        let write = address_byte(self.config.address, Direction::Write);

        self.transaction(|bus| {
            bus.start()?;
            bus.send(write)?;
            bus.send(register)?;
            bus.send(value)
        })
    }

    /// Read the raw temperature word, flag bits included
    pub fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.read_word(reg::TEMPERATURE)
    }

    /// Decode a raw word with the configured encoding
    pub fn decode(&self, raw: u16) -> f32 {
        match self.config.encoding {
            TemperatureEncoding::Magnitude => decode_celsius(raw),
            TemperatureEncoding::TwosComplement => decode_celsius_signed(raw),
        }
    }

    /// Read the comparator flags
    pub fn read_status(&mut self) -> Result<Lm92Status, SensorError> {
        self.read_raw().map(Lm92Status::from_raw)
    }

    /// Read the manufacturer identification register
    pub fn read_manufacturer_id(&mut self) -> Result<u16, SensorError> {
        self.read_word(reg::MANUFACTURER_ID)
    }

    /// Check that the device answers with the LM92 manufacturer ID
    pub fn verify(&mut self) -> Result<(), SensorError> {
        let id = self.read_manufacturer_id()?;
        if id != MANUFACTURER_ID {
            warn!("LM92: unexpected manufacturer id {=u16:#x}", id);
            return Err(SensorError::InvalidReading);
        }
        Ok(())
    }

    /// Read the configuration register
    pub fn read_configuration(&mut self) -> Result<u8, SensorError> {
        self.read_byte(reg::CONFIGURATION)
    }

    /// Write the configuration register
    pub fn write_configuration(&mut self, value: u8) -> Result<(), SensorError> {
        self.write_byte(reg::CONFIGURATION, value)
    }

    /// Read a threshold register in °C
    pub fn read_threshold(&mut self, threshold: Threshold) -> Result<f32, SensorError> {
        self.read_word(threshold.register()).map(decode_celsius_signed)
    }

    /// Write a threshold register in °C
    pub fn write_threshold(
        &mut self,
        threshold: Threshold,
        celsius: f32,
    ) -> Result<(), SensorError> {
        self.write_word(threshold.register(), encode_celsius(celsius))
    }
}

impl<B: TwoWireBus> TemperatureSensor for Lm92<B> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let raw = self.read_raw()?;
        trace!("LM92 raw temperature {=u16:#x}", raw);
        Ok(self.decode(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::TwiMaster;
    use crate::testing::{SimTwi, WireEvent};
    use proptest::prelude::*;
    use thermostat_hal::I2cConfig;

    fn sensor(sim: SimTwi) -> Lm92<TwiMaster<SimTwi>> {
        Lm92::new(TwiMaster::new(sim, I2cConfig::STANDARD))
    }

    fn responding(bytes: &[u8]) -> Lm92<TwiMaster<SimTwi>> {
        let mut sim = SimTwi::new(DEFAULT_ADDRESS);
        sim.respond(bytes);
        sensor(sim)
    }

    fn events(lm92: Lm92<TwiMaster<SimTwi>>) -> std::vec::Vec<WireEvent> {
        lm92.release().release().events
    }

    #[test]
    fn test_read_celsius_scenario() {
        let mut lm92 = responding(&[0x06, 0x40]);

        assert_eq!(lm92.read_celsius().unwrap(), 12.5);
        assert_eq!(
            events(lm92),
            [
                WireEvent::Start,
                WireEvent::Send(0x90),
                WireEvent::Send(0x00),
                WireEvent::Start,
                WireEvent::Send(0x91),
                WireEvent::ReadAck(0x06),
                WireEvent::ReadNoAck(0x40),
                WireEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_read_fahrenheit_scenario() {
        let mut lm92 = responding(&[0x06, 0x40]);
        let f = lm92.read_fahrenheit().unwrap();
        assert!((f - 54.5).abs() < 1e-4);
    }

    #[test]
    fn test_flag_bits_are_discarded() {
        let mut lm92 = responding(&[0x06, 0x47]);
        assert_eq!(lm92.read_celsius().unwrap(), 12.5);
    }

    #[test]
    fn test_status_flags() {
        let mut lm92 = responding(&[0x06, 0x45]);
        let status = lm92.read_status().unwrap();
        assert_eq!(
            status,
            Lm92Status {
                low: true,
                high: false,
                critical: true,
            }
        );
    }

    #[test]
    fn test_signed_decoding() {
        // -25 °C from the data sheet table: 0xF380
        assert_eq!(decode_celsius_signed(0xF380), -25.0);
        assert_eq!(decode_celsius_signed(0x0C80), 25.0);

        let mut sim = SimTwi::new(DEFAULT_ADDRESS);
        sim.respond(&[0xF3, 0x80]);
        let config = Lm92Config {
            encoding: TemperatureEncoding::TwosComplement,
            ..Default::default()
        };
        let mut lm92 = Lm92::with_config(TwiMaster::new(sim, I2cConfig::STANDARD), config);
        assert_eq!(lm92.read_celsius().unwrap(), -25.0);
    }

    #[test]
    fn test_magnitude_decoding_of_negative_word() {
        // Logical shift keeps the sign bit as magnitude
        assert_eq!(decode_celsius(0xF380), (0xF380u16 >> 3) as f32 * 0.0625);
    }

    #[test]
    fn test_absent_device_is_nack_and_bus_released() {
        let mut lm92 = sensor(SimTwi::new(0x49));

        assert_eq!(lm92.read_celsius(), Err(SensorError::BusNack));
        assert_eq!(
            events(lm92),
            [WireEvent::Start, WireEvent::Send(0x90), WireEvent::Stop]
        );
    }

    #[test]
    fn test_stuck_bus_is_timeout_and_stop_is_issued() {
        let mut sim = SimTwi::new(DEFAULT_ADDRESS);
        sim.stuck = true;
        let mut lm92 = sensor(sim);

        assert_eq!(lm92.read_celsius(), Err(SensorError::BusTimeout));
        assert_eq!(events(lm92), [WireEvent::Start, WireEvent::Stop]);
    }

    #[test]
    fn test_every_start_has_one_stop() {
        let mut sim = SimTwi::new(DEFAULT_ADDRESS);
        sim.respond(&[0x06, 0x40, 0x80, 0x01, 0x00]);
        let mut lm92 = sensor(sim);

        lm92.read_celsius().unwrap();
        lm92.read_manufacturer_id().unwrap();
        lm92.read_configuration().unwrap();

        let events = events(lm92);
        let stops = events.iter().filter(|e| **e == WireEvent::Stop).count();
        assert_eq!(stops, 3);
        assert_eq!(events.last(), Some(&WireEvent::Stop));
    }

    #[test]
    fn test_verify_manufacturer_id() {
        let mut lm92 = responding(&[0x80, 0x01]);
        assert_eq!(lm92.verify(), Ok(()));

        let mut lm92 = responding(&[0x12, 0x34]);
        assert_eq!(lm92.verify(), Err(SensorError::InvalidReading));
    }

    #[test]
    fn test_read_configuration_is_single_nacked_byte() {
        let mut lm92 = responding(&[0x18]);
        assert_eq!(lm92.read_configuration().unwrap(), 0x18);
        assert_eq!(
            events(lm92),
            [
                WireEvent::Start,
                WireEvent::Send(0x90),
                WireEvent::Send(0x01),
                WireEvent::Start,
                WireEvent::Send(0x91),
                WireEvent::ReadNoAck(0x18),
                WireEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_write_threshold() {
        let mut lm92 = sensor(SimTwi::new(DEFAULT_ADDRESS));
        lm92.write_threshold(Threshold::Critical, 80.0).unwrap();

        // 80 °C = 1280 steps = 0x2800
        assert_eq!(
            events(lm92),
            [
                WireEvent::Start,
                WireEvent::Send(0x90),
                WireEvent::Send(0x03),
                WireEvent::Send(0x28),
                WireEvent::Send(0x00),
                WireEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_read_threshold_is_signed() {
        let mut lm92 = responding(&[0xF3, 0x80]);
        assert_eq!(lm92.read_threshold(Threshold::Low).unwrap(), -25.0);
    }

    #[test]
    fn test_encode_celsius() {
        assert_eq!(encode_celsius(25.0), 0x0C80);
        assert_eq!(encode_celsius(-25.0), 0xF380);
        assert_eq!(encode_celsius(1000.0), 0x7FF8);
        assert_eq!(encode_celsius(-1000.0), 0x8000);
    }

    #[test]
    fn test_works_through_a_borrowed_bus() {
        let mut sim = SimTwi::new(DEFAULT_ADDRESS);
        sim.respond(&[0x06, 0x40]);
        let mut bus = TwiMaster::new(sim, I2cConfig::STANDARD);

        {
            let mut lm92 = Lm92::new(&mut bus);
            assert_eq!(lm92.read_celsius().unwrap(), 12.5);
        }
        assert!(!bus.in_transaction());
    }

    proptest! {
        #[test]
        fn decode_is_shift_then_scale(raw in any::<u16>()) {
            prop_assert_eq!(decode_celsius(raw), ((raw >> 3) as f32) * 0.0625);
        }

        #[test]
        fn read_celsius_assembles_big_endian(high in any::<u8>(), low in any::<u8>()) {
            let mut lm92 = responding(&[high, low]);
            let word = ((high as u16) << 8) | low as u16;
            prop_assert_eq!(lm92.read_celsius().unwrap(), decode_celsius(word));
        }

        #[test]
        fn signed_encoding_roundtrips(steps in -4096i32..=4095) {
            let celsius = steps as f32 * CELSIUS_PER_LSB;
            prop_assert_eq!(decode_celsius_signed(encode_celsius(celsius)), celsius);
        }
    }
}
