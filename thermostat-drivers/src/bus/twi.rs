//! TWI bus master
//!
//! Drives a TWI peripheral through its raw registers. Every operation is
//! triggered by writing the control register with TWINT set, then
//! busy-polls until the hardware sets TWINT again and checks the status
//! code for the outcome.
//!
//! # Blocking
//!
//! Completion polling is the only place this driver waits. With
//! `timeout_polls: None` a bus that never completes hangs the caller
//! forever; with a poll budget the wait ends in [`BusError::Timeout`].

use thermostat_hal::i2c::{ClockError, I2cBus, I2cConfig};
use thermostat_hal::twi::{address_byte, control, status, Direction};
use thermostat_hal::{BusError, TwiRegisters, TwoWireBus};

/// TWI master driver
pub struct TwiMaster<R> {
    regs: R,
    config: I2cConfig,
    /// A start condition was issued and no stop has followed yet
    in_transaction: bool,
}

impl<R: TwiRegisters> TwiMaster<R> {
    /// Create a new TWI master
    ///
    /// The peripheral is not touched until [`init`](Self::init).
    pub fn new(regs: R, config: I2cConfig) -> Self {
        Self {
            regs,
            config,
            in_transaction: false,
        }
    }

    /// Initialize the peripheral
    ///
    /// Enables the pull-ups, programs the bit rate and prescaler for the
    /// configured SCL frequency and enables the peripheral. Call once
    /// before any other bus operation.
    pub fn init(&mut self) -> Result<(), ClockError> {
        let rate = self.config.bit_rate()?;

        self.regs.enable_pullups();
        self.regs.write_status(rate.prescaler as u8);
        self.regs.write_bit_rate(rate.divisor);
        self.regs.write_control(control::TWEN);

        debug!(
            "TWI init: {} Hz, TWBR={}, prescaler={}",
            self.config.frequency,
            rate.divisor,
            rate.prescaler as u8
        );
        Ok(())
    }

    /// Get the bus configuration
    pub fn config(&self) -> &I2cConfig {
        &self.config
    }

    /// Check if a start condition is outstanding (no stop yet)
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Release the register block
    pub fn release(self) -> R {
        self.regs
    }

    /// Wait until the hardware sets the completion flag
    pub fn wait_for_complete(&mut self) -> Result<(), BusError> {
        match self.config.timeout_polls {
            None => {
                while !self.is_complete() {
                    core::hint::spin_loop();
                }
                Ok(())
            }
            Some(budget) => {
                for _ in 0..budget {
                    if self.is_complete() {
                        return Ok(());
                    }
                    core::hint::spin_loop();
                }
                warn!("TWI completion flag not set after {} polls", budget);
                Err(BusError::Timeout)
            }
        }
    }

    fn is_complete(&mut self) -> bool {
        self.regs.read_control() & control::TWINT != 0
    }

    fn status(&mut self) -> u8 {
        self.regs.read_status() & status::MASK
    }

    fn ensure_transaction(&self) -> Result<(), BusError> {
        if self.in_transaction {
            Ok(())
        } else {
            Err(BusError::NoTransaction)
        }
    }

    fn receive(&mut self, ack: bool) -> Result<u8, BusError> {
        self.ensure_transaction()?;

        let ea = if ack { control::TWEA } else { 0 };
        self.regs.write_control(control::TWINT | control::TWEN | ea);
        self.wait_for_complete()?;

        let expected = if ack {
            status::DATA_RX_ACK
        } else {
            status::DATA_RX_NACK
        };
        match self.status() {
            s if s == expected => Ok(self.regs.read_data()),
            status::ARBITRATION_LOST => Err(BusError::ArbitrationLost),
            other => Err(BusError::UnexpectedStatus(other)),
        }
    }

    /// Run `f` as one transaction, always finishing with a stop condition
    fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, BusError>,
    ) -> Result<T, BusError> {
        let result = f(self);
        self.stop();
        result
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
        if let Some((last, rest)) = buf.split_last_mut() {
            for byte in rest {
                *byte = self.read_ack()?;
            }
            *last = self.read_no_ack()?;
        }
        Ok(())
    }
}

impl<R: TwiRegisters> TwoWireBus for TwiMaster<R> {
    fn start(&mut self) -> Result<(), BusError> {
        self.regs
            .write_control(control::TWINT | control::TWSTA | control::TWEN);
        // The start condition is on the wire from here; a stop is owed
        // even if completion never arrives.
        self.in_transaction = true;
        self.wait_for_complete()?;

        match self.status() {
            status::START | status::REPEATED_START => Ok(()),
            status::ARBITRATION_LOST => Err(BusError::ArbitrationLost),
            other => {
                warn!("TWI start: unexpected status {=u8:#x}", other);
                Err(BusError::UnexpectedStatus(other))
            }
        }
    }

    fn stop(&mut self) {
        if !self.in_transaction {
            trace!("TWI stop without open transaction ignored");
            return;
        }
        self.regs
            .write_control(control::TWINT | control::TWSTO | control::TWEN);
        self.in_transaction = false;
    }

    fn send(&mut self, byte: u8) -> Result<(), BusError> {
        self.ensure_transaction()?;

        self.regs.write_data(byte);
        self.regs.write_control(control::TWINT | control::TWEN);
        self.wait_for_complete()?;

        match self.status() {
            status::SLA_W_ACK | status::SLA_R_ACK | status::DATA_TX_ACK => Ok(()),
            status::SLA_W_NACK | status::SLA_R_NACK | status::DATA_TX_NACK => {
                debug!("TWI send {=u8:#x}: not acknowledged", byte);
                Err(BusError::Nack)
            }
            status::ARBITRATION_LOST => Err(BusError::ArbitrationLost),
            other => Err(BusError::UnexpectedStatus(other)),
        }
    }

    fn read_ack(&mut self) -> Result<u8, BusError> {
        self.receive(true)
    }

    fn read_no_ack(&mut self) -> Result<u8, BusError> {
        self.receive(false)
    }
}

impl<R: TwiRegisters> I2cBus for TwiMaster<R> {
    type Error = BusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError> {
        self.transaction(|bus| {
            bus.start()?;
            bus.send(address_byte(address, Direction::Write))?;
            for &byte in data {
                bus.send(byte)?;
            }
            Ok(())
        })
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.transaction(|bus| {
            bus.start()?;
            bus.send(address_byte(address, Direction::Read))?;
            bus.read_into(buf)
        })
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), BusError> {
        self.transaction(|bus| {
            bus.start()?;
            bus.send(address_byte(address, Direction::Write))?;
            for &byte in write_data {
                bus.send(byte)?;
            }
            // Repeated start turns the bus around without releasing it
            bus.start()?;
            bus.send(address_byte(address, Direction::Read))?;
            bus.read_into(read_buf)
        })
    }
}
