//! Simulated peripherals shared by the driver tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use thermostat_hal::twi::{control, status};
use thermostat_hal::TwiRegisters;

/// What a TWI register block put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireEvent {
    Start,
    Stop,
    Send(u8),
    ReadAck(u8),
    ReadNoAck(u8),
}

/// TWI register block with one simulated device on the bus
///
/// Status codes follow the master-mode tables: the first byte after a
/// start is an address byte, acknowledged only if it matches `address`.
pub struct SimTwi {
    pub address: u8,
    pub events: Vec<WireEvent>,
    /// Bytes the device returns for reads, in order
    pub responses: VecDeque<u8>,
    /// Completion never arrives
    pub stuck: bool,
    /// Data bytes written after the address are not acknowledged
    pub nack_data: bool,
    /// Overrides every status code
    pub force_status: Option<u8>,
    /// Control register polls before completion
    pub latency: u32,
    pub polls: u32,
    pub pullups: bool,
    pub bit_rate: u8,
    pub prescaler: u8,
    pub control: u8,
    data: u8,
    status: u8,
    pending: u32,
    complete: bool,
    started: bool,
    expect_address: bool,
    reading: bool,
}

impl SimTwi {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            events: Vec::new(),
            responses: VecDeque::new(),
            stuck: false,
            nack_data: false,
            force_status: None,
            latency: 1,
            polls: 0,
            pullups: false,
            bit_rate: 0,
            prescaler: 0,
            control: 0,
            data: 0,
            status: 0xF8,
            pending: 0,
            complete: false,
            started: false,
            expect_address: false,
            reading: false,
        }
    }

    /// Queue bytes the device answers reads with
    pub fn respond(&mut self, bytes: &[u8]) {
        self.responses.extend(bytes.iter().copied());
    }

    fn operation(&mut self, value: u8) {
        if value & control::TWSTA != 0 {
            self.events.push(WireEvent::Start);
            self.status = if self.started {
                status::REPEATED_START
            } else {
                status::START
            };
            self.started = true;
            self.expect_address = true;
        } else if self.expect_address {
            let byte = self.data;
            self.events.push(WireEvent::Send(byte));
            self.expect_address = false;
            self.reading = byte & 1 == 1;
            let matched = byte >> 1 == self.address;
            self.status = match (matched, self.reading) {
                (true, false) => status::SLA_W_ACK,
                (false, false) => status::SLA_W_NACK,
                (true, true) => status::SLA_R_ACK,
                (false, true) => status::SLA_R_NACK,
            };
        } else if self.reading {
            let byte = self.responses.pop_front().unwrap_or(0xFF);
            self.data = byte;
            if value & control::TWEA != 0 {
                self.events.push(WireEvent::ReadAck(byte));
                self.status = status::DATA_RX_ACK;
            } else {
                self.events.push(WireEvent::ReadNoAck(byte));
                self.status = status::DATA_RX_NACK;
            }
        } else {
            self.events.push(WireEvent::Send(self.data));
            self.status = if self.nack_data {
                status::DATA_TX_NACK
            } else {
                status::DATA_TX_ACK
            };
        }

        if let Some(forced) = self.force_status {
            self.status = forced;
        }
    }
}

impl TwiRegisters for SimTwi {
    fn write_control(&mut self, value: u8) {
        self.control = value;

        if value & control::TWSTO != 0 {
            self.events.push(WireEvent::Stop);
            self.started = false;
            self.reading = false;
            self.complete = false;
            return;
        }

        if value & control::TWINT == 0 {
            return;
        }

        // Writing one clears the flag; hardware sets it when done
        self.complete = false;
        self.operation(value);
        if !self.stuck {
            self.pending = self.latency.max(1);
        }
    }

    fn read_control(&mut self) -> u8 {
        self.polls += 1;
        if self.pending > 0 {
            self.pending -= 1;
            if self.pending == 0 {
                self.complete = true;
            }
        }
        let flag = if self.complete { control::TWINT } else { 0 };
        (self.control & !control::TWINT) | flag
    }

    fn read_status(&mut self) -> u8 {
        self.status | self.prescaler
    }

    fn write_status(&mut self, value: u8) {
        self.prescaler = value & 0b11;
    }

    fn write_bit_rate(&mut self, value: u8) {
        self.bit_rate = value;
    }

    fn write_data(&mut self, value: u8) {
        self.data = value;
    }

    fn read_data(&mut self) -> u8 {
        self.data
    }

    fn enable_pullups(&mut self) {
        self.pullups = true;
    }
}

/// Role of an LCD line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Rs,
    Enable,
    D4,
    D5,
    D6,
    D7,
}

/// Something that happened on the LCD interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdEvent {
    /// Nibble latched on the falling edge of enable: (register select, nibble)
    Latch { rs: bool, nibble: u8 },
    /// Delay in nanoseconds
    Delay(u32),
}

/// Levels of all LCD lines plus the event log
#[derive(Debug, Default)]
pub struct LcdWire {
    pub rs: bool,
    pub enable: bool,
    pub data: [bool; 4],
    pub events: Vec<LcdEvent>,
}

impl LcdWire {
    pub fn shared() -> Rc<RefCell<LcdWire>> {
        Rc::new(RefCell::new(LcdWire::default()))
    }

    fn set(&mut self, line: Line, high: bool) {
        match line {
            Line::Rs => self.rs = high,
            Line::Enable => {
                if self.enable && !high {
                    let nibble = self
                        .data
                        .iter()
                        .enumerate()
                        .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << i));
                    self.events.push(LcdEvent::Latch {
                        rs: self.rs,
                        nibble,
                    });
                }
                self.enable = high;
            }
            Line::D4 => self.data[0] = high,
            Line::D5 => self.data[1] = high,
            Line::D6 => self.data[2] = high,
            Line::D7 => self.data[3] = high,
        }
    }

    /// Pair latched nibbles back into (register select, byte)
    pub fn bytes(&self) -> Vec<(bool, u8)> {
        let nibbles: Vec<(bool, u8)> = self
            .events
            .iter()
            .filter_map(|e| match *e {
                LcdEvent::Latch { rs, nibble } => Some((rs, nibble)),
                LcdEvent::Delay(_) => None,
            })
            .collect();
        nibbles
            .chunks(2)
            .map(|pair| (pair[0].0, (pair[0].1 << 4) | pair.get(1).map_or(0, |n| n.1)))
            .collect()
    }

    /// Bytes written in character mode
    pub fn text(&self) -> Vec<u8> {
        self.bytes()
            .into_iter()
            .filter(|&(rs, _)| rs)
            .map(|(_, b)| b)
            .collect()
    }

    /// Bytes written in command mode
    pub fn commands(&self) -> Vec<u8> {
        self.bytes()
            .into_iter()
            .filter(|&(rs, _)| !rs)
            .map(|(_, b)| b)
            .collect()
    }
}

/// Output pin driving one LCD line
pub struct SimPin {
    line: Line,
    wire: Rc<RefCell<LcdWire>>,
}

impl SimPin {
    pub fn new(line: Line, wire: &Rc<RefCell<LcdWire>>) -> Self {
        Self {
            line,
            wire: Rc::clone(wire),
        }
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.wire.borrow_mut().set(self.line, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.wire.borrow_mut().set(self.line, true);
        Ok(())
    }
}

/// Delay that only records how long it was asked to wait
pub struct SimDelay {
    wire: Rc<RefCell<LcdWire>>,
}

impl SimDelay {
    pub fn new(wire: &Rc<RefCell<LcdWire>>) -> Self {
        Self {
            wire: Rc::clone(wire),
        }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.wire.borrow_mut().events.push(LcdEvent::Delay(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ns(us * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms * 1_000_000);
    }
}

/// Output pin that refuses every level change
pub struct BrokenPin;

#[derive(Debug)]
pub struct BrokenPinError;

impl embedded_hal::digital::Error for BrokenPinError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl ErrorType for BrokenPin {
    type Error = BrokenPinError;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), BrokenPinError> {
        Err(BrokenPinError)
    }

    fn set_high(&mut self) -> Result<(), BrokenPinError> {
        Err(BrokenPinError)
    }
}

/// Heater relay pin remembering its level
#[derive(Default)]
pub struct RelayPin {
    pub high: bool,
    pub changes: u32,
}

impl ErrorType for RelayPin {
    type Error = Infallible;
}

impl OutputPin for RelayPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        self.changes += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        self.changes += 1;
        Ok(())
    }
}
