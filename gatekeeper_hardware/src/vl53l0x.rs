//! Minimal single-shot driver for the ST VL53L0X time-of-flight ranger.
//!
//! Only the register sequence needed for one blocking measurement is
//! implemented; the sensor runs with its power-on defaults.
use std::time::{Duration, Instant};

use rppal::i2c::I2c;
use tracing::trace;

use crate::error::{HwError, Result};
use crate::util::poll_until_deadline;

pub const DEFAULT_ADDRESS: u16 = 0x29;

const SYSRANGE_START: u8 = 0x00;
const SYSTEM_INTERRUPT_CLEAR: u8 = 0x0B;
const RESULT_INTERRUPT_STATUS: u8 = 0x13;
const RESULT_RANGE_MM: u8 = 0x14 + 10;
const IDENTIFICATION_MODEL_ID: u8 = 0xC0;
const MODEL_ID: u8 = 0xEE;

const POLL_INTERVAL: Duration = Duration::from_millis(2);

pub struct Vl53l0x {
    i2c: I2c,
    stop_variable: u8,
}

fn bus(e: rppal::i2c::Error) -> HwError {
    HwError::I2c(e.to_string())
}

impl Vl53l0x {
    /// Open `bus` and verify a VL53L0X answers at `address`.
    pub fn new(bus_no: u8, address: u16) -> Result<Self> {
        let mut i2c = I2c::with_bus(bus_no).map_err(bus)?;
        i2c.set_slave_address(address).map_err(bus)?;

        let model = i2c.smbus_read_byte(IDENTIFICATION_MODEL_ID).map_err(bus)?;
        if model != MODEL_ID {
            return Err(HwError::WrongModel(model));
        }

        let mut dev = Self {
            i2c,
            stop_variable: 0,
        };
        dev.enter_private_page()?;
        dev.stop_variable = dev.i2c.smbus_read_byte(0x91).map_err(bus)?;
        dev.leave_private_page()?;
        trace!(stop_variable = dev.stop_variable, "vl53l0x ready");
        Ok(dev)
    }

    fn write(&self, reg: u8, value: u8) -> Result<()> {
        self.i2c.smbus_write_byte(reg, value).map_err(bus)
    }

    fn enter_private_page(&self) -> Result<()> {
        self.write(0x80, 0x01)?;
        self.write(0xFF, 0x01)?;
        self.write(0x00, 0x00)
    }

    fn leave_private_page(&self) -> Result<()> {
        self.write(0x00, 0x01)?;
        self.write(0xFF, 0x00)?;
        self.write(0x80, 0x00)
    }

    /// Trigger one measurement and wait for the result.
    /// Out-of-range targets read as ~8190 mm, which callers treat as "far".
    pub fn read_single_with_timeout(&mut self, timeout: Duration) -> Result<u16> {
        self.enter_private_page()?;
        self.write(0x91, self.stop_variable)?;
        self.leave_private_page()?;
        self.write(SYSRANGE_START, 0x01)?;

        // Both waits draw on one budget so a read never blocks past `timeout`.
        let deadline = Instant::now() + timeout;
        let i2c = &self.i2c;
        poll_until_deadline(
            || Ok(i2c.smbus_read_byte(SYSRANGE_START).map_err(bus)? & 0x01 == 0),
            deadline,
            POLL_INTERVAL,
        )
        .map_err(HwError::into_read_timeout)?;
        poll_until_deadline(
            || Ok(i2c.smbus_read_byte(RESULT_INTERRUPT_STATUS).map_err(bus)? & 0x07 != 0),
            deadline,
            POLL_INTERVAL,
        )?;

        let mut buf = [0u8; 2];
        self.i2c
            .write_read(&[RESULT_RANGE_MM], &mut buf)
            .map_err(bus)?;
        self.write(SYSTEM_INTERRUPT_CLEAR, 0x01)?;

        let mm = u16::from_be_bytes(buf);
        trace!(mm, "vl53l0x range");
        Ok(mm)
    }
}
