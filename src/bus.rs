//! Si4735 SPI-mode transport.
//!
//! In SPI mode the chip frames every transfer with a control byte:
//! - write: `CS↓, 0x48, 8 command bytes, CS↑` (opcode + up to 7 args,
//!   zero-padded to the full frame)
//! - status: `CS↓, 0xA0, read 1 byte, CS↑`
//! - response: `CS↓, 0xE0, read 16 bytes, CS↑`
//!
//! After a command the chip must not be addressed again until the status
//! byte reports CTS (clear to send); `send_command` polls for that with a
//! bounded retry budget.
//!
//! The higher-level command set is intentionally not implemented here: this
//! module focuses on a small, reusable bus interface the driver talks to.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::commands::STATUS_CTS;

const CTRL_WRITE_COMMAND: u8 = 0x48;
const CTRL_READ_STATUS: u8 = 0xA0;
const CTRL_READ_RESPONSE: u8 = 0xE0;

/// Command frame length: opcode + 7 argument bytes.
pub const COMMAND_LEN: usize = 8;
/// Fixed status + data response frame length.
pub const RESPONSE_LEN: usize = 16;

/// Errors returned by the SPI transport.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE, CsE> {
    /// Error on the SPI peripheral.
    Spi(SpiE),
    /// Error driving the chip-select line.
    Cs(CsE),
    /// CTS did not assert within the retry budget.
    Timeout,
}

/// A minimal bus trait for Si4735 command/response access.
pub trait Si4735Bus {
    type Error;

    /// Send one command frame (opcode + args, at most [`COMMAND_LEN`] bytes)
    /// and block until the chip signals clear-to-send.
    fn send_command(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Read the fixed 16-byte status + data response frame.
    fn read_response(&mut self, buf: &mut [u8; RESPONSE_LEN]) -> Result<(), Self::Error>;

    /// Read the single status byte (CTS/ERR/interrupt flags).
    fn read_status(&mut self) -> Result<u8, Self::Error>;
}

/// SPI-mode Si4735 transport over `embedded-hal` traits.
///
/// `SPI` is the raw bus; chip select is driven manually because the control
/// byte and its payload must share one CS assertion.
pub struct SpiInterface<SPI, CS, D> {
    spi: SPI,
    cs: CS,
    delay: D,
    /// CTS poll attempts, 1ms apart, before giving up.
    cts_retries: u32,
}

impl<SPI, CS, D> SpiInterface<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    /// Default CTS retry budget. Most commands are ready within a few hundred
    /// microseconds; POWER_UP with the crystal oscillator takes up to 110ms.
    pub const DEFAULT_CTS_RETRIES: u32 = 500;

    /// Create a new transport. CS is left deasserted.
    pub fn new(spi: SPI, mut cs: CS, delay: D) -> Result<Self, Error<SPI::Error, CS::Error>> {
        cs.set_high().map_err(Error::Cs)?;
        Ok(Self {
            spi,
            cs,
            delay,
            cts_retries: Self::DEFAULT_CTS_RETRIES,
        })
    }

    /// Override the CTS retry budget (1ms per attempt).
    #[inline]
    pub fn set_cts_retries(&mut self, retries: u32) {
        self.cts_retries = retries.max(1);
    }

    /// Destroy the transport and return the owned peripherals.
    #[inline]
    pub fn free(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }

    fn select(&mut self) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.cs.set_low().map_err(Error::Cs)?;
        // The chip samples the control byte only after a short CS setup time.
        self.delay.delay_us(30);
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.cs.set_high().map_err(Error::Cs)
    }

    fn status_byte(&mut self) -> Result<u8, Error<SPI::Error, CS::Error>> {
        self.select()?;
        let res = (|| {
            self.spi.write(&[CTRL_READ_STATUS]).map_err(Error::Spi)?;
            let mut status = [0u8; 1];
            self.spi.read(&mut status).map_err(Error::Spi)?;
            Ok(status[0])
        })();
        self.deselect()?;
        res
    }

    fn wait_cts(&mut self) -> Result<(), Error<SPI::Error, CS::Error>> {
        for _ in 0..self.cts_retries {
            if self.status_byte()? & STATUS_CTS != 0 {
                return Ok(());
            }
            self.delay.delay_ms(1);
        }
        Err(Error::Timeout)
    }
}

impl<SPI, CS, D> Si4735Bus for SpiInterface<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = Error<SPI::Error, CS::Error>;

    fn send_command(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        let len = frame.len().min(COMMAND_LEN);
        let mut padded = [0u8; COMMAND_LEN];
        padded[..len].copy_from_slice(&frame[..len]);

        self.select()?;
        let res = (|| {
            self.spi.write(&[CTRL_WRITE_COMMAND]).map_err(Error::Spi)?;
            self.spi.write(&padded).map_err(Error::Spi)
        })();
        self.deselect()?;
        res?;

        self.wait_cts()
    }

    fn read_response(&mut self, buf: &mut [u8; RESPONSE_LEN]) -> Result<(), Self::Error> {
        self.select()?;
        let res = (|| {
            self.spi.write(&[CTRL_READ_RESPONSE]).map_err(Error::Spi)?;
            self.spi.read(buf).map_err(Error::Spi)
        })();
        self.deselect()?;
        res
    }

    fn read_status(&mut self) -> Result<u8, Self::Error> {
        self.status_byte()
    }
}
