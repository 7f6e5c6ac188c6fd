//! High-level Si4735 driver: power management, tuning, seek, audio and the
//! RDS polling pump, on top of a [`Si4735Bus`] transport.
//!
//! The chip is command-driven; every operation here is a short command frame
//! plus, where the chip answers, a 16-byte response read. Seek and tune
//! return as soon as the command is accepted; completion is reported
//! through the STC flag in [`TuneStatus`], matching the cooperative polling
//! model the rest of the driver uses.

use crate::bus::{Si4735Bus, RESPONSE_LEN};
use crate::commands::*;
use crate::rds::{RdsConfig, RdsDecoder, RdsGroup, StationInfo};

/// Receiver function. FM is the only band with RDS.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Mode {
    /// FM broadcast band. Frequencies in 10kHz units (9730 = 97.30MHz).
    Fm,
    /// Medium wave. Frequencies in kHz.
    Am,
    /// Short wave. Frequencies in kHz.
    Sw,
    /// Long wave. Frequencies in kHz.
    Lw,
}

impl Mode {
    #[inline]
    fn is_fm(self) -> bool {
        matches!(self, Mode::Fm)
    }
}

/// Chip part and firmware identification (GET_REV).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Revision {
    pub part_number: u8,
    pub firmware_major: u8,
    pub firmware_minor: u8,
    pub patch: u16,
    pub component_major: u8,
    pub component_minor: u8,
    pub chip_revision: u8,
}

/// Tune/seek result. `frequency` is only meaningful once `stc` is set.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TuneStatus {
    /// Seek/tune complete: the reported frequency is final.
    pub stc: bool,
    /// Current frequency in the mode's tuning units.
    pub frequency: u16,
    pub rssi: u8,
    pub snr: u8,
}

/// Received signal quality. Stereo blend, multipath and frequency offset are
/// FM-only and read as zero on the AM bands.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SignalQuality {
    /// 0 = mono, 100 = full stereo.
    pub stereo_blend: u8,
    /// dBuV.
    pub rssi: u8,
    /// dB.
    pub snr: u8,
    pub multipath: u8,
    /// Signed tuning error, kHz.
    pub frequency_offset: i8,
}

/// SW seek/tune band limits, kHz.
const SW_BAND_BOTTOM: u16 = 2_300;
const SW_BAND_TOP: u16 = 23_000;
/// LW seek/tune band limits, kHz.
const LW_BAND_BOTTOM: u16 = 152;
const LW_BAND_TOP: u16 = 279;

const VOLUME_MAX: u8 = 63;

/// Si4735 driver, owning the bus plus the small amount of state the chip
/// cannot report back cheaply (mode, volume shadow) and the RDS decoder.
pub struct Si4735<BUS> {
    bus: BUS,
    mode: Mode,
    volume: u8,
    rds: RdsDecoder,
}

impl<BUS> Si4735<BUS>
where
    BUS: Si4735Bus,
{
    pub fn new(bus: BUS, rds_config: RdsConfig) -> Self {
        Self {
            bus,
            mode: Mode::Fm,
            volume: VOLUME_MAX,
            rds: RdsDecoder::new(rds_config),
        }
    }

    #[inline]
    pub fn free(self) -> BUS {
        self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut BUS {
        &mut self.bus
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    // --- Power and configuration -------------------------------------------

    /// Power the receiver up in the given mode with analog audio out.
    ///
    /// Applies the initial volume, unmutes, enables RDS delivery (FM), and
    /// programs the seek band limits for SW/LW, which share the chip's AM
    /// function with non-default ranges.
    pub fn power_up(&mut self, mode: Mode) -> Result<(), BUS::Error> {
        self.mode = mode;

        let function = if mode.is_fm() {
            POWER_UP_ARG_FUNC_FM
        } else {
            POWER_UP_ARG_FUNC_AM
        };
        self.bus.send_command(&[
            POWER_UP,
            POWER_UP_ARG_GPO2OEN | POWER_UP_ARG_XOSCEN | function,
            POWER_UP_ARG_OPMODE_ANALOG,
        ])?;

        self.set_property(PROP_RX_VOLUME, u16::from(self.volume))?;
        self.unmute()?;

        if mode.is_fm() {
            self.set_property(PROP_FM_RDS_INT_SOURCE, RDS_INT_SOURCE_RECV)?;
            self.set_property(PROP_FM_RDS_CONFIG, RDS_CONFIG_ACCEPT_CORRECTED)?;
        }

        match mode {
            Mode::Sw => {
                self.set_property(PROP_AM_SEEK_BAND_BOTTOM, SW_BAND_BOTTOM)?;
                self.set_property(PROP_AM_SEEK_BAND_TOP, SW_BAND_TOP)?;
            }
            Mode::Lw => {
                self.set_property(PROP_AM_SEEK_BAND_BOTTOM, LW_BAND_BOTTOM)?;
                self.set_property(PROP_AM_SEEK_BAND_TOP, LW_BAND_TOP)?;
            }
            Mode::Fm | Mode::Am => {}
        }

        Ok(())
    }

    /// Power the receiver down. Volume and mode shadows are kept for the
    /// next power-up.
    pub fn power_down(&mut self) -> Result<(), BUS::Error> {
        self.bus.send_command(&[POWER_DOWN])
    }

    /// Read part and firmware revision information.
    pub fn revision(&mut self) -> Result<Revision, BUS::Error> {
        self.bus.send_command(&[GET_REV])?;
        let resp = self.response()?;
        Ok(Revision {
            part_number: resp[1],
            firmware_major: resp[2],
            firmware_minor: resp[3],
            patch: u16::from_be_bytes([resp[4], resp[5]]),
            component_major: resp[6],
            component_minor: resp[7],
            chip_revision: resp[8],
        })
    }

    // --- Tuning and seek ----------------------------------------------------

    /// Tune to `frequency` (10kHz units on FM, kHz elsewhere).
    ///
    /// Returns once the command is accepted; poll [`tune_status`](Self::tune_status)
    /// for STC. The accumulated RDS station context is cleared; it has no
    /// validity across frequencies.
    pub fn tune_frequency(&mut self, frequency: u16) -> Result<(), BUS::Error> {
        let [hi, lo] = frequency.to_be_bytes();
        match self.mode {
            Mode::Fm => self.bus.send_command(&[FM_TUNE_FREQ, 0x00, hi, lo, 0x00])?,
            Mode::Am | Mode::Lw => self
                .bus
                .send_command(&[AM_TUNE_FREQ, 0x00, hi, lo, 0x00, 0x00])?,
            // SW needs the antenna tuning capacitor forced to its maximum.
            Mode::Sw => self
                .bus
                .send_command(&[AM_TUNE_FREQ, 0x00, hi, lo, 0x00, 0xFF])?,
        }
        self.rds.reset();
        Ok(())
    }

    /// Seek upward to the next station, wrapping at the band edge.
    pub fn seek_up(&mut self) -> Result<(), BUS::Error> {
        self.seek(SEEK_ARG_UP | SEEK_ARG_WRAP)
    }

    /// Seek downward to the next station, wrapping at the band edge.
    pub fn seek_down(&mut self) -> Result<(), BUS::Error> {
        self.seek(SEEK_ARG_WRAP)
    }

    fn seek(&mut self, flags: u8) -> Result<(), BUS::Error> {
        if self.mode.is_fm() {
            self.bus.send_command(&[FM_SEEK_START, flags])?;
        } else {
            self.bus
                .send_command(&[AM_SEEK_START, flags, 0x00, 0x00, 0x00, 0x00])?;
        }
        self.rds.reset();
        Ok(())
    }

    /// Read the current tune status (frequency readback + STC flag).
    pub fn tune_status(&mut self) -> Result<TuneStatus, BUS::Error> {
        let opcode = if self.mode.is_fm() {
            FM_TUNE_STATUS
        } else {
            AM_TUNE_STATUS
        };
        self.bus.send_command(&[opcode, 0x00])?;
        let resp = self.response()?;
        Ok(TuneStatus {
            stc: resp[0] & STATUS_STCINT != 0,
            frequency: u16::from_be_bytes([resp[2], resp[3]]),
            rssi: resp[4],
            snr: resp[5],
        })
    }

    /// Read received signal quality metrics.
    pub fn rsq_status(&mut self) -> Result<SignalQuality, BUS::Error> {
        let opcode = if self.mode.is_fm() {
            FM_RSQ_STATUS
        } else {
            AM_RSQ_STATUS
        };
        self.bus.send_command(&[opcode, 0x00])?;
        let resp = self.response()?;

        let mut rsq = SignalQuality {
            stereo_blend: 0,
            rssi: resp[4],
            snr: resp[5],
            multipath: 0,
            frequency_offset: 0,
        };
        if self.mode.is_fm() {
            rsq.stereo_blend = resp[3] & 0x3F;
            rsq.multipath = resp[6];
            rsq.frequency_offset = resp[7] as i8;
        }
        Ok(rsq)
    }

    // --- Audio --------------------------------------------------------------

    /// Set the output volume, clamped to 0..=63.
    pub fn set_volume(&mut self, volume: u8) -> Result<u8, BUS::Error> {
        self.volume = volume.min(VOLUME_MAX);
        self.set_property(PROP_RX_VOLUME, u16::from(self.volume))?;
        Ok(self.volume)
    }

    /// Raise the volume one step.
    pub fn volume_up(&mut self) -> Result<u8, BUS::Error> {
        self.set_volume(self.volume.saturating_add(1))
    }

    /// Lower the volume one step.
    pub fn volume_down(&mut self) -> Result<u8, BUS::Error> {
        self.set_volume(self.volume.saturating_sub(1))
    }

    /// Last volume written to the chip.
    #[inline]
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Read the volume back from the chip.
    pub fn read_volume(&mut self) -> Result<u8, BUS::Error> {
        Ok(self.get_property(PROP_RX_VOLUME)? as u8)
    }

    /// Hard-mute both audio channels.
    pub fn mute(&mut self) -> Result<(), BUS::Error> {
        self.set_property(PROP_RX_HARD_MUTE, HARD_MUTE_BOTH)
    }

    /// Release the hard mute.
    pub fn unmute(&mut self) -> Result<(), BUS::Error> {
        self.set_property(PROP_RX_HARD_MUTE, HARD_MUTE_NONE)
    }

    // --- Status and RDS ------------------------------------------------------

    /// Refresh and read the interrupt status byte (CTS/ERR/RSQ/RDS/STC).
    pub fn interrupt_status(&mut self) -> Result<u8, BUS::Error> {
        self.bus.send_command(&[GET_INT_STATUS])?;
        self.bus.read_status()
    }

    /// Whether an RDS group is waiting in the chip's FIFO.
    pub fn rds_ready(&mut self) -> Result<bool, BUS::Error> {
        if !self.mode.is_fm() {
            return Ok(false);
        }
        Ok(self.interrupt_status()? & STATUS_RDSINT != 0)
    }

    /// The RDS pump: call once per application loop iteration.
    ///
    /// If a group is waiting it is read (acknowledging the interrupt) and
    /// folded into the station context. Returns whether a group was
    /// consumed, so callers may drain a backlog by looping.
    pub fn poll_rds(&mut self) -> Result<bool, BUS::Error> {
        if !self.rds_ready()? {
            return Ok(false);
        }

        self.bus
            .send_command(&[FM_RDS_STATUS, RDS_STATUS_ARG_INTACK])?;
        let resp = self.response()?;
        self.rds.decode(RdsGroup::from_response(&resp));
        Ok(true)
    }

    /// The accumulated RDS station context.
    #[inline]
    pub fn rds(&self) -> &RdsDecoder {
        &self.rds
    }

    /// Printable-filtered copy of the current station metadata.
    pub fn rds_snapshot(&self) -> StationInfo {
        self.rds.snapshot()
    }

    /// Whether any RDS group has been received since the last tune/seek.
    #[inline]
    pub fn has_rds(&self) -> bool {
        self.rds.has_rds()
    }

    /// Whether a clock-time group has been decoded since the last tune/seek.
    #[inline]
    pub fn clock_available(&self) -> bool {
        self.rds.clock_available()
    }

    /// Clear the RDS station context without retuning.
    pub fn reset_rds(&mut self) {
        self.rds.reset();
    }

    // --- Property access -----------------------------------------------------

    fn set_property(&mut self, property: u16, value: u16) -> Result<(), BUS::Error> {
        let [prop_hi, prop_lo] = property.to_be_bytes();
        let [val_hi, val_lo] = value.to_be_bytes();
        self.bus
            .send_command(&[SET_PROPERTY, 0x00, prop_hi, prop_lo, val_hi, val_lo])
    }

    fn get_property(&mut self, property: u16) -> Result<u16, BUS::Error> {
        let [prop_hi, prop_lo] = property.to_be_bytes();
        self.bus
            .send_command(&[GET_PROPERTY, 0x00, prop_hi, prop_lo])?;
        let resp = self.response()?;
        Ok(u16::from_be_bytes([resp[2], resp[3]]))
    }

    fn response(&mut self) -> Result<[u8; RESPONSE_LEN], BUS::Error> {
        let mut resp = [0u8; RESPONSE_LEN];
        self.bus.read_response(&mut resp)?;
        Ok(resp)
    }
}
