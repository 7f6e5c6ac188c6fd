//! RDS group decoder and station context.
//!
//! The chip delivers RDS data one group at a time: four 16-bit blocks, with
//! block-level error correction already applied by the tuner (see
//! `FM_RDS_CONFIG`). [`RdsDecoder::decode`] folds each group into a durable
//! [station context](RdsDecoder) of program service name, radio text,
//! program type name and clock time, which the application reads back
//! through [`RdsDecoder::snapshot`].
//!
//! The decoder does no I/O and never fails: segment addresses are
//! bounds-checked before every buffer write, unknown group types are ignored,
//! and an all-zero clock-time field is treated as "no time broadcast this
//! cycle" rather than as midnight.

use bitfield_struct::bitfield;
use heapless::String;

use crate::bus::RESPONSE_LEN;
use crate::calendar::{self, mjd_to_date};
use crate::pty::{self, Locale};

const PS_LEN: usize = 8;
const RADIO_TEXT_LEN: usize = 64;
const PTYN_LEN: usize = 8;

/// One RDS group: blocks A..D as received from the chip.
///
/// Block A carries the program identifier, block B the group type and common
/// flags, blocks C and D the group-specific payload.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RdsGroup {
    pub block_a: u16,
    pub block_b: u16,
    pub block_c: u16,
    pub block_d: u16,
}

impl RdsGroup {
    /// Assemble a group from four big-endian block pairs (A, B, C, D).
    pub fn from_bytes(raw: &[u8; 8]) -> Self {
        Self {
            block_a: u16::from_be_bytes([raw[0], raw[1]]),
            block_b: u16::from_be_bytes([raw[2], raw[3]]),
            block_c: u16::from_be_bytes([raw[4], raw[5]]),
            block_d: u16::from_be_bytes([raw[6], raw[7]]),
        }
    }

    /// Extract the four blocks from an `FM_RDS_STATUS` response frame
    /// (blocks live at response bytes 4..=11).
    pub fn from_response(resp: &[u8; RESPONSE_LEN]) -> Self {
        Self {
            block_a: u16::from_be_bytes([resp[4], resp[5]]),
            block_b: u16::from_be_bytes([resp[6], resp[7]]),
            block_c: u16::from_be_bytes([resp[8], resp[9]]),
            block_d: u16::from_be_bytes([resp[10], resp[11]]),
        }
    }
}

/// RDS block B field layout (low 5 bits are group-specific).
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct BlockB {
    #[bits(5)]
    pub payload: u8,
    #[bits(5)]
    pub pty: u8,
    pub tp: bool,
    pub version_b: bool,
    #[bits(4)]
    pub group_type: u8,
}

impl BlockB {
    // Group 0 payload: TA(4) MS(3) DI(2) segment(1:0).
    #[inline]
    fn ta(&self) -> bool {
        self.payload() & 0x10 != 0
    }

    #[inline]
    fn ms(&self) -> bool {
        self.payload() & 0x08 != 0
    }

    #[inline]
    fn di(&self) -> bool {
        self.payload() & 0x04 != 0
    }

    #[inline]
    fn ps_segment(&self) -> usize {
        (self.payload() & 0x03) as usize
    }

    // Group 2 / 10 payload: text A/B flag(4) segment(3:0 / 0).
    #[inline]
    fn text_flip(&self) -> bool {
        self.payload() & 0x10 != 0
    }

    #[inline]
    fn text_segment(&self) -> usize {
        (self.payload() & 0x0F) as usize
    }

    #[inline]
    fn ptyn_segment(&self) -> usize {
        (self.payload() & 0x01) as usize
    }
}

/// Replacement character for non-printable bytes in snapshot strings.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Placeholder {
    #[default]
    Space,
    Question,
}

impl Placeholder {
    fn as_char(self) -> char {
        match self {
            Placeholder::Space => ' ',
            Placeholder::Question => '?',
        }
    }
}

/// Decoder configuration. Locale selects the program-type name table;
/// placeholder the printable-filter policy for snapshot strings.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RdsConfig {
    pub locale: Locale,
    pub placeholder: Placeholder,
}

/// Decoded clock time from group 4A, localized by the broadcast offset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RdsTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// 1..=7, Monday = 1.
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
}

/// Read-only snapshot of the accumulated station metadata.
///
/// Text fields are printable-filtered copies: bytes outside ASCII 32..=126
/// are replaced by the configured placeholder, a carriage return terminates
/// the string, and trailing padding is dropped. The live accumulation
/// buffers are never filtered, so later segment writes land untouched.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StationInfo {
    /// Raw program identifier from block A.
    pub pi: u16,
    /// 8-character program service name.
    pub program_service: String<PS_LEN>,
    /// Up to 64 characters of radio text.
    pub radio_text: String<RADIO_TEXT_LEN>,
    /// 8-character program type name (group 10A).
    pub program_type_name: String<PTYN_LEN>,
    /// Station call sign, derived from the PI code (RBDS; empty when the PI
    /// is outside the K/W call ranges).
    pub call_sign: String<4>,
    /// 5-bit program type code.
    pub pty: u8,
    /// Program type translated through the configured locale table.
    pub pty_name: &'static str,
    /// Traffic program flag.
    pub tp: bool,
    /// Traffic announcement flag.
    pub ta: bool,
    /// Music/speech flag.
    pub ms: bool,
    /// Decoder identification control bits, one per PS segment.
    pub di: u8,
    /// Last decoded clock time, if any has been received since the last
    /// retune.
    pub clock: Option<RdsTime>,
}

/// Accumulates RDS groups into station metadata.
///
/// Owns the mutable station context for exactly one tuned frequency: the
/// tuning path calls [`reset`](Self::reset) whenever the frequency changes,
/// so nothing here survives across stations.
pub struct RdsDecoder {
    config: RdsConfig,
    pi: u16,
    pty: u8,
    tp: bool,
    ta: bool,
    ms: bool,
    /// DI control codes, bit (3 - segment) per received PS segment.
    dicc: u8,
    ps: [u8; PS_LEN],
    radio_text: [u8; RADIO_TEXT_LEN],
    ptyn: [u8; PTYN_LEN],
    /// Last seen radio text A/B flag; a change invalidates the buffer.
    text_flip: bool,
    ptyn_flip: bool,
    have_rds: bool,
    clock: Option<RdsTime>,
}

impl RdsDecoder {
    pub fn new(config: RdsConfig) -> Self {
        Self {
            config,
            pi: 0,
            pty: 0,
            tp: false,
            ta: false,
            ms: false,
            dicc: 0,
            ps: [b' '; PS_LEN],
            radio_text: [b' '; RADIO_TEXT_LEN],
            ptyn: [b' '; PTYN_LEN],
            text_flip: false,
            ptyn_flip: false,
            have_rds: false,
            clock: None,
        }
    }

    /// Clear all accumulated state back to the empty context.
    ///
    /// Called by the tuning/seek path on every frequency change; station
    /// metadata has no validity across stations.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Whether any group has been decoded since the last reset.
    #[inline]
    pub fn has_rds(&self) -> bool {
        self.have_rds
    }

    /// Whether a clock-time group has been decoded since the last reset.
    #[inline]
    pub fn clock_available(&self) -> bool {
        self.clock.is_some()
    }

    /// Fold one group into the station context.
    ///
    /// Never fails: malformed segment addresses are ignored and unknown
    /// group types (AF lists, ODA, EON, paging, ...) are no-ops.
    pub fn decode(&mut self, group: RdsGroup) {
        self.pi = group.block_a;

        let b = BlockB::from(group.block_b);
        self.pty = b.pty();
        self.tp = b.tp();

        match (b.group_type(), b.version_b()) {
            (0, _) => self.basic_tuning(b, group.block_d),
            (2, false) => self.radio_text_2a(b, group.block_c, group.block_d),
            (2, true) => self.radio_text_2b(b, group.block_d),
            (4, false) => self.clock_time(b, group.block_c, group.block_d),
            (10, false) => self.program_type_name(b, group.block_c, group.block_d),
            _ => {}
        }

        self.have_rds = true;
    }

    /// Group 0A/0B: TA/MS/DI flags plus two PS characters per segment.
    fn basic_tuning(&mut self, b: BlockB, block_d: u16) {
        self.ta = b.ta();
        self.ms = b.ms();

        let segment = b.ps_segment();
        // DI bits arrive most significant first: segment 0 carries d3.
        let di_bit = 1u8 << (3 - segment);
        if b.di() {
            self.dicc |= di_bit;
        } else {
            self.dicc &= !di_bit;
        }

        write_segment(&mut self.ps, segment * 2, &block_d.to_be_bytes());
    }

    /// Group 2A: four radio text characters per segment, 16 segments.
    fn radio_text_2a(&mut self, b: BlockB, block_c: u16, block_d: u16) {
        self.check_text_flip(b.text_flip());

        let [c1, c2] = block_c.to_be_bytes();
        let [c3, c4] = block_d.to_be_bytes();
        write_segment(
            &mut self.radio_text,
            b.text_segment() * 4,
            &[c1, c2, c3, c4],
        );
    }

    /// Group 2B: two characters per segment into the same buffer, segments
    /// 0..=7. Addresses 8..=15 are ignored without mutation.
    fn radio_text_2b(&mut self, b: BlockB, block_d: u16) {
        let segment = b.text_segment();
        if segment > 7 {
            return;
        }
        self.check_text_flip(b.text_flip());

        write_segment(&mut self.radio_text, segment * 2, &block_d.to_be_bytes());
    }

    /// A flipped A/B flag means the broadcaster started a new message:
    /// discard the old text before the next segment lands.
    fn check_text_flip(&mut self, flip: bool) {
        if flip != self.text_flip {
            self.radio_text = [b' '; RADIO_TEXT_LEN];
            self.text_flip = flip;
        }
    }

    /// Group 4A: 17-bit Modified Julian Day plus packed hour/minute/offset.
    fn clock_time(&mut self, b: BlockB, block_c: u16, block_d: u16) {
        let mjd = (u32::from(b.payload() & 0x03) << 15) | u32::from(block_c >> 1);

        // Hour/minute/offset straddle the C/D boundary. All-zero means "no
        // time info broadcast this cycle", not midnight UTC+0.
        let ct = (u32::from(block_c & 0x01) << 16) | u32::from(block_d);
        if ct == 0 {
            return;
        }

        let hour = (((block_c & 0x01) << 4) | (block_d >> 12)) as u8;
        let minute = ((block_d >> 6) & 0x3F) as u8;
        let magnitude = (block_d & 0x1F) as i8;
        let offset = if block_d & 0x20 != 0 {
            -magnitude
        } else {
            magnitude
        };

        let Some(date) = mjd_to_date(mjd) else {
            return;
        };
        let (hour, minute) = calendar::local_time(hour, minute, offset);

        self.clock = Some(RdsTime {
            year: date.year,
            month: date.month,
            day: date.day,
            weekday: date.weekday,
            hour,
            minute,
        });
    }

    /// Group 10A: four program-type-name characters per segment, 1-bit
    /// address, with the same flip/invalidate rule as radio text.
    fn program_type_name(&mut self, b: BlockB, block_c: u16, block_d: u16) {
        let flip = b.text_flip();
        if flip != self.ptyn_flip {
            self.ptyn = [b' '; PTYN_LEN];
            self.ptyn_flip = flip;
        }

        let [c1, c2] = block_c.to_be_bytes();
        let [c3, c4] = block_d.to_be_bytes();
        write_segment(&mut self.ptyn, b.ptyn_segment() * 4, &[c1, c2, c3, c4]);
    }

    /// Copy out the current station metadata, printable-filtered.
    pub fn snapshot(&self) -> StationInfo {
        StationInfo {
            pi: self.pi,
            program_service: self.filtered(&self.ps),
            radio_text: self.filtered(&self.radio_text),
            program_type_name: self.filtered(&self.ptyn),
            call_sign: call_sign(self.pi),
            pty: self.pty,
            pty_name: pty::name(self.pty, self.config.locale),
            tp: self.tp,
            ta: self.ta,
            ms: self.ms,
            di: self.dicc,
            clock: self.clock,
        }
    }

    fn filtered<const N: usize>(&self, buf: &[u8]) -> String<N> {
        let mut out = String::new();
        for &byte in buf {
            // 0x0D is the standard's explicit end-of-message marker.
            if byte == 0x0D {
                break;
            }
            let ch = if (0x20..=0x7E).contains(&byte) {
                byte as char
            } else {
                self.config.placeholder.as_char()
            };
            let _ = out.push(ch);
        }
        while out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new(RdsConfig::default())
    }
}

/// Bounds-checked segment write: an address field from the wire is never
/// trusted to index a buffer directly.
fn write_segment(buf: &mut [u8], pos: usize, chars: &[u8]) {
    if let Some(dst) = buf.get_mut(pos..pos + chars.len()) {
        dst.copy_from_slice(chars);
    }
}

/// Derive a station call sign from an RBDS program identifier.
///
/// US/Canadian PI codes pack the call letters numerically: K stations start
/// at 4096, W stations at 21672, with the remaining three letters in base
/// 26. PI codes outside those ranges yield an empty string.
fn call_sign(pi: u16) -> String<4> {
    let mut out = String::new();

    let (first, rem) = if pi >= 21_672 {
        ('W', u32::from(pi) - 21_672)
    } else if pi >= 4_096 {
        ('K', u32::from(pi) - 4_096)
    } else {
        return out;
    };
    if rem >= 26 * 26 * 26 {
        return out;
    }

    let _ = out.push(first);
    let _ = out.push((b'A' + (rem / 676) as u8) as char);
    let _ = out.push((b'A' + (rem / 26 % 26) as u8) as char);
    let _ = out.push((b'A' + (rem % 26) as u8) as char);
    out
}

#[cfg(test)]
#[path = "rds_tests.rs"]
mod tests;
