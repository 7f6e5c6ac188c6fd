//! Si4735 command opcodes, property addresses and status bits (AN332).
//!
//! Only the subset this driver issues is listed. Properties are 16-bit
//! addresses written/read through `SET_PROPERTY`/`GET_PROPERTY`.

// --- Commands ---------------------------------------------------------------

pub const POWER_UP: u8 = 0x01;
pub const GET_REV: u8 = 0x10;
pub const POWER_DOWN: u8 = 0x11;
pub const SET_PROPERTY: u8 = 0x12;
pub const GET_PROPERTY: u8 = 0x13;
pub const GET_INT_STATUS: u8 = 0x14;

pub const FM_TUNE_FREQ: u8 = 0x20;
pub const FM_SEEK_START: u8 = 0x21;
pub const FM_TUNE_STATUS: u8 = 0x22;
pub const FM_RSQ_STATUS: u8 = 0x23;
pub const FM_RDS_STATUS: u8 = 0x24;

pub const AM_TUNE_FREQ: u8 = 0x40;
pub const AM_SEEK_START: u8 = 0x41;
pub const AM_TUNE_STATUS: u8 = 0x42;
pub const AM_RSQ_STATUS: u8 = 0x43;

// --- POWER_UP arguments -----------------------------------------------------

pub const POWER_UP_ARG_GPO2OEN: u8 = 0x40;
pub const POWER_UP_ARG_XOSCEN: u8 = 0x10;
pub const POWER_UP_ARG_FUNC_FM: u8 = 0x00;
pub const POWER_UP_ARG_FUNC_AM: u8 = 0x01;
pub const POWER_UP_ARG_OPMODE_ANALOG: u8 = 0x05;

// --- SEEK_START arguments ---------------------------------------------------

pub const SEEK_ARG_UP: u8 = 0x08;
pub const SEEK_ARG_WRAP: u8 = 0x04;

// --- FM_RDS_STATUS arguments ------------------------------------------------

pub const RDS_STATUS_ARG_INTACK: u8 = 0x01;

// --- Properties -------------------------------------------------------------

pub const PROP_FM_RDS_INT_SOURCE: u16 = 0x1502;
pub const PROP_FM_RDS_CONFIG: u16 = 0x1504;
pub const PROP_AM_SEEK_BAND_BOTTOM: u16 = 0x3400;
pub const PROP_AM_SEEK_BAND_TOP: u16 = 0x3401;
pub const PROP_RX_VOLUME: u16 = 0x4000;
pub const PROP_RX_HARD_MUTE: u16 = 0x4001;

/// FM_RDS_INT_SOURCE: interrupt on every received group.
pub const RDS_INT_SOURCE_RECV: u16 = 0x0001;

/// FM_RDS_CONFIG: RDS enabled, block error threshold "corrected errors
/// accepted" on all four blocks. Groups with uncorrectable blocks never reach
/// the FIFO, so the decoder sees only chip-validated data.
pub const RDS_CONFIG_ACCEPT_CORRECTED: u16 = 0x5501;

/// RX_HARD_MUTE: both audio channels muted / unmuted.
pub const HARD_MUTE_BOTH: u16 = 0x0003;
pub const HARD_MUTE_NONE: u16 = 0x0000;

// --- Status byte bits -------------------------------------------------------

pub const STATUS_CTS: u8 = 0x80;
pub const STATUS_ERR: u8 = 0x40;
pub const STATUS_RSQINT: u8 = 0x08;
pub const STATUS_RDSINT: u8 = 0x04;
pub const STATUS_STCINT: u8 = 0x01;
