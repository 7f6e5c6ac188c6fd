// Unit tests for the RDS group decoder.
// Included via #[cfg(test)] mod in rds.rs.

use super::*;

const TEST_PI: u16 = 0x54A9;

fn block_b(group_type: u8, version_b: bool, payload: u8) -> u16 {
    BlockB::new()
        .with_group_type(group_type)
        .with_version_b(version_b)
        .with_payload(payload)
        .into()
}

/// Type 0A basic tuning group: `payload` carries TA/MS/DI and the segment.
fn ps_group(payload: u8, chars: [u8; 2]) -> RdsGroup {
    RdsGroup {
        block_a: TEST_PI,
        block_b: block_b(0, false, payload),
        block_c: 0,
        block_d: u16::from_be_bytes(chars),
    }
}

/// Type 2A radio text group: four characters from blocks C and D.
fn rt_group_2a(flip: bool, segment: u8, chars: [u8; 4]) -> RdsGroup {
    RdsGroup {
        block_a: TEST_PI,
        block_b: block_b(2, false, (u8::from(flip) << 4) | (segment & 0x0F)),
        block_c: u16::from_be_bytes([chars[0], chars[1]]),
        block_d: u16::from_be_bytes([chars[2], chars[3]]),
    }
}

/// Type 2B radio text group: two characters from block D only.
fn rt_group_2b(flip: bool, segment: u8, chars: [u8; 2]) -> RdsGroup {
    RdsGroup {
        block_a: TEST_PI,
        block_b: block_b(2, true, (u8::from(flip) << 4) | (segment & 0x0F)),
        block_c: TEST_PI,
        block_d: u16::from_be_bytes(chars),
    }
}

/// Type 4A clock-time group.
fn ct_group(mjd: u32, hour: u8, minute: u8, offset_half_hours: i8) -> RdsGroup {
    let block_c = (((mjd & 0x7FFF) as u16) << 1) | u16::from(hour >> 4);
    let block_d = (u16::from(hour & 0x0F) << 12)
        | (u16::from(minute) << 6)
        | (u16::from(offset_half_hours < 0) << 5)
        | u16::from(offset_half_hours.unsigned_abs() & 0x1F);
    RdsGroup {
        block_a: TEST_PI,
        block_b: block_b(4, false, ((mjd >> 15) & 0x03) as u8),
        block_c,
        block_d,
    }
}

/// Type 10A program-type-name group.
fn ptyn_group(flip: bool, segment: u8, chars: [u8; 4]) -> RdsGroup {
    RdsGroup {
        block_a: TEST_PI,
        block_b: block_b(10, false, (u8::from(flip) << 4) | (segment & 0x01)),
        block_c: u16::from_be_bytes([chars[0], chars[1]]),
        block_d: u16::from_be_bytes([chars[2], chars[3]]),
    }
}

#[test]
fn ps_round_trip_in_order() {
    let mut dec = RdsDecoder::default();
    for (seg, chars) in [*b"KD", *b"Z ", *b"TE", *b"ST"].iter().enumerate() {
        dec.decode(ps_group(seg as u8, *chars));
    }
    assert_eq!(dec.snapshot().program_service.as_str(), "KDZ TEST");
}

#[test]
fn ps_segments_assemble_in_any_order() {
    let mut dec = RdsDecoder::default();
    dec.decode(ps_group(3, *b"ST"));
    dec.decode(ps_group(0, *b"KD"));
    dec.decode(ps_group(2, *b"TE"));
    dec.decode(ps_group(1, *b"Z "));
    assert_eq!(dec.snapshot().program_service.as_str(), "KDZ TEST");
}

#[test]
fn ps_segments_may_repeat() {
    let mut dec = RdsDecoder::default();
    dec.decode(ps_group(0, *b"KD"));
    dec.decode(ps_group(0, *b"KD"));
    dec.decode(ps_group(1, *b"Z "));
    assert_eq!(dec.snapshot().program_service.as_str(), "KDZ");
}

#[test]
fn version_b_groups_also_carry_ps() {
    let mut dec = RdsDecoder::default();
    dec.decode(RdsGroup {
        block_a: TEST_PI,
        block_b: block_b(0, true, 0),
        block_c: TEST_PI,
        block_d: u16::from_be_bytes(*b"HI"),
    });
    assert_eq!(dec.snapshot().program_service.as_str(), "HI");
}

#[test]
fn pi_is_always_overwritten() {
    let mut dec = RdsDecoder::default();
    dec.decode(ps_group(0, *b"KD"));
    assert_eq!(dec.snapshot().pi, TEST_PI);

    let mut other = ps_group(1, *b"Z ");
    other.block_a = 0x1234;
    dec.decode(other);
    assert_eq!(dec.snapshot().pi, 0x1234);
}

#[test]
fn di_bits_are_stored_most_significant_first() {
    let mut dec = RdsDecoder::default();
    // DI flag is payload bit 2; segment 0 carries d3, segment 3 carries d0.
    dec.decode(ps_group(0x04, *b"KD"));
    assert_eq!(dec.snapshot().di, 0b1000);
    dec.decode(ps_group(0x04 | 3, *b"ST"));
    assert_eq!(dec.snapshot().di, 0b1001);
    // A cleared flag clears the bit again.
    dec.decode(ps_group(0, *b"KD"));
    assert_eq!(dec.snapshot().di, 0b0001);
}

#[test]
fn flags_follow_the_latest_group() {
    let mut dec = RdsDecoder::default();
    // TA (bit 4) and MS (bit 3) set, PTY 5 ("Rock" in RBDS), TP set.
    let mut group = ps_group(0x18, *b"KD");
    group.block_b = BlockB::from(group.block_b).with_tp(true).with_pty(5).into();
    dec.decode(group);

    let info = dec.snapshot();
    assert!(info.ta);
    assert!(info.ms);
    assert!(info.tp);
    assert_eq!(info.pty, 5);
    assert_eq!(info.pty_name, "Rock");
}

#[test]
fn radio_text_2a_reconstructs_the_full_message() {
    let text = b"DEEP PURPLE - SMOKE ON THE WATER (MACHINE HEAD)";
    let mut msg = [b' '; 64];
    msg[..text.len()].copy_from_slice(text);

    let mut dec = RdsDecoder::default();
    // Broadcast order is not guaranteed; feed the segments shuffled.
    for seg in [7u8, 0, 15, 3, 11, 1, 8, 4, 12, 2, 9, 5, 13, 6, 10, 14] {
        let base = usize::from(seg) * 4;
        dec.decode(rt_group_2a(
            false,
            seg,
            [msg[base], msg[base + 1], msg[base + 2], msg[base + 3]],
        ));
    }
    assert_eq!(
        dec.snapshot().radio_text.as_str(),
        core::str::from_utf8(text).unwrap()
    );
}

#[test]
fn radio_text_flip_change_blanks_the_buffer() {
    let mut dec = RdsDecoder::default();
    dec.decode(rt_group_2a(false, 0, *b"ABCD"));
    dec.decode(rt_group_2a(false, 1, *b"EFGH"));
    assert_eq!(dec.snapshot().radio_text.as_str(), "ABCDEFGH");

    // New message started: old content must not survive.
    dec.decode(rt_group_2a(true, 1, *b"WXYZ"));
    assert_eq!(dec.snapshot().radio_text.as_str(), "    WXYZ");
}

#[test]
fn radio_text_2b_writes_at_half_density() {
    let mut dec = RdsDecoder::default();
    dec.decode(rt_group_2b(false, 0, *b"AB"));
    dec.decode(rt_group_2b(false, 1, *b"CD"));
    dec.decode(rt_group_2b(false, 7, *b"OP"));
    assert_eq!(dec.snapshot().radio_text.as_str(), "ABCD          OP");
}

#[test]
fn radio_text_2b_rejects_out_of_range_segments() {
    let mut dec = RdsDecoder::default();
    dec.decode(rt_group_2b(false, 0, *b"AB"));
    // Addresses 8..=15 carry no valid 2B segment; nothing may change, not
    // even the flip flag.
    dec.decode(rt_group_2b(true, 8, *b"!!"));
    dec.decode(rt_group_2b(true, 15, *b"!!"));
    assert_eq!(dec.snapshot().radio_text.as_str(), "AB");
}

#[test]
fn program_type_name_assembles_and_blanks_on_flip() {
    let mut dec = RdsDecoder::default();
    dec.decode(ptyn_group(false, 0, *b"ROCK"));
    dec.decode(ptyn_group(false, 1, *b"FM  "));
    assert_eq!(dec.snapshot().program_type_name.as_str(), "ROCKFM");

    dec.decode(ptyn_group(true, 1, *b"NEWS"));
    assert_eq!(dec.snapshot().program_type_name.as_str(), "    NEWS");
}

#[test]
fn clock_time_decodes_date_and_local_time() {
    let mut dec = RdsDecoder::default();
    assert!(!dec.clock_available());

    // 2020-01-09 18:30 UTC, local offset +1h.
    dec.decode(ct_group(58_857, 18, 30, 2));
    assert!(dec.clock_available());
    assert_eq!(
        dec.snapshot().clock,
        Some(RdsTime {
            year: 2020,
            month: 1,
            day: 9,
            weekday: 4,
            hour: 19,
            minute: 30,
        })
    );
}

#[test]
fn clock_time_negative_offset_keeps_utc_date() {
    let mut dec = RdsDecoder::default();
    // 00:15 UTC-0:30 -> 23:45; the date stays the broadcast (UTC) one.
    dec.decode(ct_group(45_218, 0, 15, -1));
    assert_eq!(
        dec.snapshot().clock,
        Some(RdsTime {
            year: 1982,
            month: 9,
            day: 6,
            weekday: 1,
            hour: 23,
            minute: 45,
        })
    );
}

#[test]
fn all_zero_clock_time_is_no_data() {
    let mut dec = RdsDecoder::default();
    dec.decode(ct_group(58_857, 0, 0, 0));
    assert!(!dec.clock_available());
    assert_eq!(dec.snapshot().clock, None);
    // The group still counts as received RDS.
    assert!(dec.has_rds());
}

#[test]
fn zero_clock_time_after_reset_stays_unavailable() {
    let mut dec = RdsDecoder::default();
    dec.decode(ct_group(58_857, 18, 30, 0));
    assert!(dec.clock_available());

    dec.reset();
    dec.decode(ct_group(58_857, 0, 0, 0));
    assert!(!dec.clock_available());
}

#[test]
fn clock_time_with_garbage_day_count_is_ignored() {
    let mut dec = RdsDecoder::default();
    // Below the formula's epoch; hour/minute alone are not a usable clock.
    dec.decode(ct_group(100, 12, 0, 0));
    assert!(!dec.clock_available());
}

#[test]
fn unknown_group_types_are_ignored() {
    let mut dec = RdsDecoder::default();
    for group_type in [1u8, 3, 5, 6, 7, 8, 9, 11, 12, 13, 14, 15] {
        dec.decode(RdsGroup {
            block_a: TEST_PI,
            block_b: block_b(group_type, false, 0x1F),
            block_c: 0xDEAD,
            block_d: 0xBEEF,
        });
    }
    // Group 10B is likewise undefined.
    dec.decode(RdsGroup {
        block_a: TEST_PI,
        block_b: block_b(10, true, 0x11),
        block_c: 0xDEAD,
        block_d: 0xBEEF,
    });

    let info = dec.snapshot();
    assert_eq!(info.program_service.as_str(), "");
    assert_eq!(info.radio_text.as_str(), "");
    assert_eq!(info.program_type_name.as_str(), "");
    assert_eq!(info.clock, None);
    assert!(dec.has_rds());
}

#[test]
fn reset_drops_all_station_state() {
    let mut dec = RdsDecoder::default();
    dec.decode(ps_group(0x04, *b"KD"));
    dec.decode(rt_group_2a(false, 0, *b"ABCD"));
    dec.decode(ct_group(58_857, 18, 30, 0));
    assert!(dec.has_rds());

    dec.reset();
    assert!(!dec.has_rds());
    assert!(!dec.clock_available());

    let info = dec.snapshot();
    assert_eq!(info.pi, 0);
    assert_eq!(info.program_service.as_str(), "");
    assert_eq!(info.radio_text.as_str(), "");
    assert_eq!(info.di, 0);
    assert_eq!(info.clock, None);
}

#[test]
fn reset_then_partial_groups_expose_no_stale_data() {
    let mut dec = RdsDecoder::default();
    for (seg, chars) in [*b"KD", *b"Z ", *b"TE", *b"ST"].iter().enumerate() {
        dec.decode(ps_group(seg as u8, *chars));
    }
    dec.reset();

    // Only one segment of the "new station" has arrived.
    dec.decode(ps_group(1, *b"Z "));
    assert_eq!(dec.snapshot().program_service.as_str(), "  Z");
}

#[test]
fn call_sign_decodes_k_and_w_ranges() {
    let mut dec = RdsDecoder::default();
    let mut group = ps_group(0, *b"KD");
    group.block_a = 0x18F0; // 6384 = KDKA
    dec.decode(group);
    assert_eq!(dec.snapshot().call_sign.as_str(), "KDKA");

    group.block_a = 0x93ED; // 37869 = WXYZ
    dec.decode(group);
    assert_eq!(dec.snapshot().call_sign.as_str(), "WXYZ");
}

#[test]
fn call_sign_is_blank_outside_the_call_ranges() {
    let mut dec = RdsDecoder::default();
    let mut group = ps_group(0, *b"KD");
    group.block_a = 0x0FFF; // below the K range
    dec.decode(group);
    assert_eq!(dec.snapshot().call_sign.as_str(), "");

    group.block_a = 0xFFFF; // past WZZZ
    dec.decode(group);
    assert_eq!(dec.snapshot().call_sign.as_str(), "");
}

#[test]
fn snapshot_replaces_non_printable_bytes() {
    let mut dec = RdsDecoder::default();
    dec.decode(ps_group(0, [0x05, b'A']));
    assert_eq!(dec.snapshot().program_service.as_str(), " A");

    let mut dec = RdsDecoder::new(RdsConfig {
        placeholder: Placeholder::Question,
        ..RdsConfig::default()
    });
    dec.decode(ps_group(0, [0x05, b'A']));
    assert_eq!(dec.snapshot().program_service.as_str(), "?A");
}

#[test]
fn carriage_return_ends_the_snapshot_string() {
    let mut dec = RdsDecoder::default();
    dec.decode(rt_group_2a(false, 0, [b'H', b'I', 0x0D, b'X']));
    dec.decode(rt_group_2a(false, 1, *b"MORE"));
    assert_eq!(dec.snapshot().radio_text.as_str(), "HI");
}

#[test]
fn filtering_never_touches_the_accumulation_buffer() {
    let mut dec = RdsDecoder::default();
    dec.decode(ps_group(0, [0x01, 0x02]));
    assert_eq!(dec.snapshot().program_service.as_str(), "");

    // Overwriting the same segment with real characters must still work.
    dec.decode(ps_group(0, *b"OK"));
    assert_eq!(dec.snapshot().program_service.as_str(), "OK");
}
