//! Modified Julian Day to Gregorian calendar conversion.
//!
//! RDS group 4A broadcasts the date as a 17-bit MJD day count. The conversion
//! below is the standard's fixed-point formula scaled by 10/100/10000 so that
//! everything stays in integer arithmetic.

/// Smallest MJD the conversion formula is defined for (1900-03-01).
pub const MJD_MIN: u32 = 15_079;

/// A Gregorian calendar date. `weekday` is 1..=7 with Monday = 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

/// Convert an MJD day count to a Gregorian date.
///
/// Returns `None` below [`MJD_MIN`], where the formula's year/month
/// corrections no longer hold.
pub fn mjd_to_date(mjd: u32) -> Option<Date> {
    if mjd < MJD_MIN {
        return None;
    }
    let mjd = mjd as i32;

    let yp = (mjd * 10 - 150_782) * 10 / 36_525;
    let ys = yp * 36_525 / 100;
    let mp = (mjd * 10 - 149_561 - ys * 10) * 1_000 / 306_001;
    let day = mjd - 14_956 - ys - mp * 306_001 / 10_000;
    let k = i32::from(mp == 14 || mp == 15);

    Some(Date {
        year: (1_900 + yp + k) as u16,
        month: (mp - 1 - k * 12) as u8,
        day: day as u8,
        weekday: ((mjd + 2) % 7 + 1) as u8,
    })
}

/// Apply a signed local-time offset (half-hour units) to a UTC hour/minute.
///
/// Computed in total minutes so the half-hour borrow carries across the hour
/// and the result wraps cleanly across midnight. Hour is always reported in
/// 0..=23; a wrap to midnight yields 0, not 24.
pub fn local_time(hour: u8, minute: u8, offset_half_hours: i8) -> (u8, u8) {
    let total = i32::from(hour) * 60 + i32::from(minute) + i32::from(offset_half_hours) * 30;
    let total = total.rem_euclid(24 * 60);
    ((total / 60) as u8, (total % 60) as u8)
}
