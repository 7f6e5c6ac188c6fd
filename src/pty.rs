//! Program type (PTY) code to name tables.
//!
//! The 5-bit PTY code maps to different genre tables depending on region:
//! North America broadcasts RBDS codes, Europe the original RDS set. The
//! locale is decoder configuration, not a build-time choice.

/// Which program-type table to translate PTY codes against.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Locale {
    /// RBDS (United States / Canada) program types.
    #[default]
    NorthAmerica,
    /// RDS (European) program types.
    Europe,
}

const PTY_RBDS: [&str; 32] = [
    "None",
    "News",
    "Information",
    "Sports",
    "Talk",
    "Rock",
    "Classic Rock",
    "Adult Hits",
    "Soft Rock",
    "Top 40",
    "Country",
    "Oldies",
    "Soft",
    "Nostalgia",
    "Jazz",
    "Classical",
    "Rhythm and Blues",
    "Soft R & B",
    "Foreign Language",
    "Religious Music",
    "Religious Talk",
    "Personality",
    "Public",
    "College",
    "None",
    "None",
    "None",
    "None",
    "None",
    "Weather",
    "Emergency Test",
    "ALERT! ALERT!",
];

const PTY_RDS: [&str; 32] = [
    "None",
    "News",
    "Current Affairs",
    "Information",
    "Sports",
    "Education",
    "Drama",
    "Cultures",
    "Science",
    "Varied Speech",
    "Pop Music",
    "Rock Music",
    "Easy Listening",
    "Light Classics M",
    "Serious Classics",
    "Other Music",
    "Weather & Metr",
    "Finance",
    "Children's Progs",
    "Social Affairs",
    "Religion",
    "Phone In",
    "Travel & Touring",
    "Leisure & Hobby",
    "Jazz Music",
    "Country Music",
    "National Music",
    "Oldies Music",
    "Folk Music",
    "Documentary",
    "Alarm Test",
    "Alarm - Alarm!",
];

/// Look up the program-type name for a PTY code in the given locale.
pub fn name(pty: u8, locale: Locale) -> &'static str {
    let table = match locale {
        Locale::NorthAmerica => &PTY_RBDS,
        Locale::Europe => &PTY_RDS,
    };
    table[(pty & 0x1F) as usize]
}
