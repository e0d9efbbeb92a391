//! Verb codec: conversion between long and short command verbs.
//!
//! SDG commands have two spellings per verb (`BASIC_WAVE` / `BSWV`). Incoming
//! commands are always normalised to the short form before dispatch; outgoing
//! responses are reshaped according to the device's `CHDR` header mode.
//!
//! Only the verb path (text before the first space) is touched. Each `:`-separated
//! segment is looked up on its own, with a trailing `?` carried over; segments that
//! are not in the table pass through, upper-cased. The parameter tail is never
//! modified.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// `(long, short)` verb pairs.
const VERB_PAIRS: &[(&str, &str)] = &[
    ("COMM_HEADER", "CHDR"),
    ("OUTPUT", "OUTP"),
    ("BASIC_WAVE", "BSWV"),
    ("MODULATEWAVE", "MDWV"),
    ("SWEEPWAVE", "SWWV"),
    ("BURSTWAVE", "BTWV"),
    ("PARACOPY", "PACP"),
    ("ARBWAVE", "ARWV"),
    ("NUMBER_FORMAT", "NBFM"),
    ("LANGUAGE", "LAGG"),
    ("SYS_CFG", "SCFG"),
    ("BUZZER", "BUZZ"),
    ("SCREEN_SAVE", "SCSV"),
    ("CLOCK_SOURCE", "ROSC"),
    ("FREQCOUNTER", "FCNT"),
    ("INVERT", "INVT"),
    ("COUPLING", "COUP"),
    ("STORELIST", "STL"),
    ("WAVEDATA", "WVDT"),
    ("VIRTUALKEY", "VKEY"),
    ("SYSTEM", "SYST"),
    ("COMMUNICATE", "COMM"),
    ("IPADDRESS", "IPAD"),
    ("SUBNETMASK", "SMAS"),
    ("GATEWAY", "GAT"),
    ("SAMPLERATE", "SRATE"),
    ("HARMONIC", "HARM"),
    ("COMBINE", "CMBN"),
];

/// Bidirectional verb lookup. The two maps are exact inverses.
#[derive(Debug)]
pub struct VerbTable {
    long_to_short: HashMap<&'static str, &'static str>,
    short_to_long: HashMap<&'static str, &'static str>,
}

impl VerbTable {
    fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Self {
        let long_to_short = pairs.iter().map(|&(long, short)| (long, short)).collect();
        let short_to_long = pairs.iter().map(|&(long, short)| (short, long)).collect();
        Self {
            long_to_short,
            short_to_long,
        }
    }

    /// The process-wide table.
    pub fn global() -> &'static VerbTable {
        static TABLE: Lazy<VerbTable> = Lazy::new(|| VerbTable::from_pairs(VERB_PAIRS));
        &TABLE
    }

    pub fn long_to_short(&self) -> &HashMap<&'static str, &'static str> {
        &self.long_to_short
    }

    pub fn short_to_long(&self) -> &HashMap<&'static str, &'static str> {
        &self.short_to_long
    }
}

/// Response header mode, as stored in the `CHDR` device setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    #[default]
    Short,
    Long,
    Off,
}

impl HeaderMode {
    /// Interpret a stored `CHDR` value. Anything other than `LONG` or `OFF` is short.
    pub fn from_setting(value: &str) -> Self {
        value.parse().unwrap_or(HeaderMode::Short)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HeaderMode::Short => "SHORT",
            HeaderMode::Long => "LONG",
            HeaderMode::Off => "OFF",
        }
    }
}

impl FromStr for HeaderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SHORT" => Ok(HeaderMode::Short),
            "LONG" => Ok(HeaderMode::Long),
            "OFF" => Ok(HeaderMode::Off),
            other => Err(format!("invalid header mode '{other}'")),
        }
    }
}

impl fmt::Display for HeaderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a command into its verb path and optional parameter tail.
fn split_command(command: &str) -> (&str, Option<&str>) {
    match command.split_once(' ') {
        Some((verbs, params)) => (verbs, Some(params)),
        None => (command, None),
    }
}

fn map_verbs(command: &str, table: &HashMap<&'static str, &'static str>) -> String {
    let (verbs, params) = split_command(command);

    let mapped = verbs
        .split(':')
        .map(|segment| {
            let segment = segment.to_ascii_uppercase();
            let (stem, query) = match segment.strip_suffix('?') {
                Some(stem) => (stem, "?"),
                None => (segment.as_str(), ""),
            };
            match table.get(stem) {
                Some(mapped) => format!("{mapped}{query}"),
                None => segment.clone(),
            }
        })
        .collect::<Vec<_>>()
        .join(":");

    match params {
        Some(params) => format!("{mapped} {params}"),
        None => mapped,
    }
}

/// Reduce every verb segment to its short form.
pub fn shorten(command: &str) -> String {
    map_verbs(command, VerbTable::global().long_to_short())
}

/// Expand every verb segment to its long form.
pub fn lengthen(command: &str) -> String {
    map_verbs(command, VerbTable::global().short_to_long())
}

/// Drop the verb path, keeping only the parameter tail (empty if none).
pub fn strip(command: &str) -> String {
    split_command(command).1.unwrap_or_default().to_string()
}

/// Reshape an outgoing response for the given header mode.
pub fn format(command: &str, mode: HeaderMode) -> String {
    match mode {
        HeaderMode::Off => strip(command),
        HeaderMode::Long => lengthen(command),
        HeaderMode::Short => shorten(command),
    }
}
