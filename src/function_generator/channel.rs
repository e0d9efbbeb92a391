//! Output channel state and its command handlers.
//!
//! A channel owns its settings outright. `PACP` replaces them with a copy of
//! another channel's settings, and `reset` with a fresh copy of the defaults.
//!
//! Handled commands (after the `C<n>:` prefix):
//!
//! | Command | Effect |
//! |---|---|
//! | `OUTP?` | `C<n>:OUTP <ON|OFF>,LOAD,<load>,PLRT,<plrt>` |
//! | `OUTP <tokens>` | output enable, load (with amplitude rescaling), other keys |
//! | `BSWV?` | basic wave parameters with unit suffixes |
//! | `BSWV <key>,<value>` | one parameter; `FRQ` and `AMP` recompute derived values |

use super::defaults::CHANNEL_DEFAULTS;
use super::settings::Settings;
use super::Response;
use crate::error::CommandError;
use crate::numeric::{divide, format_float, multiply, parse_number, subtract};

/// Amplitude clamp of the output stage, in volts peak-to-peak.
const MIN_AMPLITUDE: f64 = 0.002;
const MAX_AMPLITUDE: f64 = 20.0;

/// Vpp to Vrms for a sine: 1/sqrt(2)/2, as rounded by the instrument.
const VRMS_FACTOR: &str = "0.3535";

/// Settings scaled by a load change.
const LOAD_SCALED: [&str; 5] = ["AMP", "AMPVRMS", "AMPDBM", "HLEV", "LLEV"];

const LOAD_50_OHM: &str = "50";
const LOAD_HIGH_Z: &str = "HZ";

/// Allowed values of enum-typed settings written through the generic key path.
const ENUM_SETTINGS: &[(&str, &[&str])] = &[("OUTPUT", &["ON", "OFF"]), ("PLRT", &["NOR", "INVT"])];

#[derive(Debug, Clone)]
pub struct Channel {
    number: u8,
    prefix: String,
    settings: Settings,
}

impl Channel {
    /// Create channel `number` (one-based) at its power-on settings.
    pub fn new(number: u8) -> Self {
        Self {
            number,
            prefix: format!("C{number}:"),
            settings: Settings::from_defaults(CHANNEL_DEFAULTS),
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace all settings with a copy of `source`'s.
    pub fn copy_from(&mut self, source: &Channel) {
        self.settings = source.settings.clone();
    }

    /// Restore the power-on settings.
    pub fn reset(&mut self) {
        self.settings = Settings::from_defaults(CHANNEL_DEFAULTS);
    }

    /// Handle a full channel command such as `C1:BSWV FRQ,120.1`.
    pub fn process(&mut self, command: &str) -> Result<Response, CommandError> {
        let sub_command = command
            .strip_prefix(self.prefix.as_str())
            .ok_or_else(|| CommandError::WrongChannel(command.to_string()))?;

        if sub_command.starts_with("OUTP") {
            self.outp(sub_command)
        } else if sub_command.starts_with("BSWV") {
            self.bswv(sub_command)
        } else {
            Err(CommandError::UnsupportedForm(command.to_string()))
        }
    }

    fn outp(&mut self, command: &str) -> Result<Response, CommandError> {
        if command == "OUTP?" {
            return Ok(Response::Headed(format!(
                "C{}:OUTP {},LOAD,{},PLRT,{}",
                self.number,
                self.settings.value("OUTPUT"),
                self.settings.value("LOAD"),
                self.settings.value("PLRT"),
            )));
        }

        let tokens = parameter_tokens(command, "OUTP")?;
        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                state @ ("ON" | "OFF") => {
                    self.settings.set("OUTPUT", state);
                    i += 1;
                }
                "LOAD" => {
                    let load = value_after(&tokens, i, command)?;
                    self.change_load(load)?;
                    // A load change ends the token stream.
                    break;
                }
                key if self.settings.contains(key) => {
                    let value = value_after(&tokens, i, command)?;
                    check_enum(key, value)?;
                    self.settings.set(key, value);
                    i += 2;
                }
                other => {
                    return Err(CommandError::UnknownSubCommand {
                        sub: other.to_string(),
                        command: command.to_string(),
                    })
                }
            }
        }

        Ok(Response::Silent)
    }

    /// Switch the load, rescaling the amplitude family. Same load is a no-op.
    fn change_load(&mut self, load: &str) -> Result<(), CommandError> {
        if self.settings.value("LOAD") == load {
            return Ok(());
        }

        let mut scaled = Vec::with_capacity(LOAD_SCALED.len());
        for key in LOAD_SCALED {
            let current = self.settings.value(key);
            let value = match load {
                LOAD_50_OHM => divide(current, "2")?,
                LOAD_HIGH_Z => multiply(current, "2")?,
                _ => {
                    return Err(CommandError::InvalidValue {
                        key: "LOAD".to_string(),
                        value: load.to_string(),
                    })
                }
            };
            scaled.push((key, value));
        }

        self.settings.set("LOAD", load);
        for (key, value) in scaled {
            self.settings.set(key, value);
        }
        Ok(())
    }

    fn bswv(&mut self, command: &str) -> Result<Response, CommandError> {
        if command == "BSWV?" {
            return Ok(Response::Headed(self.basic_wave_report()));
        }

        let tokens = parameter_tokens(command, "BSWV")?;
        let key = tokens[0];
        match key {
            "FRQ" => {
                let value = value_after(&tokens, 0, command)?;
                let frequency = format_float(parse_number(value)?);
                let period = divide("1", value)?;
                self.settings.set("FRQ", frequency);
                self.settings.set("PERI", period);
            }
            "AMP" => {
                let value = value_after(&tokens, 0, command)?;
                let amplitude = parse_number(value)?.clamp(MIN_AMPLITUDE, MAX_AMPLITUDE);
                let amp = format_float(amplitude);
                let vrms = multiply(&amp, VRMS_FACTOR)?;
                let high = divide(&amp, "2")?;
                let low = subtract(&high, &amp)?;
                self.settings.set("AMP", amp);
                self.settings.set("AMPVRMS", vrms);
                self.settings.set("HLEV", high);
                self.settings.set("LLEV", low);
            }
            key if self.settings.contains(key) => {
                let value = value_after(&tokens, 0, command)?;
                self.settings.set(key, value);
            }
            other => {
                return Err(CommandError::UnknownSubCommand {
                    sub: other.to_string(),
                    command: command.to_string(),
                })
            }
        }

        Ok(Response::Silent)
    }

    fn basic_wave_report(&self) -> String {
        let s = &self.settings;
        let dbm = if s.value("LOAD") == LOAD_50_OHM {
            format!("AMPDBM,{}dBm,", s.value("AMPDBM"))
        } else {
            String::new()
        };
        format!(
            "C{}:BSWV WVTP,{},FRQ,{}HZ,PERI,{}S,AMP,{}V,AMPVRMS,{}Vrms,{}OFST,{}V,HLEV,{}V,LLEV,{}V,PHSE,{}",
            self.number,
            s.value("WVTP"),
            s.value("FRQ"),
            s.value("PERI"),
            s.value("AMP"),
            s.value("AMPVRMS"),
            dbm,
            s.value("OFST"),
            s.value("HLEV"),
            s.value("LLEV"),
            s.value("PHSE"),
        )
    }
}

/// Comma-separated parameters of `<verb> <params>`. Only the first
/// space-delimited word after the verb is considered.
fn parameter_tokens<'a>(command: &'a str, verb: &str) -> Result<Vec<&'a str>, CommandError> {
    let rest = command
        .strip_prefix(verb)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or_else(|| CommandError::UnsupportedForm(command.to_string()))?;
    let params = rest.split(' ').next().unwrap_or_default();
    Ok(params.split(',').collect())
}

fn value_after<'a>(tokens: &[&'a str], index: usize, command: &str) -> Result<&'a str, CommandError> {
    tokens
        .get(index + 1)
        .copied()
        .ok_or_else(|| CommandError::MissingParameter(command.to_string()))
}

fn check_enum(key: &str, value: &str) -> Result<(), CommandError> {
    match ENUM_SETTINGS.iter().find(|(k, _)| *k == key) {
        Some((_, allowed)) if !allowed.contains(&value) => Err(CommandError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
        _ => Ok(()),
    }
}
