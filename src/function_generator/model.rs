//! Supported instrument models.
//!
//! Models differ only in the identification string they report; all command
//! handling is shared.

use crate::error::EmulatorError;
use std::fmt;
use std::str::FromStr;

const MANUFACTURER: &str = "Siglent Technologies";
const SERIAL_NUMBER: &str = "SDG1XCBD5R6027";
const FIRMWARE: &str = "1.01.01.33R1B6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentModel {
    Sdg1032x,
    Sdg1062x,
}

impl InstrumentModel {
    /// Every model the emulator can stand in for.
    pub const ALL: [InstrumentModel; 2] = [InstrumentModel::Sdg1032x, InstrumentModel::Sdg1062x];

    /// Model name as printed by the instrument.
    pub fn name(self) -> &'static str {
        match self {
            InstrumentModel::Sdg1032x => "SDG1032X",
            InstrumentModel::Sdg1062x => "SDG1062X",
        }
    }

    /// Reply to `*IDN?`: manufacturer, model, serial number, firmware.
    pub fn identification(self) -> String {
        format!(
            "{MANUFACTURER},{},{SERIAL_NUMBER},{FIRMWARE}",
            self.name()
        )
    }
}

impl FromStr for InstrumentModel {
    type Err = EmulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EmulatorError::UnknownModel(s.to_string()))
    }
}

impl fmt::Display for InstrumentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            "sdg1032x".parse::<InstrumentModel>().unwrap(),
            InstrumentModel::Sdg1032x
        );
        assert_eq!(
            "SDG1062X".parse::<InstrumentModel>().unwrap(),
            InstrumentModel::Sdg1062x
        );
    }

    #[test]
    fn rejects_unknown_models() {
        let err = "ABC1000".parse::<InstrumentModel>().unwrap_err();
        assert!(matches!(err, EmulatorError::UnknownModel(name) if name == "ABC1000"));
    }

    #[test]
    fn identification_differs_only_by_model_name() {
        assert_eq!(
            InstrumentModel::Sdg1032x.identification(),
            "Siglent Technologies,SDG1032X,SDG1XCBD5R6027,1.01.01.33R1B6"
        );
        assert_eq!(
            InstrumentModel::Sdg1062x.identification(),
            "Siglent Technologies,SDG1062X,SDG1XCBD5R6027,1.01.01.33R1B6"
        );
    }
}
