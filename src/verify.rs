//! Emulator versus hardware parity checks.
//!
//! Both peers receive the same command sequence. After every command the channel
//! state of both is queried and compared; the first state divergence aborts the
//! run because every later comparison would be meaningless.

use crate::client::ScpiClient;
use anyhow::Result;
use std::fmt;
use tracing::{error, info};

/// Commands that bring an instrument to a comparable starting state.
pub const RESET_PREAMBLE: &[&str] = &[
    "*RST",
    "C1:OUTP OFF",
    "C2:OUTP OFF",
    "C1:OUTP LOAD,HZ",
    "C2:OUTP LOAD,HZ",
    "C1:OUTP PLRT,NOR",
    "C2:OUTP PLRT,NOR",
];

pub const COMMAND_SCRIPT: &[&str] = &[
    "*IDN?",
    "*RST",
    "*OPC",
    "STL?",
    "STL? BUILDIN",
    "STL? USER",
    "PACP C2,C1",
    "C1:OUTP ON",
    "C1:OUTP OFF",
    "C2:OUTP ON",
    "C2:OUTP OFF",
    "C1:OUTP LOAD,50",
    "C1:OUTP LOAD,HZ",
    "C2:OUTP LOAD,50",
    "C2:OUTP LOAD,HZ",
    "C1:OUTP PLRT,NOR",
    "C1:OUTP PLRT,INVT",
    "C2:OUTP PLRT,NOR",
    "C2:OUTP PLRT,INVT",
    "C1:BSWV FRQ,120.1",
    "C2:BSWV FRQ,234.5",
    "C1:BSWV AMP,17.89",
    "C2:BSWV AMP,14.32",
    "C1:BSWV FRQ,33.3",
    "C2:BSWV FRQ,44.4",
    "PACP C2,C1",
    "*OPC",
    "*RST",
];

pub const STATE_QUERIES: &[&str] = &["C1:OUTP?", "C2:OUTP?", "C1:BSWV?", "C2:BSWV?"];

/// Frequencies where the hardware's own rounding is known to disagree.
pub const FREQUENCY_OUTLIERS: &[u32] = &[202, 223, 438, 743];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub attempts: usize,
    pub failures: usize,
    pub mismatches: Vec<Mismatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub command: String,
    pub emulator: String,
    pub hardware: String,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.failures == 0
    }

    pub fn merge(&mut self, other: VerifyReport) {
        self.attempts += other.attempts;
        self.failures += other.failures;
        self.mismatches.extend(other.mismatches);
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "{} tests run. All tests passed!", self.attempts)
        } else {
            write!(f, "{} of {} tests failed", self.failures, self.attempts)
        }
    }
}

/// Make line terminators visible in log output.
pub fn escape_response(response: &str) -> String {
    response.replace('\n', "\\n").replace('\r', "\\r")
}

/// Amplitude sweep commands, `0.0` through `21.9` in steps of `0.1`.
pub fn amplitude_sweep() -> Vec<String> {
    (0..22)
        .flat_map(|whole| (0..10).map(move |frac| format!("C1:BSWV AMP,{}.{}", whole, frac)))
        .collect()
}

/// Frequency sweep commands, `0` through `999` minus the known outliers.
pub fn frequency_sweep() -> Vec<String> {
    (0..1000u32)
        .filter(|v| !FREQUENCY_OUTLIERS.contains(v))
        .map(|v| format!("C1:BSWV FRQ,{}", v))
        .collect()
}

fn display(response: &Option<String>) -> String {
    match response {
        Some(text) => escape_response(text),
        None => "No response expected".to_string(),
    }
}

pub struct Verifier {
    emulator: ScpiClient,
    hardware: ScpiClient,
}

impl Verifier {
    pub fn new(emulator: ScpiClient, hardware: ScpiClient) -> Self {
        Self { emulator, hardware }
    }

    /// Bring both peers to the preamble state.
    pub async fn reset(&self) -> Result<()> {
        for command in RESET_PREAMBLE {
            self.emulator.send(command).await?;
            self.hardware.send(command).await?;
        }
        Ok(())
    }

    /// Reset both peers, then run the sweeps (optionally) and the command script.
    pub async fn run_all(&self, sweeps: bool) -> VerifyReport {
        let mut report = VerifyReport::default();
        if let Err(e) = self.reset().await {
            error!(error = %e, "Reset failed");
            report.failures += 1;
            return report;
        }

        if sweeps {
            report.merge(self.run_script(amplitude_sweep().as_slice(), &["C1:BSWV?"]).await);
            report.merge(self.run_script(frequency_sweep().as_slice(), &["C1:BSWV?"]).await);
        }
        report.merge(self.run_script(COMMAND_SCRIPT, STATE_QUERIES).await);
        report
    }

    /// Run each command and compare `states` after it.
    pub async fn run_script<S: AsRef<str>>(&self, commands: &[S], states: &[&str]) -> VerifyReport {
        let mut report = VerifyReport::default();
        if let Err(e) = self.run_commands(commands, states, &mut report).await {
            error!(error = %e, "Caught error. Aborting tests.");
            report.failures += 1;
        }
        report
    }

    async fn run_commands<S: AsRef<str>>(
        &self,
        commands: &[S],
        states: &[&str],
        report: &mut VerifyReport,
    ) -> Result<()> {
        for command in commands {
            let command = command.as_ref();
            report.attempts += 1;
            info!(command, "Testing");
            if !self.compare(command, report).await? {
                report.failures += 1;
            }
            for state in states {
                if !self.compare(state, report).await? {
                    report.failures += 1;
                    error!(command, "State mismatch! Aborting tests.");
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    async fn compare(&self, command: &str, report: &mut VerifyReport) -> Result<bool> {
        let emulator = self.emulator.send(command).await?;
        let hardware = self.hardware.send(command).await?;
        if emulator == hardware {
            return Ok(true);
        }

        let mismatch = Mismatch {
            command: command.to_string(),
            emulator: display(&emulator),
            hardware: display(&hardware),
        };
        error!(
            command,
            emulator = %mismatch.emulator,
            hardware = %mismatch.hardware,
            "Response mismatch"
        );
        report.mismatches.push(mismatch);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_line_terminators() {
        assert_eq!(escape_response("C1:OUTP OFF\r\n"), "C1:OUTP OFF\\r\\n");
    }

    #[test]
    fn amplitude_sweep_covers_tenths() {
        let sweep = amplitude_sweep();
        assert_eq!(sweep.len(), 220);
        assert_eq!(sweep[0], "C1:BSWV AMP,0.0");
        assert_eq!(sweep[219], "C1:BSWV AMP,21.9");
    }

    #[test]
    fn frequency_sweep_skips_outliers() {
        let sweep = frequency_sweep();
        assert_eq!(sweep.len(), 1000 - FREQUENCY_OUTLIERS.len());
        assert!(!sweep.contains(&"C1:BSWV FRQ,202".to_string()));
        assert!(sweep.contains(&"C1:BSWV FRQ,203".to_string()));
    }

    #[test]
    fn report_merges_and_summarises() {
        let mut report = VerifyReport {
            attempts: 3,
            ..Default::default()
        };
        assert_eq!(report.to_string(), "3 tests run. All tests passed!");

        report.merge(VerifyReport {
            attempts: 2,
            failures: 1,
            mismatches: Vec::new(),
        });
        assert!(!report.passed());
        assert_eq!(report.to_string(), "1 of 5 tests failed");
    }
}
