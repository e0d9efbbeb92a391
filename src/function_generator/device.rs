//! Device-wide state and command routing.
//!
//! Commands arrive here already normalised to short verbs. Device-level verbs are
//! matched first, in a fixed order; anything shaped like `C<digit>:` is forwarded to
//! that channel; everything else is ignored. Handler errors are logged and turned
//! into [`Response::Silent`].

use super::channel::Channel;
use super::defaults::DEVICE_DEFAULTS;
use super::model::InstrumentModel;
use super::settings::Settings;
use super::{Response, CHANNEL_COUNT};
use crate::error::CommandError;
use crate::numeric::channel_to_index;
use crate::verbs::HeaderMode;
use tracing::{debug, error, warn};

/// Device-level verbs, in routing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceVerb {
    Identify,
    OperationComplete,
    ParameterCopy,
    Reset,
    CommHeader,
    Buzzer,
    StoreList,
}

impl DeviceVerb {
    const ROUTES: [(&'static str, bool, DeviceVerb); 7] = [
        ("*IDN?", true, DeviceVerb::Identify),
        ("*OPC", false, DeviceVerb::OperationComplete),
        ("PACP", false, DeviceVerb::ParameterCopy),
        ("*RST", true, DeviceVerb::Reset),
        ("CHDR", false, DeviceVerb::CommHeader),
        ("BUZZ", false, DeviceVerb::Buzzer),
        ("STL", false, DeviceVerb::StoreList),
    ];

    /// First route whose verb matches, exactly or as a prefix.
    fn route(command: &str) -> Option<DeviceVerb> {
        Self::ROUTES
            .iter()
            .find(|(verb, exact, _)| {
                if *exact {
                    command == *verb
                } else {
                    command.starts_with(verb)
                }
            })
            .map(|(_, _, target)| *target)
    }
}

#[derive(Debug, Clone)]
pub struct Device {
    model: InstrumentModel,
    settings: Settings,
    channels: Vec<Channel>,
}

impl Device {
    pub fn new(model: InstrumentModel) -> Self {
        Self {
            model,
            settings: Settings::from_defaults(DEVICE_DEFAULTS),
            channels: (1..=CHANNEL_COUNT as u8).map(Channel::new).collect(),
        }
    }

    pub fn model(&self) -> InstrumentModel {
        self.model
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Channel by zero-based index.
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Current `CHDR` response header mode.
    pub fn header_mode(&self) -> HeaderMode {
        HeaderMode::from_setting(self.settings.value("CHDR"))
    }

    /// Route a normalised command and return its raw reply.
    pub fn dispatch(&mut self, command: &str) -> Response {
        match self.route(command) {
            Ok(response) => response,
            Err(err) => {
                warn!(command, error = %err, "Rejected command");
                Response::Silent
            }
        }
    }

    fn route(&mut self, command: &str) -> Result<Response, CommandError> {
        if let Some(verb) = DeviceVerb::route(command) {
            return match verb {
                DeviceVerb::Identify => Ok(self.identification()),
                DeviceVerb::OperationComplete => Ok(self.operation_complete(command)),
                DeviceVerb::ParameterCopy => self.parameter_copy(command),
                DeviceVerb::Reset => {
                    self.reset();
                    Ok(Response::Silent)
                }
                DeviceVerb::CommHeader => self.comm_header(command),
                DeviceVerb::Buzzer => self.buzzer(command),
                DeviceVerb::StoreList => self.store_list(command),
            };
        }

        if let Some(index) = channel_command_index(command) {
            let channel = self
                .channels
                .get_mut(index)
                .ok_or_else(|| CommandError::InvalidChannel(command.to_string()))?;
            return channel.process(command);
        }

        debug!(command, "Ignoring unsupported command");
        Ok(Response::Silent)
    }

    /// `*IDN?`
    pub fn identification(&self) -> Response {
        Response::Bare(self.model.identification())
    }

    /// `*OPC?` reports completion; other forms are accepted silently.
    pub fn operation_complete(&self, command: &str) -> Response {
        if command == "*OPC?" {
            Response::Headed("*OPC 1".to_string())
        } else {
            Response::Silent
        }
    }

    /// `*RST`: device settings and every channel back to power-on values.
    pub fn reset(&mut self) {
        self.settings = Settings::from_defaults(DEVICE_DEFAULTS);
        for channel in &mut self.channels {
            channel.reset();
        }
    }

    /// `CHDR?` / `CHDR <SHORT|LONG|OFF>`
    pub fn comm_header(&mut self, command: &str) -> Result<Response, CommandError> {
        if command == "CHDR?" {
            return Ok(Response::Headed(format!(
                "CHDR {}",
                self.settings.value("CHDR")
            )));
        }
        let value = single_parameter(command)?;
        let mode = value
            .parse::<HeaderMode>()
            .map_err(|_| invalid("CHDR", value))?;
        self.settings.set("CHDR", mode.as_str());
        Ok(Response::Silent)
    }

    /// `PACP C<dest>,C<src>`: copy every setting of the source channel onto the
    /// destination channel.
    pub fn parameter_copy(&mut self, command: &str) -> Result<Response, CommandError> {
        let result = self.copy_channel(command);
        if let Err(err) = &result {
            error!(command, error = %err, "Parameter copy failed");
        }
        result
    }

    fn copy_channel(&mut self, command: &str) -> Result<Response, CommandError> {
        let pair = single_parameter(command)?;
        let (dest, source) = match pair.split(',').collect::<Vec<_>>()[..] {
            [dest, source] => (dest, source),
            _ => return Err(CommandError::MissingParameter(command.to_string())),
        };
        let dest = self.channel_index(dest)?;
        let source = self.channel_index(source)?;

        let snapshot = self.channels[source].clone();
        self.channels[dest].copy_from(&snapshot);
        Ok(Response::Silent)
    }

    fn channel_index(&self, token: &str) -> Result<usize, CommandError> {
        channel_to_index(token)
            .filter(|index| *index < self.channels.len())
            .ok_or_else(|| CommandError::InvalidChannel(token.to_string()))
    }

    /// `STL?`, `STL? BUILDIN`, `STL? USER`
    pub fn store_list(&self, command: &str) -> Result<Response, CommandError> {
        if command == "STL?" {
            return Ok(Response::Headed(self.settings.value("STL").to_string()));
        }
        let key = match single_parameter(command)? {
            "BUILDIN" => "STL",
            "USER" => "STL USER",
            other => return Err(invalid("STL", other)),
        };
        Ok(Response::Headed(self.settings.value(key).to_string()))
    }

    /// `BUZZ?` / `BUZZ <ON|OFF>`
    pub fn buzzer(&mut self, command: &str) -> Result<Response, CommandError> {
        if command == "BUZZ?" {
            return Ok(Response::Headed(format!(
                "BUZZ {}",
                self.settings.value("BUZZ")
            )));
        }
        match single_parameter(command)? {
            state @ ("ON" | "OFF") => {
                self.settings.set("BUZZ", state);
                Ok(Response::Silent)
            }
            other => Err(invalid("BUZZ", other)),
        }
    }
}

/// Zero-based channel index of a `C<digit>:` command.
fn channel_command_index(command: &str) -> Option<usize> {
    match command.as_bytes() {
        [b'C', digit, b':', ..] if digit.is_ascii_digit() => channel_to_index(command),
        _ => None,
    }
}

/// The parameter of a `<verb> <param>` command with exactly one space.
fn single_parameter(command: &str) -> Result<&str, CommandError> {
    match command.split(' ').collect::<Vec<_>>()[..] {
        [_, param] => Ok(param),
        _ => Err(CommandError::UnsupportedForm(command.to_string())),
    }
}

fn invalid(key: &str, value: &str) -> CommandError {
    CommandError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
