use super::ParsedCommand;
use crate::decode::unwrap;
use crate::error::Error;
use crate::record::{Command, ErrorRecord};
use crate::value::Map;

const KIND: &str = "error";

// error,13:42:56.960,0000016A|<json>|<json>
pub(super) fn parse(payload: &str) -> Result<ParsedCommand, Error> {
    let mut parts = payload.split('|');
    let header = parts.next().unwrap_or_default();
    let fragments: Vec<&str> = parts.collect();
    if fragments.is_empty() {
        return Err(Error::broken(KIND, format!("no messages found in `{payload}`")));
    }

    let fields: Vec<&str> = header.split(',').collect();
    let [command_word, log_time, length_hex] = fields.as_slice() else {
        return Err(Error::broken(
            KIND,
            format!("expected 3 header fields, found {}", fields.len()),
        ));
    };

    let mut message = Map::new();
    for fragment in fragments {
        message.extend(unwrap(fragment)?);
    }

    Ok(ParsedCommand {
        command_type: command_word.to_string(),
        command: Command::Error(ErrorRecord {
            log_time: log_time.to_string(),
            length_hex: length_hex.to_string(),
            message,
        }),
    })
}
