use super::{ParsedCommand, int_field};
use crate::error::Error;
use crate::record::{Command, HostLoad};

const KIND: &str = "hostload";

// hostload,13:24:05.630,ARZ,0,13:24:04,29
pub(super) fn parse(payload: &str) -> Result<ParsedCommand, Error> {
    let fields: Vec<&str> = payload.split(',').collect();
    let [_, log_time, vax, load, vax_time, flags] = fields.as_slice() else {
        return Err(Error::broken(
            KIND,
            format!("expected 6 fields, found {} in `{payload}`", fields.len()),
        ));
    };

    Ok(ParsedCommand {
        command_type: KIND.to_string(),
        command: Command::Hostload(HostLoad {
            log_time: log_time.to_string(),
            vax: vax.to_string(),
            load: int_field(KIND, "load", load)?,
            vax_time: vax_time.to_string(),
            flags: int_field(KIND, "flags", flags)?,
        }),
    })
}
