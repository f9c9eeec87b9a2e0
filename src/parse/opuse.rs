use super::{ParsedCommand, int_field};
use crate::error::Error;
use crate::record::{Command, OpUse};

const KIND: &str = "opuse";

/// Backslash-separated fields in the data block; odd positions are empty.
const DATA_FIELDS: usize = 23;

// opuse,14:54:35.450,14:54:35\tCH6\\6\\CartOps\\0\\0\\10\\8\\406347\\406361\\0\\100\\9
pub(super) fn parse(payload: &str) -> Result<ParsedCommand, Error> {
    let parts: Vec<&str> = payload.split(r"\t").collect();
    let [header, data] = parts.as_slice() else {
        return Err(Error::broken(
            KIND,
            format!("expected header and data block in `{payload}`"),
        ));
    };

    let header_fields: Vec<&str> = header.split(',').collect();
    let [command_word, log_time, vax_time] = header_fields.as_slice() else {
        return Err(Error::broken(
            KIND,
            format!("expected 3 header fields, found {}", header_fields.len()),
        ));
    };

    let f: Vec<&str> = data.split('\\').collect();
    if f.len() != DATA_FIELDS {
        return Err(Error::broken(
            KIND,
            format!("expected {DATA_FIELDS} data fields, found {} in `{data}`", f.len()),
        ));
    }

    let op = OpUse {
        log_time: log_time.to_string(),
        vax_time: vax_time.to_string(),
        host: f[0].to_string(),
        portset: int_field(KIND, "portset", f[2])?,
        usage: f[4].to_string(),
        usedcur: int_field(KIND, "usedcur", f[6])?,
        quecur: int_field(KIND, "quecur", f[8])?,
        usedpeak: int_field(KIND, "usedpeak", f[10])?,
        quepeak: int_field(KIND, "quepeak", f[12])?,
        usedtot: int_field(KIND, "usedtot", f[14])?,
        quetot: int_field(KIND, "quetot", f[16])?,
        min: int_field(KIND, "min", f[18])?,
        max: int_field(KIND, "max", f[20])?,
        ideal: int_field(KIND, "ideal", f[22])?,
    };

    Ok(ParsedCommand {
        command_type: command_word.to_string(),
        command: Command::Opuse(op),
    })
}
