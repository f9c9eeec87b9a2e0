use std::str::FromStr;

use super::{ParsedCommand, int_field};
use crate::decode::unwrap;
use crate::error::Error;
use crate::record::{ClientHeader, Command, ReqResp};
use crate::value::{Map, Value};

const KIND: &str = "response";

// header|message1|message2|...
pub(super) fn parse(payload: &str) -> Result<ParsedCommand, Error> {
    let mut fragments = payload.split('|');
    let header = fragments.next().unwrap_or_default();
    let first = fragments
        .next()
        .ok_or_else(|| Error::broken(KIND, format!("no messages found in `{payload}`")))?;

    // command_type,log_time,message_id/client_ip/client_port/socket_id,length_hex
    let fields: Vec<&str> = header.split(',').collect();
    let [command_word, log_time, client, length_hex] = fields.as_slice() else {
        return Err(Error::broken(
            KIND,
            format!("expected 4 header fields, found {}", fields.len()),
        ));
    };

    let message = if first.starts_with('{') {
        unwrap(first)?
    } else {
        let mut message = Map::new();
        for (i, fragment) in std::iter::once(first).chain(fragments).enumerate() {
            let key = match i {
                0 => "header".to_string(),
                n => format!("command{n}"),
            };
            message.insert(key, Value::Map(unwrap(fragment)?));
        }
        message
    };

    let body = ReqResp {
        log_time: log_time.to_string(),
        client: client.parse()?,
        length_hex: length_hex.to_string(),
        message,
    };

    let command = if *command_word == "request" {
        Command::Request(body)
    } else {
        Command::Response(body)
    };

    Ok(ParsedCommand {
        command_type: command_word.to_string(),
        command,
    })
}

impl FromStr for ClientHeader {
    type Err = Error;

    // 363776339/192.168.48.45/52401/414
    fn from_str(quad: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = quad.split('/').collect();
        let [message_id, ip, port, socket] = parts.as_slice() else {
            return Err(Error::broken(
                KIND,
                format!("invalid number of client parts in `{quad}`"),
            ));
        };

        Ok(ClientHeader {
            message_id: int_field(KIND, "client message id", message_id)?,
            ip: ip.to_string(),
            port: int_field(KIND, "client port", port)?,
            socket: int_field(KIND, "client socket", socket)?,
        })
    }
}
