//! Normalized record model.
//!
//! The serde representation is the output schema consumed downstream:
//!
//! ```text
//! { "command_type": "...", "hostname": "...", "ts": "<rfc3339>",
//!   "command": { "<unparsed|request|response|error|opuse|hostload>": ... } }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::Map;

/// One parsed Atlas log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub command_type: String,
    pub hostname: String,
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    pub command: Command,
}

impl Record {
    pub fn to_json(&self) -> Result<Vec<u8>, crate::Error> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(raw: &[u8]) -> Result<Self, crate::Error> {
        Ok(serde_json::from_slice(raw)?)
    }
}

/// The sub-format a record was parsed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    /// Payload text of a line no sub-parser accepted.
    Unparsed(String),
    Request(ReqResp),
    Response(ReqResp),
    Error(ErrorRecord),
    Opuse(OpUse),
    Hostload(HostLoad),
}

impl Command {
    /// Request and response records share a body.
    pub fn req_resp(&self) -> Option<&ReqResp> {
        match self {
            Command::Request(r) | Command::Response(r) => Some(r),
            _ => None,
        }
    }
}

// response,10:52:07.630,195840581/192.168.59.44/49312/416,000000EA|result=0x0,statmsg=QUE,...
// response,12:03:55.460,42854398/192.168.49.220/2175/429,00000BDE|<json>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReqResp {
    pub log_time: String,
    pub client: ClientHeader,
    #[serde(rename = "message_length_hex")]
    pub length_hex: String,
    pub message: Map,
}

/// `message_id/client_ip/client_port/socket_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientHeader {
    #[serde(rename = "message")]
    pub message_id: i64,
    pub ip: String,
    pub port: i64,
    pub socket: i64,
}

// error,13:42:56.960,0000016A|<json>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub log_time: String,
    #[serde(rename = "message_length_hex")]
    pub length_hex: String,
    pub message: Map,
}

// opuse,14:54:35.450,14:54:35\tCH6\\6\\CartOps\\0\\0\\10\\8\\406347\\406361\\0\\100\\9
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpUse {
    pub log_time: String,
    pub vax_time: String,

    pub host: String,
    pub portset: i64,
    pub usage: String,
    pub usedcur: i64,
    pub quecur: i64,
    pub usedpeak: i64,
    pub quepeak: i64,
    pub usedtot: i64,
    pub quetot: i64,
    pub min: i64,
    pub max: i64,
    pub ideal: i64,
}

// hostload,13:23:35.800,ARZ,0,13:23:34,29
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostLoad {
    pub log_time: String,
    pub vax: String,
    pub load: i64,
    pub vax_time: String,
    pub flags: i64,
}
