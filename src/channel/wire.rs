//! Newline-delimited JSON rendition of the channel.
//!
//! One request per input line, one response per output line, in order:
//!
//! ```text
//! → {"id":1,"method":"addOverlayToImage","arguments":{"imagePath":"a.jpg","overlayPath":"o.png"}}
//! ← {"id":1,"status":"success","result":"a.jpg"}
//! → {"id":2,"method":"saveImage","arguments":{}}
//! ← {"id":2,"status":"error","code":"InvalidArguments","message":"missing or non-string argument: imagePath"}
//! ```
//!
//! Blank lines are skipped. A line that is not a valid request gets a
//! `MalformedRequest` error carrying whatever `id` could be salvaged (0 if none).

use super::command::MethodCall;
use super::composer::Reply;
use super::dispatcher::Dispatcher;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};

pub const MALFORMED_REQUEST: &str = "MalformedRequest";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Request {
    pub id: u64,
    #[serde(flatten)]
    pub call: MethodCall,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Response {
    pub id: u64,
    #[serde(flatten)]
    pub reply: Reply,
}

/// Counts for one serve session. `failed` includes malformed lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub requests: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub malformed: usize,
}

/// Parse one request line, or build the error response for it.
pub fn parse_request(line: &str) -> Result<Request, Response> {
    serde_json::from_str::<Request>(line).map_err(|e| {
        let id = serde_json::from_str::<Value>(line)
            .ok()
            .and_then(|v| v.get("id").and_then(Value::as_u64))
            .unwrap_or(0);
        Response {
            id,
            reply: Reply::error(MALFORMED_REQUEST, e.to_string()),
        }
    })
}

/// Answer every request on `input` until EOF.
pub fn serve<R: BufRead, W: Write>(
    dispatcher: &Dispatcher,
    input: R,
    mut output: W,
) -> std::io::Result<ServeStats> {
    let mut stats = ServeStats::default();

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        stats.requests += 1;

        let response = match parse_request(&line) {
            Ok(request) => Response {
                id: request.id,
                reply: dispatcher.submit(request.call).wait(),
            },
            Err(response) => {
                stats.malformed += 1;
                response
            }
        };

        if response.reply.is_success() {
            stats.succeeded += 1;
        } else {
            stats.failed += 1;
        }

        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }

    Ok(stats)
}
