//! JSON-lines host protocol
//!
//! The host writes one request object per line on our stdin and reads one
//! response object per line from our stdout:
//!
//! ```text
//! {"event":"query","argument":"readme","preferences":{"result_limit":"5"}}
//! {"action":"render_result_list","items":[...]}
//! ```
//!
//! A malformed line is answered with an error item and the loop keeps going.

use crate::extension::Extension;
use crate::preferences::RawPreferences;
use crate::results::{Action, ERROR_ICON, ResultItem};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// An event sent by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Request {
    /// The user typed into the launcher
    Query {
        #[serde(default)]
        argument: Option<String>,
        #[serde(default)]
        preferences: RawPreferences,
    },
    /// The user changed the extension's preferences
    PreferencesUpdated {
        #[serde(default)]
        preferences: Option<RawPreferences>,
    },
    /// The user activated an item whose action the host delegates to us
    ItemActivated { action: Action },
}

/// What the host should do in reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Response {
    RenderResultList { items: Vec<ResultItem> },
    DoNothing,
}

impl Response {
    fn error(message: impl Into<String>) -> Self {
        Self::RenderResultList {
            items: vec![ResultItem::inert(message, ERROR_ICON)],
        }
    }
}

/// Dispatch one decoded request
pub fn handle_request(extension: &mut Extension, request: Request) -> Response {
    match request {
        Request::Query {
            argument,
            preferences,
        } => Response::RenderResultList {
            items: extension.on_query(argument.as_deref(), &preferences),
        },
        Request::PreferencesUpdated { preferences } => {
            extension.on_preferences_updated(preferences);
            Response::DoNothing
        }
        Request::ItemActivated { action } => match extension.on_item_activated(&action) {
            Ok(()) => Response::DoNothing,
            Err(error) => {
                tracing::warn!(%error, "Action failed");
                Response::error(error.to_string())
            }
        },
    }
}

/// Decode `payload`, dispatch it and encode the response
///
/// # Errors
/// Returns `serde_json::Error` only if the response cannot be encoded.
pub fn handle_json(extension: &mut Extension, payload: &str) -> Result<String, serde_json::Error> {
    let response = match serde_json::from_str::<Request>(payload) {
        Ok(request) => handle_request(extension, request),
        Err(error) => {
            tracing::warn!(%error, "Invalid request");
            Response::error(format!("Invalid request: {error}"))
        }
    };

    serde_json::to_string(&response)
}

/// Answer requests from `input` until end of file
///
/// Blank lines are skipped.
///
/// # Errors
/// Returns an I/O error if reading a request or writing a response fails.
pub fn serve(extension: &mut Extension, input: impl BufRead, mut output: impl Write) -> std::io::Result<()> {
    tracing::debug!("Serving host requests");
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_json(extension, &line)?;
        writeln!(output, "{response}")?;
        output.flush()?;
    }
    tracing::debug!("Host closed the connection");
    Ok(())
}
