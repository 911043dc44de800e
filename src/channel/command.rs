//! Method calls as they arrive on the channel, and the typed commands they
//! become.
//!
//! A [`MethodCall`] is a method name plus a string-keyed argument map. It is
//! converted into a [`Command`] once, up front; everything downstream works
//! with typed paths and never looks arguments up by name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

pub const ADD_OVERLAY_TO_IMAGE: &str = "addOverlayToImage";
pub const SAVE_IMAGE: &str = "saveImage";

pub const ARG_IMAGE_PATH: &str = "imagePath";
pub const ARG_OVERLAY_PATH: &str = "overlayPath";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("missing or non-string argument: {0}")]
    InvalidArgument(&'static str),
}

/// A named invocation with string-keyed arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: &str, arguments: &[(&str, &str)]) -> Self {
        Self {
            method: method.to_string(),
            arguments: arguments
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        }
    }

    fn path_argument(&self, key: &'static str) -> Result<PathBuf, ChannelError> {
        self.arguments
            .get(key)
            .and_then(Value::as_str)
            .map(PathBuf::from)
            .ok_or(ChannelError::InvalidArgument(key))
    }
}

/// One variant per supported method, carrying its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddOverlayToImage {
        image_path: PathBuf,
        overlay_path: PathBuf,
    },
    SaveImage {
        image_path: PathBuf,
    },
}

impl Command {
    pub fn method(&self) -> &'static str {
        match self {
            Command::AddOverlayToImage { .. } => ADD_OVERLAY_TO_IMAGE,
            Command::SaveImage { .. } => SAVE_IMAGE,
        }
    }
}

impl TryFrom<&MethodCall> for Command {
    type Error = ChannelError;

    fn try_from(call: &MethodCall) -> Result<Self, Self::Error> {
        match call.method.as_str() {
            ADD_OVERLAY_TO_IMAGE => Ok(Command::AddOverlayToImage {
                image_path: call.path_argument(ARG_IMAGE_PATH)?,
                overlay_path: call.path_argument(ARG_OVERLAY_PATH)?,
            }),
            SAVE_IMAGE => Ok(Command::SaveImage {
                image_path: call.path_argument(ARG_IMAGE_PATH)?,
            }),
            other => Err(ChannelError::UnknownMethod(other.to_string())),
        }
    }
}
