//! The handler behind the channel: runs a command and turns its outcome
//! into exactly one [`Reply`].

use super::command::{ChannelError, Command, MethodCall};
use crate::config::ComposerConfig;
use crate::gallery::MediaStore;
use crate::imaging::{BackendError, ImageBackend, SaveError, add_overlay_to_image, save_image};
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub const FILE_NOT_FOUND: &str = "FileNotFoundException";
pub const IO_EXCEPTION: &str = "IOException";
pub const DECODE_EXCEPTION: &str = "DecodeException";
pub const SAVE_FAILED: &str = "could not save image";
pub const INVALID_ARGUMENTS: &str = "InvalidArguments";

/// Terminal result of one method call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    Success { result: String },
    Error { code: String, message: String },
    NotImplemented,
}

impl Reply {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Reply::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success { .. })
    }
}

fn backend_error_reply(err: &BackendError) -> Reply {
    let code = match err {
        BackendError::NotFound { .. } => FILE_NOT_FOUND,
        BackendError::Io(_) | BackendError::Encode { .. } => IO_EXCEPTION,
        BackendError::Decode { .. } => DECODE_EXCEPTION,
    };
    Reply::error(code, err.to_string())
}

fn save_error_reply(err: &SaveError) -> Reply {
    Reply::error(SAVE_FAILED, format!("Could not save Image: {err}"))
}

/// Owns the backend, the gallery, and the config for its lifetime.
pub struct Composer<B, S> {
    backend: B,
    store: S,
    config: ComposerConfig,
}

impl<B: ImageBackend, S: MediaStore> Composer<B, S> {
    pub fn new(backend: B, store: S, config: ComposerConfig) -> Self {
        Self {
            backend,
            store,
            config,
        }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decode a raw call and execute it.
    pub fn handle_call(&self, call: &MethodCall) -> Reply {
        match Command::try_from(call) {
            Ok(command) => self.execute(&command),
            Err(ChannelError::UnknownMethod(method)) => {
                debug!("not implemented: {method}");
                Reply::NotImplemented
            }
            Err(e @ ChannelError::InvalidArgument(_)) => {
                Reply::error(INVALID_ARGUMENTS, e.to_string())
            }
        }
    }

    pub fn execute(&self, command: &Command) -> Reply {
        match command {
            Command::AddOverlayToImage {
                image_path,
                overlay_path,
            } => match add_overlay_to_image(
                &self.backend,
                image_path,
                overlay_path,
                &self.config.compose_config(),
            ) {
                Ok(outcome) => Reply::Success {
                    result: outcome.path.to_string_lossy().into_owned(),
                },
                Err(e) => {
                    error!("{} failed for {}: {}", command.method(), image_path.display(), e);
                    backend_error_reply(&e)
                }
            },
            Command::SaveImage { image_path } => match save_image(
                &self.backend,
                &self.store,
                image_path,
                &self.config.save_config(),
            ) {
                Ok(entry) => {
                    debug!("saved {} as {}", image_path.display(), entry.file_name);
                    Reply::Success {
                        result: image_path.to_string_lossy().into_owned(),
                    }
                }
                Err(e) => {
                    error!("{} failed for {}: {}", command.method(), image_path.display(), e);
                    save_error_reply(&e)
                }
            },
        }
    }
}
