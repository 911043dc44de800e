//! The two-command channel: `addOverlayToImage` and `saveImage`.
//!
//! | Piece | Role |
//! |---|---|
//! | [`MethodCall`] → [`Command`] | Untyped call decoded once into a typed command |
//! | [`Composer`] | Executes a command, produces exactly one [`Reply`] |
//! | [`Dispatcher`] | Runs the composer on a worker thread, FIFO |
//! | [`wire`] | JSON-lines transport used by `overlay-composer serve` |

mod command;
mod composer;
mod dispatcher;
pub mod wire;

pub use command::{
    ADD_OVERLAY_TO_IMAGE, ARG_IMAGE_PATH, ARG_OVERLAY_PATH, ChannelError, Command, MethodCall,
    SAVE_IMAGE,
};
pub use composer::{
    Composer, DECODE_EXCEPTION, FILE_NOT_FOUND, INVALID_ARGUMENTS, IO_EXCEPTION, Reply,
    SAVE_FAILED,
};
pub use dispatcher::{DISPATCHER_CLOSED, Dispatcher, PendingReply};
pub use wire::{Request, Response, ServeStats, serve};
