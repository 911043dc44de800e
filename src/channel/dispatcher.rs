//! Runs the composer on its own thread.
//!
//! Calls are queued over an `mpsc` channel and handled one at a time in
//! submission order. Each call gets its own reply channel, so a caller can
//! block on [`PendingReply::wait`] or poll with [`PendingReply::try_take`]
//! while the decode and encode work happens elsewhere. Once a call is
//! picked up it runs to completion; there is no cancellation.

use super::command::MethodCall;
use super::composer::{Composer, Reply};
use crate::gallery::MediaStore;
use crate::imaging::ImageBackend;
use log::error;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

pub const DISPATCHER_CLOSED: &str = "DispatcherClosed";

type Job = (MethodCall, Sender<Reply>);

/// Handle to the worker thread.
///
/// Dropping it closes the queue and waits for queued calls to finish.
pub struct Dispatcher {
    jobs: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn spawn<B, S>(composer: Composer<B, S>) -> std::io::Result<Self>
    where
        B: ImageBackend + Send + 'static,
        S: MediaStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Job>();
        let worker = thread::Builder::new()
            .name("composer".to_string())
            .spawn(move || {
                for (call, reply_tx) in rx {
                    let reply = composer.handle_call(&call);
                    // The caller may have dropped its PendingReply; nothing to do then.
                    let _ = reply_tx.send(reply);
                }
            })?;

        Ok(Self {
            jobs: Some(tx),
            worker: Some(worker),
        })
    }

    /// Queue a call. The reply arrives on the returned handle.
    pub fn submit(&self, call: MethodCall) -> PendingReply {
        let (reply_tx, reply_rx) = mpsc::channel();
        if let Some(jobs) = &self.jobs {
            // On failure the job (and its reply sender) is dropped, which the
            // PendingReply reports as a closed dispatcher.
            let _ = jobs.send((call, reply_tx));
        }
        PendingReply { rx: reply_rx }
    }

    /// Stop accepting calls and wait for the queue to drain.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("composer worker panicked");
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The single reply to one submitted call.
pub struct PendingReply {
    rx: Receiver<Reply>,
}

fn closed_reply() -> Reply {
    Reply::error(DISPATCHER_CLOSED, "composer worker stopped before replying")
}

impl PendingReply {
    /// Block until the worker replies.
    pub fn wait(self) -> Reply {
        self.rx.recv().unwrap_or_else(|_| closed_reply())
    }

    /// Return the reply if it is ready, without blocking.
    pub fn try_take(&self) -> Option<Reply> {
        match self.rx.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(closed_reply()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::command::SAVE_IMAGE;
    use crate::config::ComposerConfig;
    use crate::gallery::tests::MemoryStore;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::MockBackend;
    use std::time::Duration;

    fn dispatcher(dims: Vec<Dimensions>) -> Dispatcher {
        let composer = Composer::new(
            MockBackend::with_dimensions(dims),
            MemoryStore::new(),
            ComposerConfig::default(),
        );
        Dispatcher::spawn(composer).unwrap()
    }

    #[test]
    fn replies_arrive_once_per_call() {
        let d = dispatcher(vec![
            Dimensions {
                width: 1,
                height: 1,
            },
            Dimensions {
                width: 2,
                height: 2,
            },
        ]);

        let first = d.submit(MethodCall::new(SAVE_IMAGE, &[("imagePath", "/a.jpg")]));
        let second = d.submit(MethodCall::new(SAVE_IMAGE, &[("imagePath", "/b.jpg")]));

        assert_eq!(
            first.wait(),
            Reply::Success {
                result: "/a.jpg".into()
            }
        );
        assert_eq!(
            second.wait(),
            Reply::Success {
                result: "/b.jpg".into()
            }
        );
    }

    #[test]
    fn save_produces_no_trailing_error() {
        let d = dispatcher(vec![Dimensions {
            width: 4,
            height: 4,
        }]);
        let pending = d.submit(MethodCall::new(SAVE_IMAGE, &[("imagePath", "/a.jpg")]));

        let reply = pending.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(reply.is_success());

        d.shutdown();
        // The worker dropped the reply sender without sending anything else.
        assert_eq!(pending.rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn unknown_method_goes_through_worker() {
        let d = dispatcher(vec![]);
        assert_eq!(
            d.submit(MethodCall::new("noSuchMethod", &[])).wait(),
            Reply::NotImplemented
        );
    }

    #[test]
    fn try_take_polls_until_ready() {
        let d = dispatcher(vec![Dimensions {
            width: 4,
            height: 4,
        }]);
        let pending = d.submit(MethodCall::new(SAVE_IMAGE, &[("imagePath", "/a.jpg")]));

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let reply = loop {
            if let Some(reply) = pending.try_take() {
                break reply;
            }
            assert!(std::time::Instant::now() < deadline, "no reply in time");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert!(reply.is_success());
    }

    #[test]
    fn closed_dispatcher_reports_instead_of_hanging() {
        let (tx, rx) = mpsc::channel::<Reply>();
        drop(tx);
        let pending = PendingReply { rx };
        assert!(matches!(
            pending.try_take(),
            Some(Reply::Error { code, .. }) if code == DISPATCHER_CLOSED
        ));
    }

    #[test]
    fn shutdown_drains_queue() {
        let d = dispatcher(vec![Dimensions {
            width: 4,
            height: 4,
        }]);
        let pending = d.submit(MethodCall::new(SAVE_IMAGE, &[("imagePath", "/a.jpg")]));
        d.shutdown();
        assert!(pending.wait().is_success());
    }
}
