//! Background spectrum worker.
//!
//! Requests and responses are moved across channels; the worker never shares
//! state with the host. The host keeps the set of ids it still cares about
//! and silently drops any response outside it, so a late result can never
//! overwrite a newer one.
//!
//! Dropping the worker detaches its thread: the host does not wait for a
//! running computation, whose result is discarded. Use
//! [`SpectralWorker::shutdown`] to wait for the thread instead.

use std::collections::BTreeSet;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TryRecvError, TrySendError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use runtime::WorkQueue;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SpectralError;
use crate::image::RasterImage;
use crate::palette::Palette;
use crate::protocol::{RequestId, WorkerRequest, WorkerResponse};
use crate::spectrum::{DEFAULT_MAX_SIDE, render_spectrum};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Bound of both the request channel and the worker's pending queue.
    /// `submit` fails with `QueueFull` when the channel is full; a request
    /// that overflows the pending queue comes back as an `ERROR` response.
    pub queue_capacity: usize,
    /// Largest padded spectrum side; larger requests get an `ERROR` response.
    pub max_side: usize,
    pub palette: Palette,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 8,
            max_side: DEFAULT_MAX_SIDE,
            palette: Palette::default(),
        }
    }
}

pub struct SpectralWorker {
    requests: Option<SyncSender<WorkerRequest>>,
    responses: Receiver<WorkerResponse>,
    interested: BTreeSet<RequestId>,
    handle: Option<JoinHandle<()>>,
}

impl SpectralWorker {
    pub fn spawn(config: WorkerConfig) -> Self {
        let config = WorkerConfig {
            queue_capacity: config.queue_capacity.max(1),
            ..config
        };
        let (req_tx, req_rx) = mpsc::sync_channel(config.queue_capacity);
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = match std::thread::Builder::new()
            .name("spectral-worker".to_string())
            .spawn(move || run(req_rx, resp_tx, config))
        {
            Ok(handle) => Some(handle),
            Err(err) => {
                // The request receiver died with the closure; sends report WorkerGone.
                warn!("failed to spawn spectral worker thread: {err}");
                None
            }
        };
        Self {
            requests: Some(req_tx),
            responses: resp_rx,
            interested: BTreeSet::new(),
            handle,
        }
    }

    fn send(&self, request: WorkerRequest) -> Result<(), SpectralError> {
        let tx = self.requests.as_ref().ok_or(SpectralError::WorkerGone)?;
        tx.try_send(request).map_err(|e| match e {
            TrySendError::Full(_) => SpectralError::QueueFull,
            TrySendError::Disconnected(_) => SpectralError::WorkerGone,
        })
    }

    /// Queues a computation. Resubmitting an id supersedes nothing: the first
    /// response carrying the id is delivered and later ones are dropped.
    pub fn submit(&mut self, id: RequestId, image: RasterImage) -> Result<(), SpectralError> {
        self.send(WorkerRequest::Compute {
            image,
            id: id.clone(),
        })?;
        self.interested.insert(id);
        Ok(())
    }

    /// Stops caring about `id` and asks the worker to drop it if it has not
    /// started. Returns `true` if the id was in flight.
    pub fn cancel(&mut self, id: &RequestId) -> bool {
        let was_interested = self.forget(id);
        if was_interested && let Err(err) = self.send(WorkerRequest::Cancel { id: id.clone() }) {
            debug!(%id, "cancel not delivered ({err}); response will be ignored");
        }
        was_interested
    }

    /// Stops caring about `id` without telling the worker.
    pub fn forget(&mut self, id: &RequestId) -> bool {
        self.interested.remove(id)
    }

    pub fn in_flight(&self) -> usize {
        self.interested.len()
    }

    fn accept(&mut self, response: WorkerResponse) -> Option<WorkerResponse> {
        if self.interested.remove(response.id()) {
            Some(response)
        } else {
            debug!(id = %response.id(), "dropping late spectral response");
            None
        }
    }

    /// Non-blocking: every response that arrived since the last call and is
    /// still of interest.
    pub fn poll(&mut self) -> Vec<WorkerResponse> {
        let mut out = Vec::new();
        loop {
            match self.responses.try_recv() {
                Ok(response) => out.extend(self.accept(response)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Blocks up to `timeout` for the next response of interest.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<WorkerResponse, SpectralError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.responses.recv_timeout(remaining) {
                Ok(response) => {
                    if let Some(r) = self.accept(response) {
                        return Ok(r);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Err(SpectralError::Timeout),
                Err(RecvTimeoutError::Disconnected) => return Err(SpectralError::WorkerGone),
            }
        }
    }
}

impl SpectralWorker {
    /// Closes the request channel and waits for the thread to exit. A
    /// computation already running is finished first; queued ones are not.
    pub fn shutdown(mut self) {
        self.requests = None;
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("spectral worker thread panicked");
        }
    }
}

impl Drop for SpectralWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop; the thread is
        // left to finish on its own.
        self.requests = None;
        self.handle = None;
    }
}

fn run(
    requests: Receiver<WorkerRequest>,
    responses: Sender<WorkerResponse>,
    config: WorkerConfig,
) {
    let mut queue: WorkQueue<(RequestId, RasterImage)> =
        WorkQueue::with_max_len(config.queue_capacity);
    let mut closed = false;

    loop {
        if queue.is_empty() {
            if closed {
                break;
            }
            match requests.recv() {
                Ok(request) => {
                    if !enqueue(&mut queue, request, &responses) {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        while !closed {
            match requests.try_recv() {
                Ok(request) => {
                    if !enqueue(&mut queue, request, &responses) {
                        closed = true;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => closed = true,
            }
        }
        if closed {
            // Host is gone; nobody is left to read results.
            break;
        }

        let Some((_, _, (id, image))) = queue.pop_next() else {
            continue;
        };
        debug!(%id, width = image.width, height = image.height, "computing spectrum");
        let response = match render_spectrum(&image, &config.palette, config.max_side) {
            Ok(result) => WorkerResponse::Result { result, id },
            Err(err) => WorkerResponse::Error {
                error: err.to_string(),
                id,
            },
        };
        if responses.send(response).is_err() {
            break;
        }
    }
}

/// Returns `false` once the host has stopped listening.
fn enqueue(
    queue: &mut WorkQueue<(RequestId, RasterImage)>,
    request: WorkerRequest,
    responses: &Sender<WorkerResponse>,
) -> bool {
    match request {
        WorkerRequest::Compute { image, id } => {
            if let Err(full) = queue.try_push(0, (id.clone(), image)) {
                debug!(%id, "rejecting spectrum request: {full}");
                let error = WorkerResponse::Error {
                    error: SpectralError::QueueFull.to_string(),
                    id,
                };
                return responses.send(error).is_ok();
            }
        }
        WorkerRequest::Cancel { id } => {
            let dropped = queue.cancel_where(|(queued, _)| *queued == id);
            debug!(%id, dropped, "cancel request");
        }
    }
    true
}
