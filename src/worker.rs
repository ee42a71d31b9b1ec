//! Channel front-end hosting one dispatcher per worker instance.

use crate::dispatcher::Dispatcher;
use crate::error::WorkerError;
use crate::message::{Request, Response};
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 64;

/// Handle to a running dispatch worker.
///
/// The worker is a dedicated OS thread owning a [`Dispatcher`]; the engine
/// handles never leave that thread. Requests are processed strictly in
/// receipt order and every request yields exactly one response, so the
/// response stream order matches the request send order.
pub struct WorkerHandle {
    requests: mpsc::Sender<Request>,
    responses: mpsc::Receiver<Response>,
    thread: thread::JoinHandle<()>,
}

impl WorkerHandle {
    /// Start a worker with an empty session registry.
    pub fn spawn() -> Self {
        let (request_tx, mut request_rx) = mpsc::channel::<Request>(CHANNEL_CAPACITY);
        let (response_tx, response_rx) = mpsc::channel::<Response>(CHANNEL_CAPACITY);
        let thread = thread::spawn(move || {
            let mut dispatcher = Dispatcher::new();
            debug!("sqlite worker started");
            while let Some(request) = request_rx.blocking_recv() {
                let response = dispatcher.dispatch(request);
                if response_tx.blocking_send(response).is_err() {
                    break;
                }
            }
            debug!("sqlite worker stopped");
        });
        Self {
            requests: request_tx,
            responses: response_rx,
            thread,
        }
    }

    /// Enqueue a request for the worker.
    pub async fn send(&self, request: Request) -> Result<(), WorkerError> {
        self.requests
            .send(request)
            .await
            .map_err(|_| WorkerError::Closed)
    }

    /// Next response, in completion order. `None` once the worker is gone.
    pub async fn recv(&mut self) -> Option<Response> {
        self.responses.recv().await
    }

    /// Send one request and await its response.
    ///
    /// Responses arrive in request order, so with a single sequential
    /// caller the next response is always the matching one.
    pub async fn request(&mut self, request: Request) -> Result<Response, WorkerError> {
        self.send(request).await?;
        self.recv().await.ok_or(WorkerError::Closed)
    }

    /// Close the inbound channel and wait for the worker thread to exit.
    pub fn shutdown(self) {
        let Self {
            requests,
            responses,
            thread,
        } = self;
        drop(requests);
        drop(responses);
        if thread.join().is_err() {
            warn!("sqlite worker thread panicked");
        }
    }
}
