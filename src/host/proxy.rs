//! Single-owner call marshaling.
//!
//! A [`HostService`] owns a resource that may only be touched from one thread. Any number of
//! [`HostClient`]s, on any thread, can ask the owner to run a closure against the resource and
//! block until the result comes back. The owner drains a single-consumer job channel; each call
//! carries its own rendezvous channel for the reply.

use crate::foundation::error::{BorderError, BorderResult};
use std::sync::mpsc;

type Job<H> = Box<dyn FnOnce(&mut H) + Send>;

/// Owner side: holds the resource and executes marshaled calls.
pub struct HostService<H> {
    host: H,
    jobs: mpsc::Receiver<Job<H>>,
}

/// Caller side: cheap to clone, usable from any thread.
pub struct HostClient<H> {
    jobs: mpsc::Sender<Job<H>>,
}

impl<H> Clone for HostClient<H> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
        }
    }
}

impl<H: 'static> HostService<H> {
    /// Wrap `host` and return the service with its first client.
    pub fn new(host: H) -> (Self, HostClient<H>) {
        let (tx, rx) = mpsc::channel();
        (Self { host, jobs: rx }, HostClient { jobs: tx })
    }

    /// Dispatch calls until every client is dropped, then hand the resource back.
    ///
    /// Must run on the owner thread for as long as any client may call.
    pub fn run(mut self) -> H {
        let mut served = 0u64;
        while let Ok(job) = self.jobs.recv() {
            job(&mut self.host);
            served += 1;
        }
        tracing::debug!(served, "host service stopped");
        self.host
    }

    /// Run every call already queued without blocking; returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut n = 0;
        while let Ok(job) = self.jobs.try_recv() {
            job(&mut self.host);
            n += 1;
        }
        n
    }

    /// Borrow the resource from the owner thread.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutably borrow the resource from the owner thread.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: 'static> HostClient<H> {
    /// Run `f` on the owner thread and wait for its result.
    ///
    /// Blocks until the owner executes the call. Fails only when the service is gone.
    pub fn call<R, F>(&self, f: F) -> BorderResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut H) -> R + Send + 'static,
    {
        let (reply_tx, reply_rx) = mpsc::sync_channel::<R>(1);
        let job: Job<H> = Box::new(move |host| {
            // The caller may have given up; nothing to do then.
            let _ = reply_tx.send(f(host));
        });
        self.jobs
            .send(job)
            .map_err(|_| BorderError::host("host service is not running"))?;
        reply_rx
            .recv()
            .map_err(|_| BorderError::host("host service dropped the call before replying"))
    }

    /// Like [`HostClient::call`] for closures that already return a [`BorderResult`].
    pub fn try_call<R, F>(&self, f: F) -> BorderResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut H) -> BorderResult<R> + Send + 'static,
    {
        self.call(f)?
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/proxy.rs"]
mod tests;
