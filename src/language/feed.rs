use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use super::{SessionKey, WordSupply};

/// Work the session asks of whoever owns the word supply
#[derive(Debug, Clone, PartialEq)]
pub enum SupplyRequest {
    /// Drop the shuffle in progress for this key
    Reset(SessionKey),
    Fetch {
        key: SessionKey,
        count: usize,
        /// Session generation the batch is meant for
        generation: u64,
    },
}

/// Words delivered back for a fetch request
#[derive(Debug, Clone, PartialEq)]
pub struct WordBatch {
    pub generation: u64,
    pub words: Vec<String>,
}

/// Executes supply requests on behalf of a session
pub trait WordFeed {
    fn submit(&mut self, request: SupplyRequest);
    /// Batches that completed since the last poll. Never blocks.
    fn poll(&mut self) -> Vec<WordBatch>;
}

fn serve(supply: &mut WordSupply, request: SupplyRequest) -> Option<WordBatch> {
    match request {
        SupplyRequest::Reset(key) => {
            supply.reset(key);
            None
        }
        SupplyRequest::Fetch {
            key,
            count,
            generation,
        } => Some(WordBatch {
            generation,
            words: supply.fetch_batch(key, count),
        }),
    }
}

/// Answers requests immediately on the caller's thread
pub struct InlineFeed {
    supply: WordSupply,
    ready: Vec<WordBatch>,
}

impl InlineFeed {
    pub fn new(supply: WordSupply) -> Self {
        Self {
            supply,
            ready: Vec::new(),
        }
    }

    pub fn supply(&self) -> &WordSupply {
        &self.supply
    }
}

impl WordFeed for InlineFeed {
    fn submit(&mut self, request: SupplyRequest) {
        if let Some(batch) = serve(&mut self.supply, request) {
            self.ready.push(batch);
        }
    }

    fn poll(&mut self) -> Vec<WordBatch> {
        std::mem::take(&mut self.ready)
    }
}

/// Runs the word supply on a worker thread so a slow word list never stalls a frame
pub struct ThreadedFeed {
    tx: Option<Sender<SupplyRequest>>,
    rx: Receiver<WordBatch>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadedFeed {
    pub fn new(mut supply: WordSupply) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<SupplyRequest>();
        let (batch_tx, batch_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            for request in request_rx {
                if let Some(batch) = serve(&mut supply, request) {
                    if batch_tx.send(batch).is_err() {
                        break;
                    }
                }
            }
            tracing::debug!("word feed worker stopped");
        });

        Self {
            tx: Some(request_tx),
            rx: batch_rx,
            worker: Some(worker),
        }
    }

    /// Block until the next batch arrives (tests and start-up)
    pub fn recv(&self) -> Option<WordBatch> {
        self.rx.recv().ok()
    }
}

impl WordFeed for ThreadedFeed {
    fn submit(&mut self, request: SupplyRequest) {
        if let Some(tx) = &self.tx {
            if tx.send(request).is_err() {
                tracing::warn!("word feed worker is gone, dropping request");
            }
        }
    }

    fn poll(&mut self) -> Vec<WordBatch> {
        let mut batches = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(batch) => batches.push(batch),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        batches
    }
}

impl Drop for ThreadedFeed {
    fn drop(&mut self) {
        // closing the request channel ends the worker loop
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
