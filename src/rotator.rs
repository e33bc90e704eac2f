//! Periodic share rotation.
//!
//! A [`Rotator`] owns one worker thread that waits on a ticker and a stop
//! signal. On every tick it reads the current share set from storage,
//! produces a replacement set (full re-share or proactive refresh), and
//! writes it back under the same indices. Tick failures are reported
//! through the `log` facade and never terminate the worker; the next tick
//! starts fresh.
//!
//! External readers are not fenced: during a tick they may observe the old
//! set, the new set, or a mixture, but every individual frame they see is
//! internally consistent (valid header and CRC).

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Sender};
use log::{info, warn};

use crate::entropy::OsEntropy;
use crate::recovery::{store_shares, RecoveryError};
use crate::sss::{proactive_refresh, rotate, ShamirError};
use crate::storage::{ShareStore, StorageError};

/// Parameters for a [`Rotator`].
#[derive(Clone)]
pub struct RotatorConfig {
    /// Where the share set lives.
    pub storage: Arc<dyn ShareStore>,
    /// Reconstruction threshold t.
    pub threshold: u8,
    /// Total share count n.
    pub total_shares: u8,
    /// Time between ticks; must be nonzero.
    pub rotation_interval: Duration,
    /// If true, refresh share values in place; if false, reconstruct and
    /// re-share. Either way the secret value is unchanged.
    pub proactive_only: bool,
}

/// Configuration rejected by [`Rotator::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatorError {
    InvalidConfig(&'static str),
}

impl fmt::Display for RotatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotatorError::InvalidConfig(what) => write!(f, "invalid rotator config: {}", what),
        }
    }
}

impl std::error::Error for RotatorError {}

/// A single tick's failure, tagged with the stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickError {
    List(StorageError),
    Retrieve(StorageError),
    Refresh(ShamirError),
    Rotate(ShamirError),
    Store(RecoveryError),
    InsufficientShares { have: usize, need: u8 },
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickError::List(e) => write!(f, "list shares: {}", e),
            TickError::Retrieve(e) => write!(f, "retrieve shares: {}", e),
            TickError::Refresh(e) => write!(f, "proactive refresh: {}", e),
            TickError::Rotate(e) => write!(f, "full rotate: {}", e),
            TickError::Store(e) => write!(f, "store new shares: {}", e),
            TickError::InsufficientShares { have, need } => {
                write!(f, "not enough shares to operate: have {}, need {}", have, need)
            }
        }
    }
}

impl std::error::Error for TickError {}

/// Drives periodic rotation or refresh of a stored share set.
///
/// Lifecycle is single-start/single-stop: `start` spawns the worker,
/// `stop` signals it and joins. Calling `start` again while the worker is
/// running is a no-op; `stop` without a running worker is too.
pub struct Rotator {
    cfg: RotatorConfig,
    stop_tx: Option<Sender<()>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Rotator {
    /// Validates the configuration and builds an idle rotator.
    pub fn new(cfg: RotatorConfig) -> Result<Self, RotatorError> {
        if cfg.threshold < 2 {
            return Err(RotatorError::InvalidConfig("threshold must be at least 2"));
        }
        if cfg.total_shares < cfg.threshold {
            return Err(RotatorError::InvalidConfig(
                "total shares must be at least the threshold",
            ));
        }
        if cfg.rotation_interval.is_zero() {
            return Err(RotatorError::InvalidConfig(
                "rotation interval must be positive",
            ));
        }
        Ok(Self {
            cfg,
            stop_tx: None,
            worker: None,
        })
    }

    /// Starts the background worker.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let ticker = tick(self.cfg.rotation_interval);
        let cfg = self.cfg.clone();
        let handle = thread::spawn(move || loop {
            select! {
                recv(ticker) -> _ => {
                    match run_tick(&cfg) {
                        Ok(()) => info!(
                            "{}",
                            if cfg.proactive_only {
                                "refreshed share set"
                            } else {
                                "re-shared secret"
                            }
                        ),
                        Err(e) => warn!("share rotation failed: {}", e),
                    }
                }
                // Fires when `stop` drops the sender.
                recv(stop_rx) -> _ => return,
            }
        });
        self.stop_tx = Some(stop_tx);
        self.worker = Some(handle);
    }

    /// Signals the worker to cease and waits for it.
    ///
    /// An in-flight tick runs to completion; once `stop` returns, no
    /// further storage writes will come from this rotator.
    pub fn stop(&mut self) {
        self.stop_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    /// Performs one rotation cycle immediately, outside the timer.
    pub fn tick(&self) -> Result<(), TickError> {
        run_tick(&self.cfg)
    }
}

impl Drop for Rotator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One rotation cycle: read the set, rebuild it, write it back.
fn run_tick(cfg: &RotatorConfig) -> Result<(), TickError> {
    let indices = cfg.storage.list().map_err(TickError::List)?;
    if indices.len() < cfg.threshold as usize {
        return Err(TickError::InsufficientShares {
            have: indices.len(),
            need: cfg.threshold,
        });
    }

    let mut frames = Vec::with_capacity(indices.len());
    for &index in &indices {
        frames.push(cfg.storage.get(index).map_err(TickError::Retrieve)?);
    }

    let mut entropy = OsEntropy;
    let next = if cfg.proactive_only {
        proactive_refresh(&frames, cfg.threshold, cfg.total_shares, &mut entropy)
            .map_err(TickError::Refresh)?
    } else {
        rotate(&frames, cfg.threshold, cfg.total_shares, &mut entropy)
            .map_err(TickError::Rotate)?
    };

    store_shares(&next, cfg.storage.as_ref()).map_err(TickError::Store)?;
    Ok(())
}
