//! A small pool of engine subprocesses, so the dispatch layer doesn't pay a
//! process spawn (and a fresh `dui` handshake) for every bot-authored turn.
//!
//! Checkout hands out an already-handshaken [`EngineProcess`]; return puts
//! it back unless it has exited, in which case a fresh one is spawned in
//! its place on the next checkout that needs it.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::Result;
use crate::process::EngineProcess;

/// How to (re)spawn an engine process for this pool.
#[derive(Clone)]
pub struct EngineSpec {
    pub program: String,
    pub args: Vec<String>,
}

pub struct EnginePool {
    spec: EngineSpec,
    idle: Mutex<Vec<Arc<EngineProcess>>>,
    capacity: usize,
}

impl EnginePool {
    pub fn new(spec: EngineSpec, capacity: usize) -> Self {
        EnginePool { spec, idle: Mutex::new(Vec::with_capacity(capacity)), capacity }
    }

    /// Hands out a ready process, reusing an idle one if any are alive.
    pub async fn checkout(&self) -> Result<Arc<EngineProcess>> {
        loop {
            let candidate = {
                let mut idle = self.idle.lock().await;
                idle.pop()
            };
            match candidate {
                Some(process) if !process.has_exited().await && process.is_healthy().await => return Ok(process),
                Some(_) => {
                    warn!(program = %self.spec.program, "dropping a dead or crashed pooled engine process");
                    continue;
                }
                None => {
                    info!(program = %self.spec.program, "spawning a new engine process for the pool");
                    let process = EngineProcess::spawn(&self.spec.program, &self.spec.args).await?;
                    return Ok(Arc::new(process));
                }
            }
        }
    }

    /// Returns a process to the idle set, up to `capacity`. Beyond that (or
    /// if it already exited or crashed out of a timed-out search) the
    /// process is simply dropped — `kill_on_drop` on the underlying child
    /// takes care of cleanup.
    pub async fn checkin(&self, process: Arc<EngineProcess>) {
        if process.has_exited().await || !process.is_healthy().await {
            return;
        }
        let mut idle = self.idle.lock().await;
        if idle.len() < self.capacity {
            idle.push(process);
        }
    }
}
