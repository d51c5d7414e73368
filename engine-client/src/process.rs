//! Drives one engine subprocess through the DUI handshake and `go` cycle.
//!
//! The subprocess's stdin/stdout is a line protocol; this
//! type owns the child, a writer half, and a background task that reads
//! stdout lines and classifies them, handing parsed replies back over an
//! unbounded channel so the caller can `await` just the reply it needs
//! without blocking on unrelated chatter (engines are free to interleave
//! `info` lines with their real answers).

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command as ProcessCommand};
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::dui::{Command, Reply};
use crate::error::{EngineError, Result};

/// How long a crashed or unresponsive engine is given to answer `stop`
/// before it's forcibly terminated.
const STOP_GRACE: Duration = Duration::from_secs(2);

/// Where a subprocess sits in the DUI handshake/search cycle.
/// `Ready` and `Searching` alternate for the life of a healthy process;
/// `Crashed` and `Closed` are terminal — a pool must not check either
/// back in for reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotStarted,
    Starting,
    Handshaking,
    Ready,
    Searching,
    Closed,
    Crashed,
}

/// A running engine subprocess, ready to receive [`Command`]s.
pub struct EngineProcess {
    child: Mutex<Child>,
    stdin_closed: Mutex<bool>,
    replies: Mutex<mpsc::UnboundedReceiver<Reply>>,
    program: String,
    state: Mutex<ProcessState>,
}

impl EngineProcess {
    /// Spawns `program` with `args` and completes the `dui`/`duiok`
    /// handshake. The returned process is ready for `isready`/`newgame`.
    pub async fn spawn(program: &str, args: &[String]) -> Result<Self> {
        let state = Mutex::new(ProcessState::Starting);
        let mut child = ProcessCommand::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        let stdout = child.stdout.take().expect("stdout was piped");
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let reply = Reply::parse(&line);
                        if tx.send(reply).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "engine stdout read failed");
                        break;
                    }
                }
            }
        });

        let process = EngineProcess {
            child: Mutex::new(child),
            stdin_closed: Mutex::new(false),
            replies: Mutex::new(rx),
            program: program.to_string(),
            state,
        };

        *process.state.lock().await = ProcessState::Handshaking;
        process.send(Command::Dui).await?;
        process.await_reply(|r| matches!(r, Reply::DuiOk), Duration::from_secs(5)).await?;
        *process.state.lock().await = ProcessState::Ready;
        Ok(process)
    }

    /// The process's current handshake/search state.
    pub async fn state(&self) -> ProcessState {
        *self.state.lock().await
    }

    /// Whether the process is in a state a pool may safely hand back out
    /// or check back in; false once it has crashed or been told to quit.
    pub async fn is_healthy(&self) -> bool {
        !matches!(self.state().await, ProcessState::Crashed | ProcessState::Closed)
    }

    /// Writes one command line to the subprocess's stdin.
    pub async fn send(&self, command: Command) -> Result<()> {
        let mut child = self.child.lock().await;
        let stdin = child.stdin.as_mut().ok_or_else(|| EngineError::Protocol("stdin already closed".into()))?;
        let line = format!("{}\n", command.to_line());
        stdin.write_all(line.as_bytes()).await.map_err(|e| EngineError::Io(e.to_string()))?;
        stdin.flush().await.map_err(|e| EngineError::Io(e.to_string()))?;
        Ok(())
    }

    /// Sends `isready` and waits for `readyok`, bounded by `deadline`.
    pub async fn wait_ready(&self, deadline: Duration) -> Result<()> {
        self.send(Command::IsReady).await?;
        self.await_reply(|r| matches!(r, Reply::ReadyOk), deadline).await
    }

    /// Sends `go` and waits for the engine's `bestorders` line, bounded by
    /// `deadline` — the remaining time on the seat's deadline, arming the
    /// engine's own `movetime` hint so a well-behaved engine returns before
    /// this crate's own timeout fires.
    ///
    /// On timeout, sends `stop` and gives the engine [`STOP_GRACE`] to
    /// answer; an engine that still doesn't respond is killed and marked
    /// [`ProcessState::Crashed`] so a pool never hands it back out. Either
    /// way the original deadline already elapsed, so the caller still
    /// sees [`EngineError::Timeout`].
    pub async fn go(&self, go: Command, deadline: Duration) -> Result<String> {
        *self.state.lock().await = ProcessState::Searching;
        self.send(go).await?;
        match self.await_reply(|r| matches!(r, Reply::BestOrders(_)), deadline).await {
            Ok(Reply::BestOrders(dson)) => {
                *self.state.lock().await = ProcessState::Ready;
                Ok(dson)
            }
            Ok(other) => unreachable!("await_reply only returns matches: {other:?}"),
            Err(EngineError::Timeout) => {
                self.recover_from_timeout().await;
                Err(EngineError::Timeout)
            }
            Err(other) => Err(other),
        }
    }

    async fn recover_from_timeout(&self) {
        warn!(program = %self.program, "engine missed its deadline, sending stop");
        let _ = self.send(Command::Stop).await;
        if self.await_reply(|r| matches!(r, Reply::BestOrders(_)), STOP_GRACE).await.is_ok() {
            *self.state.lock().await = ProcessState::Ready;
            return;
        }
        warn!(program = %self.program, "engine did not answer stop, killing it");
        let mut child = self.child.lock().await;
        let _ = child.start_kill();
        drop(child);
        *self.state.lock().await = ProcessState::Crashed;
    }

    /// Sends `stop`, asking an in-flight search to answer immediately.
    pub async fn stop(&self) -> Result<()> {
        self.send(Command::Stop).await
    }

    /// Sends `quit` and closes stdin; does not wait for the process to exit.
    pub async fn quit(&self) -> Result<()> {
        self.send(Command::Quit).await?;
        let mut closed = self.stdin_closed.lock().await;
        if !*closed {
            let mut child = self.child.lock().await;
            if let Some(stdin) = child.stdin.take() {
                drop(stdin);
            }
            *closed = true;
        }
        *self.state.lock().await = ProcessState::Closed;
        Ok(())
    }

    /// Whether the child process has exited, without blocking.
    pub async fn has_exited(&self) -> bool {
        let mut child = self.child.lock().await;
        let exited = matches!(child.try_wait(), Ok(Some(_)));
        drop(child);
        if exited {
            *self.state.lock().await = ProcessState::Crashed;
        }
        exited
    }

    async fn await_reply(&self, matches: impl Fn(&Reply) -> bool, deadline: Duration) -> Result<Reply> {
        let mut replies = self.replies.lock().await;
        let wait = async {
            loop {
                match replies.recv().await {
                    Some(reply) if matches(&reply) => return Ok(reply),
                    Some(reply) => {
                        debug!(program = %self.program, ?reply, "ignoring unrelated engine reply");
                        continue;
                    }
                    None => return Err(EngineError::Protocol("engine closed stdout".into())),
                }
            }
        };
        timeout(deadline, wait).await.map_err(|_| EngineError::Timeout)?
    }
}
