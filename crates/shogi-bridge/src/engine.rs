//! USI engine process bridge.
//!
//! Each query spawns the engine, runs the handshake, asks for one move and
//! shuts the process down again. The engine is always told to `quit`, then
//! killed and reaped, whatever happened during the exchange.

use crate::config::BridgeConfig;
use shogi_core::Move;
use shogi_engine::Position;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, warn};
use usi::{EngineMessage, GoOptions, GuiCommand, Score};

/// `USI_Hash` in MB when choosing a move.
pub const SELECT_HASH_MB: u32 = 64;
/// `USI_Hash` in MB when evaluating.
pub const EVALUATE_HASH_MB: u32 = 16;

/// Stderr kept for diagnostics.
const STDERR_LIMIT: usize = 4096;
/// Time given to an engine that may be exiting on its own.
const EXIT_POLL: Duration = Duration::from_millis(50);
/// Time given to exit after `quit` before the process is killed.
const QUIT_GRACE: Duration = Duration::from_millis(100);
/// How long shutdown waits for the process to be reaped.
const REAP_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors from a single engine exchange.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("engine path is not configured")]
    NotConfigured,
    #[error("engine not found or not executable: {}", .0.display())]
    NotExecutable(PathBuf),
    #[error("failed to spawn engine: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("I/O error talking to engine: {0}")]
    Io(#[from] std::io::Error),
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
    #[error("engine exited while waiting for {0}")]
    UnexpectedExit(&'static str),
    #[error("engine reported no score")]
    NoScore,
}

impl BridgeError {
    /// True for problems found before any process was started.
    pub fn is_config_error(&self) -> bool {
        matches!(self, BridgeError::NotConfigured | BridgeError::NotExecutable(_))
    }
}

/// A failed query with whatever the process left behind.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct BridgeFailure {
    #[source]
    pub error: BridgeError,
    /// Captured stderr, if any.
    pub stderr: String,
    /// Exit code, if the process exited on its own.
    pub exit_code: Option<i32>,
}

impl BridgeFailure {
    fn new(error: BridgeError) -> Self {
        BridgeFailure {
            error,
            stderr: String::new(),
            exit_code: None,
        }
    }

    /// Best available explanation: stderr, then the spawn error, then the
    /// exit code, then the failure itself.
    pub fn detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        if let BridgeError::Spawn(e) = &self.error {
            return e.to_string();
        }
        if let Some(code) = self.exit_code {
            return format!("engine exited with code {}", code);
        }
        self.error.to_string()
    }
}

impl From<BridgeError> for BridgeFailure {
    fn from(error: BridgeError) -> Self {
        BridgeFailure::new(error)
    }
}

/// Movetime for move selection: `min(max(200, t) * max(1, depth - 4), 2000)`.
pub fn select_movetime(depth: u32, time_ms: u64) -> u64 {
    let time = time_ms.max(200);
    time.saturating_mul(depth_scale(depth)).min(2000)
}

/// Movetime for evaluation: `min(max(max(200, t) * max(2, scale), 2000), 5000)`.
pub fn evaluate_movetime(depth: u32, time_ms: u64) -> u64 {
    let time = time_ms.max(200);
    time.saturating_mul(depth_scale(depth).max(2)).clamp(2000, 5000)
}

fn depth_scale(depth: u32) -> u64 {
    u64::from(depth.saturating_sub(4).max(1))
}

/// Checks that `path` names an executable file.
fn check_executable(path: &Path) -> Result<(), BridgeError> {
    let meta = std::fs::metadata(path).map_err(|_| BridgeError::NotExecutable(path.to_path_buf()))?;
    if !meta.is_file() {
        return Err(BridgeError::NotExecutable(path.to_path_buf()));
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 == 0 {
            return Err(BridgeError::NotExecutable(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Spawns USI engine processes on demand.
#[derive(Debug, Clone)]
pub struct EngineBridge {
    path: Option<PathBuf>,
    handshake_timeout: Duration,
    bestmove_grace: Duration,
}

impl EngineBridge {
    pub fn new(config: &BridgeConfig) -> Self {
        EngineBridge {
            path: config.engine_path.clone(),
            handshake_timeout: config.handshake_timeout(),
            bestmove_grace: config.bestmove_grace(),
        }
    }

    /// The configured executable, verified.
    pub fn executable(&self) -> Result<&Path, BridgeError> {
        let path = self.path.as_deref().ok_or(BridgeError::NotConfigured)?;
        check_executable(path)?;
        Ok(path)
    }

    /// Asks the engine for a move. `Ok(None)` means it answered without one
    /// (`resign`, `win`, or something unparseable).
    pub async fn select_move(
        &self,
        position: &Position,
        depth: u32,
        time_ms: u64,
    ) -> Result<Option<Move>, BridgeFailure> {
        let movetime = select_movetime(depth, time_ms);
        let reply = self.query(position, SELECT_HASH_MB, movetime).await?;
        debug!(bestmove = %reply.bestmove, "engine answered");
        Ok(Move::from_usi(&reply.bestmove))
    }

    /// Asks the engine for a score: the last `info ... score` seen before
    /// `bestmove`, from the side to move's point of view.
    pub async fn evaluate(
        &self,
        position: &Position,
        depth: u32,
        time_ms: u64,
    ) -> Result<i32, BridgeFailure> {
        let movetime = evaluate_movetime(depth, time_ms);
        let reply = self.query(position, EVALUATE_HASH_MB, movetime).await?;
        match reply.score {
            Some(score) => Ok(score.to_value()),
            None => Err(BridgeFailure {
                error: BridgeError::NoScore,
                stderr: reply.stderr,
                exit_code: None,
            }),
        }
    }

    async fn query(
        &self,
        position: &Position,
        hash_mb: u32,
        movetime: u64,
    ) -> Result<Reply, BridgeFailure> {
        let exe = self.executable()?;
        let mut session = Session::spawn(exe).map_err(BridgeError::Spawn)?;

        let outcome = session
            .exchange(position, hash_mb, movetime, self.handshake_timeout, self.bestmove_grace)
            .await;
        let (exit_code, stderr) = session.shutdown().await;

        match outcome {
            Ok((bestmove, score)) => Ok(Reply {
                bestmove,
                score,
                stderr,
            }),
            Err(error) => {
                warn!(%error, exit_code, "engine exchange failed");
                Err(BridgeFailure {
                    error,
                    stderr,
                    exit_code,
                })
            }
        }
    }
}

struct Reply {
    bestmove: String,
    score: Option<Score>,
    stderr: String,
}

/// One running engine process.
struct Session {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Lines<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<String>>,
}

impl Session {
    fn spawn(exe: &Path) -> std::io::Result<Self> {
        let mut cmd = Command::new(exe);
        if let Some(dir) = exe.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let missing = |what| std::io::Error::new(std::io::ErrorKind::BrokenPipe, what);
        let stdin = child.stdin.take().ok_or_else(|| missing("engine stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| missing("engine stdout"))?;
        let stderr = child.stderr.take().map(|mut err| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 512];
                while let Ok(n) = err.read(&mut chunk).await {
                    if n == 0 {
                        break;
                    }
                    let room = STDERR_LIMIT.saturating_sub(buf.len());
                    buf.extend_from_slice(&chunk[..n.min(room)]);
                }
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        debug!(path = %exe.display(), pid = child.id(), "engine spawned");
        Ok(Session {
            child,
            stdin: Some(stdin),
            lines: BufReader::new(stdout).lines(),
            stderr,
        })
    }

    async fn send(&mut self, cmd: &GuiCommand) -> Result<(), BridgeError> {
        let line = cmd.to_usi();
        debug!(%line, "engine <");
        let stdin = self
            .stdin
            .as_mut()
            .ok_or(BridgeError::UnexpectedExit("stdin"))?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Reads lines until `f` accepts a message or the deadline passes.
    async fn wait_for<T>(
        &mut self,
        deadline: Instant,
        what: &'static str,
        mut f: impl FnMut(EngineMessage) -> Option<T>,
    ) -> Result<T, BridgeError> {
        loop {
            let line = match timeout_at(deadline, self.lines.next_line()).await {
                Err(_) => return Err(BridgeError::Timeout(what)),
                Ok(Err(e)) => return Err(e.into()),
                Ok(Ok(None)) => return Err(BridgeError::UnexpectedExit(what)),
                Ok(Ok(Some(line))) => line,
            };
            debug!(%line, "engine >");
            if let Some(value) = EngineMessage::parse(&line).and_then(&mut f) {
                return Ok(value);
            }
        }
    }

    async fn exchange(
        &mut self,
        position: &Position,
        hash_mb: u32,
        movetime: u64,
        handshake: Duration,
        grace: Duration,
    ) -> Result<(String, Option<Score>), BridgeError> {
        self.send(&GuiCommand::Usi).await?;
        self.wait_for(Instant::now() + handshake, "usiok", |msg| {
            matches!(msg, EngineMessage::UsiOk).then_some(())
        })
        .await?;

        self.send(&set_option("USI_Hash", hash_mb)).await?;
        self.send(&set_option("Threads", 1)).await?;
        self.send(&GuiCommand::IsReady).await?;
        self.wait_for(Instant::now() + handshake, "readyok", |msg| {
            matches!(msg, EngineMessage::ReadyOk).then_some(())
        })
        .await?;

        self.send(&GuiCommand::Position {
            sfen: Some(position.to_sfen()),
            moves: Vec::new(),
        })
        .await?;
        self.send(&GuiCommand::Go(GoOptions::movetime(movetime))).await?;

        let deadline = Instant::now() + Duration::from_millis(movetime) + grace;
        let mut last_score = None;
        let bestmove = self
            .wait_for(deadline, "bestmove", |msg| match msg {
                EngineMessage::Info(info) => {
                    if info.score.is_some() {
                        last_score = info.score;
                    }
                    None
                }
                EngineMessage::BestMove { mv, .. } => Some(mv),
                _ => None,
            })
            .await?;
        Ok((bestmove, last_score))
    }

    /// Sends `quit`, kills and reaps the process, and collects stderr.
    /// Returns the exit code if the process had already exited by itself.
    async fn shutdown(mut self) -> (Option<i32>, String) {
        let exited = match self.child.try_wait() {
            Ok(Some(status)) => Some(status),
            _ => timeout(EXIT_POLL, self.child.wait()).await.ok().and_then(Result::ok),
        };
        if exited.is_none() {
            let _ = self.send(&GuiCommand::Quit).await;
        }
        drop(self.stdin.take());

        if timeout(QUIT_GRACE, self.child.wait()).await.is_err() {
            let _ = self.child.start_kill();
            match timeout(REAP_TIMEOUT, self.child.wait()).await {
                Ok(Err(e)) => warn!("failed to reap engine: {}", e),
                Err(_) => warn!("engine did not exit after kill"),
                Ok(Ok(_)) => {}
            }
        }

        let stderr = match self.stderr.take() {
            Some(task) => match timeout(REAP_TIMEOUT, task).await {
                Ok(Ok(text)) => text,
                _ => String::new(),
            },
            None => String::new(),
        };
        (exited.and_then(|s| s.code()), stderr)
    }
}

fn set_option(name: &str, value: u32) -> GuiCommand {
    GuiCommand::SetOption {
        name: name.to_string(),
        value: Some(value.to_string()),
    }
}
