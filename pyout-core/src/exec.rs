use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::format::last_non_blank;

/// Hard wall-clock cap on a single interpreter run
pub const EXEC_TIMEOUT: Duration = Duration::from_millis(5000);

/// Interval between child liveness checks
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Message shown when the interpreter is killed at the deadline
pub const TIMEOUT_MESSAGE: &str = "Execution timed out";

/// Fallback when a failure produced no usable stderr
const GENERIC_ERROR: &str = "Execution error";

/// Immutable snapshot of the buffer, taken when the debouncer fires.
///
/// `seq` is the supersession token: results whose seq is no longer the
/// latest issued are dropped unseen.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub seq: u64,
}

impl EvaluationRequest {
    /// The program prefix: lines up to and including the cursor line
    pub fn code(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let end = self.cursor_line.min(self.lines.len() - 1);
        self.lines[..=end].join("\n")
    }
}

/// Outcome of one interpreter run
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_error: Option<String>,
    pub timed_out: bool,
    pub elapsed_ms: u64,
}

impl ExecutionResult {
    /// A failure that never reached the interpreter (scratch I/O, spawn)
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_error: Some(message.into()),
            timed_out: false,
            elapsed_ms: 0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.exit_error.is_some()
    }
}

/// Scratch file handed to the interpreter; removed on drop, so cleanup runs
/// on every exit path of an evaluation.
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn create(dir: &Path, code: &str) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(format!("pyout-{}.py", Uuid::new_v4()));
        fs::write(&path, code)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Runs program prefixes through the external interpreter
#[derive(Debug, Clone)]
pub struct Executor {
    interpreter: String,
    scratch_dir: PathBuf,
    timeout: Duration,
}

impl Executor {
    pub fn new(interpreter: impl Into<String>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            scratch_dir: scratch_dir.into(),
            timeout: EXEC_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the request's prefix program in the interpreter.
    ///
    /// Elapsed time is recorded on every outcome, spawn overhead included.
    pub fn execute(&self, request: &EvaluationRequest) -> Result<ExecutionResult> {
        let scratch = ScratchFile::create(&self.scratch_dir, &request.code())?;

        let start = Instant::now();
        let mut child = Command::new(&self.interpreter)
            .arg(scratch.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.interpreter))?;

        let stdout_reader = child.stdout.take().map(drain_pipe);
        let stderr_reader = child.stderr.take().map(drain_pipe);

        let deadline = start + self.timeout;
        let (status, timed_out) = loop {
            match child.try_wait().context("Failed to poll interpreter")? {
                Some(status) => break (Some(status), false),
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    break (None, true);
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };
        let elapsed_ms = (start.elapsed().as_secs_f64() * 1000.0).round() as u64;

        let stdout = stdout_reader
            .map(|h| h.join().unwrap_or_default())
            .unwrap_or_default();
        let stderr = stderr_reader
            .map(|h| h.join().unwrap_or_default())
            .unwrap_or_default();

        let exit_error = if timed_out {
            Some(TIMEOUT_MESSAGE.to_string())
        } else {
            derive_exit_error(&stderr, status)
        };

        Ok(ExecutionResult {
            stdout,
            stderr,
            exit_error,
            timed_out,
            elapsed_ms,
        })
    }
}

/// Drain a child pipe on its own thread so a full pipe never blocks the child
fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        let _ = pipe.read_to_string(&mut buf);
        buf
    })
}

/// Last non-blank stderr line, then the exit status, then a generic message
fn derive_exit_error(stderr: &str, status: Option<ExitStatus>) -> Option<String> {
    let failed = status.map(|s| !s.success()).unwrap_or(true);
    if stderr.trim().is_empty() && !failed {
        return None;
    }
    if let Some(line) = last_non_blank(stderr) {
        return Some(line.to_string());
    }
    match status {
        Some(status) => Some(format!("Interpreter exited with {}", status)),
        None => Some(GENERIC_ERROR.to_string()),
    }
}

/// A finished evaluation, tagged with its supersession token
struct Completion {
    seq: u64,
    line: usize,
    result: ExecutionResult,
}

/// Spawns evaluations on worker threads and delivers only the newest result.
///
/// Each spawn issues the next `seq` and records it as the latest; `poll`
/// drops completions whose seq is stale, so a superseded evaluation can
/// never overwrite the annotation of a newer one.
pub struct Evaluator {
    executor: Executor,
    next_seq: u64,
    latest_seq: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Evaluator {
    pub fn new(executor: Executor) -> Self {
        let (tx, rx) = channel();
        Self {
            executor,
            next_seq: 0,
            latest_seq: 0,
            tx,
            rx,
        }
    }

    /// Start an evaluation of `lines` truncated at `cursor_line`,
    /// superseding any still in flight
    pub fn spawn(&mut self, lines: Vec<String>, cursor_line: usize) {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest_seq = seq;

        let request = EvaluationRequest {
            lines,
            cursor_line,
            seq,
        };
        let executor = self.executor.clone();
        let tx = self.tx.clone();

        thread::spawn(move || {
            let result = executor
                .execute(&request)
                .unwrap_or_else(|e| ExecutionResult::fault(e.to_string()));
            let _ = tx.send(Completion {
                seq,
                line: request.cursor_line,
                result,
            });
        });
    }

    /// Drain finished evaluations; stale results are discarded
    pub fn poll(&mut self) -> Option<(usize, ExecutionResult)> {
        let mut newest = None;
        while let Ok(done) = self.rx.try_recv() {
            if done.seq == self.latest_seq {
                newest = Some((done.line, done.result));
            }
        }
        newest
    }
}
