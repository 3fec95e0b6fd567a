//! A child process spoken to one line at a time.
//!
//! Each channel runs three tasks on the current tokio runtime:
//!
//! - a stdout reader that splits output into lines on the inbound queue
//! - a stdin writer draining the outbound queue
//! - an exit supervisor that owns the `Child`, reaps it, and kills it on
//!   request
//!
//! Writes never block the caller. A failed write asks the supervisor to
//! kill the process, after which the channel reports itself dead.

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{mpsc, watch};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use super::lines::LineSplitter;
use crate::error::ChannelError;

/// What the reader hands the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Inbound {
    Line(String),
    /// No more lines will follow from a live process.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liveness {
    Running,
    /// `None` when the status could not be collected.
    Exited(Option<ExitStatus>),
}

/// Line-oriented connection to one child process.
#[derive(Debug)]
pub struct ProcessChannel {
    command: String,
    pid: Option<u32>,
    inbound: mpsc::UnboundedReceiver<Inbound>,
    inbound_tx: mpsc::UnboundedSender<Inbound>,
    outbound: Option<mpsc::UnboundedSender<String>>,
    kill_tx: mpsc::UnboundedSender<()>,
    liveness: watch::Receiver<Liveness>,
    death_noted: bool,
    eof: bool,
}

impl ProcessChannel {
    /// Start `command` in the current directory.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(command: &str) -> Result<Self, ChannelError> {
        Self::start_in(command, None)
    }

    /// Start `command`, split into words like a POSIX shell would, with
    /// an optional working directory. No shell is involved.
    pub fn start_in(command: &str, cwd: Option<&Path>) -> Result<Self, ChannelError> {
        let argv = shlex::split(command).ok_or_else(|| ChannelError::Unparsable {
            command: command.to_string(),
        })?;
        let (program, args) = argv.split_first().ok_or(ChannelError::EmptyCommand)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let launch_error = |source: io::Error| ChannelError::Launch {
            command: command.to_string(),
            source,
        };
        let mut child = cmd.spawn().map_err(launch_error)?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| launch_error(io::Error::other("stdin was not captured")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| launch_error(io::Error::other("stdout was not captured")))?;
        let pid = child.id();

        let (inbound_tx, inbound) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = mpsc::unbounded_channel();
        let (liveness_tx, liveness) = watch::channel(Liveness::Running);

        tokio::spawn(pump_stdout(stdout, inbound_tx.clone()));
        tokio::spawn(pump_stdin(stdin, outbound_rx, kill_tx.clone()));
        tokio::spawn(supervise(child, kill_rx, liveness_tx));

        debug!(command, pid, "process started");
        Ok(Self {
            command: command.to_string(),
            pid,
            inbound,
            inbound_tx,
            outbound: Some(outbound_tx),
            kill_tx,
            liveness,
            death_noted: false,
            eof: false,
        })
    }

    /// The command line this channel was started with.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Queue one line for the child's stdin. `line` must not contain a
    /// newline; one is appended.
    pub fn write_line(&mut self, line: &str) -> Result<(), ChannelError> {
        if !self.is_alive() {
            return Err(ChannelError::Closed);
        }
        let outbound = self.outbound.as_ref().ok_or(ChannelError::Closed)?;
        outbound
            .send(line.to_string())
            .map_err(|_| ChannelError::Closed)
    }

    /// Next line, waiting at most `timeout`.
    pub async fn read_line(&mut self, timeout: Duration) -> Option<String> {
        self.read_line_by(Instant::now() + timeout).await
    }

    /// Next line, waiting until `deadline`.
    ///
    /// `None` on timeout or once the process has gone away. Lines already
    /// queued are returned even if the deadline has passed.
    pub async fn read_line_by(&mut self, deadline: Instant) -> Option<String> {
        self.is_alive();
        if self.eof {
            return self.try_read_line();
        }
        match timeout_at(deadline, self.inbound.recv()).await {
            Ok(Some(Inbound::Line(line))) => Some(line),
            Ok(Some(Inbound::Closed) | None) => {
                self.eof = true;
                self.try_read_line()
            }
            Err(_) => None,
        }
    }

    /// Next line if one is already queued.
    pub fn try_read_line(&mut self) -> Option<String> {
        loop {
            match self.inbound.try_recv() {
                Ok(Inbound::Line(line)) => return Some(line),
                Ok(Inbound::Closed) => self.eof = true,
                Err(_) => return None,
            }
        }
    }

    /// Whether the process is still running.
    ///
    /// The first call to observe the exit wakes any pending reader.
    pub fn is_alive(&mut self) -> bool {
        let running = *self.liveness.borrow() == Liveness::Running;
        if !running && !self.death_noted {
            self.death_noted = true;
            let _ = self.inbound_tx.send(Inbound::Closed);
        }
        running
    }

    /// No further lines can arrive: the process exited or closed its
    /// stdout.
    pub fn is_finished(&mut self) -> bool {
        !self.is_alive() || self.eof
    }

    /// Exit status, if the process has exited and it could be collected.
    #[must_use]
    pub fn exit_status(&self) -> Option<ExitStatus> {
        match *self.liveness.borrow() {
            Liveness::Exited(status) => status,
            Liveness::Running => None,
        }
    }

    /// Stop the process with `SIGSTOP`.
    pub fn suspend(&mut self) {
        #[cfg(unix)]
        self.signal(nix::sys::signal::Signal::SIGSTOP);
    }

    /// Continue a suspended process with `SIGCONT`.
    pub fn resume(&mut self) {
        #[cfg(unix)]
        self.signal(nix::sys::signal::Signal::SIGCONT);
    }

    #[cfg(unix)]
    fn signal(&mut self, signal: nix::sys::signal::Signal) {
        use nix::unistd::Pid;

        if !self.is_alive() {
            return;
        }
        let Some(pid) = self.pid.and_then(|pid| i32::try_from(pid).ok()) else {
            return;
        };
        if let Err(err) = nix::sys::signal::kill(Pid::from_raw(pid), signal) {
            debug!(pid, %signal, %err, "signal not delivered");
        }
    }

    /// Kill the process and wait until it has been reaped.
    ///
    /// Returns the exit status when known. Safe to call repeatedly.
    pub async fn kill(&mut self) -> Option<ExitStatus> {
        self.outbound.take();
        let _ = self.kill_tx.send(());
        let exited = self
            .liveness
            .wait_for(|state| *state != Liveness::Running)
            .await
            .map(|state| *state);
        self.is_alive();
        match exited {
            Ok(Liveness::Exited(status)) => status,
            _ => None,
        }
    }
}

async fn pump_stdout(mut stdout: ChildStdout, inbound: mpsc::UnboundedSender<Inbound>) {
    let mut splitter = LineSplitter::new();
    let mut buf = [0u8; 4096];
    loop {
        match stdout.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                for line in splitter.push(&buf[..n]) {
                    if inbound.send(Inbound::Line(line)).is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                debug!(%err, "stdout read failed");
                break;
            }
        }
    }
    if let Some(line) = splitter.finish() {
        let _ = inbound.send(Inbound::Line(line));
    }
    let _ = inbound.send(Inbound::Closed);
}

async fn pump_stdin(
    mut stdin: ChildStdin,
    mut outbound: mpsc::UnboundedReceiver<String>,
    kill: mpsc::UnboundedSender<()>,
) {
    while let Some(line) = outbound.recv().await {
        if let Err(err) = write_line(&mut stdin, line).await {
            warn!(%err, "write to bot failed, killing it");
            let _ = kill.send(());
            return;
        }
    }
}

async fn write_line(stdin: &mut ChildStdin, line: String) -> io::Result<()> {
    let mut bytes = line.into_bytes();
    bytes.push(b'\n');
    stdin.write_all(&bytes).await?;
    stdin.flush().await
}

/// Own the child until it exits. Any kill request, or every handle to the
/// channel going away, kills it.
async fn supervise(
    mut child: Child,
    mut kill: mpsc::UnboundedReceiver<()>,
    liveness: watch::Sender<Liveness>,
) {
    let pid = child.id();
    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill.recv() => {
            if let Err(err) = child.start_kill() {
                debug!(%err, "kill failed");
            }
            child.wait().await
        }
    };

    let status = match status {
        Ok(status) => {
            debug!(pid, %status, "process exited");
            Some(status)
        }
        Err(err) => {
            warn!(%err, "could not collect exit status");
            None
        }
    };
    let _ = liveness.send(Liveness::Exited(status));
}
