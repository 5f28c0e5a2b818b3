use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::ports::{Invocation, ProcessError, ProcessOutput, ProcessRunner};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs programs as real child processes
///
/// The child gets its working directory through `Command::current_dir`,
/// so this process's own current directory is never touched.
#[derive(Debug, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn spawn(invocation: &Invocation) -> Result<Child, ProcessError> {
        Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            // never block on a credential prompt nobody can answer
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: invocation.program.clone(),
                source,
            })
    }

    fn check_limits(&self, invocation: &Invocation, started: Instant) -> Result<(), ProcessError> {
        if invocation.is_cancelled() {
            tracing::warn!("cancelled {}", invocation.command_line());
            return Err(ProcessError::Cancelled {
                program: invocation.program.clone(),
            });
        }

        if let Some(limit) = self.timeout
            && started.elapsed() >= limit
        {
            tracing::warn!("timed out {}", invocation.command_line());
            return Err(ProcessError::TimedOut {
                program: invocation.program.clone(),
                seconds: limit.as_secs(),
            });
        }

        Ok(())
    }

    fn stop(child: &mut Child) {
        let _ = child.kill();
        let _ = child.wait();
    }
}

fn spawn_reader<R>(stream: R, sender: Sender<String>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buffer)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    if sender.send(line).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

fn drain(receiver: &Receiver<String>, lines: &mut Vec<String>) {
    lines.extend(receiver.try_iter());
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProcessError> {
        tracing::debug!(
            dir = %invocation.working_dir.display(),
            "running {}",
            invocation.command_line()
        );

        if invocation.is_cancelled() {
            return Err(ProcessError::Cancelled {
                program: invocation.program.clone(),
            });
        }

        let mut child = Self::spawn(invocation)?;

        let (sender, receiver) = mpsc::channel();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(stdout, sender.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(stderr, sender.clone()));
        }
        drop(sender);

        let started = Instant::now();
        let mut lines = Vec::new();

        let status = loop {
            drain(&receiver, &mut lines);

            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(source) => {
                    Self::stop(&mut child);
                    return Err(ProcessError::Io {
                        program: invocation.program.clone(),
                        source,
                    });
                }
            }

            if let Err(e) = self.check_limits(invocation, started) {
                Self::stop(&mut child);
                return Err(e);
            }

            match receiver.recv_timeout(POLL_INTERVAL) {
                Ok(line) => lines.push(line),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => thread::sleep(POLL_INTERVAL),
            }
        };

        // A grandchild may still hold the pipes open after the child exits
        loop {
            match receiver.recv_timeout(POLL_INTERVAL) {
                Ok(line) => lines.push(line),
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = self.check_limits(invocation, started) {
                        tracing::debug!("left {} reader(s) detached", readers.len());
                        return Err(e);
                    }
                }
            }
        }
        for reader in readers {
            let _ = reader.join();
        }

        let output = ProcessOutput::new(status.code().unwrap_or(-1), lines);
        tracing::debug!(
            exit_code = output.exit_code,
            "finished {}",
            invocation.command_line()
        );

        Ok(output)
    }
}
