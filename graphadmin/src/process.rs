// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Local database server process
//!
//! The server is launched in foreground ("console") mode and killed when the
//! console exits. Spawning does not wait for the server to accept connections;
//! callers that want that opt into `wait_until_reachable`.

use std::io::{BufRead, BufReader, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use url::Url;

use crate::error::{Error, Result};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);
const CONNECT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(500);
const DEFAULT_BOLT_PORT: u16 = 7687;

/// Anything the console can shut down on exit
pub trait ServerHandle {
    /// Forcibly stop the server
    fn terminate(&mut self) -> Result<()>;
}

/// A spawned server child process
pub struct ServerProcess {
    executable: PathBuf,
    child: Child,
    forwarders: Vec<JoinHandle<()>>,
    terminated: bool,
}

impl ServerProcess {
    /// Launch `<executable> <mode>` with captured output
    pub fn spawn(executable: &Path, mode: &str) -> Result<Self> {
        let mut child = Command::new(executable)
            .arg(mode)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::Process(format!("Failed to launch {}: {}", executable.display(), e))
            })?;

        let mut forwarders = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            forwarders.push(forward_lines(stdout, false));
        }
        if let Some(stderr) = child.stderr.take() {
            forwarders.push(forward_lines(stderr, true));
        }

        log::info!(
            "Started server {} {} (pid {})",
            executable.display(),
            mode,
            child.id()
        );

        Ok(Self {
            executable: executable.to_path_buf(),
            child,
            forwarders,
            terminated: false,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Whether the child has not exited yet
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl ServerHandle for ServerProcess {
    fn terminate(&mut self) -> Result<()> {
        if self.terminated {
            return Ok(());
        }

        match self.child.try_wait()? {
            Some(status) => {
                log::info!("Server already exited with {}", status);
            }
            None => {
                self.child
                    .kill()
                    .map_err(|e| Error::Process(format!("Failed to kill server: {}", e)))?;
                let status = self.child.wait()?;
                log::info!("Server pid {} terminated ({})", self.child.id(), status);
            }
        }
        self.terminated = true;

        // Launcher scripts may leave grandchildren holding the pipes open,
        // so the forwarders are detached rather than joined
        self.forwarders.clear();
        Ok(())
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        if let Err(e) = self.terminate() {
            log::warn!("Failed to terminate server on drop: {}", e);
        }
    }
}

fn forward_lines<R: Read + Send + 'static>(stream: R, is_stderr: bool) -> JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            match line {
                Ok(line) if is_stderr => log::warn!(target: "server", "{}", line),
                Ok(line) => log::debug!(target: "server", "{}", line),
                Err(_) => break,
            }
        }
    })
}

/// Extract `host:port` from a connection URI such as `bolt://localhost:7687`
pub fn socket_address(uri: &str) -> Result<String> {
    let parsed = if uri.contains("://") {
        Url::parse(uri)
    } else {
        Url::parse(&format!("bolt://{}", uri))
    }
    .map_err(|e| Error::Config(format!("Invalid URI '{}': {}", uri, e)))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => {
            Ok(format!("{}:{}", host, parsed.port().unwrap_or(DEFAULT_BOLT_PORT)))
        }
        _ => Err(Error::Config(format!("No host in URI '{}'", uri))),
    }
}

/// Poll until something accepts TCP connections at `uri`, or time out
pub fn wait_until_reachable(uri: &str, timeout: Duration) -> Result<()> {
    let address = socket_address(uri)?;
    let deadline = Instant::now() + timeout;
    log::info!("Waiting up to {:?} for {} to accept connections", timeout, address);

    loop {
        if resolve(&address)?
            .iter()
            .any(|addr| TcpStream::connect_timeout(addr, CONNECT_ATTEMPT_TIMEOUT).is_ok())
        {
            log::info!("{} is accepting connections", address);
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(Error::Process(format!(
                "Server at {} not reachable after {:?}",
                address, timeout
            )));
        }
        thread::sleep(READY_POLL_INTERVAL);
    }
}

fn resolve(address: &str) -> Result<Vec<SocketAddr>> {
    address
        .to_socket_addrs()
        .map(|addrs| addrs.collect())
        .map_err(|e| Error::Config(format!("Cannot resolve {}: {}", address, e)))
}
