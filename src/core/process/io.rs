// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks
//!   mpsc channels buffer lines
//!   wait
//!   --> ProcessOutput { command, exit_code, stdout, stderr }
//! ```

use crate::error::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};

/// Spawns a reader task for one stream if anything wants its lines.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
    tx: mpsc::UnboundedSender<String>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    let name = process_name.to_string();
    stream.map(|stream| {
        tokio::spawn(async move {
            read_stream(stream, flags, &name, stream_name, tx).await;
        })
    })
}

/// Collects output from a channel into a string.
fn collect_output(rx: &mut mpsc::UnboundedReceiver<String>, flags: StreamFlags) -> String {
    if !flags.contains(StreamFlags::KEEP_IN_STRING) {
        return String::new();
    }
    let mut output = String::new();
    while let Ok(line) = rx.try_recv() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&line);
    }
    output
}

/// Waits for reader tasks to complete.
async fn await_readers(handles: [Option<JoinHandle<()>>; 2]) {
    for handle in handles.into_iter().flatten() {
        let _ = handle.await;
    }
}

impl ProcessBuilder {
    /// Runs the child process, streaming its output and waiting for exit.
    pub(super) async fn run_child(
        &self,
        name: &str,
        command_line: &str,
        child: &mut Child,
    ) -> Result<ProcessOutput> {
        let (stdout_tx, mut stdout_rx) = mpsc::unbounded_channel::<String>();
        let (stderr_tx, mut stderr_rx) = mpsc::unbounded_channel::<String>();

        let stdout_handle = spawn_reader(
            child.stdout.take(),
            self.stdout_config(),
            name,
            "stdout",
            stdout_tx,
        );
        let stderr_handle = spawn_reader(
            child.stderr.take(),
            self.stderr_config(),
            name,
            "stderr",
            stderr_tx,
        );

        let exit_status = child.wait().await?;

        await_readers([stdout_handle, stderr_handle]).await;

        Ok(ProcessOutput::new(
            command_line,
            exit_status.code().unwrap_or(-1),
            collect_output(&mut stdout_rx, self.stdout_config()),
            collect_output(&mut stderr_rx, self.stderr_config()),
        ))
    }
}

/// Reads from a stream line by line.
///
/// Invalid UTF-8 ends the stream early; git and gh both write UTF-8.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &str,
    tx: mpsc::UnboundedSender<String>,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if flags.contains(StreamFlags::FORWARD_TO_LOG) {
            trace!(process = %process_name, stream = %stream_name, line = %line, "output");
        }
        if flags.contains(StreamFlags::KEEP_IN_STRING) {
            let _ = tx.send(line);
        }
    }
}
