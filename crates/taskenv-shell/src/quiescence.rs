use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, ChildStdout};

/// How long a single read attempt waits before we treat it as "no bytes
/// right now" and fall back to the out-of-band PID probe.
pub const GRACE_INTERVAL: Duration = Duration::from_millis(150);
const READ_BUF_SIZE: usize = 8192;

pub enum ReadOutcome {
    Data(Vec<u8>),
    NoBytes,
    Eof,
}

/// Read from whichever of stdout/stderr has data first, waiting at most
/// `GRACE_INTERVAL` before reporting `NoBytes`.
pub async fn read_chunk(stdout: &mut ChildStdout, stderr: &mut ChildStderr) -> ReadOutcome {
    let mut buf_out = [0u8; READ_BUF_SIZE];
    let mut buf_err = [0u8; READ_BUF_SIZE];
    tokio::select! {
        biased;
        res = stdout.read(&mut buf_out) => match res {
            Ok(0) => ReadOutcome::Eof,
            Ok(n) => ReadOutcome::Data(buf_out[..n].to_vec()),
            Err(_) => ReadOutcome::Eof,
        },
        res = stderr.read(&mut buf_err) => match res {
            Ok(0) => ReadOutcome::Eof,
            Ok(n) => ReadOutcome::Data(buf_err[..n].to_vec()),
            Err(_) => ReadOutcome::Eof,
        },
        _ = tokio::time::sleep(GRACE_INTERVAL) => ReadOutcome::NoBytes,
    }
}

pub enum QuiescenceOutcome {
    /// The read loop settled: here is everything it collected.
    Settled(String),
    /// `timeout` elapsed before the loop settled; this is everything
    /// collected up to that point.
    TimedOut(String),
}

/// Read from `stdout`/`stderr` until either `overall_timeout` elapses, or a
/// `GRACE_INTERVAL` passes with no new bytes *and* `no_children` reports
/// true (probed out-of-band, never by re-entering this pipe).
pub async fn read_until_quiescent<F, Fut>(
    stdout: &mut ChildStdout,
    stderr: &mut ChildStderr,
    overall_timeout: Duration,
    mut no_children: F,
) -> QuiescenceOutcome
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = Instant::now() + overall_timeout;
    let mut buffer = Vec::new();

    loop {
        if Instant::now() >= deadline {
            return QuiescenceOutcome::TimedOut(String::from_utf8_lossy(&buffer).into_owned());
        }
        match read_chunk(stdout, stderr).await {
            ReadOutcome::Data(bytes) => buffer.extend_from_slice(&bytes),
            ReadOutcome::Eof => {
                return QuiescenceOutcome::Settled(String::from_utf8_lossy(&buffer).into_owned());
            }
            ReadOutcome::NoBytes => {
                if no_children().await {
                    return QuiescenceOutcome::Settled(
                        String::from_utf8_lossy(&buffer).into_owned(),
                    );
                }
            }
        }
    }
}
