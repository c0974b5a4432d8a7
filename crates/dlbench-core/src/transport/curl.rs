//! curl-backed transport: one Easy handle per attempt on a blocking thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::{TransferEvent, TransferTarget, Transport};

/// Response header carrying the intermediary cache status (set by e.g. an
/// nginx proxy_cache layer in front of the origin).
const CACHE_STATUS_HEADER: &str = "x-proxy-cache";
/// Reported when the intermediary sends no cache status header.
const CACHE_STATUS_UNKNOWN: &str = "UNKNOWN";

/// Downloads over HTTP with curl, counting bytes and discarding them (this
/// is a benchmark; the payload itself is not kept). Each `begin_transfer`
/// spawns one OS thread driving one Easy handle, emitting events into the
/// returned channel.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
}

impl CurlTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Transport for CurlTransport {
    fn begin_transfer(&self, target: &TransferTarget) -> mpsc::UnboundedReceiver<TransferEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let url = target.url.clone();
        let connect_timeout = self.connect_timeout;
        std::thread::spawn(move || {
            match perform(&url, connect_timeout, &tx) {
                Ok((final_bytes, cache_tag)) => {
                    let _ = tx.send(TransferEvent::Done {
                        final_bytes,
                        cache_tag,
                        at: Instant::now(),
                    });
                }
                Err(detail) => {
                    let _ = tx.send(TransferEvent::Failed {
                        detail,
                        at: Instant::now(),
                    });
                }
            }
        });
        rx
    }
}

/// Runs one GET, streaming cumulative progress events. Returns the final
/// byte count and the cache tag, or a failure detail string.
fn perform(
    url: &str,
    connect_timeout: Duration,
    tx: &mpsc::UnboundedSender<TransferEvent>,
) -> Result<(u64, String), String> {
    let bytes_loaded = Arc::new(AtomicU64::new(0));
    let bytes_total = Arc::new(AtomicU64::new(0));
    let cache_tag: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(|e| e.to_string())?;
    easy.follow_location(true).map_err(|e| e.to_string())?;
    easy.connect_timeout(connect_timeout)
        .map_err(|e| e.to_string())?;

    {
        let bytes_total = Arc::clone(&bytes_total);
        let cache_tag = Arc::clone(&cache_tag);
        easy.header_function(move |header| {
            if let Ok(line) = std::str::from_utf8(header) {
                if let Some((name, value)) = line.split_once(':') {
                    let value = value.trim();
                    if name.eq_ignore_ascii_case("content-length") {
                        if let Ok(len) = value.parse::<u64>() {
                            bytes_total.store(len, Ordering::Relaxed);
                        }
                    } else if name.eq_ignore_ascii_case(CACHE_STATUS_HEADER) {
                        let _ = cache_tag.lock().unwrap().replace(value.to_string());
                    }
                }
            }
            true
        })
        .map_err(|e| e.to_string())?;
    }

    {
        let mut transfer = easy.transfer();
        let loaded = Arc::clone(&bytes_loaded);
        let total = Arc::clone(&bytes_total);
        let progress_tx = tx.clone();
        transfer
            .write_function(move |data| {
                let cumulative =
                    loaded.fetch_add(data.len() as u64, Ordering::Relaxed) + data.len() as u64;
                let _ = progress_tx.send(TransferEvent::Progress {
                    bytes_loaded: cumulative,
                    bytes_total: total.load(Ordering::Relaxed),
                    at: Instant::now(),
                });
                Ok(data.len())
            })
            .map_err(|e| e.to_string())?;
        transfer.perform().map_err(|e| e.to_string())?;
    }

    let code = easy.response_code().map_err(|e| e.to_string())?;
    if !(200..300).contains(&code) {
        return Err(format!("HTTP {}", code));
    }

    let tag = cache_tag
        .lock()
        .unwrap()
        .take()
        .unwrap_or_else(|| CACHE_STATUS_UNKNOWN.to_string());
    Ok((bytes_loaded.load(Ordering::Relaxed), tag))
}
