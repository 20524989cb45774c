use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use nxtlink_lcp::LcpReader;
use nxtlink_transport::BrickStream;
use tracing::{debug, trace, warn};

use crate::notification::{Notification, NotificationSender};

/// State handed to the I/O worker thread.
pub(crate) struct WorkerContext {
    pub reader: LcpReader<BrickStream>,
    pub connected: Arc<AtomicBool>,
    pub last_reply: Arc<Mutex<Option<Bytes>>>,
    pub sink: Option<NotificationSender>,
}

/// Read frames until the connection goes away.
///
/// Every received telegram lands in the last-reply slot; classified
/// replies are additionally forwarded to the owner. On a read failure the
/// loop exits exactly once: silently when the teardown was deliberate,
/// with a receive-error notification otherwise.
pub(crate) fn run(mut ctx: WorkerContext) {
    while ctx.connected.load(Ordering::SeqCst) {
        match ctx.reader.read_frame() {
            Ok(frame) => {
                let payload = frame.payload;
                ctx.last_reply
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .replace(payload.clone());

                match nxtlink_lcp::classify(&payload) {
                    Some(kind) => {
                        debug!(?kind, len = payload.len(), "reply received");
                        if let Some(sink) = &ctx.sink {
                            let _ = sink.send(Notification::Reply {
                                kind,
                                frame: payload,
                            });
                        }
                    }
                    None => trace!(len = payload.len(), "unclassified frame dropped"),
                }
            }
            Err(err) => {
                if ctx.connected.swap(false, Ordering::SeqCst) {
                    warn!(%err, "receive failed");
                    if let Some(sink) = &ctx.sink {
                        let _ = sink.send(Notification::ReceiveError);
                    }
                }
                return;
            }
        }
    }
}
