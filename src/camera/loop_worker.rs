use std::sync::Arc;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{
    controller::CameraController,
    platform::{BarcodeDetector, MediaStream},
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Poll `detector` once per frame until a barcode turns up or the session ends.
///
/// Frames are strictly sequential: the next tick is only awaited after the
/// previous detection settled. Cancellation is checked before every frame and
/// while a detection is in flight, so a stopped session never writes a value.
pub async fn scan_loop(
    controller: CameraController,
    session_id: Uuid,
    detector: Arc<dyn BarcodeDetector>,
    stream: Arc<dyn MediaStream>,
    cancel_token: CancellationToken,
) {
    let frame_interval = controller.config().frame_interval();
    let mut frames = time::interval_at(Instant::now() + frame_interval, frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let deadline = controller
        .config()
        .scan_timeout()
        .map(|timeout| Instant::now() + timeout);
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("camera loop {} shutting down after {} frames", session_id, ticks);
                break;
            }
            _ = wait_until(deadline) => {
                controller.expire(session_id).await;
                break;
            }
            _ = frames.tick() => {}
        }

        ticks += 1;
        let detected = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("camera loop {} cancelled mid-frame", session_id);
                break;
            }
            result = detector.detect(stream.as_ref()) => result,
        };

        match detected {
            Ok(barcodes) => {
                if let Some(first) = barcodes.first() {
                    let value = first.raw_value.trim().to_string();
                    controller.complete(session_id, value).await;
                    break;
                }
            }
            // Transient; the next frame gets another try.
            Err(err) => log_debug!("frame {} detection failed: {}", ticks, err),
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
