//! Cooperative frame delivery
//!
//! Frames go to the reply channel one at a time. Each delivery is awaited
//! before the next frame is produced, and a timed suspension follows every
//! frame of a typed reveal. The first failed delivery ends the loop: no
//! further frames are emitted and nothing is retried.

use crate::errors::ClearanceResult;
use crate::render::{Frame, Rendered};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};

/// Timed suspension between frames.
pub trait Pacer {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Never waits. For tests and offline simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    async fn pause(&self, _duration: Duration) {}
}

/// Where reply updates go. An error means the interaction is gone.
pub trait ReplyChannel {
    fn edit_reply(&mut self, frame: &Frame) -> impl Future<Output = ClearanceResult<()>> + Send;
}

/// Push every frame of `rendered` through `channel`, in order.
///
/// Returns the number of frames delivered.
pub async fn deliver<C, P>(
    rendered: Rendered,
    channel: &mut C,
    pacer: &P,
) -> ClearanceResult<usize>
where
    C: ReplyChannel,
    P: Pacer,
{
    let delay = rendered.frame_delay();
    let mut delivered = 0usize;

    for frame in rendered {
        if let Err(e) = channel.edit_reply(&frame).await {
            error!(delivered, error = %e, "reply delivery failed; abandoning remaining frames");
            return Err(e);
        }
        delivered += 1;

        if !delay.is_zero() {
            pacer.pause(delay).await;
        }
    }

    debug!(delivered, "reply delivered");
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClearanceError;
    use crate::render::{AllowedMentions, TypedReveal};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        frames: Vec<String>,
        fail_at: Option<usize>,
    }

    impl ReplyChannel for Recording {
        async fn edit_reply(&mut self, frame: &Frame) -> ClearanceResult<()> {
            if self.fail_at == Some(self.frames.len()) {
                return Err(ClearanceError::reply_channel("unknown interaction"));
            }
            self.frames.push(frame.text.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingPacer {
        pauses: Mutex<Vec<Duration>>,
    }

    impl Pacer for CountingPacer {
        async fn pause(&self, duration: Duration) {
            if let Ok(mut pauses) = self.pauses.lock() {
                pauses.push(duration);
            }
        }
    }

    fn reveal(text: &str) -> Rendered {
        Rendered::Reveal(TypedReveal::new(
            text,
            Duration::from_millis(300),
            None,
            AllowedMentions::none(),
        ))
    }

    #[tokio::test]
    async fn delivers_all_frames_in_order() {
        let mut channel = Recording::default();
        let pacer = CountingPacer::default();

        let count = deliver(reveal("abc"), &mut channel, &pacer).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(channel.frames, ["a", "ab", "abc"]);
        let pauses = pacer.pauses.lock().unwrap();
        assert_eq!(pauses.len(), 3);
        assert!(pauses.iter().all(|d| *d == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn stops_at_first_failed_delivery() {
        let mut channel = Recording {
            fail_at: Some(2),
            ..Default::default()
        };

        let result = deliver(reveal("abcdef"), &mut channel, &NoDelay).await;

        assert!(matches!(result, Err(ClearanceError::ReplyChannel { .. })));
        assert_eq!(channel.frames, ["a", "ab"]);
    }

    #[tokio::test]
    async fn static_frame_is_not_paced() {
        let mut channel = Recording::default();
        let pacer = CountingPacer::default();

        let count = deliver(Rendered::Static(Frame::plain("no")), &mut channel, &pacer)
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert!(pacer.pauses.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_pacer_spends_the_reveal_budget() {
        let mut channel = Recording::default();
        let start = tokio::time::Instant::now();

        deliver(reveal("abcd"), &mut channel, &TokioPacer).await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(310), "{elapsed:?}");
    }
}
