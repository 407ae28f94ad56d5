//! Cooperative wait primitives.
//!
//! Every wait in the engine is bounded. Waits suspend on tokio's timer so
//! tests can drive them on paused virtual time.

use std::future::Future;
use std::time::Duration;

use jobfill_protocols::{Page, PageError};
use tokio::time::{Instant, sleep, timeout};
use tracing::debug;

/// How a quiet-period wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quiet {
    /// No mutation was observed for the whole stability window.
    Settled,
    /// The overall bound elapsed first.
    TimedOut,
}

/// Await `fut` for at most `deadline`. `None` when the deadline elapsed.
pub async fn await_with_deadline<T, F>(deadline: Duration, fut: F) -> Option<T>
where
    F: Future<Output = T>,
{
    timeout(deadline, fut).await.ok()
}

/// Wait until the page's mutation epoch stays unchanged for `stable`,
/// giving up after `bound`.
pub async fn wait_for_quiet(
    page: &dyn Page,
    bound: Duration,
    stable: Duration,
    poll: Duration,
) -> Result<Quiet, PageError> {
    let start = Instant::now();
    let mut epoch = page.mutation_epoch().await?;
    let mut quiet_since = Instant::now();

    loop {
        if quiet_since.elapsed() >= stable {
            debug!("DOM quiet after {:?}", start.elapsed());
            return Ok(Quiet::Settled);
        }
        if start.elapsed() >= bound {
            debug!("DOM still mutating after {:?}", bound);
            return Ok(Quiet::TimedOut);
        }
        sleep(poll).await;
        let current = page.mutation_epoch().await?;
        if current != epoch {
            epoch = current;
            quiet_since = Instant::now();
        }
    }
}

/// Poll `probe` every `poll` until it yields a value or `bound` elapses.
pub(crate) async fn poll_until<T, F, Fut>(
    bound: Duration,
    poll: Duration,
    mut probe: F,
) -> Result<Option<T>, PageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, PageError>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }
        if start.elapsed() >= bound {
            return Ok(None);
        }
        sleep(poll).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    #[tokio::test(start_paused = true)]
    async fn test_await_with_deadline_completes() {
        let value = await_with_deadline(Duration::from_secs(1), async { 7 }).await;
        assert_eq!(value, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_await_with_deadline_expires() {
        let value = await_with_deadline(Duration::from_millis(100), async {
            sleep(Duration::from_secs(5)).await;
            7
        })
        .await;
        assert_eq!(value, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_quiet_settles_on_static_page() {
        let page = FakePage::new();
        let start = Instant::now();
        let quiet = wait_for_quiet(
            &page,
            Duration::from_secs(3),
            Duration::from_millis(500),
            Duration::from_millis(100),
        )
        .await
        .unwrap();
        assert_eq!(quiet, Quiet::Settled);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_quiet_times_out_on_busy_page() {
        let page = FakePage::new().churning();
        let quiet = wait_for_quiet(
            &page,
            Duration::from_secs(2),
            Duration::from_millis(500),
            Duration::from_millis(100),
        )
        .await
        .unwrap();
        assert_eq!(quiet, Quiet::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_quiet_gone_page() {
        let page = FakePage::new();
        page.navigate_away();
        let result = wait_for_quiet(
            &page,
            Duration::from_secs(1),
            Duration::from_millis(100),
            Duration::from_millis(50),
        )
        .await;
        assert!(matches!(result, Err(PageError::Gone(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_gives_up() {
        let mut calls = 0;
        let result: Option<u32> = poll_until(Duration::from_millis(300), Duration::from_millis(100), || {
            calls += 1;
            async { Ok(None) }
        })
        .await
        .unwrap();
        assert!(result.is_none());
        assert_eq!(calls, 4);
    }
}
