//! Runtime abstraction layer for async operations
//!
//! Feature fetches, the analysis call and the raster attach delay are spawned
//! through this module so the orchestration code runs unchanged on Tokio and
//! on the browser event loop (WASM).

use crate::prelude::{Future, Pin};
use std::time::Duration;

/// A spawnable task. Browser futures (fetch, timers) are `!Send`, so the
/// bound is only required off wasm32.
#[cfg(not(target_arch = "wasm32"))]
pub type BoxedTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
#[cfg(target_arch = "wasm32")]
pub type BoxedTask = Pin<Box<dyn Future<Output = ()> + 'static>>;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(&self, future: BoxedTask) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;
}

/// Spawns `future` on the global runtime
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    runtime().spawn_boxed(Box::pin(future))
}

/// Spawns `future` on the browser event loop
#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: Future<Output = ()> + 'static,
{
    runtime().spawn_boxed(Box::pin(future))
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxedTask) -> Box<dyn AsyncHandle> {
                let handle = ::tokio::spawn(future);
                Box::new(TokioHandle(handle))
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }
        }
    }

    #[cfg(feature = "wasm")]
    pub mod wasm {
        use super::*;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        /// WASM-compatible async spawner
        pub struct WasmSpawner;

        impl AsyncSpawner for WasmSpawner {
            fn spawn_boxed(&self, future: BoxedTask) -> Box<dyn AsyncHandle> {
                let finished = Arc::new(AtomicBool::new(false));
                let finished_clone = finished.clone();

                wasm_bindgen_futures::spawn_local(async move {
                    future.await;
                    finished_clone.store(true, Ordering::Release);
                });

                Box::new(WasmHandle { finished })
            }
        }

        struct WasmHandle {
            finished: Arc<AtomicBool>,
        }

        impl AsyncHandle for WasmHandle {
            fn is_finished(&self) -> bool {
                self.finished.load(Ordering::Acquire)
            }
        }
    }
}

/// Sleeps without blocking the event loop
pub async fn async_delay(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    #[cfg(feature = "tokio-runtime")]
    {
        ::tokio::time::sleep(duration).await;
    }

    #[cfg(all(feature = "wasm", not(feature = "tokio-runtime")))]
    {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }

    #[cfg(not(any(feature = "tokio-runtime", feature = "wasm")))]
    {
        log::warn!("no async runtime enabled; skipping {:?} delay", duration);
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Initialize the runtime with a specific spawner. Only the first call wins.
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) {
    if RUNTIME.set(spawner).is_err() {
        log::debug!("runtime already initialized; keeping the existing spawner");
    }
}

/// Get the global runtime spawner
pub fn runtime() -> &'static dyn AsyncSpawner {
    RUNTIME
        .get_or_init(|| {
            #[cfg(feature = "tokio-runtime")]
            {
                Box::new(spawners::tokio_impl::TokioSpawner)
            }

            #[cfg(all(feature = "wasm", not(feature = "tokio-runtime")))]
            {
                Box::new(spawners::wasm::WasmSpawner)
            }

            #[cfg(not(any(feature = "tokio-runtime", feature = "wasm")))]
            {
                panic!("No async runtime available. Enable 'tokio-runtime' or 'wasm' feature.");
            }
        })
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    #[::tokio::test]
    async fn test_tokio_spawner() {
        let (tx, rx) = ::tokio::sync::oneshot::channel();
        let handle = spawn(async move {
            let _ = tx.send(7);
        });

        assert_eq!(rx.await.unwrap(), 7);
        ::tokio::task::yield_now().await;
        assert!(handle.is_finished());
    }

    #[cfg(feature = "tokio-runtime")]
    #[::tokio::test]
    async fn test_zero_delay_returns_immediately() {
        async_delay(Duration::ZERO).await;
    }
}
