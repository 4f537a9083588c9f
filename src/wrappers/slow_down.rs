//! Atraso antes de cada chamada.

use std::future::Future;
use std::time::Duration;

/// Atraso configurável aplicado antes de cada chamada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlowDown {
    delay: Duration,
}

impl Default for SlowDown {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
        }
    }
}

impl SlowDown {
    /// Atraso explícito.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Atraso em segundos (valores negativos ou NaN viram zero).
    pub fn from_secs_f64(secs: f64) -> Self {
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        Self::new(Duration::from_secs_f64(secs))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Envolve `func`, bloqueando a thread pelo atraso antes de cada chamada.
    pub fn wrap<A, R>(self, mut func: impl FnMut(A) -> R) -> impl FnMut(A) -> R {
        let delay = self.delay;
        move |args| {
            std::thread::sleep(delay);
            func(args)
        }
    }

    /// Aguarda o atraso (sem bloquear a thread) e então a future.
    pub async fn call_async<Fut: Future>(&self, fut: Fut) -> Fut::Output {
        tokio::time::sleep(self.delay).await;
        fut.await
    }
}

/// Envolve `func` com o atraso padrão de um segundo.
pub fn slow_down<A, R>(func: impl FnMut(A) -> R) -> impl FnMut(A) -> R {
    SlowDown::default().wrap(func)
}
