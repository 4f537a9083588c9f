//! Contagem de chamadas com estado explícito.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Contador compartilhado entre a função envolvida e quem a criou.
///
/// Clones apontam para o mesmo contador.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicU64>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de chamadas desde a criação ou o último `reset`.
    pub fn count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Zera o contador. Chamadas seguintes voltam a contar a partir de 1.
    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
    }

    fn increment(&self) -> u64 {
        self.calls.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Configuração da contagem de chamadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountCalls {
    verbose: bool,
}

impl Default for CountCalls {
    fn default() -> Self {
        Self { verbose: true }
    }
}

impl CountCalls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra cada chamada no log (`Call N of 'name'`).
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Envolve `func` e devolve também o contador associado.
    pub fn wrap<A, R>(
        self,
        name: impl Into<String>,
        mut func: impl FnMut(A) -> R,
    ) -> (impl FnMut(A) -> R, CallCounter) {
        let name = name.into();
        let counter = CallCounter::new();
        let handle = counter.clone();
        let verbose = self.verbose;

        let wrapped = move |args| {
            let n = counter.increment();
            if verbose {
                tracing::info!(function = %name, call = n, "Call {} of '{}'", n, name);
            }
            func(args)
        };

        (wrapped, handle)
    }
}

/// Envolve `func` com contagem verbosa.
pub fn count_calls<A, R>(
    name: impl Into<String>,
    func: impl FnMut(A) -> R,
) -> (impl FnMut(A) -> R, CallCounter) {
    CountCalls::default().wrap(name, func)
}
