//! Hooks padrão do decor.
//!
//! - `LoggingHook`: registra cada evento no log
//! - `MetricsHook`: conta hits, misses, gravações e resultados vazios

use std::sync::atomic::{AtomicU64, Ordering};

use crate::DecorResult;

use super::{DumpContext, DumpEvent, DumpHook};

// ═══════════════════════════════════════════════════════════════════════════
// LoggingHook
// ═══════════════════════════════════════════════════════════════════════════

/// Hook que registra eventos do memoizador no log (tracing).
///
/// Hits e misses saem em `debug`; gravações em `info`; resultados
/// vazios em `warn`, já que a próxima chamada vai recalcular.
#[derive(Debug, Default)]
pub struct LoggingHook;

impl LoggingHook {
    /// Cria um novo LoggingHook.
    pub fn new() -> Self {
        Self
    }
}

impl DumpHook for LoggingHook {
    fn name(&self) -> &str {
        "logging"
    }

    fn execute(&self, context: &DumpContext<'_>) -> DecorResult<()> {
        let path = context.path.display();
        match context.event {
            DumpEvent::Hit => {
                tracing::debug!(path = %path, "Loading stored result");
            }
            DumpEvent::Miss => {
                tracing::debug!(path = %path, args = %context.args, "No stored result, computing");
            }
            DumpEvent::Stored => {
                tracing::info!(path = %path, "Result stored");
            }
            DumpEvent::SkippedEmpty => {
                tracing::warn!(path = %path, "Function returned no result - nothing stored");
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MetricsHook
// ═══════════════════════════════════════════════════════════════════════════

/// Hook que coleta contadores do memoizador.
#[derive(Debug, Default)]
pub struct MetricsHook {
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    empties: AtomicU64,
}

impl MetricsHook {
    /// Cria um novo MetricsHook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Taxa de acerto: hits / (hits + misses).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Retorna as métricas em formato estruturado.
    pub fn metrics(&self) -> DumpMetrics {
        DumpMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            empty_results: self.empties.load(Ordering::Relaxed),
            hit_rate: self.hit_rate(),
        }
    }

    /// Zera todos os contadores.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.stores.store(0, Ordering::Relaxed);
        self.empties.store(0, Ordering::Relaxed);
    }
}

/// Métricas coletadas pelo MetricsHook.
#[derive(Debug, Clone, PartialEq)]
pub struct DumpMetrics {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub empty_results: u64,
    pub hit_rate: f64,
}

impl DumpHook for MetricsHook {
    fn name(&self) -> &str {
        "metrics"
    }

    fn execute(&self, context: &DumpContext<'_>) -> DecorResult<()> {
        let counter = match context.event {
            DumpEvent::Hit => &self.hits,
            DumpEvent::Miss => &self.misses,
            DumpEvent::Stored => &self.stores,
            DumpEvent::SkippedEmpty => &self.empties,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CallArgs;
    use std::path::Path;

    fn run(hook: &dyn DumpHook, event: DumpEvent) {
        let args = CallArgs::new().arg(1).arg(2);
        let ctx = DumpContext {
            event,
            path: Path::new("nc_dump/12.nc"),
            args: &args,
        };
        hook.execute(&ctx).unwrap();
    }

    #[test]
    fn test_logging_hook_accepts_every_event() {
        let hook = LoggingHook::new();
        for event in DumpEvent::ALL {
            run(&hook, event);
        }
        assert_eq!(hook.name(), "logging");
    }

    #[test]
    fn test_metrics_hook_counts() {
        let hook = MetricsHook::new();
        run(&hook, DumpEvent::Miss);
        run(&hook, DumpEvent::Stored);
        run(&hook, DumpEvent::Hit);
        run(&hook, DumpEvent::Hit);
        run(&hook, DumpEvent::Hit);
        run(&hook, DumpEvent::SkippedEmpty);

        let m = hook.metrics();
        assert_eq!(m.hits, 3);
        assert_eq!(m.misses, 1);
        assert_eq!(m.stores, 1);
        assert_eq!(m.empty_results, 1);
        assert!((m.hit_rate - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics_reset() {
        let hook = MetricsHook::new();
        run(&hook, DumpEvent::Hit);
        hook.reset();
        assert_eq!(hook.metrics().hits, 0);
        assert_eq!(hook.hit_rate(), 0.0);
    }
}
