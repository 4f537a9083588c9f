//! Medição do tempo de execução.

use std::future::Future;
use std::time::{Duration, Instant};

/// Executa `func` e devolve o resultado junto com o tempo gasto.
pub fn measure<R>(func: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let value = func();
    (value, start.elapsed())
}

fn report(name: &str, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();
    tracing::info!(function = name, elapsed_secs = secs, "Finished '{}' in {:.4} secs", name, secs);
}

/// Envolve `func` registrando no log quanto tempo cada chamada levou.
pub fn timer<A, R>(name: impl Into<String>, mut func: impl FnMut(A) -> R) -> impl FnMut(A) -> R {
    let name = name.into();
    move |args| {
        let (value, elapsed) = measure(|| func(args));
        report(&name, elapsed);
        value
    }
}

/// Versão assíncrona de [`timer`]: mede até a future completar.
pub async fn timer_async<Fut: Future>(name: &str, fut: Fut) -> Fut::Output {
    let start = Instant::now();
    let value = fut.await;
    report(name, start.elapsed());
    value
}
