//! Testes de integração para os wrappers e o cache em memória.

use std::num::NonZeroU32;
use std::time::{Duration, Instant};

use decor::cache::{cache, Memoized};
use decor::types::config::CacheConfig;
use decor::wrappers::{
    count_calls, debug, repeat, set_unit, slow_down, timer, timer_async, use_unit, CountCalls,
    Repeat, SlowDown,
};

#[test]
fn test_composed_wrappers_keep_result() {
    let (counted, calls) = count_calls("mul", |(a, b): (i64, i64)| a * b);
    let mut f = timer("mul", debug("mul", Repeat::times(NonZeroU32::new(3).unwrap()).wrap(counted)));

    assert_eq!(f((6, 7)), 42);
    // repeat executa a função contada três vezes
    assert_eq!(calls.count(), 3);
}

#[test]
fn test_repeat_default_and_counter_reset() {
    let (counted, calls) = CountCalls::new().verbose(false).wrap("noop", |_: ()| ());
    let mut twice = repeat(counted);

    twice(());
    assert_eq!(calls.count(), 2);

    calls.reset();
    twice(());
    assert_eq!(calls.count(), 2);
}

#[test]
fn test_memoized_counted_function() {
    let (counted, calls) = count_calls("factorial", |n: u64| (1..=n).product::<u64>());
    let mut factorial = cache(counted);

    assert_eq!(factorial.call(5), 120);
    assert_eq!(factorial.call(5), 120);
    assert_eq!(factorial.call(6), 720);

    assert_eq!(calls.count(), 2);
    assert_eq!(factorial.stats().hits, 1);
}

#[test]
fn test_memoized_from_config_bound() {
    let config = CacheConfig { capacity: 2 };
    let mut memo = Memoized::from_config(&config, |s: String| s.to_uppercase());
    memo.call("a".into());
    memo.call("b".into());
    memo.call("c".into());
    assert_eq!(memo.len(), 2);
    assert!(!memo.contains(&"a".to_string()));
}

#[test]
fn test_slow_down_delays_each_call() {
    let mut f = SlowDown::new(Duration::from_millis(15)).wrap(|x: i32| -x);
    let start = Instant::now();
    f(1);
    f(2);
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[test]
fn test_slow_down_default_constructor() {
    // Só garante que o construtor padrão produz um wrapper utilizável
    let _f = slow_down(|x: u8| x);
    assert_eq!(SlowDown::default().delay(), Duration::from_secs(1));
}

#[test]
fn test_units() {
    let tagged = set_unit("m", |x: f64| x * 2.0).unwrap();
    assert_eq!(tagged.unit().to_string(), "m");

    let mut energy = use_unit("J", |(m, v): (f64, f64)| 0.5 * m * v * v).unwrap();
    let q = energy((2.0, 3.0));
    assert_eq!(q.magnitude, 9.0);
    assert_eq!(q.unit.as_str(), "J");
}

#[tokio::test]
async fn test_async_wrappers() {
    let slow = SlowDown::new(Duration::from_millis(5));
    let value = timer_async("job", slow.call_async(async { 1 + 1 })).await;
    assert_eq!(value, 2);
}
