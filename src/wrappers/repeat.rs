//! Repetição de chamadas.

use std::num::NonZeroU32;

use crate::{DecorError, DecorResult};

/// Executa a função várias vezes por chamada e devolve o último resultado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    times: NonZeroU32,
}

impl Default for Repeat {
    fn default() -> Self {
        Self {
            times: NonZeroU32::MIN.saturating_add(1),
        }
    }
}

impl Repeat {
    pub fn times(times: NonZeroU32) -> Self {
        Self { times }
    }

    /// Como [`Repeat::times`], rejeitando zero.
    pub fn try_times(times: u32) -> DecorResult<Self> {
        NonZeroU32::new(times)
            .map(Self::times)
            .ok_or_else(|| DecorError::config("repeat precisa de pelo menos uma execução"))
    }

    pub fn count(&self) -> u32 {
        self.times.get()
    }

    /// Envolve `func`. Os argumentos são clonados para cada execução extra.
    pub fn wrap<A, R>(self, mut func: impl FnMut(A) -> R) -> impl FnMut(A) -> R
    where
        A: Clone,
    {
        let extra = self.times.get() - 1;
        move |args: A| {
            for _ in 0..extra {
                func(args.clone());
            }
            func(args)
        }
    }
}

/// Envolve `func` para rodar duas vezes por chamada.
pub fn repeat<A: Clone, R>(func: impl FnMut(A) -> R) -> impl FnMut(A) -> R {
    Repeat::default().wrap(func)
}
