//! Memoização em memória, com limite LRU opcional.

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::types::config::CacheConfig;

/// Estatísticas do cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Número atual de entradas.
    pub size: usize,

    /// Capacidade máxima (`None` = ilimitado).
    pub capacity: Option<usize>,

    /// Número de acertos (cache hits).
    pub hits: u64,

    /// Número de erros (cache misses).
    pub misses: u64,
}

impl CacheStats {
    /// Calcula a taxa de acerto.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Função envolvida que guarda o resultado de cada combinação de argumentos.
///
/// Múltiplos argumentos são passados como tupla. O estado do cache pertence
/// a este objeto; não há cache global.
pub struct Memoized<F, A, R> {
    func: F,
    cache: LruCache<A, R>,
    bounded: bool,
    hits: u64,
    misses: u64,
}

/// Envolve `func` com um cache ilimitado.
pub fn cache<F, A, R>(func: F) -> Memoized<F, A, R>
where
    F: FnMut(A) -> R,
    A: Hash + Eq + Clone,
    R: Clone,
{
    Memoized::new(func)
}

impl<F, A, R> Memoized<F, A, R>
where
    F: FnMut(A) -> R,
    A: Hash + Eq + Clone,
    R: Clone,
{
    /// Cache ilimitado.
    pub fn new(func: F) -> Self {
        Self {
            func,
            cache: LruCache::unbounded(),
            bounded: false,
            hits: 0,
            misses: 0,
        }
    }

    /// Cache com no máximo `capacity` entradas (LRU); 0 = ilimitado.
    pub fn with_capacity(capacity: usize, func: F) -> Self {
        match NonZeroUsize::new(capacity) {
            Some(cap) => Self {
                func,
                cache: LruCache::new(cap),
                bounded: true,
                hits: 0,
                misses: 0,
            },
            None => Self::new(func),
        }
    }

    /// Usa a capacidade da seção `[cache]` da configuração.
    pub fn from_config(config: &CacheConfig, func: F) -> Self {
        Self::with_capacity(config.capacity, func)
    }

    /// Retorna o valor em cache ou chama a função e guarda o resultado.
    pub fn call(&mut self, args: A) -> R {
        if let Some(value) = self.cache.get(&args) {
            self.hits += 1;
            return value.clone();
        }

        self.misses += 1;
        let value = (self.func)(args.clone());
        if self.bounded && self.cache.len() == self.cache.cap().get() {
            tracing::trace!(capacity = self.cache.len(), "Evicting least recently used entry");
        }
        self.cache.put(args, value.clone());
        value
    }

    /// Verifica se há resultado guardado para `args`, sem alterar a ordem LRU.
    pub fn contains(&self, args: &A) -> bool {
        self.cache.contains(args)
    }

    /// Remove a entrada de `args`.
    pub fn invalidate(&mut self, args: &A) {
        self.cache.pop(args);
    }

    /// Limpa todo o cache (as estatísticas são mantidas).
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.cache.len(),
            capacity: self.bounded.then(|| self.cache.cap().get()),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
