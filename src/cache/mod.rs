//! Cache em memória para resultados de funções.
//!
//! Este módulo implementa memoização por argumentos, ilimitada por
//! padrão ou limitada com descarte Least Recently Used (LRU).

mod memo;

pub use memo::{cache, CacheStats, Memoized};
