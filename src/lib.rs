//! # decor
//!
//! Wrappers de uso geral para funções, com destaque para a memoização
//! de resultados em disco.
//!
//! ## Módulos
//!
//! - [`memo`] - Memoizador em disco (`nc_dump`) e derivação de chaves
//! - [`dataset`] - Dataset persistível e codec netCDF clássico
//! - [`hooks`] - Hooks de observação do memoizador (logging, métricas)
//! - [`wrappers`] - timer, debug, slow_down, repeat, count_calls, unidades
//! - [`cache`] - Memoização em memória com limite LRU opcional
//! - [`cli`] - Interface de linha de comando
//! - [`types`] - Tipos compartilhados (erros, configuração, argumentos)

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod dataset;
pub mod hooks;
pub mod memo;
pub mod types;
pub mod wrappers;

pub use dataset::Dataset;
pub use memo::{nc_dump, DumpOptions, ResultMemoizer, Storable};
pub use types::config::Config;
pub use types::errors::{DecorError, DecorResult};
pub use types::{ArgValue, CallArgs};
