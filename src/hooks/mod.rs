//! Sistema de hooks do memoizador em disco.
//!
//! Hooks observam o que acontece em cada chamada memoizada:
//!
//! - `hit`: resultado carregado do disco, função não executada
//! - `miss`: arquivo ausente, a função será executada
//! - `stored`: resultado novo gravado em disco
//! - `skipped_empty`: a função retornou `None`, nada foi gravado

mod builtin;

pub use builtin::{DumpMetrics, LoggingHook, MetricsHook};

use std::path::Path;
use std::sync::Arc;

use crate::types::CallArgs;
use crate::DecorResult;

// ═══════════════════════════════════════════════════════════════════════════
// Tipos de eventos
// ═══════════════════════════════════════════════════════════════════════════

/// Evento que dispara um hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DumpEvent {
    /// Arquivo existente foi carregado.
    Hit,

    /// Arquivo ausente; a função será chamada.
    Miss,

    /// Resultado foi gravado.
    Stored,

    /// Resultado vazio; nada foi gravado.
    SkippedEmpty,
}

impl DumpEvent {
    /// Todos os eventos, na ordem em que podem ocorrer.
    pub const ALL: [DumpEvent; 4] = [
        DumpEvent::Hit,
        DumpEvent::Miss,
        DumpEvent::Stored,
        DumpEvent::SkippedEmpty,
    ];
}

impl std::fmt::Display for DumpEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DumpEvent::Hit => write!(f, "hit"),
            DumpEvent::Miss => write!(f, "miss"),
            DumpEvent::Stored => write!(f, "stored"),
            DumpEvent::SkippedEmpty => write!(f, "skipped_empty"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Contexto de hooks
// ═══════════════════════════════════════════════════════════════════════════

/// Contexto passado para hooks.
#[derive(Debug, Clone, Copy)]
pub struct DumpContext<'a> {
    /// Evento ocorrido.
    pub event: DumpEvent,

    /// Caminho completo do arquivo de resultado.
    pub path: &'a Path,

    /// Argumentos da chamada.
    pub args: &'a CallArgs,
}

// ═══════════════════════════════════════════════════════════════════════════
// Trait DumpHook
// ═══════════════════════════════════════════════════════════════════════════

/// Trait para hooks customizáveis.
pub trait DumpHook: Send + Sync {
    /// Nome do hook.
    fn name(&self) -> &str;

    /// Eventos que disparam este hook (padrão: todos).
    fn events(&self) -> &[DumpEvent] {
        &DumpEvent::ALL
    }

    /// Executa o hook.
    fn execute(&self, context: &DumpContext<'_>) -> DecorResult<()>;
}

impl<H: DumpHook + ?Sized> DumpHook for Arc<H> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn events(&self) -> &[DumpEvent] {
        (**self).events()
    }

    fn execute(&self, context: &DumpContext<'_>) -> DecorResult<()> {
        (**self).execute(context)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Sistema de hooks
// ═══════════════════════════════════════════════════════════════════════════

/// Gerenciador de hooks.
#[derive(Default)]
pub struct HookSystem {
    hooks: Vec<Box<dyn DumpHook>>,
}

impl HookSystem {
    /// Cria um novo sistema de hooks vazio.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Cria um sistema com hooks padrão (logging).
    pub fn with_defaults() -> Self {
        let mut system = Self::new();
        system.register(Box::new(LoggingHook));
        system
    }

    /// Registra um hook.
    pub fn register(&mut self, hook: Box<dyn DumpHook>) {
        tracing::debug!(
            hook_name = hook.name(),
            events = ?hook.events(),
            "Registering hook"
        );
        self.hooks.push(hook);
    }

    /// Executa, em ordem de registro, os hooks inscritos no evento.
    ///
    /// O primeiro erro interrompe a cadeia e é propagado.
    pub fn dispatch(&self, context: &DumpContext<'_>) -> DecorResult<()> {
        for hook in &self.hooks {
            if hook.events().contains(&context.event) {
                hook.execute(context)?;
            }
        }
        Ok(())
    }

    /// Retorna o número total de hooks registrados.
    pub fn count(&self) -> usize {
        self.hooks.len()
    }

    /// Retorna o número de hooks para um evento específico.
    pub fn count_for_event(&self, event: DumpEvent) -> usize {
        self.hooks
            .iter()
            .filter(|h| h.events().contains(&event))
            .count()
    }
}

impl std::fmt::Debug for HookSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.hooks.iter().map(|h| h.name()).collect();
        f.debug_struct("HookSystem").field("hooks", &names).finish()
    }
}
