//! Wrappers simples para funções.
//!
//! Cada wrapper recebe uma função `FnMut(A) -> R` (vários argumentos
//! viram uma tupla) e devolve outra com o mesmo contrato, então podem
//! ser compostos livremente:
//!
//! ```
//! use decor::wrappers::{count_calls, debug, timer};
//!
//! let (counted, calls) = count_calls("area", |(w, h): (u32, u32)| w * h);
//! let mut area = timer("area", debug("area", counted));
//!
//! assert_eq!(area((3, 4)), 12);
//! assert_eq!(calls.count(), 1);
//! ```
//!
//! Wrappers configuráveis têm dois construtores: uma função com os
//! valores padrão (`slow_down`, `repeat`, `count_calls`) e um tipo de
//! configuração com `wrap` (`SlowDown`, `Repeat`, `CountCalls`).

mod count_calls;
mod debug;
mod repeat;
mod slow_down;
mod timer;
mod units;

pub use count_calls::{count_calls, CallCounter, CountCalls};
pub use debug::{debug, format_call};
pub use repeat::{repeat, Repeat};
pub use slow_down::{slow_down, SlowDown};
pub use timer::{measure, timer, timer_async};
pub use units::{set_unit, use_unit, Quantity, Unit, WithUnit};
