//! Rastreamento de chamadas: argumentos e valor de retorno.

use std::fmt::Debug;

/// Linha de log de uma chamada: `name(args)`.
///
/// Tuplas já trazem os próprios parênteses; outros valores são envolvidos.
pub fn format_call<A: Debug>(name: &str, args: &A) -> String {
    let rendered = format!("{:?}", args);
    if rendered.starts_with('(') && rendered.ends_with(')') {
        format!("{}{}", name, rendered)
    } else {
        format!("{}({})", name, rendered)
    }
}

/// Envolve `func` registrando em `debug` a chamada e o valor retornado.
pub fn debug<A, R>(name: impl Into<String>, mut func: impl FnMut(A) -> R) -> impl FnMut(A) -> R
where
    A: Debug,
    R: Debug,
{
    let name = name.into();
    move |args| {
        tracing::debug!("Calling {}", format_call(&name, &args));
        let value = func(args);
        tracing::debug!("'{}' returned {:?}", name, value);
        value
    }
}
