//! Unidades físicas associadas a funções e resultados.
//!
//! Não há conversão entre unidades: a unidade é um rótulo validado que
//! acompanha a função ([`WithUnit`]) ou o valor retornado ([`Quantity`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DecorError, DecorResult};

/// Símbolo de unidade, como `m`, `K` ou `kg*m/s^2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Unit(String);

impl Unit {
    /// Valida o símbolo: não vazio, sem caracteres de controle.
    pub fn parse(symbol: &str) -> DecorResult<Self> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(DecorError::config("unidade vazia"));
        }
        if symbol.chars().any(char::is_control) {
            return Err(DecorError::config(format!(
                "unidade '{}' contém caractere de controle",
                symbol.escape_debug()
            )));
        }
        Ok(Self(symbol.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Unit {
    type Error = DecorError;

    fn try_from(value: String) -> DecorResult<Self> {
        Unit::parse(&value)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.0
    }
}

/// Valor acompanhado de sua unidade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity<T> {
    pub magnitude: T,
    pub unit: Unit,
}

impl<T: fmt::Display> fmt::Display for Quantity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

/// Função com unidade registrada; a chamada não é alterada.
#[derive(Debug, Clone)]
pub struct WithUnit<F> {
    func: F,
    unit: Unit,
}

impl<F> WithUnit<F> {
    /// Unidade registrada.
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Chama a função original.
    pub fn call<A, R>(&mut self, args: A) -> R
    where
        F: FnMut(A) -> R,
    {
        (self.func)(args)
    }

    /// Chama a função e anexa a unidade ao resultado.
    pub fn call_quantity<A, R>(&mut self, args: A) -> Quantity<R>
    where
        F: FnMut(A) -> R,
    {
        Quantity {
            magnitude: (self.func)(args),
            unit: self.unit.clone(),
        }
    }

    pub fn into_inner(self) -> F {
        self.func
    }
}

/// Registra uma unidade junto à função.
pub fn set_unit<F>(unit: &str, func: F) -> DecorResult<WithUnit<F>> {
    Ok(WithUnit {
        func,
        unit: Unit::parse(unit)?,
    })
}

/// Envolve `func` para que o resultado saia como [`Quantity`] na unidade dada.
pub fn use_unit<A, R>(
    unit: &str,
    mut func: impl FnMut(A) -> R,
) -> DecorResult<impl FnMut(A) -> Quantity<R>> {
    let unit = Unit::parse(unit)?;
    Ok(move |args| Quantity {
        magnitude: func(args),
        unit: unit.clone(),
    })
}
