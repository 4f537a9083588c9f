//! Modelo de argumentos de chamada.
//!
//! Funções envolvidas pelo memoizador em disco recebem argumentos
//! posicionais e nomeados como valores dinâmicos, para que a chave
//! do arquivo possa ser derivada da forma textual de cada um.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Valor dinâmico de um argumento.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Ausência de valor.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Verdadeiro para `ArgValue::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, ArgValue::None)
    }

    /// Forma literal, com strings entre aspas: `"a"`, `[1, "b"]`.
    pub fn repr(&self) -> String {
        match self {
            ArgValue::Str(s) => format!("{:?}", s),
            ArgValue::List(items) => {
                let inner: Vec<String> = items.iter().map(ArgValue::repr).collect();
                format!("[{}]", inner.join(", "))
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::None => write!(f, "None"),
            ArgValue::Bool(b) => write!(f, "{}", b),
            ArgValue::Int(i) => write!(f, "{}", i),
            // `{:?}` mantém o ponto decimal: 1.0 não colide com o inteiro 1
            ArgValue::Float(x) => write!(f, "{:?}", x),
            ArgValue::Str(s) => write!(f, "{}", s),
            ArgValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(value.into())
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Int(value.into())
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Float(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(values: Vec<T>) -> Self {
        ArgValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ArgValue::None, Into::into)
    }
}

/// Argumentos posicionais e nomeados de uma chamada, em ordem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArgs {
    /// Argumentos posicionais.
    pub positional: Vec<ArgValue>,

    /// Argumentos nomeados, na ordem em que foram passados.
    pub keyword: Vec<(String, ArgValue)>,
}

impl CallArgs {
    /// Cria uma lista de argumentos vazia.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um argumento posicional.
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adiciona (ou substitui) um argumento nomeado.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.keyword.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.keyword.push((name, value)),
        }
        self
    }

    /// Busca um argumento nomeado.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.keyword
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Número total de argumentos.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for CallArgs {
    /// Formato de assinatura: `1, 2, scale=0.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for value in &self.positional {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", value.repr())?;
            first = false;
        }
        for (name, value) in &self.keyword {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value.repr())?;
            first = false;
        }
        Ok(())
    }
}
