//! Tipos de erro do decor.

use std::path::PathBuf;

use thiserror::Error;

/// Tipo de resultado padrão do decor.
pub type DecorResult<T> = Result<T, DecorError>;

/// Erros possíveis no decor.
#[derive(Error, Debug)]
pub enum DecorError {
    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro de IO em '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Arquivo '{}' ilegível: {reason}", path.display())]
    Deserialize { path: PathBuf, reason: String },

    #[error("Dataset inválido: {0}")]
    InvalidDataset(String),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "cli")]
    #[error("Erro no prompt interativo: {0}")]
    Dialog(#[from] dialoguer::Error),

    #[error("{0}")]
    Other(String),
}

impl DecorError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Anexa o caminho a um erro de IO.
    pub fn filesystem<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Cria um erro de desserialização para o arquivo em `path`.
    pub fn deserialize<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::Deserialize {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Verdadeiro para falhas de sistema de arquivos (com ou sem caminho).
    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Filesystem { .. })
    }

    /// Verdadeiro quando um arquivo existente não pôde ser decodificado.
    pub fn is_deserialize(&self) -> bool {
        matches!(self, Self::Deserialize { .. })
    }
}
