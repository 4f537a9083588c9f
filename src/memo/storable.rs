//! Trait base para resultados persistíveis.

use std::path::Path;

use crate::DecorResult;

/// Resultado que sabe se gravar em um arquivo e se reconstruir a partir dele.
///
/// O memoizador em disco só depende deste par de operações; o formato
/// do arquivo fica a cargo do implementador. Erros de IO devem vir como
/// [`DecorError::Filesystem`](crate::DecorError::Filesystem) e arquivos
/// ilegíveis como [`DecorError::Deserialize`](crate::DecorError::Deserialize).
pub trait Storable: Sized {
    /// Grava o resultado em `path`, sobrescrevendo o que houver.
    fn save(&self, path: &Path) -> DecorResult<()>;

    /// Lê um resultado previamente gravado em `path`.
    fn load(path: &Path) -> DecorResult<Self>;
}
