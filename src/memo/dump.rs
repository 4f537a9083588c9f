//! Memoizador de resultados em disco.

use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};

use crate::hooks::{DumpContext, DumpEvent, DumpHook, HookSystem};
use crate::types::config::DumpConfig;
use crate::types::CallArgs;
use crate::{DecorError, DecorResult};

use super::key::{derive_filename, DEFAULT_KEEP_CHARS, DUMP_SUBDIR, FILENAME_KEYWORD};
use super::Storable;

/// Configuração do memoizador, fixada no momento do wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    filename: Option<String>,
    store_path: Option<PathBuf>,
    keep_chars: NonZeroUsize,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            filename: None,
            store_path: None,
            keep_chars: NonZeroUsize::MIN.saturating_add(DEFAULT_KEEP_CHARS - 1),
        }
    }
}

impl DumpOptions {
    /// Configuração padrão: nome derivado, diretório atual, 15 caracteres.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrói a partir da seção `[dump]` do arquivo de configuração.
    ///
    /// # Errors
    ///
    /// `keep_chars = 0` é rejeitado, como em [`DumpOptions::try_keep_chars`].
    pub fn from_config(config: &DumpConfig) -> DecorResult<Self> {
        let options = Self {
            filename: None,
            store_path: config.store_path.clone(),
            ..Self::default()
        };
        options.try_keep_chars(config.keep_chars)
    }

    /// Usa sempre este nome de arquivo, ignorando os argumentos.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Diretório base; `nc_dump/` é criado dentro dele.
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Tamanho máximo do nome derivado (sem extensão).
    pub fn keep_chars(mut self, keep_chars: NonZeroUsize) -> Self {
        self.keep_chars = keep_chars;
        self
    }

    /// Como [`DumpOptions::keep_chars`], rejeitando zero: todo nome
    /// derivado viraria `.nc`.
    pub fn try_keep_chars(self, keep_chars: usize) -> DecorResult<Self> {
        NonZeroUsize::new(keep_chars)
            .map(|n| self.keep_chars(n))
            .ok_or_else(|| DecorError::config("keep_chars deve ser maior que zero"))
    }

    pub fn explicit_filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    pub fn max_chars(&self) -> usize {
        self.keep_chars.get()
    }

    /// Nome do arquivo para esta chamada.
    ///
    /// Ordem de precedência: nome configurado, argumento `nc_dump_file`
    /// (se não for `None`), nome derivado dos argumentos.
    pub fn resolve_filename(&self, args: &CallArgs) -> String {
        if let Some(name) = &self.filename {
            return name.clone();
        }
        match args.get(FILENAME_KEYWORD) {
            Some(value) if !value.is_none() => value.to_string(),
            _ => derive_filename(args, self.keep_chars.get()),
        }
    }

    /// Diretório onde os resultados ficam: `<store_path ou cwd>/nc_dump`.
    ///
    /// O diretório atual é consultado a cada chamada.
    pub fn storage_dir(&self) -> DecorResult<PathBuf> {
        let base = match &self.store_path {
            Some(path) => path.clone(),
            None => std::env::current_dir()?,
        };
        Ok(base.join(DUMP_SUBDIR))
    }

    /// Caminho completo do arquivo para esta chamada.
    ///
    /// O resultado fica sempre dentro de [`storage_dir`](Self::storage_dir):
    /// raiz, prefixos e `..` do nome resolvido são descartados.
    pub fn target_path(&self, args: &CallArgs) -> DecorResult<PathBuf> {
        let name = self.resolve_filename(args);
        let relative = confine(&name)?;
        Ok(self.storage_dir()?.join(relative))
    }

    /// Envolve `func` com esta configuração.
    pub fn wrap<F, R>(self, func: F) -> ResultMemoizer<F, R>
    where
        F: FnMut(&CallArgs) -> Option<R>,
        R: Storable,
    {
        ResultMemoizer {
            options: self,
            func,
            hooks: HookSystem::with_defaults(),
            _result: PhantomData,
        }
    }
}

/// Mantém só os componentes normais de `name`, para que ele não escape do
/// diretório de resultados.
fn confine(name: &str) -> DecorResult<PathBuf> {
    let relative: PathBuf = Path::new(name)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();
    if relative.as_os_str().is_empty() {
        return Err(DecorError::config(format!(
            "nome de arquivo '{}' não aponta para um arquivo",
            name
        )));
    }
    Ok(relative)
}

/// Envolve `func` com a configuração padrão.
///
/// Equivale a `DumpOptions::new().wrap(func)`.
pub fn nc_dump<F, R>(func: F) -> ResultMemoizer<F, R>
where
    F: FnMut(&CallArgs) -> Option<R>,
    R: Storable,
{
    DumpOptions::new().wrap(func)
}

/// Função envolvida cujo resultado é gravado em disco na primeira chamada
/// e lido do disco nas seguintes.
///
/// Não há invalidação: um arquivo existente é sempre reutilizado, mesmo
/// que a função tenha mudado. Chamadas concorrentes com a mesma chave
/// podem calcular e gravar duas vezes; vence a última gravação.
pub struct ResultMemoizer<F, R> {
    options: DumpOptions,
    func: F,
    hooks: HookSystem,
    _result: PhantomData<fn() -> R>,
}

impl<F, R> ResultMemoizer<F, R>
where
    F: FnMut(&CallArgs) -> Option<R>,
    R: Storable,
{
    /// Registra um hook adicional.
    pub fn with_hook(mut self, hook: Box<dyn DumpHook>) -> Self {
        self.hooks.register(hook);
        self
    }

    /// Substitui todos os hooks (inclusive o de logging padrão).
    pub fn with_hooks(mut self, hooks: HookSystem) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn options(&self) -> &DumpOptions {
        &self.options
    }

    pub fn hooks(&self) -> &HookSystem {
        &self.hooks
    }

    /// Caminho que `call(args)` usaria, sem executar nada.
    pub fn target_path(&self, args: &CallArgs) -> DecorResult<PathBuf> {
        self.options.target_path(args)
    }

    /// Chama a função envolvida, ou carrega o resultado já gravado.
    ///
    /// Se o arquivo existe, ele é lido e a função não é chamada. Caso
    /// contrário a função é executada e, se retornar `Some`, o resultado
    /// é gravado antes de ser devolvido. `None` é devolvido sem gravar,
    /// então a próxima chamada recalcula.
    ///
    /// # Errors
    ///
    /// Falhas de IO e arquivos ilegíveis são propagados sem tratamento.
    /// Erros de hooks apenas vão para o log; não alteram o resultado.
    pub fn call(&mut self, args: &CallArgs) -> DecorResult<Option<R>> {
        let path = self.options.target_path(args)?;

        if path.is_file() {
            let result = R::load(&path)?;
            self.emit(DumpEvent::Hit, &path, args);
            return Ok(Some(result));
        }

        self.emit(DumpEvent::Miss, &path, args);
        let Some(result) = (self.func)(args) else {
            self.emit(DumpEvent::SkippedEmpty, &path, args);
            return Ok(None);
        };

        if let Some(dir) = path.parent() {
            // create_dir_all tolera um diretório criado por outro processo.
            std::fs::create_dir_all(dir).map_err(|e| DecorError::filesystem(dir, e))?;
        }
        result.save(&path)?;
        self.emit(DumpEvent::Stored, &path, args);

        Ok(Some(result))
    }

    /// Devolve a função original.
    pub fn into_inner(self) -> F {
        self.func
    }

    fn emit(&self, event: DumpEvent, path: &Path, args: &CallArgs) {
        if let Err(e) = self.hooks.dispatch(&DumpContext { event, path, args }) {
            tracing::warn!(event = %event, path = %path.display(), error = %e, "Hook failed");
        }
    }
}

impl<F, R> std::fmt::Debug for ResultMemoizer<F, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultMemoizer")
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Values};
    use crate::hooks::MetricsHook;
    use crate::types::ArgValue;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn make_dataset(args: &CallArgs) -> Dataset {
        let values: Vec<f64> = args
            .positional
            .iter()
            .map(|v| match v {
                ArgValue::Int(i) => *i as f64,
                ArgValue::Float(x) => *x,
                _ => 0.0,
            })
            .collect();
        let mut ds = Dataset::new();
        ds.add_dimension("n", values.len().max(1)).unwrap();
        let data = if values.is_empty() { vec![0.0] } else { values };
        ds.add_variable("x", &["n"], Values::Double(data)).unwrap();
        ds
    }

    #[test]
    fn test_resolve_filename_precedence() {
        let derived = DumpOptions::new();
        let args = CallArgs::new().arg(1).arg(2);
        assert_eq!(derived.resolve_filename(&args), "12.nc");

        let with_kw = args.clone().kwarg(FILENAME_KEYWORD, "mine.nc");
        assert_eq!(derived.resolve_filename(&with_kw), "mine.nc");

        let explicit = DumpOptions::new().filename("result.nc");
        assert_eq!(explicit.resolve_filename(&with_kw), "result.nc");
    }

    #[test]
    fn test_none_keyword_falls_back_to_derivation() {
        let args = CallArgs::new()
            .arg(7)
            .kwarg(FILENAME_KEYWORD, ArgValue::None);
        let name = DumpOptions::new()
            .try_keep_chars(100)
            .unwrap()
            .resolve_filename(&args);
        assert_eq!(name, "7nc_dump_fileNone.nc");
    }

    #[test]
    fn test_storage_dir_uses_store_path() {
        let opts = DumpOptions::new().store_path("/data");
        assert_eq!(
            opts.storage_dir().unwrap(),
            PathBuf::from("/data").join(DUMP_SUBDIR)
        );
    }

    #[test]
    fn test_from_config() {
        let config = DumpConfig {
            store_path: Some(PathBuf::from("/srv")),
            keep_chars: 4,
        };
        let opts = DumpOptions::from_config(&config).unwrap();
        assert_eq!(opts.base_path(), Some(Path::new("/srv")));
        assert_eq!(opts.max_chars(), 4);
        assert!(opts.explicit_filename().is_none());
    }

    #[test]
    fn test_zero_keep_chars_rejected() {
        assert!(DumpOptions::new().try_keep_chars(0).is_err());
        let config = DumpConfig {
            store_path: None,
            keep_chars: 0,
        };
        assert!(DumpOptions::from_config(&config).is_err());
        assert_eq!(DumpOptions::new().max_chars(), DEFAULT_KEEP_CHARS);
    }

    #[test]
    fn test_target_path_stays_in_storage_dir() {
        let opts = DumpOptions::new().store_path("/data").try_keep_chars(200).unwrap();
        let dir = opts.storage_dir().unwrap();

        let absolute = CallArgs::new().arg("/etc/passwd");
        let path = opts.target_path(&absolute).unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(path, dir.join("etc").join("passwd.nc"));

        let escaping = CallArgs::new().kwarg(FILENAME_KEYWORD, "../../x.nc");
        assert_eq!(opts.target_path(&escaping).unwrap(), dir.join("x.nc"));

        let root_only = DumpOptions::new().store_path("/data").filename("/");
        assert!(root_only.target_path(&CallArgs::new()).is_err());
    }

    #[test]
    fn test_second_call_reads_from_disk() {
        let dir = TempDir::new().unwrap();
        let mut calls = 0;
        let mut memo = DumpOptions::new()
            .store_path(dir.path())
            .wrap(|args: &CallArgs| {
                calls += 1;
                Some(make_dataset(args))
            });

        let args = CallArgs::new().arg(1).arg(2);
        let first = memo.call(&args).unwrap().unwrap();
        let second = memo.call(&args).unwrap().unwrap();
        drop(memo);

        assert_eq!(first, second);
        assert_eq!(calls, 1);
        assert!(dir.path().join("nc_dump").join("12.nc").is_file());
    }

    #[test]
    fn test_none_result_not_stored() {
        let dir = TempDir::new().unwrap();
        let mut calls = 0;
        let mut memo = DumpOptions::new()
            .store_path(dir.path())
            .wrap(|_: &CallArgs| -> Option<Dataset> {
                calls += 1;
                None
            });

        let args = CallArgs::new().arg(1);
        assert!(memo.call(&args).unwrap().is_none());
        assert!(memo.call(&args).unwrap().is_none());
        let path = memo.target_path(&args).unwrap();
        drop(memo);

        assert_eq!(calls, 2);
        assert!(!path.exists());
        assert!(!dir.path().join("nc_dump").exists());
    }

    #[test]
    fn test_hooks_see_events() {
        let dir = TempDir::new().unwrap();
        let metrics = Arc::new(MetricsHook::new());
        let mut memo = DumpOptions::new()
            .store_path(dir.path())
            .wrap(|args: &CallArgs| Some(make_dataset(args)))
            .with_hook(Box::new(metrics.clone()));

        let args = CallArgs::new().arg(3);
        memo.call(&args).unwrap();
        memo.call(&args).unwrap();
        memo.call(&args).unwrap();

        let m = metrics.metrics();
        assert_eq!(m.misses, 1);
        assert_eq!(m.stores, 1);
        assert_eq!(m.hits, 2);
    }

    #[test]
    fn test_corrupt_file_propagates() {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("nc_dump");
        std::fs::create_dir_all(&store).unwrap();
        std::fs::write(store.join("5.nc"), b"garbage").unwrap();

        let mut memo = DumpOptions::new()
            .store_path(dir.path())
            .wrap(|args: &CallArgs| Some(make_dataset(args)));

        let err = memo.call(&CallArgs::new().arg(5)).unwrap_err();
        assert!(err.is_deserialize());
    }

    #[test]
    fn test_debug_output() {
        let memo = nc_dump(|_: &CallArgs| -> Option<Dataset> { None });
        let dbg = format!("{:?}", memo);
        assert!(dbg.contains("ResultMemoizer"));
        assert!(dbg.contains("logging"));
    }
}
