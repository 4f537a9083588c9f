//! Derivação do nome de arquivo a partir dos argumentos.

use crate::types::CallArgs;

/// Caracteres removidos do nome derivado.
pub const DISALLOWED_CHARS: [char; 9] = [' ', ':', '(', ')', '[', ']', '\n', ',', '.'];

/// Extensão anexada aos nomes derivados.
pub const DUMP_EXTENSION: &str = ".nc";

/// Subdiretório, sob o diretório base, onde os resultados ficam.
pub const DUMP_SUBDIR: &str = "nc_dump";

/// Argumento nomeado que, na chamada, fixa o nome do arquivo.
pub const FILENAME_KEYWORD: &str = "nc_dump_file";

/// Tamanho máximo padrão do nome derivado, sem a extensão.
pub const DEFAULT_KEEP_CHARS: usize = 15;

/// Concatena a forma textual dos argumentos, sem caracteres proibidos.
///
/// Posicionais vêm primeiro; cada nomeado contribui `nome + valor`.
pub fn key_stem(args: &CallArgs) -> String {
    let mut raw = String::new();
    for value in &args.positional {
        raw.push_str(&value.to_string());
    }
    for (name, value) in &args.keyword {
        raw.push_str(name);
        raw.push_str(&value.to_string());
    }
    raw.retain(|c| !DISALLOWED_CHARS.contains(&c));
    raw
}

/// Nome de arquivo derivado: radical truncado em `keep_chars` caracteres
/// mais [`DUMP_EXTENSION`].
///
/// Com `keep_chars == 0` o radical fica vazio; por isso [`DumpOptions`]
/// e a configuração não aceitam zero.
///
/// [`DumpOptions`]: crate::memo::DumpOptions
///
/// ```
/// use decor::memo::derive_filename;
/// use decor::types::CallArgs;
///
/// let args = CallArgs::new().arg(1).arg(2);
/// assert_eq!(derive_filename(&args, 15), "12.nc");
/// ```
pub fn derive_filename(args: &CallArgs, keep_chars: usize) -> String {
    let stem: String = key_stem(args).chars().take(keep_chars).collect();
    format!("{}{}", stem, DUMP_EXTENSION)
}
