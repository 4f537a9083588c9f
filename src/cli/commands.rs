//! Implementação dos comandos CLI.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::dataset::Dataset;
use crate::memo::{derive_filename, DumpOptions, Storable};
use crate::types::config::{Config, CONFIG_FILE_NAME};
use crate::types::{ArgValue, CallArgs};
use crate::{DecorError, DecorResult};

/// Converte `nome=valor` em par (usado pelo clap em `--kw`).
pub fn parse_keyword(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("esperado nome=valor, recebido '{}'", raw)),
    }
}

/// Interpreta um argumento textual da linha de comando.
///
/// Inteiros e floats viram números, `None`/`true`/`false` viram os
/// valores correspondentes; o resto fica como texto.
pub fn parse_arg_value(raw: &str) -> ArgValue {
    match raw {
        "None" => return ArgValue::None,
        "true" => return ArgValue::Bool(true),
        "false" => return ArgValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return ArgValue::Int(i);
    }
    match raw.parse::<f64>() {
        Ok(x) if x.is_finite() => ArgValue::Float(x),
        _ => ArgValue::Str(raw.to_string()),
    }
}

/// Inicializa configuração no diretório indicado.
pub async fn init(path: Option<PathBuf>, force: bool) -> DecorResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));
    let config_path = target_dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        return Err(DecorError::config(format!(
            "{} já existe (use --force para sobrescrever)",
            config_path.display()
        )));
    }

    tokio::fs::create_dir_all(&target_dir).await?;
    Config::default_config().save(&config_path)?;

    println!("✓ Configuração criada em: {}", config_path.display());
    Ok(())
}

/// Mostra o nome de arquivo derivado.
pub fn key(
    args: &[String],
    keywords: &[(String, String)],
    keep_chars: Option<usize>,
    config: &Config,
) -> DecorResult<()> {
    let call_args = args
        .iter()
        .fold(CallArgs::new(), |acc, raw| acc.arg(parse_arg_value(raw)));
    let call_args = keywords.iter().fold(call_args, |acc, (name, raw)| {
        acc.kwarg(name.as_str(), parse_arg_value(raw))
    });

    let options = DumpOptions::from_config(&config.dump)?;
    let options = match keep_chars {
        Some(n) => options.try_keep_chars(n)?,
        None => options,
    };
    let filename = options.resolve_filename(&call_args);
    tracing::debug!(
        args = %call_args,
        derived = %derive_filename(&call_args, options.max_chars()),
        "Resolved key"
    );

    println!("{}", filename);
    Ok(())
}

/// Arquivo encontrado no diretório de resultados.
#[derive(Debug, Clone, Serialize)]
pub struct DumpEntry {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    pub sha256: String,
}

/// Lista os arquivos do diretório de resultados, em ordem de nome.
///
/// Um diretório inexistente resulta em lista vazia.
pub async fn scan_dump_dir(dir: &Path) -> DecorResult<Vec<DumpEntry>> {
    let mut reader = match tokio::fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DecorError::filesystem(dir, e)),
    };

    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }

        let bytes = tokio::fs::read(entry.path()).await?;
        let digest = hex::encode(Sha256::digest(&bytes));

        entries.push(DumpEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            sha256: digest,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Lista os resultados gravados.
pub async fn list(config: &Config, json: bool) -> DecorResult<()> {
    let dir = DumpOptions::from_config(&config.dump)?.storage_dir()?;
    let entries = scan_dump_dir(&dir).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Nenhum resultado em {}", dir.display());
        return Ok(());
    }

    println!("Resultados em {}:\n", dir.display());
    for entry in &entries {
        let modified = entry
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} {:>10} B  {}  {}",
            entry.name,
            entry.size,
            modified,
            &entry.sha256[..12]
        );
    }
    println!("\n{} arquivo(s)", entries.len());

    Ok(())
}

/// Resolve o arquivo de `show`: caminho existente ou nome dentro do nc_dump.
fn resolve_dump_file(file: &Path, config: &Config) -> DecorResult<PathBuf> {
    if file.exists() {
        return Ok(file.to_path_buf());
    }
    Ok(DumpOptions::from_config(&config.dump)?
        .storage_dir()?
        .join(file))
}

/// Mostra a estrutura de um resultado gravado.
pub fn show(file: &Path, config: &Config, json: bool) -> DecorResult<()> {
    let path = resolve_dump_file(file, config)?;
    let dataset = Dataset::load(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
        return Ok(());
    }

    println!("{}", path.display());
    println!("\nDimensões:");
    for dim in dataset.dimensions() {
        println!("  {} = {}", dim.name, dim.len);
    }

    println!("\nVariáveis:");
    for var in dataset.variables() {
        println!(
            "  {} {}({})  [{} elementos]",
            var.data.type_name(),
            var.name,
            var.dims.join(", "),
            var.data.len()
        );
        for attr in &var.attributes {
            println!("      :{} = {}", attr.name, render_attribute(&attr.value));
        }
    }

    if !dataset.attributes().is_empty() {
        println!("\nAtributos globais:");
        for attr in dataset.attributes() {
            println!("  :{} = {}", attr.name, render_attribute(&attr.value));
        }
    }

    Ok(())
}

fn render_attribute(value: &crate::dataset::Values) -> String {
    if let Some(text) = value.as_text() {
        return format!("{:?}", text);
    }
    value
        .to_f64_vec()
        .unwrap_or_default()
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Apaga os resultados gravados.
pub async fn clear(config: &Config, yes: bool) -> DecorResult<()> {
    let dir = DumpOptions::from_config(&config.dump)?.storage_dir()?;
    let entries = scan_dump_dir(&dir).await?;

    if entries.is_empty() {
        println!("Nada a apagar em {}", dir.display());
        return Ok(());
    }

    if !yes {
        let confirmed = dialoguer::Confirm::with_theme(&dialoguer::theme::ColorfulTheme::default())
            .with_prompt(format!(
                "Apagar {} arquivo(s) de {}?",
                entries.len(),
                dir.display()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Nada foi apagado.");
            return Ok(());
        }
    }

    let progress = indicatif::ProgressBar::new(entries.len() as u64);
    if let Ok(style) =
        indicatif::ProgressStyle::with_template("{bar:30} {pos}/{len} {wide_msg}")
    {
        progress.set_style(style);
    }

    for entry in &entries {
        let path = dir.join(&entry.name);
        progress.set_message(entry.name.clone());
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| DecorError::filesystem(&path, e))?;
        tracing::debug!(path = %path.display(), "Removed stored result");
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!("✓ {} arquivo(s) apagado(s)", entries.len());
    Ok(())
}

/// Mostra versão.
pub fn version() {
    println!("decor {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Wrappers de funções e memoização de datasets em disco");
}
