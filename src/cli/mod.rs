//! Interface de linha de comando do decor.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// decor - inspeciona e mantém diretórios de resultados memoizados.
#[derive(Parser, Debug)]
#[command(name = "decor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração (padrão: ./decor.toml ou o do usuário).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Diretório base do nc_dump (sobrescreve a configuração).
    #[arg(short, long, global = true)]
    pub store_path: Option<PathBuf>,

    /// Modo verbose.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Comando a executar.
    #[command(subcommand)]
    pub command: Commands,
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cria um decor.toml com os valores padrão.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Sobrescreve um decor.toml existente.
        #[arg(short, long)]
        force: bool,
    },

    /// Mostra o nome de arquivo derivado para os argumentos dados.
    Key {
        /// Argumentos posicionais.
        args: Vec<String>,

        /// Argumento nomeado no formato nome=valor (repetível).
        #[arg(long = "kw", value_parser = commands::parse_keyword)]
        keywords: Vec<(String, String)>,

        /// Tamanho máximo do nome (padrão: configuração).
        #[arg(short, long)]
        keep_chars: Option<usize>,
    },

    /// Lista os resultados gravados.
    List {
        /// Saída em JSON.
        #[arg(long)]
        json: bool,
    },

    /// Mostra a estrutura de um arquivo de resultado.
    Show {
        /// Arquivo (caminho, ou nome dentro do nc_dump).
        file: PathBuf,

        /// Saída em JSON, incluindo os dados.
        #[arg(long)]
        json: bool,
    },

    /// Apaga os resultados gravados.
    Clear {
        /// Não pede confirmação.
        #[arg(short, long)]
        yes: bool,
    },

    /// Mostra versão.
    Version,
}
