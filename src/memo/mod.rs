//! Memoização de resultados em disco.
//!
//! Na primeira chamada a função envolvida é executada e o resultado é
//! gravado em `<store_path>/nc_dump/<arquivo>`; nas chamadas seguintes
//! com a mesma chave o arquivo é lido e a função não roda. O nome do
//! arquivo vem da configuração, do argumento `nc_dump_file` ou é
//! derivado dos próprios argumentos (ver [`derive_filename`]).
//!
//! ```no_run
//! use decor::dataset::{Dataset, Values};
//! use decor::memo::DumpOptions;
//! use decor::types::CallArgs;
//!
//! let mut load = DumpOptions::new()
//!     .store_path("/tmp/results")
//!     .wrap(|args: &CallArgs| {
//!         let mut ds = Dataset::new();
//!         ds.add_dimension("n", args.len()).ok()?;
//!         ds.add_variable("x", &["n"], Values::Int(vec![0; args.len()])).ok()?;
//!         Some(ds)
//!     });
//!
//! let ds = load.call(&CallArgs::new().arg(1).arg(2))?;
//! # Ok::<(), decor::DecorError>(())
//! ```

mod dump;
mod key;
mod storable;

pub use dump::{nc_dump, DumpOptions, ResultMemoizer};
pub use key::{
    derive_filename, key_stem, DEFAULT_KEEP_CHARS, DISALLOWED_CHARS, DUMP_EXTENSION, DUMP_SUBDIR,
    FILENAME_KEYWORD,
};
pub use storable::Storable;
