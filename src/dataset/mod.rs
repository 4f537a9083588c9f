//! Dataset persistível em netCDF.
//!
//! [`Dataset`] é o tipo de resultado que o memoizador em disco sabe
//! gravar e ler: dimensões fixas, variáveis tipadas e atributos,
//! serializados no formato netCDF clássico (ver [`netcdf`]).

mod model;
pub mod netcdf;

pub use model::{Attribute, Dataset, Dimension, Values, Variable};

use std::path::Path;

use crate::memo::Storable;
use crate::{DecorError, DecorResult};

impl Storable for Dataset {
    fn save(&self, path: &Path) -> DecorResult<()> {
        let bytes = netcdf::encode(self)?;
        std::fs::write(path, bytes).map_err(|e| DecorError::filesystem(path, e))
    }

    fn load(path: &Path) -> DecorResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| DecorError::filesystem(path, e))?;
        netcdf::decode(&bytes, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ds.nc");

        let mut ds = Dataset::new();
        ds.add_dimension("x", 4).unwrap();
        ds.add_variable("v", &["x"], Values::Float(vec![0.5, 1.5, 2.5, 3.5]))
            .unwrap();
        ds.save(&path).unwrap();

        assert_eq!(Dataset::load(&path).unwrap(), ds);
    }

    #[test]
    fn test_load_missing_file_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let err = Dataset::load(&dir.path().join("missing.nc")).unwrap_err();
        assert!(err.is_filesystem());
    }

    #[test]
    fn test_load_garbage_is_deserialize_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.nc");
        std::fs::write(&path, b"not a dataset").unwrap();
        assert!(Dataset::load(&path).unwrap_err().is_deserialize());
    }
}
