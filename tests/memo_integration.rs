//! Testes de integração para o memoizador em disco.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use decor::dataset::{Dataset, Values};
use decor::hooks::{DumpContext, DumpEvent, DumpHook, MetricsHook};
use decor::memo::{nc_dump, DumpOptions, Storable, DUMP_SUBDIR, FILENAME_KEYWORD};
use decor::{ArgValue, CallArgs, DecorError, DecorResult};

fn temp_store() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

/// Dataset com uma variável `sum` igual à soma dos argumentos inteiros.
fn sum_dataset(args: &CallArgs) -> Dataset {
    let sum: i32 = args
        .positional
        .iter()
        .filter_map(|v| match v {
            ArgValue::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        })
        .sum();
    let mut ds = Dataset::new();
    ds.add_variable("sum", &[], Values::Int(vec![sum])).unwrap();
    ds.set_attribute("source", Values::text("sum_dataset")).unwrap();
    ds
}

// Cenários principais
mod scenario_tests {
    use super::*;

    #[test]
    fn test_first_call_computes_second_call_loads() {
        let (_temp_dir, store) = temp_store();
        let calls = Cell::new(0);
        let mut memo = DumpOptions::new().store_path(&store).wrap(|args: &CallArgs| {
            calls.set(calls.get() + 1);
            Some(sum_dataset(args))
        });

        let args = CallArgs::new().arg(1).arg(2);
        let first = memo.call(&args).unwrap().expect("result");
        assert_eq!(calls.get(), 1);
        assert!(store.join(DUMP_SUBDIR).join("12.nc").is_file());

        let second = memo.call(&args).unwrap().expect("result");
        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(
            second.variable("sum").unwrap().data,
            Values::Int(vec![3])
        );
    }

    #[test]
    fn test_explicit_filename_ignores_arguments() {
        let (_temp_dir, store) = temp_store();
        let calls = Cell::new(0);
        let mut memo = DumpOptions::new()
            .store_path(&store)
            .filename("result.nc")
            .wrap(|args: &CallArgs| {
                calls.set(calls.get() + 1);
                Some(sum_dataset(args))
            });

        let a = CallArgs::new().arg(1).arg(2);
        let b = CallArgs::new().arg(100);
        assert_eq!(memo.target_path(&a).unwrap(), memo.target_path(&b).unwrap());

        let first = memo.call(&a).unwrap().unwrap();
        let second = memo.call(&b).unwrap().unwrap();

        // Mesmo arquivo: o segundo resultado é o primeiro, não 100
        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert!(store.join(DUMP_SUBDIR).join("result.nc").is_file());
    }

    #[test]
    fn test_missing_directory_is_created() {
        let (_temp_dir, store) = temp_store();
        let nested = store.join("deep").join("er");
        assert!(!nested.exists());

        let mut memo = DumpOptions::new()
            .store_path(&nested)
            .wrap(|args: &CallArgs| Some(sum_dataset(args)));
        memo.call(&CallArgs::new().arg(4)).unwrap();

        assert!(nested.join(DUMP_SUBDIR).is_dir());
        assert!(nested.join(DUMP_SUBDIR).join("4.nc").is_file());
    }

    #[test]
    fn test_keyword_filename_override() {
        let (_temp_dir, store) = temp_store();
        let mut memo = DumpOptions::new()
            .store_path(&store)
            .wrap(|args: &CallArgs| Some(sum_dataset(args)));

        let args = CallArgs::new()
            .arg(1)
            .kwarg(FILENAME_KEYWORD, "custom_name.nc");
        memo.call(&args).unwrap();

        assert!(store.join(DUMP_SUBDIR).join("custom_name.nc").is_file());
    }

    #[test]
    fn test_default_store_is_current_dir() {
        let memo = nc_dump(|args: &CallArgs| Some(sum_dataset(args)));
        let expected = std::env::current_dir().unwrap().join(DUMP_SUBDIR).join("12.nc");
        assert_eq!(
            memo.target_path(&CallArgs::new().arg(1).arg(2)).unwrap(),
            expected
        );
    }

    #[test]
    fn test_absolute_names_stay_under_dump_dir() {
        let (_temp_dir, store) = temp_store();
        let (_outside_dir, outside) = temp_store();
        let dump_dir = store.join(DUMP_SUBDIR);

        let mut memo = DumpOptions::new()
            .store_path(&store)
            .try_keep_chars(200)
            .unwrap()
            .wrap(|args: &CallArgs| Some(sum_dataset(args)));

        let derived = CallArgs::new().arg(outside.join("x").display().to_string());
        let path = memo.target_path(&derived).unwrap();
        assert!(path.starts_with(&dump_dir), "{} escaped", path.display());

        memo.call(&derived).unwrap();
        assert!(path.is_file());
        assert!(!outside.join("x.nc").exists());

        let keyword = CallArgs::new().kwarg(FILENAME_KEYWORD, "/../escape.nc");
        assert_eq!(
            memo.target_path(&keyword).unwrap(),
            dump_dir.join("escape.nc")
        );
    }
}

// Política de resultado vazio e persistência entre execuções
mod policy_tests {
    use super::*;

    #[test]
    fn test_none_result_recomputes() {
        let (_temp_dir, store) = temp_store();
        let calls = Cell::new(0);
        let mut memo = DumpOptions::new()
            .store_path(&store)
            .wrap(|_: &CallArgs| -> Option<Dataset> {
                calls.set(calls.get() + 1);
                None
            });

        let args = CallArgs::new().arg(9);
        assert!(memo.call(&args).unwrap().is_none());
        assert!(memo.call(&args).unwrap().is_none());

        assert_eq!(calls.get(), 2);
        assert!(!memo.target_path(&args).unwrap().exists());
    }

    #[test]
    fn test_reuse_across_memoizer_instances() {
        let (_temp_dir, store) = temp_store();
        let args = CallArgs::new().arg(5).arg(6);

        let mut first_run = DumpOptions::new()
            .store_path(&store)
            .wrap(|a: &CallArgs| Some(sum_dataset(a)));
        let stored = first_run.call(&args).unwrap().unwrap();

        // Nova instância, como em outra execução do processo
        let calls = Cell::new(0);
        let mut second_run = DumpOptions::new().store_path(&store).wrap(|a: &CallArgs| {
            calls.set(calls.get() + 1);
            Some(sum_dataset(a))
        });
        let loaded = second_run.call(&args).unwrap().unwrap();

        assert_eq!(calls.get(), 0);
        assert_eq!(stored, loaded);
    }

    #[test]
    fn test_stale_file_is_not_invalidated() {
        let (_temp_dir, store) = temp_store();
        let args = CallArgs::new().arg(1);

        let mut old = DumpOptions::new()
            .store_path(&store)
            .wrap(|a: &CallArgs| Some(sum_dataset(a)));
        old.call(&args).unwrap();

        let mut changed = DumpOptions::new().store_path(&store).wrap(|_: &CallArgs| {
            let mut ds = Dataset::new();
            ds.add_variable("other", &[], Values::Double(vec![0.0])).unwrap();
            Some(ds)
        });
        let result = changed.call(&args).unwrap().unwrap();

        assert!(result.variable("sum").is_some());
        assert!(result.variable("other").is_none());
    }

    #[test]
    fn test_deleted_file_resumes_computation() {
        let (_temp_dir, store) = temp_store();
        let calls = Cell::new(0);
        let mut memo = DumpOptions::new().store_path(&store).wrap(|a: &CallArgs| {
            calls.set(calls.get() + 1);
            Some(sum_dataset(a))
        });

        let args = CallArgs::new().arg(2);
        memo.call(&args).unwrap();
        std::fs::remove_file(memo.target_path(&args).unwrap()).unwrap();
        memo.call(&args).unwrap();

        assert_eq!(calls.get(), 2);
    }
}

// Propagação de erros
mod error_tests {
    use super::*;

    #[test]
    fn test_unwritable_store_path_propagates() {
        let (_temp_dir, store) = temp_store();
        let not_a_dir = store.join("plain_file");
        std::fs::write(&not_a_dir, b"x").unwrap();

        let mut memo = DumpOptions::new()
            .store_path(&not_a_dir)
            .wrap(|a: &CallArgs| Some(sum_dataset(a)));

        let err = memo.call(&CallArgs::new().arg(1)).unwrap_err();
        assert!(err.is_filesystem(), "unexpected error: {}", err);
    }

    #[test]
    fn test_corrupt_file_propagates() {
        let (_temp_dir, store) = temp_store();
        let dump_dir = store.join(DUMP_SUBDIR);
        std::fs::create_dir_all(&dump_dir).unwrap();
        std::fs::write(dump_dir.join("result.nc"), b"CDF\x01broken").unwrap();

        let calls = Cell::new(0);
        let mut memo = DumpOptions::new()
            .store_path(&store)
            .filename("result.nc")
            .wrap(|a: &CallArgs| {
                calls.set(calls.get() + 1);
                Some(sum_dataset(a))
            });

        let err = memo.call(&CallArgs::new()).unwrap_err();
        assert!(matches!(err, DecorError::Deserialize { .. }));
        assert_eq!(calls.get(), 0);
    }
}

// Hooks que falham não afetam o resultado
mod hook_tests {
    use super::*;
    use std::sync::Arc;

    struct RejectEvent(DumpEvent);

    impl DumpHook for RejectEvent {
        fn name(&self) -> &str {
            "reject"
        }

        fn execute(&self, context: &DumpContext<'_>) -> DecorResult<()> {
            if context.event == self.0 {
                return Err(DecorError::other(format!("{} recusado", context.event)));
            }
            Ok(())
        }
    }

    #[test]
    fn test_failing_stored_hook_keeps_fresh_result() {
        let (_temp_dir, store) = temp_store();
        let calls = Cell::new(0);
        let mut memo = DumpOptions::new()
            .store_path(&store)
            .wrap(|a: &CallArgs| {
                calls.set(calls.get() + 1);
                Some(sum_dataset(a))
            })
            .with_hook(Box::new(RejectEvent(DumpEvent::Stored)));

        let args = CallArgs::new().arg(2).arg(3);
        let first = memo.call(&args).unwrap().expect("fresh result");
        assert_eq!(first.variable("sum").unwrap().data, Values::Int(vec![5]));

        let second = memo.call(&args).unwrap().expect("stored result");
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failing_hit_hook_keeps_loaded_result() {
        let (_temp_dir, store) = temp_store();
        let metrics = Arc::new(MetricsHook::new());
        let mut memo = DumpOptions::new()
            .store_path(&store)
            .wrap(|a: &CallArgs| Some(sum_dataset(a)))
            .with_hook(Box::new(RejectEvent(DumpEvent::Hit)))
            .with_hook(Box::new(metrics.clone()));

        let args = CallArgs::new().arg(4);
        memo.call(&args).unwrap();
        assert!(memo.call(&args).unwrap().is_some());

        // O hook que falha interrompe a cadeia daquele evento
        assert_eq!(metrics.metrics().stores, 1);
        assert_eq!(metrics.metrics().hits, 0);
    }
}

// Resultados próprios via trait Storable
mod custom_storable_tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Note(String);

    impl Storable for Note {
        fn save(&self, path: &Path) -> DecorResult<()> {
            std::fs::write(path, &self.0).map_err(|e| DecorError::filesystem(path, e))
        }

        fn load(path: &Path) -> DecorResult<Self> {
            std::fs::read_to_string(path)
                .map(Note)
                .map_err(|e| DecorError::filesystem(path, e))
        }
    }

    #[test]
    fn test_custom_result_type() {
        let (_temp_dir, store) = temp_store();
        let calls = Cell::new(0);
        let mut memo = DumpOptions::new().store_path(&store).wrap(|a: &CallArgs| {
            calls.set(calls.get() + 1);
            Some(Note(format!("hello {}", a)))
        });

        let args = CallArgs::new().arg("world");
        let first = memo.call(&args).unwrap().unwrap();
        let second = memo.call(&args).unwrap().unwrap();

        assert_eq!(first, Note("hello \"world\"".to_string()));
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
        assert!(store.join(DUMP_SUBDIR).join("world.nc").is_file());
    }
}
