//! CSV Table Loader Module
//! Reads benchmark result tables into Polars DataFrames, keyed by source path.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("expect csv file arguments")]
    NoSources,
    #[error("Failed to load CSV {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// Loaded tables in the order their sources were given.
#[derive(Debug, Default, Clone)]
pub struct Tables {
    entries: Vec<(PathBuf, DataFrame)>,
}

impl Tables {
    /// Build from frames that are already in memory.
    #[cfg(test)]
    pub fn from_frames(frames: impl IntoIterator<Item = (PathBuf, DataFrame)>) -> Self {
        let mut tables = Self::default();
        for (path, df) in frames {
            tables.insert(path, df);
        }
        tables
    }

    fn insert(&mut self, path: PathBuf, df: DataFrame) {
        if let Some(slot) = self.entries.iter_mut().find(|(p, _)| *p == path) {
            slot.1 = df;
        } else {
            self.entries.push((path, df));
        }
    }

    pub fn get(&self, path: &Path) -> Option<&DataFrame> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, df)| df)
    }

    /// Number of columns of the table loaded from `path`.
    pub fn width(&self, path: &Path) -> Option<usize> {
        self.get(path).map(DataFrame::width)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &DataFrame)> {
        self.entries.iter().map(|(p, df)| (p.as_path(), df))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handles CSV file loading with Polars.
pub struct TableLoader;

impl TableLoader {
    /// Load every source fully into memory. One bad file fails the whole call.
    pub fn read_datafiles<P: AsRef<Path>>(paths: &[P]) -> Result<Tables, LoaderError> {
        if paths.is_empty() {
            return Err(LoaderError::NoSources);
        }

        let mut tables = Tables::default();
        for path in paths {
            let path = path.as_ref();
            if tables.get(path).is_some() {
                continue;
            }
            tables.insert(path.to_path_buf(), Self::load_csv(path)?);
            log::info!(
                "read {} : {} columns",
                path.display(),
                tables.width(path).unwrap_or_default()
            );
        }
        Ok(tables)
    }

    /// Load a single CSV file with a header row.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let read_err = |source| LoaderError::Read {
            path: path.to_path_buf(),
            source,
        };

        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()
            .map_err(read_err)?
            .collect()
            .map_err(read_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn empty_source_list_is_a_usage_error() {
        let paths: Vec<PathBuf> = Vec::new();
        let err = TableLoader::read_datafiles(&paths).unwrap_err();
        assert!(matches!(err, LoaderError::NoSources));
        assert_eq!(err.to_string(), "expect csv file arguments");
    }

    #[test]
    fn loads_one_table_per_source_with_header_width() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_fixture(
            &dir,
            "handel.csv",
            "totalNbOfNodes,net_sentBytes_avg,sigen_wall_avg\n10,2048,0.05\n100,4096,0.12\n",
        );
        let b = write_fixture(&dir, "complete.csv", "totalNbOfNodes,sigen_wall_avg\n10,0.2\n");

        let tables = TableLoader::read_datafiles(&[&a, &b]).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables.width(&a), Some(3));
        assert_eq!(tables.width(&b), Some(2));
        assert_eq!(tables.width(&dir.path().join("absent.csv")), None);
        assert_eq!(tables.get(&a).unwrap().height(), 2);

        let order: Vec<&Path> = tables.iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec![a.as_path(), b.as_path()]);
    }

    #[test]
    fn duplicate_sources_are_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_fixture(&dir, "dup.csv", "totalNbOfNodes,failing\n4000,10\n");
        let tables = TableLoader::read_datafiles(&[&a, &a]).unwrap();
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn missing_file_fails_the_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_fixture(&dir, "good.csv", "totalNbOfNodes\n10\n");
        let missing = good.with_file_name("does-not-exist.csv");

        let err = TableLoader::read_datafiles(&[&good, &missing]).unwrap_err();
        match err {
            LoaderError::Read { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
