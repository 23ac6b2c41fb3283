//! Test helpers for building UN/LOCODE databases on disk.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use unlocode_core::{Function, NewCountry, NewLocode, SqliteLocodeStore};

/// A small Dutch and Belgian dataset persisted to a temporary SQLite file.
#[derive(Debug)]
pub(super) struct LocodeDatabase {
    _dir: TempDir,
    root: Utf8PathBuf,
    path: Utf8PathBuf,
}

impl LocodeDatabase {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let path = root.join("unlocode.db");
        populate(&path);
        Self {
            _dir: dir,
            root,
            path,
        }
    }

    pub(super) fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn populate(path: &Utf8Path) {
    let store = SqliteLocodeStore::open(path.as_std_path()).expect("create database");
    let country = |code: &str, name: &str| {
        let new = NewCountry::new(code, name).expect("valid country code");
        store.insert_country(&new).expect("insert country")
    };
    let netherlands = country("NL", "NETHERLANDS");
    let belgium = country("BE", "Belgium");

    for locode in [
        NewLocode::named("Eindhoven")
            .with_city_code("EIN")
            .in_country(&netherlands)
            .with_function(Function::RoadTerminal)
            .with_function(Function::Airport),
        NewLocode::named("Venlo")
            .with_city_code("VEN")
            .in_country(&netherlands)
            .with_function(Function::RailTerminal)
            .with_function(Function::RoadTerminal),
        NewLocode::named("Antwerpen")
            .with_alternative_name("Anvers")
            .with_city_code("ANR")
            .in_country(&belgium)
            .with_function(Function::Port)
            .with_function(Function::RailTerminal),
    ] {
        store.insert_locode(&locode).expect("insert locode");
    }
}

/// Decode captured command output.
pub(super) fn output_json(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).expect("output should be JSON")
}

/// Names listed in a JSON array of location views.
pub(super) fn output_names(stdout: &[u8]) -> Vec<String> {
    output_json(stdout)
        .as_array()
        .expect("output should be a JSON array")
        .iter()
        .map(|view| view["name"].as_str().expect("name is a string").to_owned())
        .collect()
}
