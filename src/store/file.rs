use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::KeyValueStore;
use crate::error::Error;

/// One JSON file per key under a data directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
                _ => '_',
            })
            .collect();

        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip(self, value))]
    fn set(&mut self, key: &str, value: String) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)?;

        // write-then-rename so a crash never leaves a half-written slot
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        Ok(())
    }
}

#[test]
fn file_store_round_trips_values() {
    let dir = std::env::temp_dir().join(format!("geonotes-{}", uuid::Uuid::new_v4()));
    let mut store = FileStore::new(&dir);

    assert_eq!(store.get("geoNotes:v1").unwrap(), None);

    store.set("geoNotes:v1", "[]".into()).unwrap();
    assert_eq!(store.get("geoNotes:v1").unwrap().as_deref(), Some("[]"));
    assert!(dir.join("geoNotes_v1.json").exists());

    store.set("geoNotes:v1", "[1]".into()).unwrap();
    assert_eq!(store.get("geoNotes:v1").unwrap().as_deref(), Some("[1]"));

    fs::remove_dir_all(&dir).unwrap();
}
