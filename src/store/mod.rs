mod file;
mod memory;
mod notes;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use notes::{NoteStore, STORAGE_KEY};

use crate::error::Error;

/// A string key-value slot store, the platform's local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&mut self, key: &str, value: String) -> Result<(), Error>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), Error> {
        (**self).set(key, value)
    }
}

pub type DynStore = Box<dyn KeyValueStore + Send + Sync>;
