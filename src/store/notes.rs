use super::KeyValueStore;
use crate::entities::Note;
use crate::error::Error;

pub const STORAGE_KEY: &str = "geoNotes:v1";

/// Ordered note list mirrored to a single storage slot.
#[derive(Debug)]
pub struct NoteStore<S> {
    backend: S,
    notes: Vec<Note>,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Opens the store and loads whatever is persisted.
    pub fn open(backend: S) -> Self {
        let mut store = Self {
            backend,
            notes: vec![],
        };
        store.notes = store.load();
        store
    }

    /// Reads the persisted list. Missing or unreadable payloads yield an empty list.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Vec<Note> {
        let raw = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return vec![],
            Err(err) => {
                tracing::error!("failed to read notes: {}", err);
                return vec![];
            }
        };

        match serde_json::from_str(&raw) {
            Ok(notes) => notes,
            Err(err) => {
                tracing::error!("failed to load notes: {}", err);
                vec![]
            }
        }
    }

    /// Overwrites the slot with the full list.
    #[tracing::instrument(skip(self, notes), fields(count = notes.len()))]
    pub fn save(&mut self, notes: &[Note]) -> Result<(), Error> {
        let payload = serde_json::to_string(notes)?;
        self.backend.set(STORAGE_KEY, payload)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn find(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Appends and persists.
    pub fn add(&mut self, note: Note) -> Result<(), Error> {
        self.notes.push(note);
        let notes = self.notes.clone();
        self.save(&notes)
    }

    /// Drops the note with `id` and persists. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> Result<bool, Error> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        let removed = self.notes.len() != before;

        let notes = self.notes.clone();
        self.save(&notes)?;

        Ok(removed)
    }
}

#[cfg(test)]
fn note(id: &str, lat: f64, lng: f64) -> Note {
    Note {
        id: id.into(),
        text: id.to_uppercase(),
        lat,
        lng,
        ts: 1_700_000_000_000,
    }
}

#[cfg(test)]
fn persisted(store: &NoteStore<super::MemoryStore>) -> Vec<Note> {
    let raw = store.backend().get(STORAGE_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn empty_storage_loads_empty_list() {
    let store = NoteStore::open(super::MemoryStore::new());
    assert!(store.notes().is_empty());
}

#[test]
fn malformed_payload_loads_empty_list() {
    let store = NoteStore::open(super::MemoryStore::with_entry(STORAGE_KEY, "{not json"));
    assert!(store.notes().is_empty());

    let store = NoteStore::open(super::MemoryStore::with_entry(
        STORAGE_KEY,
        r#"[{"id": 1}]"#,
    ));
    assert!(store.notes().is_empty());
}

#[test]
fn save_then_load_returns_same_notes() {
    let mut store = NoteStore::open(super::MemoryStore::new());
    let notes = vec![note("a", 10.0, 20.0), note("b", -33.8688, 151.2093)];

    store.save(&notes).unwrap();
    assert_eq!(store.load(), notes);
}

#[test]
fn persisted_list_tracks_every_mutation() {
    let mut store = NoteStore::open(super::MemoryStore::new());

    store.add(note("a", 0.0, 0.0)).unwrap();
    assert_eq!(persisted(&store), store.notes());

    store.add(note("b", 1.0, 1.0)).unwrap();
    store.add(note("c", 2.0, 2.0)).unwrap();
    assert_eq!(persisted(&store), store.notes());

    assert!(store.remove("b").unwrap());
    assert_eq!(persisted(&store), store.notes());

    let ids: Vec<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn removing_unknown_id_is_a_no_op() {
    let mut store = NoteStore::open(super::MemoryStore::new());
    store.add(note("a", 0.0, 0.0)).unwrap();

    assert!(!store.remove("zzz").unwrap());
    assert_eq!(store.notes().len(), 1);
    assert_eq!(persisted(&store), store.notes());
}

#[test]
fn reopening_sees_previous_writes() {
    let mut store = NoteStore::open(super::MemoryStore::new());
    store.add(note("a", 0.0, 0.0)).unwrap();

    let reopened = NoteStore::open(store.backend().clone());
    assert_eq!(reopened.notes(), store.notes());
    assert!(reopened.find("a").is_some());
}
