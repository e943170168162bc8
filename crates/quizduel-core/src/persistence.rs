//! Save/Load functionality for the local content store
//!
//! Uses bincode for compact binary serialization. A version number guards
//! against loading data written by an incompatible build.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::content::LocalContentStore;
use crate::error::ContentError;

/// Version number for the store format (increment when format changes)
const STORE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StoreData {
    version: u32,
    store: LocalContentStore,
}

/// Write the store to a writer
pub fn save_store<W: Write>(writer: W, store: &LocalContentStore) -> Result<(), SaveError> {
    let data = StoreData {
        version: STORE_VERSION,
        store: store.clone(),
    };
    bincode::serialize_into(writer, &data)?;
    log::debug!("Saved content store ({} cards)", store.card_count());
    Ok(())
}

/// Read a store previously written with [`save_store`]
pub fn load_store<R: Read>(reader: R) -> Result<LocalContentStore, SaveError> {
    let data: StoreData = bincode::deserialize_from(reader)?;

    if data.version != STORE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: STORE_VERSION,
            found: data.version,
        });
    }

    data.store.validate()?;

    log::debug!("Loaded content store ({} cards)", data.store.card_count());
    Ok(data.store)
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
    /// Decoded store holds cards that fail validation
    Content(ContentError),
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl From<ContentError> for SaveError {
    fn from(e: ContentError) -> Self {
        SaveError::Content(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Store version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SaveError::Content(e) => write!(f, "Invalid store content: {}", e),
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Card, ContentRepository};

    #[test]
    fn test_save_load_keeps_edits() {
        let mut store = LocalContentStore::seeded().unwrap();
        let cat = store.create_category("Chemie", "", "flask", "#0f0").unwrap();
        store
            .create_card(Card::new(cat, "H2O ist?", vec!["Wasser".into(), "Salz".into()], 0))
            .unwrap();

        let mut buffer = Vec::new();
        save_store(&mut buffer, &store).expect("Save failed");

        let loaded = load_store(&buffer[..]).expect("Load failed");
        assert_eq!(loaded.card_count(), store.card_count());
        assert_eq!(loaded.list_categories(), store.list_categories());

        // Id counters survive, so new cards do not collide
        let mut loaded = loaded;
        let next = loaded
            .create_card(Card::new(cat, "NaCl ist?", vec!["Salz".into(), "Zucker".into()], 0))
            .unwrap();
        assert!(store.card(next).is_none());
    }

    #[test]
    fn test_version_mismatch() {
        let data = StoreData {
            version: STORE_VERSION + 1,
            store: LocalContentStore::new(),
        };
        let buffer = bincode::serialize(&data).unwrap();

        match load_store(&buffer[..]) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, STORE_VERSION);
                assert_eq!(found, STORE_VERSION + 1);
            }
            other => panic!("expected version mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_rejects_invalid_cards() {
        use crate::components::Category;
        use std::collections::BTreeMap;

        // Same layout as LocalContentStore, written without its checks
        #[derive(Serialize)]
        struct RawStore {
            categories: BTreeMap<u32, Category>,
            cards: BTreeMap<u32, Card>,
            next_category_id: u32,
            next_card_id: u32,
        }
        #[derive(Serialize)]
        struct RawData {
            version: u32,
            store: RawStore,
        }

        let mut card = Card::new(1, "Nur eine Antwort?", vec!["Ja".into()], 0);
        card.id = 1;
        let data = RawData {
            version: STORE_VERSION,
            store: RawStore {
                categories: BTreeMap::from([(1, Category::new(1, "A"))]),
                cards: BTreeMap::from([(1, card)]),
                next_category_id: 2,
                next_card_id: 2,
            },
        };
        let buffer = bincode::serialize(&data).unwrap();

        assert!(matches!(
            load_store(&buffer[..]),
            Err(SaveError::Content(ContentError::InvalidQuestion(_)))
        ));
    }

    #[test]
    fn test_truncated_input() {
        assert!(matches!(load_store(&[1u8, 0][..]), Err(SaveError::Bincode(_))));
    }
}
