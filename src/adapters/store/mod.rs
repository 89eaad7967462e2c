//! Document store adapters.

mod firestore;
mod in_memory;
mod value;

pub use firestore::{FirestoreConfig, FirestoreDocumentStore};
pub use in_memory::InMemoryDocumentStore;
pub use value::{from_firestore_document, to_firestore_document};
