//! Admin user management domain

pub mod collection;
pub mod errors;
pub mod selection;

pub use collection::{CollectionView, FetchOutcome, UserCollectionController};
pub use errors::{AdminError, AdminResult};
pub use selection::SelectionSet;
