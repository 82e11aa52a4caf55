pub mod error;
pub mod traits;
pub mod types;

pub use error::FolioError;
pub use traits::AssetStore;
pub use types::DeleteOutcome;
