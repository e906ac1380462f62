pub mod error;
pub mod rank;
pub mod search;
pub mod settings;
pub mod urls;

pub use error::{Error, Result};
pub use rank::{NO_NUMBER_RANK, rank_key, sort_by_number};
pub use search::{SearchMode, SearchOutcome, search};
pub use settings::Settings;
pub use urls::UrlCatalog;
