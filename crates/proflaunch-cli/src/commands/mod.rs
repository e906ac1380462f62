pub mod completion;
pub mod config;
pub mod favorite;
pub mod history;
pub mod info;
pub mod list;
pub mod open;
pub mod overview;
pub mod search;
pub mod update;
pub mod url;
