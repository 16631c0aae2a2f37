pub mod error;
pub mod spreadsheet;
pub mod text;
