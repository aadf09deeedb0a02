pub mod error;
pub mod table;

pub use error::StoreError;
pub use table::{CsvTable, TableChange};
