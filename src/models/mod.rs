pub mod document;
pub mod test_case;
pub mod test_status;

pub use document::{DocumentNode, TableRow, MAX_DEPTH};
pub use test_case::{
    SheetRow, TestCaseBatch, TestCaseRecord, LIST_SEPARATOR, MAX_TEST_CASES, SHEET_HEADERS,
};
pub use test_status::{TestStatus, UnknownStatus};
