pub mod extract;
pub mod generate;
pub mod list;
pub mod report;

pub use extract::*;
pub use generate::*;
pub use list::*;
pub use report::*;
