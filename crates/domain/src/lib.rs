pub mod errors;
pub mod filter;
pub mod todo;

pub use errors::*;
pub use filter::*;
pub use todo::*;
