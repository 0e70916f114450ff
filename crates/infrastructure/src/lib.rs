pub mod errors;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod pipeline;
pub mod repositories;

pub use errors::*;
pub use memory::*;
pub use models::*;
pub use mongo::*;
pub use pipeline::*;
pub use repositories::*;
