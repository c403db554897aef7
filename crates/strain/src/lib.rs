mod catalog;
mod error;
mod query;
mod recommend;
mod record;
mod sampling;
mod store;

pub use catalog::*;
pub use error::*;
pub use query::*;
pub use recommend::*;
pub use record::*;
pub use sampling::*;
pub use store::*;
