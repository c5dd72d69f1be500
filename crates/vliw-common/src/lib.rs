pub mod bundle;
pub mod inst;
pub mod message;

pub use driver::Driver;

mod driver;
