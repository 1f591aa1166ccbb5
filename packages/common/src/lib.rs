pub mod data_dictionary;
pub mod error;
pub mod id_generator;
pub mod location;
pub mod resolver;
pub mod result;

pub use data_dictionary::*;
pub use error::*;
pub use id_generator::*;
pub use location::*;
pub use resolver::*;
pub use result::*;
