//! Question model.
//!
//! Records produced by the parser, the column schemas that lay them out as
//! spreadsheet rows, and the media resources carried by source documents.

mod question;
mod resource;
mod schema;

pub use question::*;
pub use resource::*;
pub use schema::*;
