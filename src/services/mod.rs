// Service exports
pub mod airtable;
pub mod file;
pub mod openai;
pub mod oracle;
pub mod source;

pub use airtable::AirtableClient;
pub use file::FileSource;
pub use openai::OpenAiClient;
pub use oracle::{Oracle, OracleError};
pub use source::{PlaceSource, SourceError, SourceRow};
