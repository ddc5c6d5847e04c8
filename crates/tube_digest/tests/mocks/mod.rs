pub mod captions;
pub mod datastore;
pub mod messenger;
pub mod summarizer;
