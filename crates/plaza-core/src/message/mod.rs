//! Message persistence abstractions and the message store service.

pub mod repository;
pub mod store;

pub use repository::MessageRepository;
pub use store::MessageStore;
