//! Storage layer - listing records and the in-memory search backend

pub mod entity;
pub mod mapper;
pub mod repositories;

pub use repositories::InMemoryListingRepository;
