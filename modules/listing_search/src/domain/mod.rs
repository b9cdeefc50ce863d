//! Domain layer - filter extraction, sanitization and search orchestration

pub mod amount;
pub mod parser;
pub mod repository;
pub mod sanitizer;
pub mod service;
pub mod strategy;
pub mod taxonomy;

pub use parser::QueryParser;
pub use repository::ListingSearchRepository;
pub use sanitizer::{FilterSanitizer, RawFilters, SanitizerLimits};
pub use service::Service;
pub use strategy::{FilterExtractor, FilterResolver};
pub use taxonomy::{Category, LocationEntry, ModeSignals, Subcategory, Taxonomy};
