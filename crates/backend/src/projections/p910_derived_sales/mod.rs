pub mod ad_allocator;
pub mod export;
pub mod filter;
pub mod projection_builder;
pub mod service;
