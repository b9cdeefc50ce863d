//! Infrastructure layer - search backends and external filter sources

pub mod ai;
pub mod storage;
