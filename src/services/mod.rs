//! Backend access and the per-user storage logic built on it.

pub mod object_store;
pub mod s3_store;
pub mod storage_service;
