pub mod candidate_service;
pub mod search;
pub mod storage_service;
