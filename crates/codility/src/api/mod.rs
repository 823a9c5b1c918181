//! Codility API client and the typed views the exporter reads

pub mod codility_api;
pub mod models;

pub use codility_api::CodilityAPI;
pub use models::{Candidate, CandidateInvite, SessionDetail, SessionRef, TestSummary};
