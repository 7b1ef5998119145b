//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (UploadedFile, SubmissionDraft, Submission, UploadResult, SubmissionRecord)
//! - Domain value objects (ContactFields, SubmissionLimits, RemoteFile)
//! - Domain services (validation, link resolution, row building)
//! - Repository traits (FileStorage, SubmissionLedger)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
