//! External system integrations for sumo-export.
//!
//! - [`sumo`] - Sumo Logic search job API (create, poll, page, delete)
//! - [`storage`] - Object storage for finished CSV files (S3, in-memory)
//!
//! # Design Pattern
//!
//! Each integration sits behind a trait ([`sumo::SearchApi`],
//! [`storage::ObjectStore`]) so the core logic can be exercised against
//! scripted or in-memory implementations.
//!
//! ```rust,no_run
//! use sumo_export::adapters::sumo::{HttpTransport, SumoSearchApi};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("access-id", "access-key", Duration::from_secs(120))?;
//! let api = SumoSearchApi::new("https://api.sumologic.com/api/v1/search/jobs", transport);
//! # Ok(())
//! # }
//! ```

pub mod storage;
pub mod sumo;
