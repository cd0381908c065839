//! Flat-file record stores for the box office.
//!
//! Each collection lives in its own text file, one record per line, in the
//! format defined by `boxoffice_core::codec`. Files are read once when a
//! repository opens and rewritten whole after every change.
//!
//! - A missing file loads as an empty collection
//! - Malformed lines are skipped and counted, never fatal
//! - Saves go to a temporary file in the same directory which is then renamed
//!   over the target, so a failed save leaves the previous file intact
//!
//! # Example
//!
//! ```no_run
//! use boxoffice_flatfile::DataFiles;
//! use boxoffice_core::{AdminCredentials, BoxOffice, Limits, SystemClock};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = DataFiles::in_dir("data");
//! let office = BoxOffice::open(
//!     files.stores(),
//!     &Limits::default(),
//!     AdminCredentials::default(),
//!     Arc::new(SystemClock),
//! )?;
//! println!("{}", office.sales_report());
//! # Ok(())
//! # }
//! ```

mod files;

pub use files::{DataFiles, FlatFileStore};
