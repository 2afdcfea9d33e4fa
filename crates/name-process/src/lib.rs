//! NAME run processes
//!
//! Validation and assembly of the parameters for a NAME dispersion-model
//! run, and dispatch of the assembled configuration to either an input-file
//! generator or a model runner.
//!
//! # Example
//!
//! ```rust
//! use name_process::{ParameterAssembler, ProcessSchema};
//!
//! let schema = ProcessSchema::basic();
//! let params = schema
//!     .decode(&[
//!         ("title", "test run"),
//!         ("timestamp", "daily"),
//!         ("startdate", "2017-01-01"),
//!         ("enddate", "2017-01-31"),
//!         ("elevationOut", "0-100"),
//!     ])
//!     .unwrap();
//!
//! let config = ParameterAssembler::new(&schema).assemble(&params).unwrap();
//! assert_eq!(config.elevation_ranges().unwrap()[0].max, 100);
//! ```

pub mod assembler;
pub mod collaborators;
pub mod dispatch;
pub mod domain;
pub mod params;
pub mod process;
pub mod range;
pub mod schema;
pub mod status;

// Re-export commonly used types
pub use assembler::{ConfigValue, ParameterAssembler, RunConfiguration, ValidationMode};
pub use collaborators::{InputFileGenerator, JsonInputFileGenerator, ModelRunResult, ModelRunner};
pub use dispatch::{
    FileEmissionDispatcher, ModelInvocationDispatcher, OutputDescriptor, OutputDispatcher,
    OutputValue, ProcessOutput,
};
pub use domain::{DomainBounds, DomainShape};
pub use params::{RawParameterSet, RawValue};
pub use process::{ExecuteResponse, NameProcess, ProcessDescription, ProcessSummary};
pub use range::ElevationRange;
pub use schema::{ParameterDescriptor, ParameterKind, ProcessSchema};
pub use status::{JobStatus, LogReporter, StatusReporter, StatusUpdate};
