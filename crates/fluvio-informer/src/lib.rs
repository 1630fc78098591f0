//!
//! # Shared informers
//!
//! Registry of list/watch pipelines shared by every controller of the process.
//! Each kind is observed by at most one pipeline, created on first request and
//! started with the pool it belongs to.
//!
mod error;

pub mod config;
pub mod factory;
pub mod informer;
pub mod kinds;
pub mod pipeline;
pub mod registry;
pub mod source;

pub use error::{ConfigError, InformerError};
pub use config::InformerConfig;
pub use factory::{InformerFactory, SharedInformers};
pub use informer::{Informer, Lister};
pub use registry::{InformerRegistry, SharedRegistry};

pub use fluvio_informer_model as model;
