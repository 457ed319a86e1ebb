//! # sf-script
//!
//! The contract between an integration script and the automation platform
//! that hosts it.
//!
//! A script publishes a [`ScriptDescription`] (the parameters it reads, with
//! their types, defaults, and required flags) and is invoked with an
//! [`ExecutionContext`] that resolves those parameters and provides output
//! resources.
//!
//! ## Bindings
//!
//! - [`LocalContext`] - output resources are files under a root directory
//! - [`MemoryContext`] - output resources are kept in memory, for tests and
//!   embedding
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_script::{ExecutionContext, LocalContext, Parameters};
//!
//! let params: Parameters = [("targetDataPath", "out/accounts.json")].into_iter().collect();
//! let ctx = LocalContext::new("/var/lib/evolve/run-42", params);
//!
//! let path = ctx.parameters().require("targetDataPath")?;
//! ctx.write_text(path, "{}").await?;
//! ```

mod context;
mod description;
mod error;
mod local;
mod memory;

pub use context::{ExecutionContext, Parameters};
pub use description::{ParameterSpec, ParameterType, ScriptDescription};
pub use error::{Error, ErrorKind, Result};
pub use local::{LocalContext, LocalSink};
pub use memory::{MemoryContext, MemorySink};
