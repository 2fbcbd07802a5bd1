//! Incremental, timestamp-driven build orchestration.
//!
//! This crate decides which sources of which primaries need recompiling,
//! compiles them dependencies-first exactly once per [`BuildSession`], decides
//! which targets need relinking, and drives an external [`Toolchain`] and
//! [`LibraryResolver`] to do the work. Everything runs synchronously and stops
//! at the first error.

#![warn(missing_docs)]

pub mod bootstrap;
pub mod error;
pub mod layout;
pub mod library;
pub mod linker;
pub mod lone;
pub mod orchestrator;
pub mod report;
pub mod resolver;
pub mod scheduler;
pub mod session;
pub mod staleness;
pub mod toolchain;

pub use bootstrap::bootstrap_modules;
pub use error::{BuildError, ErrorKind};
pub use layout::{BuildLayout, LoneUnit, SourceUnit};
pub use library::{LibraryFlags, LibraryResolver, PkgConfig};
pub use linker::{LinkOutcome, TargetLinker};
pub use lone::build_lone_units;
pub use orchestrator::{run_executable, Orchestrator};
pub use report::BuildReport;
pub use resolver::{DependencyResolver, WorkItem};
pub use scheduler::BuildScheduler;
pub use session::{BuildPolicy, BuildSession};
pub use staleness::is_stale;
pub use toolchain::{CommandToolchain, Invocation, Toolchain};
