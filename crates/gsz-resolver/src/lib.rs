//! Static type-name resolution for the gsz compiler front end.
//!
//! Binds every type reference of a compile unit to a class declaration:
//! - `resolver` - the per-reference lookup cascade (`TypeResolver`)
//! - `imports` - per-module import table
//! - `hierarchy` - supertype walks and inheritance cycle detection
//! - `driver` / `driver_expressions` - walking modules, classes and bodies
//! - `external` - collaborator interface for types outside the compile set
//! - `options` - resolver configuration
//!
//! ```text
//! let report = resolve_compile_unit(&mut unit, &index, ResolverOptions::default());
//! ```

pub mod cache;
pub mod classifier;
pub mod context;
pub mod driver;
mod driver_expressions;
pub mod external;
pub mod hierarchy;
pub mod imports;
pub mod options;
pub mod resolver;
pub mod scope;
pub mod tracing_config;

pub use cache::FailureCache;
pub use context::{GenericBinding, ResolutionContext};
pub use driver::{ResolutionDriver, ResolutionReport, resolve_compile_unit};
pub use external::{ClassStub, ExternalResolver, LookupResult, NoExternalTypes, StaticTypeIndex};
pub use hierarchy::InheritanceChecker;
pub use imports::ImportTable;
pub use options::ResolverOptions;
pub use resolver::{LookupFlags, ModulePass, ResolveOutcome, TypeResolver};
pub use scope::ScopeStack;
