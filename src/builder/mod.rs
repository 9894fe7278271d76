//! Generation, compilation and assembly.
//!
//! Each stage wraps one external collaborator (the code generator, the
//! per-runtime compiler) or a piece of local layout work, and hands a
//! typed result to the next.

pub mod assembler;
pub mod compiler;
pub mod dependency;
pub mod generator;
pub mod templates;

pub use assembler::{assemble, AssembledPackage, AssemblyInputs};
pub use compiler::{CompileOptions, DualRuntimeCompiler};
pub use dependency::DependencyPin;
pub use generator::{CodeGenerator, GeneratedFileSet};
