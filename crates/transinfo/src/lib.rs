//! Translation info generation for compiler builtins.
//!
//! Reads a JSON description of builtins and their operand kinds and emits a
//! C++ header fragment with enumerations and `constexpr` tables describing
//! them, for inclusion into the compiler that recognizes those builtins.
//!
//! # Description format
//!
//! ```json
//! {
//!   "HelperStructures": {"OperandKind": ["VectorIn", "VectorOut"]},
//!   "BuiltinDescriptions": {
//!     "Add": {
//!       "Name": "add",
//!       "Operands": [
//!         {"Name": "DST", "Kind": "VectorOut"},
//!         {"Name": "SRC", "Kind": "VectorIn"}
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Pipeline: [`Description::from_file`] → [`validate`] → [`generate_file`].

pub mod codegen;
pub mod schema;
mod validation;

pub use codegen::{CodegenError, Conventions, generate_file};
pub use schema::{
    BuiltinDescriptions, BuiltinDescriptor, Description, HelperStructures, LoadError, NamedList,
    OperandDescriptor,
};
pub use validation::{ValidationError, validate};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Errors that can occur while turning a description into translation info.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid description: {0}")]
    Validation(#[from] ValidationError),

    #[error("internal generator error: {0}")]
    Codegen(#[from] CodegenError),

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load, validate and generate the translation info for the description at `path`.
pub fn generate_file_from_path<P: AsRef<Path>>(
    path: P,
    conventions: &Conventions,
) -> Result<String, Error> {
    let path = path.as_ref();
    let desc = Description::from_file(path)?;
    info!(
        path = %path.display(),
        helper_structures = desc.helper_structures.len(),
        builtins = desc.builtin_descriptions.len(),
        "loaded description"
    );
    generate_file(&desc, conventions)
}

/// Generate translation info from `desc_path` and write it to `output_path`.
///
/// The output file is only touched once the whole text has been generated,
/// so a failing description leaves any previous output in place.
pub fn translate_file<P, Q>(desc_path: P, output_path: Q, conventions: &Conventions) -> Result<(), Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let text = generate_file_from_path(desc_path, conventions)?;
    let output_path = output_path.as_ref();
    fs::write(output_path, &text).map_err(|source| Error::Write {
        path: output_path.to_path_buf(),
        source,
    })?;
    info!(path = %output_path.display(), bytes = text.len(), "wrote translation info");
    Ok(())
}
