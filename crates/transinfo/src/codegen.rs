//! Translation info generation from a builtin description.
//!
//! The output is a C++ fragment of enumerations and `constexpr` arrays. It is
//! not a standalone translation unit: it is included verbatim into a source
//! file that already provides the surrounding namespace.
//!
//! Layout of the generated text, with declarations separated by a blank line:
//! - autogenerated-file header
//! - one enumeration per helper structure
//! - `BuiltinID` enumeration and the `BuiltinNames` table
//! - one `<Builtin>Operand` enumeration per builtin
//! - the `BuiltinOperandSize` table
//! - one `<Builtin>OperandKind` array per builtin that has operands
//! - the combined `BuiltinOperandKind` table

use crate::schema::{
    BuiltinDescriptions, BuiltinDescriptor, Description, HelperStructures, OPERAND_KIND,
};
use crate::validation::validate;
use thiserror::Error;
use tracing::debug;

/// Separator between C++ declarations.
pub const DECL_SEPARATOR: &str = "\n\n";

/// Prefix of every builtin's external name.
pub const DEFAULT_BUILTIN_PREFIX: &str = "__cm_cl_";

pub const DEFAULT_HEADER: &str =
    "// AUTOGENERATED FILE, DO NOT EDIT!\n// Generated by generate-translation-info.";

/// Suffix of builtin operand name enums.
pub const OPERAND_NAME: &str = "Operand";

/// Trailing enumerator whose value is the number of entries before it.
pub const SIZE: &str = "Size";

/// Stands in for the operand kind array of a builtin without operands.
pub const NULL_POINTER: &str = "nullptr";

/// Errors that can occur during code generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("cannot generate an empty array: {name}")]
    EmptyArray { name: String },
}

/// Naming conventions of the generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conventions {
    /// Prepended to each builtin `Name` in the `BuiltinNames` table
    pub builtin_prefix: String,
    /// Comment placed at the top of the generated file
    pub header: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Conventions {
            builtin_prefix: DEFAULT_BUILTIN_PREFIX.to_string(),
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

/// Generate an enumeration scoped in its own namespace:
///
/// ```text
/// namespace Name {
/// enum Enum {
///   values[0],
///   values[1]
/// };
/// } // namespace Name
/// ```
pub fn generate_enum<S: AsRef<str>>(name: &str, values: &[S]) -> String {
    let body = indented_list(values);
    format!("namespace {name} {{\nenum Enum {{\n{body}\n}};\n}} // namespace {name}")
}

/// Generate a constant array:
///
/// ```text
/// constexpr c_type name[] = {
///   values[0],
///   values[1]
/// };
/// ```
///
/// Zero-sized arrays cannot be declared this way, so an empty `values` is an
/// error. Callers special-case empty lists before getting here.
pub fn generate_array<S: AsRef<str>>(
    c_type: &str,
    name: &str,
    values: &[S],
) -> Result<String, CodegenError> {
    if values.is_empty() {
        return Err(CodegenError::EmptyArray {
            name: name.to_string(),
        });
    }
    let body = indented_list(values);
    Ok(format!("constexpr {c_type} {name}[] = {{\n{body}\n}};"))
}

fn indented_list<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|value| format!("  {}", value.as_ref()))
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Returns the values followed by the `Size` sentinel.
pub fn append_size<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(Into::into)
        .chain(std::iter::once(SIZE.to_string()))
        .collect()
}

/// Enumerations for the helper structures, in declaration order.
pub fn generate_helper_enums(helper_structures: &HelperStructures) -> String {
    helper_structures
        .iter()
        .map(|(name, values)| generate_enum(name, values))
        .collect::<Vec<_>>()
        .join(DECL_SEPARATOR)
}

/// `BuiltinNames[id]` is the external name of builtin `BuiltinID::id`.
pub fn generate_builtin_names_array(
    builtins: &BuiltinDescriptions,
    conventions: &Conventions,
) -> Result<String, CodegenError> {
    let names: Vec<String> = builtins
        .values()
        .map(|desc| format!("\"{}{}\"", conventions.builtin_prefix, desc.name))
        .collect();
    generate_array("const char*", "BuiltinNames", &names)
}

/// Operand name enum of one builtin. `<Builtin>Operand::Size` is its operand count.
pub fn generate_operand_names_enum(builtin: &str, desc: &BuiltinDescriptor) -> String {
    let names = append_size(desc.operands.iter().map(|operand| operand.name.as_str()));
    generate_enum(&format!("{builtin}{OPERAND_NAME}"), &names)
}

pub fn generate_operand_names_enums(builtins: &BuiltinDescriptions) -> String {
    builtins
        .iter()
        .map(|(builtin, desc)| generate_operand_names_enum(builtin, desc))
        .collect::<Vec<_>>()
        .join(DECL_SEPARATOR)
}

/// Operand count of every builtin, as references to its `Size` enumerator.
pub fn generate_operand_size_array(builtins: &BuiltinDescriptions) -> Result<String, CodegenError> {
    let sizes: Vec<String> = builtins
        .keys()
        .map(|builtin| format!("{builtin}{OPERAND_NAME}::{SIZE}"))
        .collect();
    generate_array("int", "BuiltinOperandSize", &sizes)
}

/// Operand kinds of one builtin. Fails for a builtin without operands.
pub fn generate_operand_kinds_array(
    builtin: &str,
    desc: &BuiltinDescriptor,
) -> Result<String, CodegenError> {
    let kinds: Vec<String> = desc
        .operands
        .iter()
        .map(|operand| format!("{OPERAND_KIND}::{}", operand.kind))
        .collect();
    generate_array(
        &format!("{OPERAND_KIND}::Enum"),
        &format!("{builtin}{OPERAND_KIND}"),
        &kinds,
    )
}

/// Operand kind arrays of every builtin that has operands.
pub fn generate_operand_kinds_arrays(builtins: &BuiltinDescriptions) -> Result<String, CodegenError> {
    let arrays = builtins
        .iter()
        .filter(|(_, desc)| desc.has_operands())
        .map(|(builtin, desc)| generate_operand_kinds_array(builtin, desc))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(arrays.join(DECL_SEPARATOR))
}

/// Name of the builtin's operand kind array, or `nullptr` when it has no operands.
pub fn operand_kinds_array_pointer(builtin: &str, desc: &BuiltinDescriptor) -> String {
    if desc.has_operands() {
        format!("{builtin}{OPERAND_KIND}")
    } else {
        NULL_POINTER.to_string()
    }
}

/// Table of pointers to the per-builtin operand kind arrays, so the kind of
/// operand `m` of builtin `n` is `BuiltinOperandKind[n][m]`.
pub fn generate_combined_operand_kinds_array(
    builtins: &BuiltinDescriptions,
) -> Result<String, CodegenError> {
    let pointers: Vec<String> = builtins
        .iter()
        .map(|(builtin, desc)| operand_kinds_array_pointer(builtin, desc))
        .collect();
    generate_array(
        &format!("const {OPERAND_KIND}::Enum*"),
        &format!("Builtin{OPERAND_KIND}"),
        &pointers,
    )
}

/// Enumerations and arrays describing the builtins.
pub fn generate_builtin_descriptions(
    builtins: &BuiltinDescriptions,
    conventions: &Conventions,
) -> Result<String, CodegenError> {
    let decls = [
        generate_enum("BuiltinID", &append_size(builtins.keys())),
        generate_builtin_names_array(builtins, conventions)?,
        generate_operand_names_enums(builtins),
        generate_operand_size_array(builtins)?,
        generate_operand_kinds_arrays(builtins)?,
        generate_combined_operand_kinds_array(builtins)?,
    ];
    Ok(decls.join(DECL_SEPARATOR))
}

/// Validate the description and generate the whole output file text.
pub fn generate_file(desc: &Description, conventions: &Conventions) -> Result<String, crate::Error> {
    validate(desc)?;

    let helper_enums = generate_helper_enums(&desc.helper_structures);
    debug!(
        structures = desc.helper_structures.len(),
        "generated helper enumerations"
    );

    let builtin_decls = generate_builtin_descriptions(&desc.builtin_descriptions, conventions)?;
    debug!(
        builtins = desc.builtin_descriptions.len(),
        "generated builtin descriptions"
    );

    Ok([
        conventions.header.as_str(),
        helper_enums.as_str(),
        builtin_decls.as_str(),
    ]
    .join(DECL_SEPARATOR))
}
