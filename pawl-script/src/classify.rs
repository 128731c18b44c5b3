//! Splitting caller-supplied arguments into parameters and variables
//!
//! Arguments whose names match a declared formal parameter are bound by
//! parameter passing; everything else is injected as session variables.

use pawl_core::VariableMap;

use crate::params::ParameterInfo;

/// Result of [`classify_arguments`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedArguments {
    /// Bindings for declared formal parameters, keyed by the declared spelling
    pub parameters: VariableMap,
    /// Everything else, injected as session variables before the run
    pub variables: VariableMap,
}

/// Classify name/value argument pairs against a script's declared parameters.
/// Matching is case-insensitive; matched names adopt the declared spelling.
pub fn classify_arguments<I, K, V>(parameters: &[ParameterInfo], arguments: I) -> ClassifiedArguments
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut classified = ClassifiedArguments::default();

    for (name, value) in arguments {
        let declared = parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.as_ref()));

        match declared {
            Some(parameter) => classified.parameters.insert(parameter.name.clone(), value),
            None => classified.variables.insert(name.as_ref(), value),
        }
    }

    classified
}
