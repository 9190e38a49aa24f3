//! Environment variable interpolation for configuration text.

use std::{collections::HashMap, sync::LazyLock};

use regex::{Captures, Regex};

// Names are word characters plus `.`, which Java-style property names use.
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \$\$ |
        \$(?P<bare>[[:word:].]+) |
        \$\{(?P<braced>[[:word:].]+)(?:(?P<op>:?-|:?\?)(?P<arg>[^}]*))?\}",
    )
    .expect("variable pattern is valid")
});

/// Text with every variable reference replaced, plus warnings about unset
/// variables.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Interpolated {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Replaces `$VAR`, `${VAR}` and the shell-style `${VAR:-default}`,
/// `${VAR-default}`, `${VAR:?message}` and `${VAR?message}` forms.
///
/// `$$` is a literal `$`. An unset plain reference becomes empty and produces
/// a warning; a failed `?` form produces an error.
pub fn interpolate(
    input: &str,
    vars: &HashMap<String, String>,
) -> Result<Interpolated, Vec<String>> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let text = VARIABLE
        .replace_all(input, |caps: &Captures<'_>| {
            let Some(name) = caps.name("bare").or_else(|| caps.name("braced")) else {
                return "$".to_owned();
            };
            let name = name.as_str();
            let value = vars.get(name).map(String::as_str);
            let op = caps.name("op").map_or("", |m| m.as_str());
            let arg = caps.name("arg").map_or("", |m| m.as_str());

            match (op, value) {
                (":-" | ":?", Some(value)) if !value.is_empty() => value.to_owned(),
                ("-" | "?", Some(value)) => value.to_owned(),
                (":-" | "-", _) => arg.to_owned(),
                (":?", _) => {
                    errors.push(format!(
                        "Non-empty environment variable {name:?} required in config: {arg}"
                    ));
                    String::new()
                }
                ("?", _) => {
                    errors.push(format!(
                        "Missing environment variable {name:?} required in config: {arg}"
                    ));
                    String::new()
                }
                (_, Some(value)) => value.to_owned(),
                (_, None) => {
                    warnings.push(format!("Unknown environment variable {name:?} in config."));
                    String::new()
                }
            }
        })
        .into_owned();

    if errors.is_empty() {
        Ok(Interpolated { text, warnings })
    } else {
        Err(errors)
    }
}
