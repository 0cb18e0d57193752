// FwCollect - Firmware Artifact Collector
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! `$NAME` / `${NAME}` expansion for build-tool supplied paths.

use std::collections::HashMap;

pub type Variables = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubstError {
    #[error("Unknown variable '${0}'")]
    UnknownVariable(String),
    #[error("Invalid variable name '{0}'")]
    InvalidName(String),
    #[error("Unterminated '${{' in '{0}'")]
    Unterminated(String),
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn lookup<'a>(vars: &'a Variables, name: &str) -> Result<&'a str, SubstError> {
    vars.get(name)
        .map(String::as_str)
        .ok_or_else(|| SubstError::UnknownVariable(name.to_string()))
}

/// Expands `$NAME` and `${NAME}` references in `template`.
///
/// `$$` produces a literal `$`, and a `$` not followed by a name is kept
/// as-is. Bare names are matched greedily, so `${NAME}` must be used when a
/// name is immediately followed by a word character.
pub fn subst(template: &str, vars: &Variables) -> Result<String, SubstError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push('$');
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err(SubstError::Unterminated(template.to_string())),
                    }
                }
                let valid = name.chars().next().is_some_and(is_name_start)
                    && name.chars().all(is_name_char);
                if !valid {
                    return Err(SubstError::InvalidName(name));
                }
                out.push_str(lookup(vars, &name)?);
            }
            Some(next) if is_name_start(next) => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                out.push_str(lookup(vars, &name)?);
            }
            _ => out.push('$'),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Variables {
        let mut vars = Variables::new();
        vars.insert("PROJECT_DIR".to_string(), "/work/rotator".to_string());
        vars.insert("PIOENV".to_string(), "pico_w".to_string());
        vars
    }

    #[test]
    fn test_bare_and_braced_names() {
        let out = subst("$PROJECT_DIR/.pio/build/${PIOENV}", &vars()).unwrap();
        assert_eq!(out, "/work/rotator/.pio/build/pico_w");
    }

    #[test]
    fn test_braces_delimit_name() {
        let out = subst("${PIOENV}_debug", &vars()).unwrap();
        assert_eq!(out, "pico_w_debug");

        let err = subst("$PIOENV_debug", &vars()).unwrap_err();
        assert_eq!(err, SubstError::UnknownVariable("PIOENV_debug".to_string()));
    }

    #[test]
    fn test_literal_dollar() {
        assert_eq!(subst("cost$$5", &vars()).unwrap(), "cost$5");
        assert_eq!(subst("a$/b", &vars()).unwrap(), "a$/b");
        assert_eq!(subst("trailing$", &vars()).unwrap(), "trailing$");
    }

    #[test]
    fn test_no_references() {
        assert_eq!(subst("/plain/path", &Variables::new()).unwrap(), "/plain/path");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            subst("$BUILD_DIR/x", &vars()),
            Err(SubstError::UnknownVariable(name)) if name == "BUILD_DIR"
        ));
        assert!(matches!(
            subst("${PIOENV", &vars()),
            Err(SubstError::Unterminated(_))
        ));
        assert!(matches!(
            subst("${1abc}", &vars()),
            Err(SubstError::InvalidName(name)) if name == "1abc"
        ));
    }
}
