//! WGSL sources and a minimal `#include` preprocessor.
//!
//! A line of the form `#include "name"` is replaced by the registered fragment
//! with that name. Fragments are inlined as-is (no nested includes).

use std::fmt;

pub const TYPES_WGSL: &str = include_str!("shaders/types.wgsl");
pub const VERTEX_WGSL: &str = include_str!("shaders/vertex.wgsl");
pub const FRAGMENT_WGSL: &str = include_str!("shaders/fragment.wgsl");

/// Fragments every shipped stage may include.
pub const BUILTIN_INCLUDES: &[(&str, &str)] = &[("types.wgsl", TYPES_WGSL)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// `#include` names a fragment that was not registered.
    UnresolvedInclude { path: String, line: usize },
    /// `#include` without a quoted path.
    MalformedInclude { line: usize },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::UnresolvedInclude { path, line } => {
                write!(f, "line {line}: unresolved include \"{path}\"")
            }
            ShaderError::MalformedInclude { line } => {
                write!(f, "line {line}: malformed #include directive")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// Expands `#include` directives in `source`. Line numbers in errors are 1-based.
pub fn preprocess(source: &str, includes: &[(&str, &str)]) -> Result<String, ShaderError> {
    let mut out = String::with_capacity(source.len());

    for (idx, line) in source.lines().enumerate() {
        let Some(rest) = line.trim_start().strip_prefix("#include") else {
            out.push_str(line);
            out.push('\n');
            continue;
        };

        let lineno = idx + 1;
        let path = parse_quoted(rest).ok_or(ShaderError::MalformedInclude { line: lineno })?;
        let (_, fragment) = includes
            .iter()
            .find(|(name, _)| *name == path)
            .ok_or_else(|| ShaderError::UnresolvedInclude {
                path: path.to_owned(),
                line: lineno,
            })?;

        out.push_str(fragment);
        if !fragment.ends_with('\n') {
            out.push('\n');
        }
    }

    Ok(out)
}

fn parse_quoted(s: &str) -> Option<&str> {
    let s = s.trim();
    let inner = s.strip_prefix('"')?.strip_suffix('"')?;
    (!inner.is_empty() && !inner.contains('"')).then_some(inner)
}

/// Vertex stage source with includes expanded.
pub fn vertex_source() -> Result<String, ShaderError> {
    preprocess(VERTEX_WGSL, BUILTIN_INCLUDES)
}

/// Fragment stage source with includes expanded.
pub fn fragment_source() -> Result<String, ShaderError> {
    preprocess(FRAGMENT_WGSL, BUILTIN_INCLUDES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_is_inlined() {
        let src = "a\n#include \"x.wgsl\"\nb\n";
        let out = preprocess(src, &[("x.wgsl", "X1\nX2")]).unwrap();
        assert_eq!(out, "a\nX1\nX2\nb\n");
    }

    #[test]
    fn indented_directive_is_recognized() {
        let out = preprocess("  #include \"t\"  ", &[("t", "T\n")]).unwrap();
        assert_eq!(out, "T\n");
    }

    #[test]
    fn unknown_include_fails() {
        let err = preprocess("ok\n#include \"missing.wgsl\"", &[]).unwrap_err();
        assert_eq!(
            err,
            ShaderError::UnresolvedInclude {
                path: "missing.wgsl".into(),
                line: 2
            }
        );
    }

    #[test]
    fn unquoted_include_fails() {
        let err = preprocess("#include types.wgsl", BUILTIN_INCLUDES).unwrap_err();
        assert_eq!(err, ShaderError::MalformedInclude { line: 1 });
    }

    #[test]
    fn shipped_stages_expand() {
        for src in [vertex_source().unwrap(), fragment_source().unwrap()] {
            assert!(!src.contains("#include"));
            assert!(src.contains("struct ViewProj"));
        }
        assert!(vertex_source().unwrap().contains("fn vs_node"));
        assert!(fragment_source().unwrap().contains("fn fs_edge"));
    }
}
