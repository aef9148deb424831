use std::path::Path;

use anyhow::Result;
use regex::Regex;

use crate::detector::detect_manifest;
use crate::error::ScanError;
use crate::models::ModuleRef;

const DIRECTIVES: &[&str] = &[
    "module",
    "go",
    "toolchain",
    "godebug",
    "require",
    "exclude",
    "replace",
    "retract",
    "tool",
    "ignore",
];

/// Analyzer for Go module projects.
///
/// Reads the `require` entries of `go.mod` in file order. Entries marked
/// `// indirect` are dropped unless `include_indirect` is set.
pub struct GoModAnalyzer {
    include_indirect: bool,
}

impl GoModAnalyzer {
    pub fn new(include_indirect: bool) -> Self {
        Self { include_indirect }
    }
}

impl super::Analyzer for GoModAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<ModuleRef>> {
        let manifest = detect_manifest(path).ok_or_else(|| ScanError::ManifestNotFound {
            dir: path.to_path_buf(),
        })?;

        let content = std::fs::read_to_string(&manifest).map_err(|source| {
            ScanError::ManifestRead {
                path: manifest.clone(),
                source,
            }
        })?;

        let modules = parse_go_mod(&content)?
            .into_iter()
            .filter(|m| self.include_indirect || !m.indirect)
            .collect();

        Ok(modules)
    }
}

/// Parse the text of a `go.mod` file into every `require` entry it declares.
pub fn parse_go_mod(content: &str) -> Result<Vec<ModuleRef>> {
    let version_re = Regex::new(r"^v[0-9]+(\.[0-9]+){0,2}([-+][0-9A-Za-z.+-]*)?$")?;

    let mut modules = Vec::new();
    // Directive of the currently open `( ... )` block and the line it opened on.
    let mut block: Option<(String, usize)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let (code, comment) = split_comment(raw);
        let tokens = tokenize(code, line)?;

        if let Some((directive, _)) = &block {
            let in_require = directive == "require";
            match tokens.first().map(String::as_str) {
                None => {}
                Some(")") if tokens.len() == 1 => block = None,
                Some(")") => return Err(malformed(line, "unexpected tokens after ')'")),
                Some(_) if in_require => {
                    modules.push(require_entry(&tokens, comment, line, &version_re)?);
                }
                Some(_) => {}
            }
            continue;
        }

        let Some(directive) = tokens.first() else {
            continue;
        };

        if directive == ")" {
            return Err(malformed(line, "unexpected ')'"));
        }
        if !DIRECTIVES.contains(&directive.as_str()) {
            return Err(malformed(line, &format!("unknown directive: {}", directive)));
        }

        if tokens.len() == 2 && tokens[1] == "(" {
            block = Some((directive.clone(), line));
            continue;
        }

        if directive == "require" {
            modules.push(require_entry(&tokens[1..], comment, line, &version_re)?);
        }
    }

    if let Some((directive, start)) = block {
        return Err(malformed(start, &format!("unterminated {} block", directive)));
    }

    Ok(modules)
}

fn require_entry(
    tokens: &[String],
    comment: Option<&str>,
    line: usize,
    version_re: &Regex,
) -> Result<ModuleRef> {
    let [path, version] = tokens else {
        return Err(malformed(line, "usage: require module/path v1.2.3"));
    };

    if !version_re.is_match(version) {
        return Err(malformed(
            line,
            &format!("invalid version {} for {}", version, path),
        ));
    }

    Ok(ModuleRef::new(path, version, is_indirect(comment)))
}

/// `// indirect` or `// indirect; <note>` marks a transitive requirement.
fn is_indirect(comment: Option<&str>) -> bool {
    comment.is_some_and(|c| c == "indirect" || c.starts_with("indirect;"))
}

fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find("//") {
        Some(pos) => (&line[..pos], Some(line[pos + 2..].trim())),
        None => (line, None),
    }
}

fn tokenize(code: &str, line: usize) -> Result<Vec<String>> {
    code.split_whitespace()
        .map(|tok| {
            let quote = match tok.chars().next() {
                Some(q @ ('"' | '`')) => q,
                _ => return Ok(tok.to_string()),
            };
            tok.strip_prefix(quote)
                .and_then(|t| t.strip_suffix(quote))
                .map(str::to_string)
                .ok_or_else(|| malformed(line, "unterminated quoted string"))
        })
        .collect()
}

fn malformed(line: usize, reason: &str) -> anyhow::Error {
    ScanError::ManifestMalformed {
        line,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;

    const GO_MOD: &str = r#"
module github.com/acme/app

go 1.21

toolchain go1.21.5

require github.com/spf13/cobra v1.8.0

require (
	github.com/pkg/errors v0.9.1
	gopkg.in/yaml.v2 v2.4.0
	"golang.org/x/mod" v0.14.0
	github.com/inconshreveable/mousetrap v1.1.0 // indirect
	github.com/spf13/pflag v1.0.5 // indirect; pulled in by cobra
	golang.org/x/sys v0.0.0-20231201-abcdef123456 // indirect
)

replace github.com/pkg/errors => ../errors

exclude (
	github.com/old/thing v1.0.0
)
"#;

    fn write_go_mod(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("go.mod"), content).unwrap();
        dir
    }

    fn malformed_line(content: &str) -> usize {
        let err = parse_go_mod(content).unwrap_err();
        match err.downcast_ref::<ScanError>() {
            Some(ScanError::ManifestMalformed { line, .. }) => *line,
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_go_mod() {
        let modules = parse_go_mod(GO_MOD).unwrap();
        assert_eq!(modules.len(), 7);
        assert_eq!(
            modules[0],
            ModuleRef::new("github.com/spf13/cobra", "v1.8.0", false)
        );
        assert_eq!(modules[3].path, "golang.org/x/mod");
        assert!(modules[4].indirect);
        assert!(modules[5].indirect);
        assert_eq!(modules[6].version, "v0.0.0-20231201-abcdef123456");
    }

    #[test]
    fn test_indirect_filtering() {
        let dir = write_go_mod(GO_MOD);

        let direct = GoModAnalyzer::new(false).analyze(dir.path()).unwrap();
        assert_eq!(direct.len(), 4);
        assert!(direct.iter().all(|m| !m.indirect));

        let all = GoModAnalyzer::new(true).analyze(dir.path()).unwrap();
        assert_eq!(all.len(), 7);
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = GoModAnalyzer::new(false).analyze(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::ManifestNotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_manifests() {
        assert_eq!(malformed_line("module a\nfrobnicate x\n"), 2);
        assert_eq!(malformed_line("module a\nrequire (\n\tgithub.com/a/b v1.0.0\n"), 2);
        assert_eq!(malformed_line("module a\n)\n"), 2);
        assert_eq!(malformed_line("require github.com/a/b\n"), 1);
        assert_eq!(malformed_line("require (\n\tgithub.com/a/b 1.0.0\n)\n"), 2);
        assert_eq!(malformed_line("require \"github.com/a/b v1.0.0\n"), 1);
    }

    #[test]
    fn test_malformed_manifest_through_analyzer() {
        let dir = write_go_mod("require (\n");
        let err = GoModAnalyzer::new(true).analyze(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::ManifestMalformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_empty_manifest_has_no_modules() {
        assert!(parse_go_mod("module example.com/empty\n\ngo 1.22\n")
            .unwrap()
            .is_empty());
    }
}
