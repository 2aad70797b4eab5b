//! src/script.rs
//!
//! Builds the text of the lint hook. Nothing here touches the filesystem, so the
//! whole script can be checked as a plain string.

use log::warn;

use crate::toolchain::LinterCommand;

pub const SHEBANG: &str = "#!/bin/sh";
pub const START_MESSAGE: &str = "Linting files";
pub const DONE_MESSAGE: &str = "Done";
pub const NO_FILES_MESSAGE: &str = "No Python files found, nothing to lint";
pub const STRICT_ABORT_MESSAGE: &str = "Not all lint checks passed, aborting...";
const PYTHON_PATTERN: &str = "*.py";

/// Inputs that shape the rendered hook.
#[derive(Debug, Clone, Default)]
pub struct ScriptOptions {
    pub strict: bool,
    /// Entries relative to the repository root, or glob patterns.
    pub ignore: Vec<String>,
    pub linter: LinterCommand,
}

pub fn non_strict_warning(linter: &LinterCommand) -> String {
    format!(
        "{linter} hook not running in strict mode. Errors are shown but no error code will be returned."
    )
}

/// Render the complete hook script.
pub fn render(options: &ScriptOptions) -> String {
    let selection = find_expression(&options.ignore);

    let mut script = String::new();
    push_line(&mut script, SHEBANG);
    push_line(&mut script, &echo(START_MESSAGE));

    if !options.strict {
        push_line(&mut script, &echo(&non_strict_warning(&options.linter)));
    }

    push_line(&mut script, &format!("if [ -z \"$({selection} -print)\" ]"));
    push_line(&mut script, "then");
    push_line(&mut script, &echo(NO_FILES_MESSAGE));
    push_line(&mut script, "exit 0");
    push_line(&mut script, "fi");

    // 文件名直接交给 linter，不经过 shell 分词
    push_line(&mut script, &lint_command(&selection, &options.linter));

    if options.strict {
        push_line(&mut script, "if [ $? -ne 0 ]");
        push_line(&mut script, "then");
        push_line(&mut script, &echo("Currently running pygih strict mode"));
        push_line(&mut script, &echo(STRICT_ABORT_MESSAGE));
        push_line(&mut script, "exit 1");
        push_line(&mut script, "fi");
    }

    push_line(&mut script, &echo(DONE_MESSAGE));
    push_line(&mut script, "exit 0");
    script
}

/// `find` expression selecting every Python file under the repository root,
/// skipping the ignored subtrees. The caller appends the action.
pub fn find_expression(ignore: &[String]) -> String {
    let name_clause = format!("-name {}", shell_quote(PYTHON_PATTERN));
    let clauses: Vec<String> = ignore
        .iter()
        .filter_map(|entry| normalize_ignore(entry))
        .map(|entry| format!("-path {}", shell_quote(&entry)))
        .collect();

    // find 不接受空的括号组
    if clauses.is_empty() {
        return format!("find . {name_clause}");
    }

    format!(
        r"find . \( {} \) -prune -o {name_clause}",
        clauses.join(" -o ")
    )
}

/// Runs the linter over the selection. `find` exits non-zero when any
/// linter batch fails.
pub fn lint_command(selection: &str, linter: &LinterCommand) -> String {
    format!("{selection} -exec {linter} {{}} +")
}

/// Make an ignore entry match the `./`-prefixed paths `find .` reports.
fn normalize_ignore(entry: &str) -> Option<String> {
    let trimmed = entry.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        warn!("Ignoring '{entry}': it would exclude the whole repository");
        return None;
    }
    if trimmed.starts_with('/') {
        warn!("Ignore entry '{entry}' is outside the repository and cannot match anything");
        return None;
    }
    if trimmed.starts_with("./") || trimmed.starts_with('*') {
        Some(trimmed.to_string())
    } else {
        Some(format!("./{trimmed}"))
    }
}

fn echo(message: &str) -> String {
    format!("echo {}", shell_quote(message))
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn push_line(script: &mut String, line: &str) {
    script.push_str(line);
    script.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(strict: bool, ignore: &[&str]) -> ScriptOptions {
        ScriptOptions {
            strict,
            ignore: ignore.iter().map(|s| s.to_string()).collect(),
            linter: LinterCommand::default(),
        }
    }

    #[test]
    fn strict_script_aborts_on_lint_failure() {
        let script = render(&options(true, &[]));
        assert!(script.contains(
            "find . -name '*.py' -exec pylint {} +\nif [ $? -ne 0 ]\nthen\n"
        ));
        assert!(script.contains("exit 1\nfi\n"));
        assert!(!script.contains("not running in strict mode"));
    }

    #[test]
    fn lenient_script_only_warns() {
        let script = render(&options(false, &[]));
        assert!(script.contains(
            "echo 'pylint hook not running in strict mode. Errors are shown but no error code will be returned.'"
        ));
        assert!(!script.contains("if [ $? -ne 0 ]"));
        assert!(!script.contains("exit 1"));
    }

    #[test]
    fn script_starts_and_ends_with_messages() {
        let script = render(&options(false, &[]));
        assert!(script.starts_with("#!/bin/sh\necho 'Linting files'\n"));
        assert!(script.ends_with("echo 'Done'\nexit 0\n"));
    }

    #[test]
    fn empty_selection_exits_before_linting() {
        let script = render(&options(true, &["vendor"]));
        let guard = script
            .find(r#"if [ -z "$(find . \( -path './vendor' \) -prune -o -name '*.py' -print)" ]"#)
            .expect("missing empty-selection guard");
        let lint = script.find("-exec pylint {} +").expect("missing lint call");
        assert!(guard < lint);
    }

    #[test]
    fn file_names_never_pass_through_shell_splitting() {
        let script = render(&options(true, &[]));
        assert!(!script.contains("$FILES"));
        assert!(script.contains("-exec pylint {} +"));
    }

    #[test]
    fn every_ignore_entry_becomes_a_prune_clause() {
        let expr = find_expression(&["a".to_string(), "b".to_string()]);
        assert_eq!(
            expr,
            r"find . \( -path './a' -o -path './b' \) -prune -o -name '*.py'"
        );
        assert!(!expr.contains("-path './c'"));
    }

    #[test]
    fn no_ignores_means_no_prune_group() {
        assert_eq!(find_expression(&[]), "find . -name '*.py'");
    }

    #[test]
    fn ignore_entries_are_normalized() {
        let expr = find_expression(&[
            "vendor/".to_string(),
            "./build".to_string(),
            "".to_string(),
            "*/migrations".to_string(),
        ]);
        assert!(expr.contains("-path './vendor'"));
        assert!(expr.contains("-path './build'"));
        assert!(expr.contains("-path '*/migrations'"));
        assert_eq!(expr.matches("-path").count(), 3);
    }

    #[test]
    fn unmatchable_entries_are_dropped() {
        let expr = find_expression(&[
            ".".to_string(),
            "/elsewhere/vendor".to_string(),
            "docs".to_string(),
        ]);
        assert_eq!(expr, r"find . \( -path './docs' \) -prune -o -name '*.py'");
    }

    #[test]
    fn quotes_are_escaped() {
        let expr = find_expression(&["it's".to_string()]);
        assert!(expr.contains(r"-path './it'\''s'"));
    }

    #[test]
    fn custom_linter_is_used_verbatim() {
        let mut opts = options(false, &[]);
        opts.linter = "python -m pylint --rcfile=.pylintrc".parse().unwrap();
        let script = render(&opts);
        assert!(script.contains("-exec python -m pylint --rcfile=.pylintrc {} +\n"));
        assert!(script.contains(
            "echo 'python -m pylint --rcfile=.pylintrc hook not running in strict mode."
        ));
    }
}
