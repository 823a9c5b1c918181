//! Choosing which test to export

use std::io::{self, BufRead, Write};

use crate::api::models::TestSummary;
use crate::config::NameMatchPolicy;
use crate::core::{CodilityError, Result};
use tracing::warn;

/// Supplies the operator's choice of test name given the available tests
pub trait TestSelector {
    fn choose_test(&mut self, tests: &[TestSummary]) -> Result<String>;
}

impl<F> TestSelector for F
where
    F: FnMut(&[TestSummary]) -> Result<String>,
{
    fn choose_test(&mut self, tests: &[TestSummary]) -> Result<String> {
        self(tests)
    }
}

/// A name decided up front, e.g. from a command-line flag
#[derive(Debug, Clone)]
pub struct FixedTestName(pub String);

impl TestSelector for FixedTestName {
    fn choose_test(&mut self, _tests: &[TestSummary]) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Prints the test listing and reads one line of input
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl PromptSelector<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, tests: &[TestSummary]) -> io::Result<String> {
        writeln!(self.output, "Available tests:")?;
        for test in tests {
            writeln!(self.output, "  {}: {}", test.id, test.display_name())?;
        }
        write!(self.output, "\nEnter the exact name of the test to export: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no test name entered"));
        }
        Ok(line)
    }
}

impl<R: BufRead, W: Write> TestSelector for PromptSelector<R, W> {
    fn choose_test(&mut self, tests: &[TestSummary]) -> Result<String> {
        self.prompt(tests).map_err(|source| CodilityError::Prompt { source })
    }
}

/// Resolve a test name to exactly one test
pub fn resolve_test<'a>(
    tests: &'a [TestSummary],
    name: &str,
    policy: NameMatchPolicy,
) -> Result<&'a TestSummary> {
    let matches: Vec<&TestSummary> = tests.iter().filter(|test| test.matches_name(name)).collect();

    match (matches.as_slice(), policy) {
        ([], _) => Err(CodilityError::TestNotFound { name: name.to_string() }),
        ([only], _) => Ok(*only),
        ([first, ..], NameMatchPolicy::First) => {
            warn!(
                "Test name '{}' matches {} tests; using the first ({})",
                name,
                matches.len(),
                first.id
            );
            Ok(*first)
        }
        (_, NameMatchPolicy::Strict) => Err(CodilityError::AmbiguousTestName {
            name: name.to_string(),
            ids: matches.iter().map(|test| test.id.clone()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Cursor;

    fn summary(id: &str, title: Option<&str>, name: Option<&str>) -> TestSummary {
        TestSummary {
            id: id.to_string(),
            title: title.map(Value::from),
            name: name.map(Value::from),
        }
    }

    #[test]
    fn prompt_lists_tests_and_reads_line() {
        let tests = vec![summary("t1", Some("Backend Role"), None), summary("t2", None, None)];
        let mut output = Vec::new();
        let mut selector = PromptSelector::new(Cursor::new("Backend Role\n"), &mut output);

        let chosen = selector.choose_test(&tests).unwrap();

        assert_eq!(chosen.trim(), "Backend Role");
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.starts_with("Available tests:\n  t1: Backend Role\n  t2: <unnamed>\n"));
        assert!(printed.ends_with("Enter the exact name of the test to export: "));
    }

    #[test]
    fn closed_input_is_a_prompt_error() {
        let mut selector = PromptSelector::new(Cursor::new(""), io::sink());
        match selector.choose_test(&[summary("t1", Some("A"), None)]) {
            Err(CodilityError::Prompt { source }) => assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("Expected Prompt error, got {:?}", other),
        }
    }

    #[test]
    fn closures_and_fixed_names_are_selectors() {
        let tests = vec![summary("t1", Some("A"), None)];
        let mut closure = |tests: &[TestSummary]| -> Result<String> { Ok(tests[0].display_name().to_string()) };
        assert_eq!(closure.choose_test(&tests).unwrap(), "A");
        assert_eq!(FixedTestName("B".to_string()).choose_test(&tests).unwrap(), "B");
    }

    #[test]
    fn resolves_by_title_or_name() {
        let tests = vec![summary("t1", Some("Backend Role"), None), summary("t2", None, Some("frontend"))];

        assert_eq!(resolve_test(&tests, "Backend Role", NameMatchPolicy::Strict).unwrap().id, "t1");
        assert_eq!(resolve_test(&tests, "frontend", NameMatchPolicy::Strict).unwrap().id, "t2");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let tests = vec![summary("t1", Some("Backend Role"), None)];
        match resolve_test(&tests, "Backend", NameMatchPolicy::First) {
            Err(CodilityError::TestNotFound { name }) => assert_eq!(name, "Backend"),
            other => panic!("Expected TestNotFound, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_names_follow_policy() {
        let tests = vec![
            summary("t1", Some("Backend Role"), None),
            summary("t2", None, Some("Backend Role")),
            summary("t3", Some("Other"), None),
        ];

        match resolve_test(&tests, "Backend Role", NameMatchPolicy::Strict) {
            Err(CodilityError::AmbiguousTestName { ids, .. }) => assert_eq!(ids, vec!["t1", "t2"]),
            other => panic!("Expected AmbiguousTestName, got {:?}", other),
        }
        assert_eq!(resolve_test(&tests, "Backend Role", NameMatchPolicy::First).unwrap().id, "t1");
    }
}
