//! Function parser test harness
//!
//! Parses a function file, prints every function written back, and checks
//! that each written function parses to the same AST.

use crate::parser::{parse_functions, AdamFunction, AdamFunctions, ParseError};
use crate::writer::write_function;
use std::io::{self, Write};

/// Outcome of one harness run
#[derive(Debug)]
pub struct HarnessReport {
    pub parse_error: Option<ParseError>,
    pub function_count: usize,
    /// Names of functions whose written form parses differently
    pub round_trip_failures: Vec<String>,
}

impl HarnessReport {
    pub fn passed(&self) -> bool {
        self.parse_error.is_none() && self.round_trip_failures.is_empty()
    }
}

/// Run the harness on `contents`, writing the transcript to `out`
pub fn run_function_parser_test(
    contents: &str,
    filename: &str,
    out: &mut impl Write,
) -> io::Result<HarnessReport> {
    writeln!(out, "functions:\"\n{}\n\"", contents)?;
    writeln!(out, "filename: {}", filename)?;

    let (functions, parse_error) = match parse_functions(contents, filename) {
        Ok(functions) => (functions, None),
        Err(err) => (AdamFunctions::default(), Some(err)),
    };
    writeln!(out, "{}", if parse_error.is_none() { "PASS" } else { "FAIL" })?;
    writeln!(out, "{} functions", functions.len())?;

    let mut sorted: Vec<&AdamFunction> = functions.values().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut round_trip_failures = Vec::new();
    for function in sorted {
        let written = write_function(function);
        write!(out, "{}\n\n", written)?;

        if !round_trips(function, &written, filename) {
            round_trip_failures.push(function.name.clone());
        }
    }
    writeln!(out)?;

    if parse_error.is_none() {
        let verdict = if round_trip_failures.is_empty() {
            "PASS".to_string()
        } else {
            format!("FAIL ({})", round_trip_failures.join(", "))
        };
        writeln!(out, "round trip: {}", verdict)?;
    }

    Ok(HarnessReport {
        parse_error,
        function_count: functions.len(),
        round_trip_failures,
    })
}

fn round_trips(function: &AdamFunction, written: &str, filename: &str) -> bool {
    match parse_functions(written, filename) {
        Ok(reparsed) => reparsed.len() == 1 && reparsed.get(&function.name) == Some(function),
        Err(err) => {
            tracing::debug!(function = %function.name, error = %err, "written function does not parse");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(contents: &str) -> (String, HarnessReport) {
        let mut out = Vec::new();
        let report = run_function_parser_test(contents, "t.fn", &mut out).unwrap();
        (String::from_utf8(out).unwrap(), report)
    }

    #[test]
    fn test_transcript() {
        let (text, report) = run("square(x) { return x * x; }");
        assert!(report.passed());
        assert_eq!(
            text,
            "functions:\"\nsquare(x) { return x * x; }\n\"\nfilename: t.fn\nPASS\n1 functions\n\
             square (x) {\n    return x * x;\n}\n\n\nround trip: PASS\n"
        );
    }

    #[test]
    fn test_failure_transcript() {
        let (text, report) = run("f() {");
        assert!(!report.passed());
        assert_eq!(report.function_count, 0);
        assert!(text.ends_with("FAIL\n0 functions\n\n"), "{}", text);
    }
}
