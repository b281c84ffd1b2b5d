//! Variable extraction and substitution
//!
//! A formula's variables are its maximal runs of ASCII letters. Only names of
//! the shape `[A-Z]*[a-z]*` (capitals, if any, lead) can be bound or
//! substituted; other runs are still tracked so edits stay predictable.

use ahash::{AHashMap, AHashSet};
use lazy_regex::{regex, regex_is_match};
use tracing::trace;

/// Variable name → bound value text (`None` until defined)
pub type Bindings = AHashMap<String, Option<String>>;

/// Whether `name` has the shape of a variable: leading capitals, then lowercase
pub fn is_variable(name: &str) -> bool {
    regex_is_match!(r"^[A-Z]*[a-z]*$", name)
}

/// Re-derive the variable set of `text`, reconciling `previous` bindings
///
/// Bindings for names still present are kept, bindings for names that
/// disappeared are dropped, and new names start unset.
pub fn retokenize_variables(text: &str, previous: &Bindings) -> (AHashSet<String>, Bindings) {
    let variables: AHashSet<String> = regex!(r"[A-Za-z]+")
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    let bindings: Bindings = variables
        .iter()
        .map(|name| (name.clone(), previous.get(name).cloned().flatten()))
        .collect();

    trace!(variables = variables.len(), "re-derived formula variables");
    (variables, bindings)
}

/// Replace every bound variable in `text` with its value
///
/// The scan grows a run of letters while it keeps the variable shape. When the
/// next character would break the shape, the run so far is looked up: a bound
/// name is replaced, anything else is copied as is. The breaking letter starts
/// the next run. Inserted values are never rescanned.
pub fn substitute(text: &str, bindings: &Bindings) -> String {
    let mut output = String::with_capacity(text.len());
    let mut run = String::new();

    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            run.push(c);
            if is_variable(&run) {
                continue;
            }
            run.pop();
            flush_run(&mut output, &mut run, bindings);
            run.push(c);
        } else {
            flush_run(&mut output, &mut run, bindings);
            output.push(c);
        }
    }
    flush_run(&mut output, &mut run, bindings);

    output
}

fn flush_run(output: &mut String, run: &mut String, bindings: &Bindings) {
    match bindings.get(run.as_str()) {
        Some(Some(value)) => output.push_str(value),
        _ => output.push_str(run),
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(text: &str) -> Vec<String> {
        let (variables, _) = retokenize_variables(text, &Bindings::new());
        let mut names: Vec<String> = variables.into_iter().collect();
        names.sort();
        names
    }

    fn bind(pairs: &[(&str, Option<&str>)]) -> Bindings {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_is_variable() {
        assert!(is_variable("x"));
        assert!(is_variable("Rate"));
        assert!(is_variable("ABc"));
        assert!(is_variable("PI"));
        assert!(!is_variable("xY"));
        assert!(!is_variable("aBc"));
        assert!(!is_variable("x1"));
    }

    #[test]
    fn test_extraction() {
        assert_eq!(names("((F +(C/N) + H * (P /R *S)) *X)"), ["C", "F", "H", "N", "P", "R", "S", "X"]);
        assert_eq!(names("-x+x*yy-"), ["x", "yy"]);
        assert_eq!(names("1+2"), Vec::<String>::new());
        assert_eq!(names(""), Vec::<String>::new());
    }

    #[test]
    fn test_extraction_is_unfiltered() {
        // tracked even though it can never be bound
        assert_eq!(names("aB+1"), ["aB"]);
        assert_eq!(names("sqrt(x2)"), ["sqrt", "x"]);
    }

    #[test]
    fn test_reconciliation() {
        let previous = bind(&[("x", Some("2")), ("gone", Some("9"))]);
        let (variables, bindings) = retokenize_variables("x+y", &previous);

        assert_eq!(variables.len(), 2);
        assert_eq!(bindings.get("x"), Some(&Some("2".to_string())));
        assert_eq!(bindings.get("y"), Some(&None));
        assert_eq!(bindings.get("gone"), None);
    }

    #[test]
    fn test_substitute() {
        let bindings = bind(&[("x", Some("2")), ("Rate", Some("1.5")), ("y", None)]);
        assert_eq!(substitute("x*Rate+y", &bindings), "2*1.5+y");
        assert_eq!(substitute("(x)(x)", &bindings), "(2)(2)");
        assert_eq!(substitute("x", &bindings), "2");
    }

    #[test]
    fn test_substitute_stops_at_shape_break() {
        let bindings = bind(&[("a", Some("1")), ("B", Some("2")), ("aB", Some("3"))]);
        // "aB" is not shape valid, so the run splits before the capital
        assert_eq!(substitute("aB", &bindings), "12");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let bindings = bind(&[("x", Some("y")), ("y", Some("5"))]);
        assert_eq!(substitute("x+y", &bindings), "y+5");
    }
}
