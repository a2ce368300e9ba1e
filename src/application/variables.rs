use crate::domain::workspace::{VariableSource, VariableSpec};
use std::collections::{BTreeMap, HashMap};

/// Read access to the process environment
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

#[cfg(test)]
impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Variable values resolved once per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedVariables(HashMap<String, String>);

impl ResolvedVariables {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(String, String)> for ResolvedVariables {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        ResolvedVariables(iter.into_iter().collect())
    }
}

/// Resolves every declared variable against the CLI arguments and environment
///
/// `args` are the positional arguments that follow the request name.
/// Variables with an unrecognized source are left out of the result.
pub fn resolve_variables(
    specs: &BTreeMap<String, VariableSpec>,
    args: &[String],
    env: &dyn Environment,
) -> ResolvedVariables {
    specs
        .iter()
        .filter_map(|(key, spec)| {
            let value = resolve_one(spec, args, env);
            if value.is_none() {
                tracing::debug!("variable '{}' has no recognized source, skipping", key);
            }
            value.map(|v| (key.clone(), v))
        })
        .collect()
}

fn resolve_one(spec: &VariableSpec, args: &[String], env: &dyn Environment) -> Option<String> {
    match spec.source {
        VariableSource::Plain => Some(spec.value.clone()),
        VariableSource::Process => Some(
            env.var(&spec.name)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| spec.value.clone()),
        ),
        VariableSource::Args => Some(
            args.get(spec.index)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| spec.value.clone()),
        ),
        VariableSource::Unrecognized => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(source: VariableSource, name: &str, index: usize, value: &str) -> VariableSpec {
        VariableSpec {
            source,
            name: name.to_string(),
            index,
            value: value.to_string(),
        }
    }

    fn specs(entries: Vec<(&str, VariableSpec)>) -> BTreeMap<String, VariableSpec> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn env(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn plain_ignores_args_and_environment() {
        let specs = specs(vec![(
            "host",
            spec(VariableSource::Plain, "HOST", 0, "localhost"),
        )]);
        let resolved = resolve_variables(
            &specs,
            &args(&["other"]),
            &env(&[("HOST", "example.com")]),
        );
        assert_eq!(resolved.get("host"), Some("localhost"));
    }

    #[test]
    fn process_reads_environment() {
        let specs = specs(vec![(
            "token",
            spec(VariableSource::Process, "API_TOKEN", 0, "fallback"),
        )]);
        let resolved = resolve_variables(&specs, &[], &env(&[("API_TOKEN", "secret")]));
        assert_eq!(resolved.get("token"), Some("secret"));
    }

    #[test]
    fn process_falls_back_when_unset_or_empty() {
        let specs = specs(vec![(
            "token",
            spec(VariableSource::Process, "API_TOKEN", 0, "fallback"),
        )]);

        let unset = resolve_variables(&specs, &[], &env(&[]));
        assert_eq!(unset.get("token"), Some("fallback"));

        let empty = resolve_variables(&specs, &[], &env(&[("API_TOKEN", "")]));
        assert_eq!(empty.get("token"), Some("fallback"));
    }

    #[test]
    fn args_reads_positional_argument() {
        let specs = specs(vec![
            ("first", spec(VariableSource::Args, "", 0, "a")),
            ("second", spec(VariableSource::Args, "", 1, "b")),
        ]);
        let resolved = resolve_variables(&specs, &args(&["42", "7"]), &env(&[]));
        assert_eq!(resolved.get("first"), Some("42"));
        assert_eq!(resolved.get("second"), Some("7"));
    }

    #[test]
    fn args_falls_back_when_missing_or_empty() {
        let specs = specs(vec![
            ("empty", spec(VariableSource::Args, "", 0, "x")),
            ("missing", spec(VariableSource::Args, "", 5, "y")),
        ]);
        let resolved = resolve_variables(&specs, &args(&[""]), &env(&[]));
        assert_eq!(resolved.get("empty"), Some("x"));
        assert_eq!(resolved.get("missing"), Some("y"));
    }

    #[test]
    fn unrecognized_source_is_omitted() {
        let specs = specs(vec![
            ("known", spec(VariableSource::Plain, "", 0, "v")),
            ("unknown", spec(VariableSource::Unrecognized, "", 0, "v")),
        ]);
        let resolved = resolve_variables(&specs, &[], &env(&[]));
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get("unknown"), None);
    }
}
