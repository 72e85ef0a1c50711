//! Environment variable assembly.

use std::collections::BTreeMap;

use tracing::warn;

use super::lrp::EnvironmentVariable;

/// Name of the variable carrying the app's monitored port.
pub const PORT_VARIABLE: &str = "PORT";

/// Caller variables (sorted by name) followed by `PORT=<monitor_port>`.
///
/// The synthesized `PORT` always wins: a caller-supplied `PORT` is dropped so
/// the request never carries the same key twice.
#[must_use]
pub fn build_environment(
    variables: &BTreeMap<String, String>,
    monitor_port: u16,
) -> Vec<EnvironmentVariable> {
    let mut env = Vec::with_capacity(variables.len() + 1);

    for (name, value) in variables {
        if name == PORT_VARIABLE {
            warn!(
                supplied = %value,
                port = monitor_port,
                "Ignoring caller-supplied PORT; it is set from the monitor port"
            );
            continue;
        }
        env.push(EnvironmentVariable::new(name, value));
    }

    env.push(EnvironmentVariable::new(PORT_VARIABLE, monitor_port.to_string()));
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_is_appended_last() {
        let vars = BTreeMap::from([
            ("ZED".to_string(), "1".to_string()),
            ("ALPHA".to_string(), "2".to_string()),
        ]);

        let env = build_environment(&vars, 8080);

        assert_eq!(
            env,
            vec![
                EnvironmentVariable::new("ALPHA", "2"),
                EnvironmentVariable::new("ZED", "1"),
                EnvironmentVariable::new("PORT", "8080"),
            ]
        );
    }

    #[test]
    fn caller_port_is_replaced() {
        let vars = BTreeMap::from([("PORT".to_string(), "3000".to_string())]);

        let env = build_environment(&vars, 8080);

        assert_eq!(env, vec![EnvironmentVariable::new("PORT", "8080")]);
    }

    #[test]
    fn empty_mapping_still_sets_port() {
        let env = build_environment(&BTreeMap::new(), 0);

        assert_eq!(env, vec![EnvironmentVariable::new("PORT", "0")]);
    }
}
