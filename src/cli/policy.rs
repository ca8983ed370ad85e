//! Per-command key validation

use clap::builder::PossibleValuesParser;
use clap::Arg;

/// How a command's `<KEY>` argument is checked against the loaded store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Only keys already in the store are accepted; unknown keys are usage errors
    RequireExisting,
    /// Any string is accepted (new or existing key)
    AllowAny,
}

impl KeyPolicy {
    /// Constrain `arg` according to this policy and the current key set
    ///
    /// Under `RequireExisting` the keys become the argument's possible values,
    /// which also surfaces them in help output and generated completions.
    pub fn apply<'a>(self, arg: Arg, keys: impl IntoIterator<Item = &'a str>) -> Arg {
        match self {
            KeyPolicy::RequireExisting => {
                let choices: Vec<String> = keys.into_iter().map(str::to_string).collect();
                arg.value_parser(PossibleValuesParser::new(choices))
            }
            KeyPolicy::AllowAny => arg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    fn command(policy: KeyPolicy, keys: &[&str]) -> Command {
        Command::new("get")
            .arg(policy.apply(Arg::new("key").required(true), keys.iter().copied()))
    }

    #[test]
    fn test_require_existing_accepts_known_key() {
        let matches = command(KeyPolicy::RequireExisting, &["a", "b"])
            .try_get_matches_from(["get", "b"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("key").unwrap(), "b");
    }

    #[test]
    fn test_require_existing_rejects_unknown_key() {
        let err = command(KeyPolicy::RequireExisting, &["a"])
            .try_get_matches_from(["get", "nope"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_require_existing_with_empty_store() {
        let result =
            command(KeyPolicy::RequireExisting, &[]).try_get_matches_from(["get", "a"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_allow_any_accepts_new_key() {
        let matches = command(KeyPolicy::AllowAny, &["a"])
            .try_get_matches_from(["get", "brand-new"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("key").unwrap(), "brand-new");
    }
}
