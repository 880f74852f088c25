//! Type definitions used throughout the scripts

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::constants::{
    FORK_BLOCK_NUMBER_FLAG, MATCH_TEST_FLAG, NO_MATCH_TEST_FLAG, VERBOSITY_FLAG,
};

/// The option keys recognized by the `test` command
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OptionKey {
    /// Run only the tests matching a pattern
    Match,
    /// Skip the tests matching a pattern
    NoMatch,
    /// Fork from a fixed block height
    Block,
}

impl Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKey::Match => write!(f, "match"),
            OptionKey::NoMatch => write!(f, "no-match"),
            OptionKey::Block => write!(f, "block"),
        }
    }
}

impl FromStr for OptionKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "match" => Ok(OptionKey::Match),
            "no-match" => Ok(OptionKey::NoMatch),
            "block" => Ok(OptionKey::Block),
            _ => Err(()),
        }
    }
}

/// A single `key=value` argument, split on the first `=`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArgument<'a> {
    /// Everything before the first `=`, or the whole token if there is none
    pub key: &'a str,
    /// Everything after the first `=`
    pub value: &'a str,
}

impl<'a> RawArgument<'a> {
    /// Split a token into its key and value
    pub fn parse(token: &'a str) -> Self {
        let (key, value) = token.split_once('=').unwrap_or((token, ""));
        Self { key, value }
    }

    /// The recognized key of this argument, if any
    pub fn option_key(&self) -> Option<OptionKey> {
        self.key.parse().ok()
    }
}

/// The options of a `forge test` run, as given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestOptions {
    /// Pattern of the tests to run
    pub match_test: Option<String>,
    /// Pattern of the tests to skip
    pub no_match_test: Option<String>,
    /// Block height to fork from
    pub block: Option<String>,
}

impl TestOptions {
    /// Collect options from `key=value` tokens.
    ///
    /// Unrecognized keys are ignored. A repeated key keeps its last value.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for token in args {
            let arg = RawArgument::parse(token.as_ref());
            let slot = match arg.option_key() {
                Some(OptionKey::Match) => &mut options.match_test,
                Some(OptionKey::NoMatch) => &mut options.no_match_test,
                Some(OptionKey::Block) => &mut options.block,
                None => continue,
            };
            *slot = Some(arg.value.to_string());
        }

        options
    }

    /// The `forge test` flags selecting and pinning the run.
    ///
    /// A non-empty `match` shadows `no-match` entirely.
    pub fn forge_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();

        if let Some(pattern) = non_empty(&self.match_test) {
            flags.extend([VERBOSITY_FLAG, MATCH_TEST_FLAG, pattern].map(String::from));
        } else if let Some(pattern) = non_empty(&self.no_match_test) {
            flags.extend([VERBOSITY_FLAG, NO_MATCH_TEST_FLAG, pattern].map(String::from));
        }

        if let Some(block) = non_empty(&self.block) {
            flags.extend([FORK_BLOCK_NUMBER_FLAG, block].map(String::from));
        }

        flags
    }
}

/// The value of an option, treating an empty value as unset
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
