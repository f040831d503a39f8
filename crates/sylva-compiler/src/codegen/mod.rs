//! C code generation for compiled forests.
//!
//! Two interchangeable strategies:
//! - `loadable` - data tables walked by the `sylva_trees.h` runtime
//! - `inline` - one function per tree plus a dispatch function
//!
//! Plus a CSV export of the structure.

mod cgen;
mod csv;
mod inline;
mod loadable;


use std::fmt;
use std::str::FromStr;

use sylva_core::{ConfigError, Forest};

pub use cgen::check_identifier;
pub use csv::to_csv;
pub use inline::InlineEmitter;
pub use loadable::LoadableEmitter;

/// One emission strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Loadable,
    Inline,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loadable => "loadable",
            Self::Inline => "inline",
        }
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loadable" => Ok(Self::Loadable),
            "inline" => Ok(Self::Inline),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of strategies to emit. Defaults to both.
///
/// Iteration order is fixed (loadable, then inline) regardless of how the set
/// was built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strategies {
    loadable: bool,
    inline: bool,
}

impl Default for Strategies {
    fn default() -> Self {
        Self {
            loadable: true,
            inline: true,
        }
    }
}

impl Strategies {
    pub const NONE: Self = Self {
        loadable: false,
        inline: false,
    };

    pub fn only(strategy: Strategy) -> Self {
        Self::NONE.with(strategy)
    }

    pub fn with(mut self, strategy: Strategy) -> Self {
        match strategy {
            Strategy::Loadable => self.loadable = true,
            Strategy::Inline => self.inline = true,
        }
        self
    }

    pub fn contains(self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::Loadable => self.loadable,
            Strategy::Inline => self.inline,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.loadable && !self.inline
    }

    pub fn iter(self) -> impl Iterator<Item = Strategy> {
        [Strategy::Loadable, Strategy::Inline]
            .into_iter()
            .filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Strategy> for Strategies {
    fn from_iter<I: IntoIterator<Item = Strategy>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Comma-separated list, e.g. `"loadable,inline"`. Must name at least one.
impl FromStr for Strategies {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let set = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Strategy::from_str)
            .collect::<Result<Self, _>>()?;
        if set.is_empty() {
            return Err(ConfigError::NoStrategy);
        }
        Ok(set)
    }
}

/// What to emit and under which C name prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    pub(crate) name: String,
    pub(crate) strategies: Strategies,
}

impl EmitOptions {
    /// Emit both strategies under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strategies: Strategies::default(),
        }
    }

    /// Set the strategies to emit.
    pub fn strategies(mut self, value: Strategies) -> Self {
        self.strategies = value;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_identifier(&self.name)?;
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategy);
        }
        Ok(())
    }
}

/// Render every selected strategy, each preceded by a blank separator.
///
/// Nothing is returned unless every strategy succeeds.
pub fn emit(forest: &Forest, options: &EmitOptions) -> crate::Result<String> {
    options.validate()?;

    let mut code = String::new();
    for strategy in options.strategies.iter() {
        let text = match strategy {
            Strategy::Loadable => LoadableEmitter::new(forest, &options.name).emit()?,
            Strategy::Inline => InlineEmitter::new(forest, &options.name).emit()?,
        };
        tracing::debug!(strategy = %strategy, bytes = text.len(), "emitted strategy");
        code.push_str("\n\n");
        code.push_str(&text);
    }
    Ok(code)
}
