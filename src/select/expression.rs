// src/select/expression.rs

//! Parsing of selection expressions.
//!
//! | expression | selects                                  |
//! |------------|------------------------------------------|
//! | `k`        | task `k` only                            |
//! | `k+`       | task `k` and all of its descendants      |
//! | `(k)+`     | the descendants of `k`, without `k`      |
//! | `+k`       | task `k` and all of its ancestors        |
//! | `+(k)`     | the ancestors of `k`, without `k`        |
//!
//! `k` is the first run of digits in the expression.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{DagdogError, Result};

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// Which part of the graph around the target a selection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// The target alone.
    Single,
    /// The target and its transitive descendants. Never pruned.
    Forward,
    /// The target and its transitive ancestors. Pruned unless forced.
    Backfill,
}

/// A parsed selection expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub position: usize,
    pub mode: SelectionMode,
    /// Whether the target itself is dropped from the result.
    pub exclude_target: bool,
}

impl Selection {
    pub fn single(position: usize) -> Self {
        Self {
            position,
            mode: SelectionMode::Single,
            exclude_target: false,
        }
    }

    /// Parse an expression such as `"+(3)"`.
    pub fn parse(expression: &str) -> Result<Self> {
        let expr = expression.trim();

        let Some(found) = DIGITS.find(expr) else {
            return Err(parse_error(expression, "no task position found"));
        };

        // Too large for `usize` means no task can have it; the index lookup
        // rejects it as an unknown position.
        let position: usize = match found.as_str().parse() {
            Ok(position) => position,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => usize::MAX,
            Err(e) => return Err(parse_error(expression, format!("invalid position: {e}"))),
        };

        let mode = if expr.ends_with('+') {
            SelectionMode::Forward
        } else if expr.starts_with('+') {
            SelectionMode::Backfill
        } else {
            SelectionMode::Single
        };

        let exclude_target = expr.contains(&format!("({})", found.as_str()));

        Ok(Self {
            position,
            mode,
            exclude_target,
        })
    }
}

fn parse_error(expression: &str, reason: impl Into<String>) -> DagdogError {
    DagdogError::Parse {
        expression: expression.to_string(),
        reason: reason.into(),
    }
}

impl FromStr for Selection {
    type Err = DagdogError;

    fn from_str(s: &str) -> Result<Self> {
        Selection::parse(s)
    }
}

impl fmt::Display for Selection {
    /// Canonical form of the expression.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = if self.exclude_target {
            format!("({})", self.position)
        } else {
            self.position.to_string()
        };

        match self.mode {
            SelectionMode::Single => write!(f, "{target}"),
            SelectionMode::Forward => write!(f, "{target}+"),
            SelectionMode::Backfill => write!(f, "+{target}"),
        }
    }
}
