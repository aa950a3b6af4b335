//! Version gating
//!
//! Tests declare the cluster versions they apply to as short constraint
//! expressions:
//!
//! ```text
//! "0.11.0"       exactly 0.11.0
//! ">=0.10.1.0"   0.10.1.0 or newer
//! ">0.9", "<1.0" both must hold
//! "!0.10.0"      anything but 0.10.0
//! ```
//!
//! A [`ConstraintSet`] is evaluated against the [`ClusterVersion`] from the
//! harness configuration and produces a [`Gate`] decision.

use shared::{ClusterVersion, Version};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{HarnessError, HarnessResult};

/// Comparison applied between the cluster version and a constraint version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Operator {
    /// Operator for the prefix used in constraint expressions
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Operator::Eq),
            "!" => Some(Operator::Ne),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Ge),
            "<=" => Some(Operator::Le),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Operator::Eq => "",
            Operator::Ne => "!",
            other => other.symbol(),
        }
    }

    /// Whether `actual <op> required` holds
    pub fn holds(&self, actual: &Version, required: &Version) -> bool {
        let ordering = actual.cmp(required);
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Ge => ordering != Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One parsed constraint expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionConstraint {
    pub operator: Operator,
    pub version: Version,
}

impl VersionConstraint {
    pub fn new(operator: Operator, version: Version) -> Self {
        Self { operator, version }
    }

    /// Parse a constraint expression such as `>=0.10.1.0`
    ///
    /// The operator width is decided by the position of the first digit: a
    /// leading digit means `=`, a digit in second place means a one-character
    /// operator and a digit in third place a two-character one.
    pub fn parse(expr: &str) -> HarnessResult<Self> {
        let invalid = || HarnessError::InvalidConstraint {
            expr: expr.to_string(),
        };
        let digit_at = |index: usize| expr.as_bytes().get(index).is_some_and(u8::is_ascii_digit);

        let (operator, version) = if digit_at(0) {
            (Operator::Eq, expr)
        } else if digit_at(1) {
            (Operator::from_symbol(&expr[..1]).ok_or_else(invalid)?, &expr[1..])
        } else if digit_at(2) {
            match Operator::from_symbol(&expr[..2]) {
                Some(op @ (Operator::Ge | Operator::Le)) => (op, &expr[2..]),
                _ => return Err(invalid()),
            }
        } else {
            return Err(invalid());
        };

        let version = version.parse::<Version>().map_err(|_| invalid())?;
        Ok(Self::new(operator, version))
    }

    pub fn matches(&self, actual: &Version) -> bool {
        self.operator.holds(actual, &self.version)
    }
}

impl FromStr for VersionConstraint {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.prefix(), self.version)
    }
}

/// Why a test declined to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    VersionUnknown,
    UnsupportedVersion {
        actual: Version,
        constraint: VersionConstraint,
    },
}

impl SkipReason {
    /// Longer description naming the failing constraint
    pub fn detail(&self) -> String {
        match self {
            SkipReason::VersionUnknown => "no cluster version configured in KAFKA_VERSION".to_string(),
            SkipReason::UnsupportedVersion { actual, constraint } => {
                format!("cluster version {actual} does not satisfy {constraint}")
            }
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::VersionUnknown => write!(f, "version unknown"),
            SkipReason::UnsupportedVersion { .. } => write!(f, "unsupported version"),
        }
    }
}

/// Outcome of version gating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Run,
    Skip(SkipReason),
}

impl Gate {
    pub fn should_run(&self) -> bool {
        matches!(self, Gate::Run)
    }
}

/// Constraints that must all hold for a test to run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstraintSet {
    constraints: Vec<VersionConstraint>,
}

impl ConstraintSet {
    pub fn new(constraints: Vec<VersionConstraint>) -> Self {
        Self { constraints }
    }

    /// Parse every expression, failing on the first malformed one
    pub fn parse_all<I, S>(exprs: I) -> HarnessResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let constraints = exprs
            .into_iter()
            .map(|expr| VersionConstraint::parse(expr.as_ref()))
            .collect::<HarnessResult<Vec<_>>>()?;
        Ok(Self::new(constraints))
    }

    pub fn constraints(&self) -> &[VersionConstraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// First constraint (in declaration order) that `actual` violates
    pub fn first_violation(&self, actual: &Version) -> Option<&VersionConstraint> {
        self.constraints.iter().find(|c| !c.matches(actual))
    }

    pub fn evaluate(&self, actual: &ClusterVersion) -> bool {
        evaluate(&self.constraints, actual)
    }

    pub fn gate(&self, actual: &ClusterVersion) -> Gate {
        let Some(version) = actual.known() else {
            return Gate::Skip(SkipReason::VersionUnknown);
        };

        match self.first_violation(version) {
            Some(constraint) => Gate::Skip(SkipReason::UnsupportedVersion {
                actual: version.clone(),
                constraint: constraint.clone(),
            }),
            None => Gate::Run,
        }
    }
}

/// Parse a single constraint expression
pub fn parse(expr: &str) -> HarnessResult<VersionConstraint> {
    VersionConstraint::parse(expr)
}

/// True when the version is known and every constraint holds
pub fn evaluate(constraints: &[VersionConstraint], actual: &ClusterVersion) -> bool {
    match actual.known() {
        Some(version) => constraints.iter().all(|c| c.matches(version)),
        None => false,
    }
}
