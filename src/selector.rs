use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

use crate::question::Question;

/// How many questions a session should draw from the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionLimit {
    All,
    Count(usize),
}

/// The menu of limits offered to the user, in display order.
pub const LIMIT_MENU: [SessionLimit; 6] = [
    SessionLimit::Count(5),
    SessionLimit::Count(10),
    SessionLimit::Count(20),
    SessionLimit::Count(30),
    SessionLimit::Count(50),
    SessionLimit::All,
];

impl SessionLimit {
    /// Map the integer form used by menus, where `-1` means "the whole bank".
    /// Other negative values have no meaning and yield `None`.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            -1 => Some(Self::All),
            n if n >= 0 => Some(Self::Count(n as usize)),
            _ => None,
        }
    }

    /// Number of questions this limit yields from a bank of `bank_len`.
    pub fn resolve(&self, bank_len: usize) -> usize {
        match self {
            Self::All => bank_len,
            Self::Count(n) => (*n).min(bank_len),
        }
    }

    pub fn is_in_menu(&self) -> bool {
        LIMIT_MENU.contains(self)
    }

    /// Position of this limit in [`LIMIT_MENU`], if it is on the menu
    pub fn menu_index(&self) -> Option<usize> {
        LIMIT_MENU.iter().position(|l| l == self)
    }
}

impl Default for SessionLimit {
    fn default() -> Self {
        Self::Count(10)
    }
}

impl fmt::Display for SessionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for SessionLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let raw: i64 = s
            .parse()
            .map_err(|_| format!("'{s}' is not a number or 'all'"))?;
        Self::from_raw(raw).ok_or_else(|| format!("'{s}' is not a valid question count"))
    }
}

/// Shuffle in place with the Fisher-Yates backward swap.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Build the ordered active question list for one session: a uniformly
/// random permutation of the bank, truncated to the limit.
///
/// An empty bank yields an empty list; rejecting that is the caller's job.
pub fn select<R: Rng + ?Sized>(
    bank: &[Arc<Question>],
    limit: SessionLimit,
    rng: &mut R,
) -> Vec<Arc<Question>> {
    let mut picked = bank.to_vec();
    fisher_yates(&mut picked, rng);
    picked.truncate(limit.resolve(bank.len()));
    picked
}
