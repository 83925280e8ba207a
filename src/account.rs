use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use tonlib_core::cell::ArcCell;

use crate::error::Error;

/// Lifecycle state of an on-chain account, normalized across backends.
///
/// The node-side state tree spells the second variant "uninitialized";
/// the REST indexers (and this crate) shorten it to "uninit".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
	NonExist,
	Uninit,
	Active,
	Frozen,
}

impl FromStr for AccountStatus {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Error> {
		match s {
			"nonexist" => Ok(Self::NonExist),
			"uninit" | "uninitialized" => Ok(Self::Uninit),
			"active" => Ok(Self::Active),
			"frozen" => Ok(Self::Frozen),
			other => Err(Error::UnexpectedResponse(format!(
				"unknown account status {other:?}"
			))),
		}
	}
}

impl fmt::Display for AccountStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Self::NonExist => "nonexist",
			Self::Uninit => "uninit",
			Self::Active => "active",
			Self::Frozen => "frozen",
		};
		f.write_str(s)
	}
}

/// Immutable snapshot of raw account state at one logical time.
///
/// Constructed fresh per query; never cached or persisted. Whatever
/// backend produced it, the same logical account state yields the same
/// balance, status, and transaction identifiers.
#[derive(Debug, Clone)]
pub struct RawAccount {
	/// Balance in nanoton (the smallest unit).
	pub balance: BigUint,
	/// Contract code; `None` for accounts without a deployed state.
	pub code: Option<ArcCell>,
	/// Contract data; `None` for accounts without a deployed state.
	pub data: Option<ArcCell>,
	pub status: AccountStatus,
	/// Logical time of the last transaction (monotonic per account).
	pub last_transaction_lt: u64,
	/// Hash of the last transaction; `None` if the account has none.
	pub last_transaction_hash: Option<[u8; 32]>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_parses_indexer_names() {
		assert_eq!("active".parse::<AccountStatus>().unwrap(), AccountStatus::Active);
		assert_eq!("frozen".parse::<AccountStatus>().unwrap(), AccountStatus::Frozen);
		assert_eq!("uninit".parse::<AccountStatus>().unwrap(), AccountStatus::Uninit);
		assert_eq!("nonexist".parse::<AccountStatus>().unwrap(), AccountStatus::NonExist);
	}

	#[test]
	fn status_accepts_node_side_spelling() {
		// Liteservers report the long form; it must map to the same variant.
		assert_eq!(
			"uninitialized".parse::<AccountStatus>().unwrap(),
			AccountStatus::Uninit
		);
	}

	#[test]
	fn status_rejects_garbage() {
		assert!("pending".parse::<AccountStatus>().is_err());
		assert!("".parse::<AccountStatus>().is_err());
	}

	#[test]
	fn status_display_roundtrips() {
		for s in ["nonexist", "uninit", "active", "frozen"] {
			assert_eq!(s.parse::<AccountStatus>().unwrap().to_string(), s);
		}
	}
}
