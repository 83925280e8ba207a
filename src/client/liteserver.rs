//! Trustless node-proxy backend.
//!
//! Unlike the REST indexers, liteservers hand back account state in the
//! chain's native TL-B encoding; this module carries the full decoder
//! (`ShardAccount` / `Account` / `StateInit`) so the adapter normalizes
//! into the same [`RawAccount`] the other backends produce, including the
//! remap of the raw "uninitialized" state name to `Uninit`.
//!
//! The ADNL transport itself is not bundled with this crate. Every
//! network entry point reports [`Error::LiteserverUnavailable`] until a
//! transport is linked in; the decoding layer below is fully functional
//! and can be driven with state obtained out of band.

use num_bigint::BigUint;
use tonlib_core::cell::{ArcCell, CellParser};
use tonlib_core::TonAddress;

use super::{hash_from_slice, Network, TonClient};
use crate::account::{AccountStatus, RawAccount};
use crate::error::{Error, Result};
use crate::stack::{StackItem, TvmStack};
use crate::utils::load_maybe_ref;

/// Construction parameters for the liteserver balancer.
#[derive(Debug, Clone)]
pub struct LiteserverConfig {
	pub network: Network,
	/// Specific `host:port#base64key` endpoints; empty means the published
	/// global config for the selected network.
	pub endpoints: Vec<String>,
	/// Proof verification strictness: 0 skips verification entirely,
	/// higher values demand stricter merkle proofs from every node.
	pub trust_level: u8,
}

impl Default for LiteserverConfig {
	fn default() -> Self {
		Self {
			network: Network::Mainnet,
			endpoints: Vec::new(),
			trust_level: 2,
		}
	}
}

pub struct LiteserverClient {
	config: LiteserverConfig,
}

impl LiteserverClient {
	/// Construction never fails; the transport capability is checked on
	/// every call instead, so the missing-dependency error is reported by
	/// each public method rather than once at startup.
	pub fn new(config: LiteserverConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &LiteserverConfig {
		&self.config
	}

	/// Fetch the raw `ShardAccount` cell for an address over ADNL.
	async fn fetch_account_state(&self, _address: &TonAddress) -> Result<ArcCell> {
		Err(Error::LiteserverUnavailable)
	}
}

#[async_trait::async_trait]
impl TonClient for LiteserverClient {
	async fn run_get_method(
		&self,
		_address: &TonAddress,
		_method: &str,
		_stack: &[StackItem],
	) -> Result<TvmStack> {
		Err(Error::LiteserverUnavailable)
	}

	async fn send_message(&self, _boc: &[u8]) -> Result<()> {
		Err(Error::LiteserverUnavailable)
	}

	async fn get_raw_account(&self, address: &TonAddress) -> Result<RawAccount> {
		let state = self.fetch_account_state(address).await?;
		decode_shard_account(&state)
	}
}

// -- Native account-state decoding --

/// Decode a `ShardAccount` cell into the uniform account snapshot.
///
/// TL-B: `account_descr$_ account:^Account last_trans_hash:bits256
/// last_trans_lt:uint64`.
pub fn decode_shard_account(cell: &ArcCell) -> Result<RawAccount> {
	let mut parser = cell.parser();
	let account = parser.next_reference()?;
	let hash = hash_from_slice(&parser.load_bytes(32)?)?;
	let lt = parser.load_u64(64)?;

	let mut account_parser = account.parser();
	decode_account(&mut account_parser, lt, Some(hash))
}

/// Decode an `Account` cell body (`account_none$0` or `account$1 addr
/// storage_stat storage`).
pub fn decode_account(
	parser: &mut CellParser,
	last_transaction_lt: u64,
	last_transaction_hash: Option<[u8; 32]>,
) -> Result<RawAccount> {
	if !parser.load_bit()? {
		return Ok(RawAccount {
			balance: BigUint::from(0u8),
			code: None,
			data: None,
			status: AccountStatus::NonExist,
			last_transaction_lt: 0,
			last_transaction_hash: None,
		});
	}

	let _address = parser.load_address()?;
	skip_storage_info(parser)?;

	// AccountStorage: last_trans_lt:uint64 balance:CurrencyCollection state.
	let _storage_lt = parser.load_u64(64)?;
	let balance = parser.load_coins()?;
	if parser.load_bit()? {
		// Extra-currency dictionary; irrelevant to the snapshot.
		parser.next_reference()?;
	}

	// AccountState: uninit$00 | frozen$01 state_hash | active$1 StateInit.
	let (status, code, data) = if parser.load_bit()? {
		let (code, data) = load_state_init(parser)?;
		(AccountStatus::Active, code, data)
	} else if parser.load_bit()? {
		parser.load_bytes(32)?;
		(AccountStatus::Frozen, None, None)
	} else {
		(AccountStatus::Uninit, None, None)
	};

	Ok(RawAccount {
		balance,
		code,
		data,
		status,
		last_transaction_lt,
		last_transaction_hash,
	})
}

/// StorageInfo: used:StorageUsed last_paid:uint32 due_payment:(Maybe Grams).
fn skip_storage_info(parser: &mut CellParser) -> Result<()> {
	load_var_uint(parser)?; // cells
	load_var_uint(parser)?; // bits
	load_var_uint(parser)?; // public cells
	parser.load_u32(32)?; // last_paid
	if parser.load_bit()? {
		parser.load_coins()?; // due_payment
	}
	Ok(())
}

/// VarUInteger 7: a 3-bit byte count followed by that many bytes.
fn load_var_uint(parser: &mut CellParser) -> Result<BigUint> {
	let byte_len = parser.load_u8(3)? as usize;
	if byte_len == 0 {
		return Ok(BigUint::from(0u8));
	}
	Ok(parser.load_uint(byte_len * 8)?)
}

/// StateInit: split_depth:(Maybe ##5) special:(Maybe TickTock)
/// code:(Maybe ^Cell) data:(Maybe ^Cell) library:(HashmapE 256 SimpleLib).
fn load_state_init(parser: &mut CellParser) -> Result<(Option<ArcCell>, Option<ArcCell>)> {
	if parser.load_bit()? {
		parser.load_u8(5)?;
	}
	if parser.load_bit()? {
		parser.load_u8(2)?;
	}
	let code = load_maybe_ref(parser)?;
	let data = load_maybe_ref(parser)?;
	if parser.load_bit()? {
		parser.next_reference()?;
	}
	Ok((code, data))
}
