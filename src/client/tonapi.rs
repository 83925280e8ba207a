//! Adapter for the tonapi.io REST indexer.
//!
//! Account fields arrive pre-decoded as JSON scalars (numeric balance,
//! plain status string, hex transaction hash); get-method arguments are
//! passed as repeated `args` query parameters.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use tonlib_core::cell::ArcCell;
use tonlib_core::TonAddress;

use super::{
	hash_from_slice, parse_balance, parse_int, parse_lt, str_field, HttpApi, Network, TonClient,
};
use crate::account::{AccountStatus, RawAccount};
use crate::error::{Error, Result};
use crate::stack::{StackItem, TvmStack};
use crate::utils::cell_from_boc_hex;

pub struct TonapiClient {
	api: HttpApi,
}

impl TonapiClient {
	/// Create a client against the hosted tonapi service. The API key is
	/// optional but unauthenticated requests are heavily rate limited.
	pub fn new(api_key: Option<&str>, network: Network) -> Result<Self> {
		let base_url = match network {
			Network::Mainnet => "https://tonapi.io",
			Network::Testnet => "https://testnet.tonapi.io",
		};
		Self::with_base_url(api_key, base_url)
	}

	/// Point the adapter at a self-hosted tonapi deployment.
	pub fn with_base_url(api_key: Option<&str>, base_url: &str) -> Result<Self> {
		let mut headers = HeaderMap::new();
		if let Some(key) = api_key {
			let value = HeaderValue::from_str(&format!("Bearer {key}"))
				.map_err(|e| Error::Config(format!("invalid API key: {e}")))?;
			headers.insert(AUTHORIZATION, value);
		}
		let api = HttpApi::new(base_url.trim_end_matches('/').to_owned(), headers)?;
		Ok(Self { api })
	}
}

#[async_trait::async_trait]
impl TonClient for TonapiClient {
	async fn run_get_method(
		&self,
		address: &TonAddress,
		method: &str,
		stack: &[StackItem],
	) -> Result<TvmStack> {
		let path = format!("/v2/blockchain/accounts/{address}/methods/{method}");
		let mut params = Vec::with_capacity(stack.len());
		for item in stack {
			params.push(("args", encode_arg(item)?));
		}
		let result = self.api.get(&path, &params).await?;
		decode_get_method_result(&result)
	}

	async fn send_message(&self, boc: &[u8]) -> Result<()> {
		let body = serde_json::json!({ "boc": BASE64.encode(boc) });
		self.api.post("/v2/blockchain/message", &body).await?;
		Ok(())
	}

	async fn get_raw_account(&self, address: &TonAddress) -> Result<RawAccount> {
		let path = format!("/v2/blockchain/accounts/{address}");
		let result = self.api.get(&path, &[]).await?;
		decode_account(&result)
	}
}

/// Encode one stack argument as an `args` query parameter value.
fn encode_arg(item: &StackItem) -> Result<String> {
	match item {
		StackItem::Int(v) => Ok(v.to_string()),
		StackItem::Address(a) => Ok(a.to_string()),
		StackItem::Cell(_) | StackItem::Slice(_) => Ok(hex::encode(item.to_boc()?)),
		StackItem::Null => Err(Error::Config(
			"tonapi does not accept null stack arguments".into(),
		)),
	}
}

/// Decode a get-method response body into the uniform stack.
pub(crate) fn decode_get_method_result(result: &Value) -> Result<TvmStack> {
	let success = result.get("success").and_then(Value::as_bool).unwrap_or(true);
	let exit_code = result.get("exit_code").and_then(Value::as_i64).unwrap_or(0);
	if !success || exit_code != 0 {
		return Err(Error::GetMethodFailed { exit_code });
	}

	let entries = result
		.get("stack")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::UnexpectedResponse("missing stack".into()))?;
	entries.iter().map(decode_stack_entry).collect()
}

fn decode_stack_entry(entry: &Value) -> Result<StackItem> {
	let kind = entry.get("type").and_then(Value::as_str).unwrap_or("");
	match kind {
		"num" => Ok(StackItem::Int(parse_int(entry_field(entry, "num")?)?)),
		"cell" => Ok(StackItem::Cell(cell_from_boc_hex(entry_field(entry, "cell")?)?)),
		"slice" => Ok(StackItem::Slice(cell_from_boc_hex(entry_field(entry, "slice")?)?)),
		"null" | "nan" => Ok(StackItem::Null),
		other => Err(Error::UnexpectedResponse(format!(
			"unsupported stack entry type {other:?}"
		))),
	}
}

/// Entry payloads are keyed by their type name, with `value` as a
/// fallback used by older API revisions.
fn entry_field<'a>(entry: &'a Value, name: &str) -> Result<&'a str> {
	entry
		.get(name)
		.or_else(|| entry.get("value"))
		.and_then(Value::as_str)
		.ok_or_else(|| Error::UnexpectedResponse(format!("stack entry missing {name:?}")))
}

/// Decode the `/v2/blockchain/accounts/{id}` response.
pub(crate) fn decode_account(result: &Value) -> Result<RawAccount> {
	let balance = parse_balance(
		result
			.get("balance")
			.ok_or_else(|| Error::UnexpectedResponse("missing balance".into()))?,
	)?;
	let status: AccountStatus = str_field(result, "status")?.parse()?;
	let code = opt_cell_hex(result, "code")?;
	let data = opt_cell_hex(result, "data")?;

	let last_transaction_lt = match result.get("last_transaction_lt") {
		Some(v) if !v.is_null() => parse_lt(v)?,
		_ => 0,
	};
	let last_transaction_hash = match result.get("last_transaction_hash").and_then(Value::as_str) {
		Some(s) => {
			let bytes = hex::decode(s).map_err(|e| {
				Error::UnexpectedResponse(format!("bad transaction hash {s:?}: {e}"))
			})?;
			Some(hash_from_slice(&bytes)?)
		}
		None => None,
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

fn opt_cell_hex(result: &Value, name: &str) -> Result<Option<ArcCell>> {
	match result.get(name).and_then(Value::as_str) {
		Some(raw) if !raw.is_empty() => Ok(Some(cell_from_boc_hex(raw)?)),
		_ => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use num_bigint::{BigInt, BigUint};
	use serde_json::json;

	#[test]
	fn account_decoding_reads_scalar_fields() {
		let code = crate::utils::comment_cell("code").unwrap();
		let code_hex = hex::encode(crate::utils::cell_to_boc(&code).unwrap());

		let body = json!({
			"address": "0:83dfd552e6372db472fcbcc8c45ebcc6691702558b68ed7527e1ba403a0f31a8",
			"balance": 989_767_533u64,
			"status": "active",
			"code": code_hex,
			"data": code_hex,
			"last_transaction_lt": 33_973_331_000_003u64,
			"last_transaction_hash": hex::encode([7u8; 32]),
		});

		let account = decode_account(&body).unwrap();
		assert_eq!(account.balance, BigUint::from(989_767_533u64));
		assert_eq!(account.status, AccountStatus::Active);
		assert_eq!(account.last_transaction_lt, 33_973_331_000_003);
		assert_eq!(account.last_transaction_hash, Some([7u8; 32]));
		assert!(account.code.is_some());
		assert!(account.data.is_some());
	}

	#[test]
	fn uninitialized_account_has_no_state() {
		let body = json!({ "balance": "0", "status": "uninit" });
		let account = decode_account(&body).unwrap();
		assert_eq!(account.status, AccountStatus::Uninit);
		assert!(account.code.is_none());
		assert!(account.data.is_none());
		assert_eq!(account.last_transaction_lt, 0);
		assert_eq!(account.last_transaction_hash, None);
	}

	#[test]
	fn stack_decoding_handles_nums_and_cells() {
		let cell = crate::utils::comment_cell("payload").unwrap();
		let cell_hex = hex::encode(crate::utils::cell_to_boc(&cell).unwrap());

		let body = json!({
			"success": true,
			"exit_code": 0,
			"stack": [
				{ "type": "num", "num": "0x2a" },
				{ "type": "slice", "slice": cell_hex },
				{ "type": "null" },
			],
		});

		let stack = decode_get_method_result(&body).unwrap();
		assert_eq!(stack.len(), 3);
		assert_eq!(stack[0].as_int().unwrap(), &BigInt::from(42));
		assert!(stack[1].as_cell().is_ok());
		assert!(matches!(stack[2], StackItem::Null));
	}

	#[test]
	fn failed_get_method_reports_exit_code() {
		let body = json!({ "success": false, "exit_code": -13, "stack": [] });
		match decode_get_method_result(&body) {
			Err(Error::GetMethodFailed { exit_code }) => assert_eq!(exit_code, -13),
			other => panic!("expected GetMethodFailed, got {other:?}"),
		}
	}

	#[test]
	fn int_args_encode_as_decimal() {
		let arg = encode_arg(&StackItem::int(123u32)).unwrap();
		assert_eq!(arg, "123");
	}
}
