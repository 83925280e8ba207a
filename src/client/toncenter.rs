//! Adapter for the toncenter.com API v3 indexer.
//!
//! The request/response shapes differ from tonapi's in every direction:
//! get-method arguments must be tagged by type (`num` vs `slice`) in a
//! JSON body, results arrive as a positional `{type, value}` stack, and
//! hash and state fields are base64-encoded rather than hex.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::{json, Value};
use tonlib_core::cell::{ArcCell, Cell};
use tonlib_core::TonAddress;

use super::{
	hash_from_slice, parse_balance, parse_int, parse_lt, str_field, HttpApi, Network, TonClient,
};
use crate::account::{AccountStatus, RawAccount};
use crate::error::{Error, Result};
use crate::stack::{StackItem, TvmStack};
use crate::utils::{cell_from_boc_base64, cell_to_boc_base64};

pub struct ToncenterClient {
	api: HttpApi,
}

impl ToncenterClient {
	pub fn new(api_key: &str, network: Network) -> Result<Self> {
		let base_url = match network {
			Network::Mainnet => "https://toncenter.com",
			Network::Testnet => "https://testnet.toncenter.com",
		};
		Self::with_base_url(api_key, base_url)
	}

	/// Point the adapter at a self-hosted toncenter deployment.
	pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
		let mut headers = HeaderMap::new();
		if !api_key.is_empty() {
			let value = HeaderValue::from_str(api_key)
				.map_err(|e| Error::Config(format!("invalid API key: {e}")))?;
			headers.insert(HeaderName::from_static("x-api-key"), value);
		}
		let api = HttpApi::new(base_url.trim_end_matches('/').to_owned(), headers)?;
		Ok(Self { api })
	}

	/// Estimate the fees a message would incur.
	///
	/// Toncenter-specific: no other backend exposes an estimator, so this
	/// deliberately lives off the [`TonClient`] trait.
	pub async fn estimate_fee(
		&self,
		address: &TonAddress,
		body: &Cell,
		init_code: Option<&Cell>,
		init_data: Option<&Cell>,
		ignore_chksig: bool,
	) -> Result<FeeEstimate> {
		let payload = json!({
			"address": address.to_string(),
			"body": cell_to_boc_base64(body)?,
			"init_code": opt_boc(init_code)?,
			"init_data": opt_boc(init_data)?,
			"ignore_chksig": ignore_chksig,
		});
		let result = self.api.post("/api/v3/estimateFee", &payload).await?;
		let fees = result.get("source_fees").unwrap_or(&result);
		serde_json::from_value(fees.clone())
			.map_err(|e| Error::UnexpectedResponse(format!("bad fee estimate: {e}")))
	}
}

#[async_trait::async_trait]
impl TonClient for ToncenterClient {
	async fn run_get_method(
		&self,
		address: &TonAddress,
		method: &str,
		stack: &[StackItem],
	) -> Result<TvmStack> {
		let body = json!({
			"address": address.to_string(),
			"method": method,
			"stack": encode_stack(stack)?,
		});
		let result = self.api.post("/api/v3/runGetMethod", &body).await?;
		decode_get_method_result(&result)
	}

	async fn send_message(&self, boc: &[u8]) -> Result<()> {
		let body = json!({ "boc": BASE64.encode(boc) });
		self.api.post("/api/v3/message", &body).await?;
		Ok(())
	}

	async fn get_raw_account(&self, address: &TonAddress) -> Result<RawAccount> {
		let params = [("address", address.to_string())];
		let result = self.api.get("/api/v3/account", &params).await?;
		decode_account(&result)
	}
}

/// Source-side fee breakdown returned by the estimator, in nanoton.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeEstimate {
	pub in_fwd_fee: u64,
	pub storage_fee: u64,
	pub gas_fee: u64,
	pub fwd_fee: u64,
}

fn opt_boc(cell: Option<&Cell>) -> Result<Value> {
	match cell {
		Some(c) => Ok(Value::String(cell_to_boc_base64(c)?)),
		None => Ok(Value::Null),
	}
}

/// Encode arguments as the tagged `{type, value}` objects the body wants.
pub(crate) fn encode_stack(stack: &[StackItem]) -> Result<Vec<Value>> {
	stack
		.iter()
		.map(|item| match item {
			StackItem::Int(v) => Ok(json!({ "type": "num", "value": v.to_string() })),
			StackItem::Address(_) | StackItem::Cell(_) | StackItem::Slice(_) => Ok(json!({
				"type": "slice",
				"value": BASE64.encode(item.to_boc()?),
			})),
			StackItem::Null => Err(Error::Config(
				"toncenter does not accept null stack arguments".into(),
			)),
		})
		.collect()
}

/// Decode the positional `{type, value}` result stack.
pub(crate) fn decode_get_method_result(result: &Value) -> Result<TvmStack> {
	let exit_code = result.get("exit_code").and_then(Value::as_i64).unwrap_or(0);
	if exit_code != 0 {
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
		"num" => Ok(StackItem::Int(parse_int(str_field(entry, "value")?)?)),
		"cell" => Ok(StackItem::Cell(cell_from_boc_base64(str_field(entry, "value")?)?)),
		"slice" => Ok(StackItem::Slice(cell_from_boc_base64(str_field(entry, "value")?)?)),
		"null" => Ok(StackItem::Null),
		other => Err(Error::UnexpectedResponse(format!(
			"unsupported stack entry type {other:?}"
		))),
	}
}

/// Decode the `/api/v3/account` response. Hashes and state cells are
/// base64; balance and logical time are decimal strings.
pub(crate) fn decode_account(result: &Value) -> Result<RawAccount> {
	let balance = parse_balance(
		result
			.get("balance")
			.ok_or_else(|| Error::UnexpectedResponse("missing balance".into()))?,
	)?;
	let status: AccountStatus = str_field(result, "status")?.parse()?;
	let code = opt_cell_base64(result, "code")?;
	let data = opt_cell_base64(result, "data")?;

	let last_transaction_lt = match result.get("last_transaction_lt") {
		Some(v) if !v.is_null() => parse_lt(v)?,
		_ => 0,
	};
	let last_transaction_hash = match result.get("last_transaction_hash").and_then(Value::as_str) {
		Some(s) => {
			let bytes = BASE64.decode(s).map_err(|e| {
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

fn opt_cell_base64(result: &Value, name: &str) -> Result<Option<ArcCell>> {
	match result.get(name).and_then(Value::as_str) {
		Some(raw) if !raw.is_empty() => Ok(Some(cell_from_boc_base64(raw)?)),
		_ => Ok(None),
	}
}
