pub mod liteserver;
pub mod tonapi;
pub mod toncenter;

pub use liteserver::{LiteserverClient, LiteserverConfig};
pub use tonapi::TonapiClient;
pub use toncenter::ToncenterClient;

use std::time::Duration;

use async_trait::async_trait;
use num_bigint::{BigInt, BigUint};
use reqwest::header::HeaderMap;
use serde_json::Value;
use tonlib_core::TonAddress;
use tracing::debug;

use crate::account::RawAccount;
use crate::error::{Error, Result};
use crate::stack::{StackItem, TvmStack};

/// Which TON network a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
	#[default]
	Mainnet,
	Testnet,
}

/// Fixed ceiling applied to every outbound request. There is no retry,
/// backoff, or cancellation machinery behind it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Uniform contract implemented by every backend adapter.
///
/// Adapters own the full round trip: argument encoding, transport, and
/// decoding of the provider's bespoke response shape into [`TvmStack`]
/// and [`RawAccount`]. Callers never branch on backend identity.
#[async_trait]
pub trait TonClient: Send + Sync {
	/// Invoke a read-only contract method and return the normalized
	/// result stack. A non-zero TVM exit code reported by the backend
	/// surfaces as [`Error::GetMethodFailed`].
	async fn run_get_method(
		&self,
		address: &TonAddress,
		method: &str,
		stack: &[StackItem],
	) -> Result<TvmStack>;

	/// Submit a pre-serialized signed message envelope. Rejections
	/// (malformed BOC, insufficient fee, seqno mismatch) surface as
	/// transport errors carrying the backend's message; nothing retries.
	async fn send_message(&self, boc: &[u8]) -> Result<()>;

	/// Fetch and normalize raw account state.
	async fn get_raw_account(&self, address: &TonAddress) -> Result<RawAccount>;

	/// Convenience projection of [`TonClient::get_raw_account`].
	async fn get_account_balance(&self, address: &TonAddress) -> Result<BigUint> {
		Ok(self.get_raw_account(address).await?.balance)
	}
}

// -- Shared HTTP plumbing for the REST adapters --

/// Thin JSON-over-HTTP helper.
///
/// Normalizes transport failures: non-2xx responses become
/// [`Error::Transport`] carrying the server-provided message, and bodies
/// that are not valid JSON degrade to their raw text payload instead of
/// failing the parse.
pub(crate) struct HttpApi {
	base_url: String,
	http: reqwest::Client,
}

impl HttpApi {
	pub(crate) fn new(base_url: String, headers: HeaderMap) -> Result<Self> {
		let http = reqwest::Client::builder()
			.default_headers(headers)
			.timeout(REQUEST_TIMEOUT)
			.build()?;
		Ok(Self { base_url, http })
	}

	pub(crate) async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
		let url = format!("{}{}", self.base_url, path);
		debug!(%url, "GET");
		let response = self.http.get(&url).query(params).send().await?;
		Self::read_response(response).await
	}

	pub(crate) async fn post(&self, path: &str, body: &Value) -> Result<Value> {
		let url = format!("{}{}", self.base_url, path);
		debug!(%url, "POST");
		let response = self.http.post(&url).json(body).send().await?;
		Self::read_response(response).await
	}

	async fn read_response(response: reqwest::Response) -> Result<Value> {
		let status = response.status();
		let text = response.text().await?;
		// Malformed bodies degrade to their raw text rather than failing.
		let content = serde_json::from_str(&text).unwrap_or(Value::String(text));

		if !status.is_success() {
			return Err(Error::Transport {
				status: status.as_u16(),
				message: error_message(&content),
			});
		}
		Ok(content)
	}
}

/// Pull the server's error description out of whatever shape it sent.
fn error_message(content: &Value) -> String {
	match content {
		Value::String(s) => s.clone(),
		other => other
			.get("error")
			.and_then(Value::as_str)
			.map(str::to_owned)
			.unwrap_or_else(|| other.to_string()),
	}
}

// -- Shared response-field parsing --

/// Parse a stack integer that may be decimal or 0x-hex, with an optional
/// leading sign.
pub(crate) fn parse_int(raw: &str) -> Result<BigInt> {
	let (negative, digits) = match raw.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, raw),
	};
	let value = match digits.strip_prefix("0x") {
		Some(hex_digits) => BigInt::parse_bytes(hex_digits.as_bytes(), 16),
		None => BigInt::parse_bytes(digits.as_bytes(), 10),
	};
	let value = value
		.ok_or_else(|| Error::UnexpectedResponse(format!("bad stack integer {raw:?}")))?;
	Ok(if negative { -value } else { value })
}

/// Parse a balance field that may arrive as a JSON number or a decimal
/// string, depending on the backend.
pub(crate) fn parse_balance(value: &Value) -> Result<BigUint> {
	match value {
		Value::Number(n) => n
			.as_u64()
			.map(BigUint::from)
			.ok_or_else(|| Error::UnexpectedResponse(format!("bad balance {n}"))),
		Value::String(s) => BigUint::parse_bytes(s.as_bytes(), 10)
			.ok_or_else(|| Error::UnexpectedResponse(format!("bad balance {s:?}"))),
		other => Err(Error::UnexpectedResponse(format!("bad balance {other}"))),
	}
}

/// Parse a logical-time field that may arrive as a JSON number or a
/// decimal string.
pub(crate) fn parse_lt(value: &Value) -> Result<u64> {
	match value {
		Value::Number(n) => n
			.as_u64()
			.ok_or_else(|| Error::UnexpectedResponse(format!("bad logical time {n}"))),
		Value::String(s) => s
			.parse()
			.map_err(|_| Error::UnexpectedResponse(format!("bad logical time {s:?}"))),
		other => Err(Error::UnexpectedResponse(format!("bad logical time {other}"))),
	}
}

pub(crate) fn str_field<'a>(value: &'a Value, name: &str) -> Result<&'a str> {
	value
		.get(name)
		.and_then(Value::as_str)
		.ok_or_else(|| Error::UnexpectedResponse(format!("missing field {name:?}")))
}

pub(crate) fn hash_from_slice(bytes: &[u8]) -> Result<[u8; 32]> {
	bytes
		.try_into()
		.map_err(|_| Error::UnexpectedResponse(format!("hash is {} bytes, want 32", bytes.len())))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_int_accepts_hex_and_decimal() {
		assert_eq!(parse_int("0x10").unwrap(), BigInt::from(16));
		assert_eq!(parse_int("16").unwrap(), BigInt::from(16));
		assert_eq!(parse_int("-0x1").unwrap(), BigInt::from(-1));
		assert_eq!(parse_int("-5").unwrap(), BigInt::from(-5));
		assert!(parse_int("zz").is_err());
	}

	#[test]
	fn parse_balance_accepts_both_encodings() {
		assert_eq!(
			parse_balance(&serde_json::json!(123u64)).unwrap(),
			BigUint::from(123u32)
		);
		assert_eq!(
			parse_balance(&serde_json::json!("456")).unwrap(),
			BigUint::from(456u32)
		);
		assert!(parse_balance(&serde_json::json!(null)).is_err());
	}

	#[test]
	fn error_message_prefers_the_error_field() {
		let body = serde_json::json!({"error": "rate limited", "code": 429});
		assert_eq!(error_message(&body), "rate limited");
		assert_eq!(error_message(&Value::String("plain text".into())), "plain text");
	}

	// The cross-backend equivalence checks live with the adapters; each
	// decoder is fed an equivalent canned response in its own module and
	// the combined check is in `liteserver::tests`.
}
