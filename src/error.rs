use thiserror::Error;
use tonlib_core::cell::TonCellError;
use tonlib_core::TonAddressParseError;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong talking to a backend or assembling a
/// payload. Transport failures carry the server-provided message; nothing
/// is retried internally.
#[derive(Debug, Error)]
pub enum Error {
	/// Non-2xx HTTP response, with whatever error text the server sent.
	#[error("HTTP {status}: {message}")]
	Transport { status: u16, message: String },

	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),

	/// The backend answered 2xx but the body did not have the shape the
	/// adapter expects.
	#[error("unexpected response: {0}")]
	UnexpectedResponse(String),

	/// The TVM reported a non-zero exit code for a get method.
	#[error("get method failed with exit code {exit_code}")]
	GetMethodFailed { exit_code: i64 },

	#[error("cell error: {0}")]
	Cell(#[from] TonCellError),

	#[error("invalid address: {0}")]
	Address(#[from] TonAddressParseError),

	#[error("invalid configuration: {0}")]
	Config(String),

	/// The liteserver backend needs a native ADNL transport that is not
	/// part of this build. Reported by every method of the client, not
	/// just at construction.
	#[error("liteserver transport is not available in this build")]
	LiteserverUnavailable,
}
