use num_bigint::BigInt;
use tonlib_core::cell::{ArcCell, BagOfCells, CellBuilder};
use tonlib_core::TonAddress;

use crate::error::{Error, Result};

/// One typed value on a get-method argument or result stack.
///
/// Every backend encodes these differently on the wire (decimal strings,
/// hex strings, base64 BOCs, typed JSON objects); the adapters own both
/// directions of that mapping, so callers only ever see this enum and
/// consume results positionally.
#[derive(Debug, Clone)]
pub enum StackItem {
	Int(BigInt),
	/// A cell result (whole cell with references).
	Cell(ArcCell),
	/// A slice result (cell consumed as a bit string).
	Slice(ArcCell),
	/// An address argument; adapters pick the native encoding.
	Address(TonAddress),
	Null,
}

/// Ordered get-method result stack.
pub type TvmStack = Vec<StackItem>;

impl StackItem {
	pub fn int(value: impl Into<BigInt>) -> Self {
		Self::Int(value.into())
	}

	pub fn address(address: &TonAddress) -> Self {
		Self::Address(address.clone())
	}

	/// Read this entry as an integer.
	pub fn as_int(&self) -> Result<&BigInt> {
		match self {
			Self::Int(v) => Ok(v),
			other => Err(type_error("integer", other)),
		}
	}

	/// Read this entry as a non-negative integer that fits in 64 bits.
	pub fn as_u64(&self) -> Result<u64> {
		let v = self.as_int()?;
		u64::try_from(v).map_err(|_| {
			Error::UnexpectedResponse(format!("stack integer {v} does not fit in u64"))
		})
	}

	/// Read this entry as a cell (accepts both cell and slice results).
	pub fn as_cell(&self) -> Result<&ArcCell> {
		match self {
			Self::Cell(c) | Self::Slice(c) => Ok(c),
			other => Err(type_error("cell", other)),
		}
	}

	/// Read this entry as an address: either a direct address value or a
	/// slice whose head is a serialized address.
	pub fn as_address(&self) -> Result<TonAddress> {
		match self {
			Self::Address(a) => Ok(a.clone()),
			Self::Cell(c) | Self::Slice(c) => {
				let mut parser = c.parser();
				Ok(parser.load_address()?)
			}
			other => Err(type_error("address", other)),
		}
	}

	/// Serialize this entry to a single-root BOC for backends that take
	/// slice-typed arguments.
	pub(crate) fn to_boc(&self) -> Result<Vec<u8>> {
		let cell = match self {
			Self::Address(a) => {
				let mut b = CellBuilder::new();
				b.store_address(a)?;
				b.build()?
			}
			Self::Cell(c) | Self::Slice(c) => c.as_ref().clone(),
			other => return Err(type_error("slice", other)),
		};
		Ok(BagOfCells::from_root(cell).serialize(true)?)
	}
}

fn type_error(wanted: &str, got: &StackItem) -> Error {
	Error::UnexpectedResponse(format!("expected {wanted} stack entry, got {got:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tonlib_core::cell::BagOfCells;

	const ADDR: &str = "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N";

	#[test]
	fn int_accessors() {
		let item = StackItem::int(42u32);
		assert_eq!(item.as_u64().unwrap(), 42);
		assert!(item.as_cell().is_err());
	}

	#[test]
	fn negative_int_does_not_fit_u64() {
		let item = StackItem::int(-1);
		assert!(item.as_u64().is_err());
	}

	#[test]
	fn address_roundtrips_through_boc() {
		let addr: TonAddress = ADDR.parse().unwrap();
		let boc = StackItem::address(&addr).to_boc().unwrap();

		let parsed = BagOfCells::parse(&boc).unwrap();
		let root = parsed.single_root().unwrap().clone();
		let recovered = StackItem::Slice(root).as_address().unwrap();
		assert_eq!(recovered, addr);
	}

	#[test]
	fn null_is_not_an_address() {
		assert!(StackItem::Null.as_address().is_err());
		assert!(StackItem::Null.to_boc().is_err());
	}
}
