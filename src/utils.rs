//! Amount conversion, BOC serialization helpers, and small TL-B field
//! helpers shared by the builders and adapters.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tonlib_core::cell::{ArcCell, BagOfCells, Cell, CellBuilder, CellParser};
use tonlib_core::TonAddress;

use crate::error::Result;

/// Convert a human-readable amount into base units for a token with the
/// given number of decimal places. `to_nano(0.01, 9)` is 10_000_000.
pub fn to_nano(amount: f64, decimals: u32) -> u128 {
	(amount * 10f64.powi(decimals as i32)).round() as u128
}

/// Inverse of [`to_nano`]; lossy for balances above 2^53 base units.
pub fn from_nano(value: u128, decimals: u32) -> f64 {
	value as f64 / 10f64.powi(decimals as i32)
}

/// Serialize a single cell into its bag-of-cells wire form.
pub fn cell_to_boc(cell: &Cell) -> Result<Vec<u8>> {
	Ok(BagOfCells::from_root(cell.clone()).serialize(true)?)
}

/// Base64 form of [`cell_to_boc`], the encoding the REST backends accept.
pub fn cell_to_boc_base64(cell: &Cell) -> Result<String> {
	Ok(BASE64.encode(cell_to_boc(cell)?))
}

/// Parse a single-root BOC from raw bytes.
pub fn cell_from_boc(bytes: &[u8]) -> Result<ArcCell> {
	let boc = BagOfCells::parse(bytes)?;
	Ok(boc.single_root()?.clone())
}

/// Parse a single-root BOC from a hex string.
pub fn cell_from_boc_hex(raw: &str) -> Result<ArcCell> {
	let boc = BagOfCells::parse_hex(raw)?;
	Ok(boc.single_root()?.clone())
}

/// Parse a single-root BOC from a base64 string.
pub fn cell_from_boc_base64(raw: &str) -> Result<ArcCell> {
	let boc = BagOfCells::parse_base64(raw)?;
	Ok(boc.single_root()?.clone())
}

/// Message body carrying a plain text comment (opcode 0).
pub fn comment_cell(text: &str) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, 0)?;
	b.store_string(text)?;
	Ok(b.build()?)
}

/// Write a `Maybe ^Cell` field.
pub fn store_maybe_ref(builder: &mut CellBuilder, cell: Option<&ArcCell>) -> Result<()> {
	match cell {
		Some(c) => {
			builder.store_bit(true)?;
			builder.store_reference(c)?;
		}
		None => {
			builder.store_bit(false)?;
		}
	}
	Ok(())
}

/// Read a `Maybe ^Cell` field.
pub fn load_maybe_ref(parser: &mut CellParser) -> Result<Option<ArcCell>> {
	if parser.load_bit()? {
		Ok(Some(parser.next_reference()?))
	} else {
		Ok(None)
	}
}

/// Write an optional address, `addr_none$00` when absent.
pub fn store_opt_address(builder: &mut CellBuilder, address: Option<&TonAddress>) -> Result<()> {
	match address {
		Some(a) => {
			builder.store_address(a)?;
		}
		None => {
			builder.store_u8(2, 0)?;
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn to_nano_handles_fractional_amounts() {
		// 0.01 of a 9-decimal token is exactly 10 million base units.
		assert_eq!(to_nano(0.01, 9), 10_000_000);
		assert_eq!(to_nano(1.0, 9), 1_000_000_000);
		assert_eq!(to_nano(0.25, 6), 250_000);
		assert_eq!(to_nano(0.0, 9), 0);
	}

	#[test]
	fn from_nano_inverts_to_nano() {
		assert_eq!(from_nano(1_000_000_000, 9), 1.0);
		assert_eq!(from_nano(10_000_000, 9), 0.01);
	}

	#[test]
	fn comment_cell_starts_with_zero_opcode() {
		let cell = comment_cell("hello").unwrap();
		let mut parser = cell.parser();
		assert_eq!(parser.load_u32(32).unwrap(), 0);
	}

	#[test]
	fn boc_roundtrip_preserves_the_cell() {
		let cell = comment_cell("roundtrip").unwrap();
		let boc = cell_to_boc(&cell).unwrap();
		let parsed = cell_from_boc(&boc).unwrap();

		let mut parser = parsed.parser();
		assert_eq!(parser.load_u32(32).unwrap(), 0);
	}

	#[test]
	fn maybe_ref_roundtrip() {
		let inner = std::sync::Arc::new(comment_cell("x").unwrap());

		let mut b = CellBuilder::new();
		store_maybe_ref(&mut b, Some(&inner)).unwrap();
		store_maybe_ref(&mut b, None).unwrap();
		let cell = b.build().unwrap();

		let mut parser = cell.parser();
		assert!(load_maybe_ref(&mut parser).unwrap().is_some());
		assert!(load_maybe_ref(&mut parser).unwrap().is_none());
	}

	#[test]
	fn opt_address_none_is_addr_none() {
		let mut b = CellBuilder::new();
		store_opt_address(&mut b, None).unwrap();
		let cell = b.build().unwrap();

		let mut parser = cell.parser();
		// Two zero bits: the addr_none constructor tag.
		assert!(!parser.load_bit().unwrap());
		assert!(!parser.load_bit().unwrap());
	}
}
