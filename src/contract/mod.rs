//! Payload builders for the supported contract families.
//!
//! Builders are stateless: given typed parameters they assemble a message
//! body cell (opcode, query id, then operation-specific fields). Each
//! body's layout is a wire contract with the target bytecode; nothing here
//! can validate acceptance locally.

pub mod dns;
pub mod jetton;
pub mod nft;
pub mod op_codes;
pub mod sale;

use tonlib_core::cell::{ArcCell, Cell, CellBuilder};

use crate::error::Result;

/// Assemble a `StateInit` cell from code and data.
///
/// No split depth, no tick-tock, no library dictionary; that covers every
/// contract this crate deploys.
pub fn build_state_init(code: &ArcCell, data: &ArcCell) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_bit(false)?; // split_depth
	b.store_bit(false)?; // special
	b.store_bit(true)?;
	b.store_reference(code)?;
	b.store_bit(true)?;
	b.store_reference(data)?;
	b.store_bit(false)?; // library
	Ok(b.build()?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	use crate::utils::comment_cell;

	#[test]
	fn state_init_carries_code_and_data_refs() {
		let code = Arc::new(comment_cell("code").unwrap());
		let data = Arc::new(comment_cell("data").unwrap());
		let init = build_state_init(&code, &data).unwrap();

		let mut parser = init.parser();
		assert!(!parser.load_bit().unwrap());
		assert!(!parser.load_bit().unwrap());
		assert!(parser.load_bit().unwrap());
		assert!(parser.load_bit().unwrap());
		assert!(!parser.load_bit().unwrap());
		assert!(parser.next_reference().is_ok());
		assert!(parser.next_reference().is_ok());
	}
}
