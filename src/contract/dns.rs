//! TON DNS record-change payload builders.
//!
//! Record keys are the sha256 of the record name; values are tagged cells
//! (one 16-bit tag per record kind). Omitting the value ref deletes the
//! record.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tonlib_core::cell::{Cell, CellBuilder};
use tonlib_core::TonAddress;

use super::op_codes::CHANGE_DNS_RECORD_OPCODE;
use crate::error::Result;

// 16-bit value tags from the TON DNS standard.
const WALLET_RECORD_TAG: u32 = 0x9fd3;
const SITE_RECORD_TAG: u32 = 0xad01;
const STORAGE_RECORD_TAG: u32 = 0x7473;
const NEXT_RESOLVER_RECORD_TAG: u32 = 0xba93;

/// Key of a named record: sha256 of the record name.
pub fn record_key(name: &str) -> [u8; 32] {
	Sha256::digest(name.as_bytes()).into()
}

fn change_record_body(key: [u8; 32], value: Option<Cell>, query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, CHANGE_DNS_RECORD_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_slice(&key)?;
	if let Some(value) = value {
		b.store_reference(&Arc::new(value))?;
	}
	Ok(b.build()?)
}

/// Point the `wallet` record at an address.
pub fn build_set_wallet_record_body(wallet: &TonAddress, query_id: u64) -> Result<Cell> {
	let mut value = CellBuilder::new();
	value.store_u32(16, WALLET_RECORD_TAG)?;
	value.store_address(wallet)?;
	value.store_u8(8, 0)?; // flags
	change_record_body(record_key("wallet"), Some(value.build()?), query_id)
}

/// Point the `site` record at an ADNL address.
pub fn build_set_site_record_body(adnl_address: &[u8; 32], query_id: u64) -> Result<Cell> {
	let mut value = CellBuilder::new();
	value.store_u32(16, SITE_RECORD_TAG)?;
	value.store_slice(adnl_address)?;
	value.store_u8(8, 0)?; // flags
	change_record_body(record_key("site"), Some(value.build()?), query_id)
}

/// Point the `storage` record at a TON Storage bag id.
pub fn build_set_storage_record_body(bag_id: &[u8; 32], query_id: u64) -> Result<Cell> {
	let mut value = CellBuilder::new();
	value.store_u32(16, STORAGE_RECORD_TAG)?;
	value.store_slice(bag_id)?;
	change_record_body(record_key("storage"), Some(value.build()?), query_id)
}

/// Delegate all further resolution to another resolver contract.
pub fn build_set_next_resolver_record_body(
	resolver: &TonAddress,
	query_id: u64,
) -> Result<Cell> {
	let mut value = CellBuilder::new();
	value.store_u32(16, NEXT_RESOLVER_RECORD_TAG)?;
	value.store_address(resolver)?;
	change_record_body(record_key("dns_next_resolver"), Some(value.build()?), query_id)
}

/// Delete a record by name.
pub fn build_delete_record_body(name: &str, query_id: u64) -> Result<Cell> {
	change_record_body(record_key(name), None, query_id)
}
