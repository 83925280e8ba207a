//! Jetton (fungible token) payload builders and on-chain lookups.

use num_bigint::BigUint;
use tonlib_core::cell::{ArcCell, Cell, CellBuilder};
use tonlib_core::TonAddress;

use super::op_codes::*;
use crate::client::TonClient;
use crate::error::{Error, Result};
use crate::stack::StackItem;
use crate::utils::{store_maybe_ref, store_opt_address};

/// Parameters for a jetton wallet `transfer` body.
///
/// `response_address` defaults to the recipient when unset; excess
/// transport fees return there as an excesses message.
#[derive(Debug, Clone)]
pub struct JettonTransfer {
	pub recipient: TonAddress,
	pub jetton_amount: BigUint,
	pub response_address: Option<TonAddress>,
	pub custom_payload: Option<ArcCell>,
	pub forward_amount: BigUint,
	pub forward_payload: Option<ArcCell>,
	pub query_id: u64,
}

impl JettonTransfer {
	pub fn new(recipient: TonAddress, jetton_amount: BigUint) -> Self {
		Self {
			recipient,
			jetton_amount,
			response_address: None,
			custom_payload: None,
			forward_amount: BigUint::from(0u8),
			forward_payload: None,
			query_id: 0,
		}
	}

	pub fn build(&self) -> Result<Cell> {
		let mut b = CellBuilder::new();
		b.store_u32(32, JETTON_TRANSFER_OPCODE)?;
		b.store_u64(64, self.query_id)?;
		b.store_coins(&self.jetton_amount)?;
		b.store_address(&self.recipient)?;
		b.store_address(self.response_address.as_ref().unwrap_or(&self.recipient))?;
		store_maybe_ref(&mut b, self.custom_payload.as_ref())?;
		b.store_coins(&self.forward_amount)?;
		store_maybe_ref(&mut b, self.forward_payload.as_ref())?;
		Ok(b.build()?)
	}
}

/// Jetton wallet `burn` body.
pub fn build_burn_body(
	jetton_amount: &BigUint,
	response_address: &TonAddress,
	custom_payload: Option<&ArcCell>,
	query_id: u64,
) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, JETTON_BURN_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_coins(jetton_amount)?;
	b.store_address(response_address)?;
	store_maybe_ref(&mut b, custom_payload)?;
	Ok(b.build()?)
}

/// Excesses acknowledgement body, sent back by wallets to the response
/// address.
pub fn build_excesses_body(query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, JETTON_EXCESSES_OPCODE)?;
	b.store_u64(64, query_id)?;
	Ok(b.build()?)
}

/// Jetton master `mint` body.
///
/// Wraps an internal-transfer message for the destination's jetton wallet;
/// `total_ton_amount` pays for the wallet deployment and the forwarded
/// notification, so it must exceed `forward_ton_amount`.
pub fn build_mint_body(
	destination: &TonAddress,
	jetton_amount: &BigUint,
	total_ton_amount: &BigUint,
	forward_ton_amount: &BigUint,
	query_id: u64,
) -> Result<Cell> {
	let mut internal = CellBuilder::new();
	internal.store_u32(32, JETTON_INTERNAL_TRANSFER_OPCODE)?;
	internal.store_u64(64, query_id)?;
	internal.store_coins(jetton_amount)?;
	store_opt_address(&mut internal, None)?; // from: the master itself
	internal.store_address(destination)?;
	internal.store_coins(forward_ton_amount)?;
	internal.store_bit(false)?; // no forward payload
	let internal = internal.build()?;

	let mut b = CellBuilder::new();
	b.store_u32(32, JETTON_MINT_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_address(destination)?;
	b.store_coins(total_ton_amount)?;
	b.store_reference(&std::sync::Arc::new(internal))?;
	Ok(b.build()?)
}

/// Jetton master `change admin` body.
pub fn build_change_admin_body(new_admin: &TonAddress, query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, JETTON_CHANGE_ADMIN_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_address(new_admin)?;
	Ok(b.build()?)
}

/// Body the incoming admin sends to complete a two-step admin handover.
pub fn build_claim_admin_body(query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, JETTON_CLAIM_ADMIN_OPCODE)?;
	b.store_u64(64, query_id)?;
	Ok(b.build()?)
}

/// Body renouncing the master's admin rights permanently.
pub fn build_drop_admin_body(query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, JETTON_DROP_ADMIN_OPCODE)?;
	b.store_u64(64, query_id)?;
	Ok(b.build()?)
}

/// Jetton master body replacing the offchain metadata URI.
pub fn build_change_metadata_uri_body(uri: &str, query_id: u64) -> Result<Cell> {
	let mut content = CellBuilder::new();
	content.store_string(uri)?;
	let content = content.build()?;

	let mut b = CellBuilder::new();
	b.store_u32(32, JETTON_CHANGE_METADATA_URI_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_reference(&std::sync::Arc::new(content))?;
	Ok(b.build()?)
}

/// Resolve the jetton wallet address a master would deploy for an owner,
/// via the master's `get_wallet_address` get-method.
pub async fn get_wallet_address(
	client: &dyn TonClient,
	master: &TonAddress,
	owner: &TonAddress,
) -> Result<TonAddress> {
	let stack = client
		.run_get_method(master, "get_wallet_address", &[StackItem::address(owner)])
		.await?;
	stack
		.first()
		.ok_or_else(|| Error::UnexpectedResponse("get_wallet_address returned an empty stack".into()))?
		.as_address()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	use crate::utils::{comment_cell, load_maybe_ref, to_nano};

	const OWNER: &str = "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N";
	const OTHER: &str = "EQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG";

	#[test]
	fn transfer_roundtrips_through_its_wire_form() {
		let recipient: TonAddress = OWNER.parse().unwrap();
		let response: TonAddress = OTHER.parse().unwrap();

		let mut transfer =
			JettonTransfer::new(recipient.clone(), BigUint::from(to_nano(0.01, 9)));
		transfer.response_address = Some(response.clone());
		transfer.forward_amount = BigUint::from(1u8);
		transfer.forward_payload = Some(Arc::new(comment_cell("hi").unwrap()));
		transfer.query_id = 7;
		let body = transfer.build().unwrap();

		let mut p = body.parser();
		assert_eq!(p.load_u32(32).unwrap(), JETTON_TRANSFER_OPCODE);
		assert_eq!(p.load_u64(64).unwrap(), 7);
		// 0.01 of a 9-decimal token is exactly ten million base units.
		assert_eq!(p.load_coins().unwrap(), BigUint::from(10_000_000u64));
		assert_eq!(p.load_address().unwrap(), recipient);
		assert_eq!(p.load_address().unwrap(), response);
		assert!(load_maybe_ref(&mut p).unwrap().is_none());
		assert_eq!(p.load_coins().unwrap(), BigUint::from(1u8));
		assert!(load_maybe_ref(&mut p).unwrap().is_some());
	}

	#[test]
	fn response_address_defaults_to_recipient() {
		let recipient: TonAddress = OWNER.parse().unwrap();
		let body = JettonTransfer::new(recipient.clone(), BigUint::from(5u8))
			.build()
			.unwrap();

		let mut p = body.parser();
		p.load_u32(32).unwrap();
		p.load_u64(64).unwrap();
		p.load_coins().unwrap();
		assert_eq!(p.load_address().unwrap(), recipient);
		assert_eq!(p.load_address().unwrap(), recipient);
	}

	#[test]
	fn burn_body_layout() {
		let response: TonAddress = OWNER.parse().unwrap();
		let body = build_burn_body(&BigUint::from(42u8), &response, None, 3).unwrap();

		let mut p = body.parser();
		assert_eq!(p.load_u32(32).unwrap(), JETTON_BURN_OPCODE);
		assert_eq!(p.load_u64(64).unwrap(), 3);
		assert_eq!(p.load_coins().unwrap(), BigUint::from(42u8));
		assert_eq!(p.load_address().unwrap(), response);
		assert!(!p.load_bit().unwrap());
	}

	#[test]
	fn mint_wraps_an_internal_transfer() {
		let destination: TonAddress = OWNER.parse().unwrap();
		let body = build_mint_body(
			&destination,
			&BigUint::from(1_000_000u64),
			&BigUint::from(to_nano(0.05, 9)),
			&BigUint::from(0u8),
			0,
		)
		.unwrap();

		let mut p = body.parser();
		assert_eq!(p.load_u32(32).unwrap(), JETTON_MINT_OPCODE);
		assert_eq!(p.load_u64(64).unwrap(), 0);
		assert_eq!(p.load_address().unwrap(), destination);
		assert_eq!(p.load_coins().unwrap(), BigUint::from(50_000_000u64));

		let inner = p.next_reference().unwrap();
		let mut p = inner.parser();
		assert_eq!(p.load_u32(32).unwrap(), JETTON_INTERNAL_TRANSFER_OPCODE);
		assert_eq!(p.load_u64(64).unwrap(), 0);
		assert_eq!(p.load_coins().unwrap(), BigUint::from(1_000_000u64));
	}

	#[test]
	fn admin_bodies_carry_only_their_fields() {
		let admin: TonAddress = OTHER.parse().unwrap();

		let change = build_change_admin_body(&admin, 9).unwrap();
		let mut p = change.parser();
		assert_eq!(p.load_u32(32).unwrap(), JETTON_CHANGE_ADMIN_OPCODE);
		assert_eq!(p.load_u64(64).unwrap(), 9);
		assert_eq!(p.load_address().unwrap(), admin);

		let claim = build_claim_admin_body(0).unwrap();
		let mut p = claim.parser();
		assert_eq!(p.load_u32(32).unwrap(), JETTON_CLAIM_ADMIN_OPCODE);

		let drop = build_drop_admin_body(0).unwrap();
		let mut p = drop.parser();
		assert_eq!(p.load_u32(32).unwrap(), JETTON_DROP_ADMIN_OPCODE);
	}

	#[test]
	fn metadata_uri_lives_in_a_ref() {
		let body = build_change_metadata_uri_body("https://example.com/j.json", 1).unwrap();
		let mut p = body.parser();
		assert_eq!(p.load_u32(32).unwrap(), JETTON_CHANGE_METADATA_URI_OPCODE);
		assert_eq!(p.load_u64(64).unwrap(), 1);
		assert!(p.next_reference().is_ok());
	}
}
