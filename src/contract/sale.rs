//! Getgems-style fixed-price sale (v3) listing builders.
//!
//! Listing works by transferring the NFT to the marketplace deployer with
//! the sale contract's state init riding in the forward payload; the
//! deployer counter-deploys the sale contract at the derived address.

use std::sync::Arc;

use num_bigint::BigUint;
use tonlib_core::cell::{ArcCell, Cell, CellBuilder};
use tonlib_core::TonAddress;

use super::op_codes::SALE_CANCEL_OPCODE;
use super::{build_state_init, nft::NftTransfer};
use crate::error::Result;

/// Storage parameters of a fixed-price sale contract.
#[derive(Debug, Clone)]
pub struct FixedPriceSale {
	pub marketplace_address: TonAddress,
	pub nft_address: TonAddress,
	pub owner_address: TonAddress,
	pub marketplace_fee_address: TonAddress,
	pub royalty_address: TonAddress,
	/// All amounts in nanoton.
	pub marketplace_fee: BigUint,
	pub royalty_fee: BigUint,
	pub price: BigUint,
	/// Unix timestamp baked into the storage; distinguishes relistings.
	pub created_at: u32,
}

impl FixedPriceSale {
	/// Initial storage cell for the sale contract.
	pub fn data_cell(&self) -> Result<Cell> {
		let mut fees = CellBuilder::new();
		fees.store_address(&self.marketplace_fee_address)?;
		fees.store_coins(&self.marketplace_fee)?;
		fees.store_address(&self.royalty_address)?;
		fees.store_coins(&self.royalty_fee)?;
		let fees = fees.build()?;

		let mut b = CellBuilder::new();
		b.store_bit(false)?; // is_complete
		b.store_u32(32, self.created_at)?;
		b.store_address(&self.marketplace_address)?;
		b.store_address(&self.nft_address)?;
		b.store_address(&self.owner_address)?;
		b.store_coins(&self.price)?;
		b.store_reference(&Arc::new(fees))?;
		Ok(b.build()?)
	}

	/// State init for the sale contract, from the caller-supplied sale
	/// bytecode (marketplaces pin their own audited revision).
	pub fn state_init(&self, sale_code: &ArcCell) -> Result<Cell> {
		build_state_init(sale_code, &Arc::new(self.data_cell()?))
	}

	/// The NFT transfer body that lists the item: sends it to the
	/// marketplace deployer with the sale state init and an empty deploy
	/// body in the forward payload.
	pub fn build_transfer_nft_body(
		&self,
		deployer: &TonAddress,
		sale_code: &ArcCell,
		forward_amount: &BigUint,
		query_id: u64,
	) -> Result<Cell> {
		let mut payload = CellBuilder::new();
		payload.store_reference(&Arc::new(self.state_init(sale_code)?))?;
		payload.store_reference(&Arc::new(CellBuilder::new().build()?))?;
		let payload = payload.build()?;

		let mut transfer = NftTransfer::new(deployer.clone());
		transfer.response_address = Some(self.owner_address.clone());
		transfer.forward_amount = forward_amount.clone();
		transfer.forward_payload = Some(Arc::new(payload));
		transfer.query_id = query_id;
		transfer.build()
	}
}

/// Body the owner sends to the sale contract to delist.
pub fn build_cancel_body(query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, SALE_CANCEL_OPCODE)?;
	b.store_u64(64, query_id)?;
	Ok(b.build()?)
}

#[cfg(test)]
mod tests {
	use super::*;

	use super::super::op_codes::NFT_TRANSFER_OPCODE;
	use crate::utils::{comment_cell, load_maybe_ref, to_nano};

	const OWNER: &str = "EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N";
	const MARKET: &str = "EQBvW8Z5huBkMJYdnfAEM5JqTNkuWX3diqYENkWsIL0XggGG";

	fn sample_sale() -> FixedPriceSale {
		let price = BigUint::from(to_nano(1.0, 9));
		FixedPriceSale {
			marketplace_address: MARKET.parse().unwrap(),
			nft_address: OWNER.parse().unwrap(),
			owner_address: OWNER.parse().unwrap(),
			marketplace_fee_address: MARKET.parse().unwrap(),
			royalty_address: MARKET.parse().unwrap(),
			marketplace_fee: &price * 5u32 / 100u32,
			royalty_fee: &price * 10u32 / 100u32,
			price,
			created_at: 1_700_000_000,
		}
	}

	#[test]
	fn data_cell_layout() {
		let sale = sample_sale();
		let cell = sale.data_cell().unwrap();

		let mut p = cell.parser();
		assert!(!p.load_bit().unwrap());
		assert_eq!(p.load_u32(32).unwrap(), 1_700_000_000);
		assert_eq!(p.load_address().unwrap(), sale.marketplace_address);
		assert_eq!(p.load_address().unwrap(), sale.nft_address);
		assert_eq!(p.load_address().unwrap(), sale.owner_address);
		assert_eq!(p.load_coins().unwrap(), BigUint::from(1_000_000_000u64));

		let fees = p.next_reference().unwrap();
		let mut p = fees.parser();
		assert_eq!(p.load_address().unwrap(), sale.marketplace_fee_address);
		assert_eq!(p.load_coins().unwrap(), BigUint::from(50_000_000u64));
		assert_eq!(p.load_address().unwrap(), sale.royalty_address);
		assert_eq!(p.load_coins().unwrap(), BigUint::from(100_000_000u64));
	}

	#[test]
	fn listing_body_is_a_transfer_with_state_init_payload() {
		let sale = sample_sale();
		let code = Arc::new(comment_cell("sale code").unwrap());
		let deployer: TonAddress = MARKET.parse().unwrap();

		let body = sale
			.build_transfer_nft_body(&deployer, &code, &BigUint::from(to_nano(0.2, 9)), 1)
			.unwrap();

		let mut p = body.parser();
		assert_eq!(p.load_u32(32).unwrap(), NFT_TRANSFER_OPCODE);
		assert_eq!(p.load_u64(64).unwrap(), 1);
		assert_eq!(p.load_address().unwrap(), deployer);
		assert_eq!(p.load_address().unwrap(), sale.owner_address);
		assert!(load_maybe_ref(&mut p).unwrap().is_none());
		assert_eq!(p.load_coins().unwrap(), BigUint::from(200_000_000u64));

		let payload = load_maybe_ref(&mut p).unwrap().expect("forward payload");
		let mut p = payload.parser();
		let state_init = p.next_reference().unwrap();
		assert!(p.next_reference().is_ok()); // empty deploy body

		// First two StateInit bits: no split depth, not special.
		let mut p = state_init.parser();
		assert!(!p.load_bit().unwrap());
		assert!(!p.load_bit().unwrap());
		assert!(p.load_bit().unwrap());
	}

	#[test]
	fn cancel_body_layout() {
		let body = build_cancel_body(4).unwrap();
		let mut p = body.parser();
		assert_eq!(p.load_u32(32).unwrap(), SALE_CANCEL_OPCODE);
		assert_eq!(p.load_u64(64).unwrap(), 4);
	}
}
