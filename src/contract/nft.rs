//! NFT item, collection, and soulbound payload builders plus on-chain
//! getters.
//!
//! Collection deployment uses the audited production bytecode embedded
//! below; item/collection storage layouts are the wire contract with that
//! exact code.

use std::collections::HashMap;
use std::sync::Arc;

use num_bigint::BigUint;
use tonlib_core::cell::{ArcCell, Cell, CellBuilder, TonCellError};
use tonlib_core::TonAddress;

use super::op_codes::*;
use crate::client::TonClient;
use crate::error::{Error, Result};
use crate::utils::{cell_from_boc_hex, store_maybe_ref};

// -- Production bytecode --

/// Standard NFT item code (TEP-62 reference implementation).
pub const NFT_ITEM_CODE_HEX: &str = "b5ee9c7241020d010001d0000114ff00f4a413f4bcf2c80b0102016203020009a11f9fe0050202ce050402012008060201200907001d00f232cfd633c58073c5b3327b552000113e910c1c2ebcb85360003b3b513434cffe900835d27080269fc07e90350c04090408f80c1c165b5b6002d70c8871c02497c0f83434c0c05c6c2497c0f83e903e900c7e800c5c75c87e800c7e800c3c00812ce3850c1b088d148cb1c17cb865407e90350c0408fc00f801b4c7f4cfe08417f30f45148c2ea3a1cc840dd78c9004f80c0d0d0d4d60840bf2c9a884aeb8c097c12103fcbc200b0a00727082108b77173505c8cbff5004cf1610248040708010c8cb055007cf165005fa0215cb6a12cb1fcb3f226eb39458cf17019132e201c901fb0001f65135c705f2e191fa4021f001fa40d20031fa00820afaf0801ba121945315a0a1de22d70b01c300209206a19136e220c2fff2e192218e3e821005138d91c85009cf16500bcf16712449145446a0708010c8cb055007cf165005fa0215cb6a12cb1fcb3f226eb39458cf17019132e201c901fb00104794102a375be20c0082028e3526f0018210d53276db103744006d71708010c8cb055007cf165005fa0215cb6a12cb1fcb3f226eb39458cf17019132e201c901fb0093303234e25502f003cc82807e";

/// Editable NFT collection code.
pub const NFT_COLLECTION_CODE_HEX: &str = "b5ee9c724102140100021f000114ff00f4a413f4bcf2c80b0102016202030202cd04050201200e0f04e7d10638048adf000e8698180b8d848adf07d201800e98fe99ff6a2687d20699fea6a6a184108349e9ca829405d47141baf8280e8410854658056b84008646582a802e78b127d010a65b509e58fe59f80e78b64c0207d80701b28b9e382f970c892e000f18112e001718112e001f181181981e0024060708090201200a0b00603502d33f5313bbf2e1925313ba01fa00d43028103459f0068e1201a44343c85005cf1613cb3fccccccc9ed54925f05e200a6357003d4308e378040f4966fa5208e2906a4208100fabe93f2c18fde81019321a05325bbf2f402fa00d43022544b30f00623ba9302a402de04926c21e2b3e6303250444313c85005cf1613cb3fccccccc9ed54002c323401fa40304144c85005cf1613cb3fccccccc9ed54003c8e15d4d43010344130c85005cf1613cb3fccccccc9ed54e05f04840ff2f00201200c0d003d45af0047021f005778018c8cb0558cf165004fa0213cb6b12ccccc971fb008002d007232cffe0a33c5b25c083232c044fd003d0032c03260001b3e401d3232c084b281f2fff2742002012010110025bc82df6a2687d20699fea6a6a182de86a182c40043b8b5d31ed44d0fa40d33fd4d4d43010245f04d0d431d430d071c8cb0701cf16ccc980201201213002fb5dafda89a1f481a67fa9a9a860d883a1a61fa61ff480610002db4f47da89a1f481a67fa9a9a86028be09e008e003e00b01a500c6e";

/// Parse the embedded standard item code.
pub fn nft_item_code() -> Result<ArcCell> {
	cell_from_boc_hex(NFT_ITEM_CODE_HEX)
}

/// Parse the embedded editable collection code.
pub fn nft_collection_code() -> Result<ArcCell> {
	cell_from_boc_hex(NFT_COLLECTION_CODE_HEX)
}

// -- Content and storage data --

/// Offchain content cell: a 0x01 tag followed by the metadata URI.
pub fn offchain_content_cell(uri: &str) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u8(8, 0x01)?;
	b.store_string(uri)?;
	Ok(b.build()?)
}

/// Royalty configuration reported by a collection, as parts of
/// `numerator / denominator` paid to `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoyaltyParams {
	pub numerator: u16,
	pub denominator: u16,
	pub destination: TonAddress,
}

impl RoyaltyParams {
	pub fn to_cell(&self) -> Result<Cell> {
		let mut b = CellBuilder::new();
		b.store_u32(16, self.numerator as u32)?;
		b.store_u32(16, self.denominator as u32)?;
		b.store_address(&self.destination)?;
		Ok(b.build()?)
	}
}

/// Initial storage for a collection deployment.
#[derive(Debug, Clone)]
pub struct CollectionData {
	pub owner: TonAddress,
	pub next_item_index: u64,
	/// Offchain URI of the collection metadata.
	pub content_uri: String,
	/// Prefix prepended to each item's individual content.
	pub common_content_uri: String,
	pub royalty: RoyaltyParams,
}

impl CollectionData {
	pub fn data_cell(&self) -> Result<Cell> {
		let collection_content = offchain_content_cell(&self.content_uri)?;
		let mut common = CellBuilder::new();
		common.store_string(&self.common_content_uri)?;
		let common_content = common.build()?;

		let mut content = CellBuilder::new();
		content.store_reference(&Arc::new(collection_content))?;
		content.store_reference(&Arc::new(common_content))?;
		let content = content.build()?;

		let mut b = CellBuilder::new();
		b.store_address(&self.owner)?;
		b.store_u64(64, self.next_item_index)?;
		b.store_reference(&Arc::new(content))?;
		b.store_reference(&nft_item_code()?)?;
		b.store_reference(&Arc::new(self.royalty.to_cell()?))?;
		Ok(b.build()?)
	}
}

/// Initial storage for a single item deployed outside a collection mint.
pub fn nft_item_data(index: u64, collection: &TonAddress) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u64(64, index)?;
	b.store_address(collection)?;
	Ok(b.build()?)
}

// -- Item bodies --

/// Parameters for an NFT item `transfer` body. The response address
/// defaults to the new owner.
#[derive(Debug, Clone)]
pub struct NftTransfer {
	pub new_owner: TonAddress,
	pub response_address: Option<TonAddress>,
	pub custom_payload: Option<ArcCell>,
	pub forward_amount: BigUint,
	pub forward_payload: Option<ArcCell>,
	pub query_id: u64,
}

impl NftTransfer {
	pub fn new(new_owner: TonAddress) -> Self {
		Self {
			new_owner,
			response_address: None,
			custom_payload: None,
			forward_amount: BigUint::from(0u8),
			forward_payload: None,
			query_id: 0,
		}
	}

	pub fn build(&self) -> Result<Cell> {
		let mut b = CellBuilder::new();
		b.store_u32(32, NFT_TRANSFER_OPCODE)?;
		b.store_u64(64, self.query_id)?;
		b.store_address(&self.new_owner)?;
		b.store_address(self.response_address.as_ref().unwrap_or(&self.new_owner))?;
		store_maybe_ref(&mut b, self.custom_payload.as_ref())?;
		b.store_coins(&self.forward_amount)?;
		store_maybe_ref(&mut b, self.forward_payload.as_ref())?;
		Ok(b.build()?)
	}
}

/// Item body replacing the individual content (editable items only).
pub fn build_edit_content_body(content: &ArcCell, query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, NFT_EDIT_CONTENT_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_reference(content)?;
	Ok(b.build()?)
}

/// Item body handing the editor role to a new address.
pub fn build_transfer_editorship_body(
	new_editor: &TonAddress,
	response_address: Option<&TonAddress>,
	forward_amount: &BigUint,
	query_id: u64,
) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, NFT_TRANSFER_EDITORSHIP_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_address(new_editor)?;
	b.store_address(response_address.unwrap_or(new_editor))?;
	b.store_bit(false)?; // no custom payload
	b.store_coins(forward_amount)?;
	b.store_bit(false)?; // no forward payload
	Ok(b.build()?)
}

/// Soulbound item body only the issuing authority may send.
pub fn build_revoke_body(query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, SBT_REVOKE_OPCODE)?;
	b.store_u64(64, query_id)?;
	Ok(b.build()?)
}

/// Soulbound item body the owner sends to burn the token.
pub fn build_destroy_body(query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, SBT_DESTROY_OPCODE)?;
	b.store_u64(64, query_id)?;
	Ok(b.build()?)
}

// -- Collection bodies --

fn mint_item_cell(
	owner: &TonAddress,
	editor: Option<&TonAddress>,
	content: &ArcCell,
) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_address(owner)?;
	b.store_address(editor.unwrap_or(owner))?;
	b.store_reference(content)?;
	Ok(b.build()?)
}

/// Collection body minting one item at the given index.
pub fn build_mint_body(
	index: u64,
	owner: &TonAddress,
	editor: Option<&TonAddress>,
	content: &ArcCell,
	amount: &BigUint,
	query_id: u64,
) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, NFT_MINT_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_u64(64, index)?;
	b.store_coins(amount)?;
	b.store_reference(&Arc::new(mint_item_cell(owner, editor, content)?))?;
	Ok(b.build()?)
}

/// One entry of a batch mint.
#[derive(Debug, Clone)]
pub struct MintItem {
	pub owner: TonAddress,
	/// Defaults to the owner when unset.
	pub editor: Option<TonAddress>,
	pub content: ArcCell,
}

fn write_mint_leaf(builder: &mut CellBuilder, value: ArcCell) -> std::result::Result<(), TonCellError> {
	builder.store_cell(&value)?;
	Ok(())
}

/// Collection body minting a run of items in one message.
///
/// Items land in a 64-bit-keyed dictionary at consecutive indices
/// `from_index .. from_index + items.len()`.
pub fn build_batch_mint_body(
	items: &[MintItem],
	from_index: u64,
	amount_per_one: &BigUint,
	query_id: u64,
) -> Result<Cell> {
	let mut dict: HashMap<u64, ArcCell> = HashMap::with_capacity(items.len());
	for (i, item) in items.iter().enumerate() {
		let mut leaf = CellBuilder::new();
		leaf.store_coins(amount_per_one)?;
		leaf.store_reference(&Arc::new(mint_item_cell(
			&item.owner,
			item.editor.as_ref(),
			&item.content,
		)?))?;
		dict.insert(from_index + i as u64, Arc::new(leaf.build()?));
	}

	let mut b = CellBuilder::new();
	b.store_u32(32, BATCH_NFT_MINT_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_dict(64, write_mint_leaf, dict)?;
	Ok(b.build()?)
}

/// Collection body transferring ownership.
pub fn build_change_owner_body(new_owner: &TonAddress, query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, CHANGE_COLLECTION_OWNER_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_address(new_owner)?;
	Ok(b.build()?)
}

/// Collection body replacing content and royalty configuration together.
pub fn build_collection_edit_content_body(
	content: &ArcCell,
	royalty: &RoyaltyParams,
	query_id: u64,
) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, COLLECTION_EDIT_CONTENT_OPCODE)?;
	b.store_u64(64, query_id)?;
	b.store_reference(content)?;
	b.store_reference(&Arc::new(royalty.to_cell()?))?;
	Ok(b.build()?)
}

/// Collection body sweeping accumulated balance back to the owner.
pub fn build_return_balance_body(query_id: u64) -> Result<Cell> {
	let mut b = CellBuilder::new();
	b.store_u32(32, RETURN_COLLECTION_BALANCE_OPCODE)?;
	b.store_u64(64, query_id)?;
	Ok(b.build()?)
}

// -- On-chain getters --

/// Item state reported by `get_nft_data`.
#[derive(Debug, Clone)]
pub struct NftData {
	pub initialized: bool,
	pub index: u64,
	pub collection_address: TonAddress,
	pub owner_address: Option<TonAddress>,
	pub individual_content: Option<ArcCell>,
}

/// Query a collection's `royalty_params` get-method.
pub async fn get_royalty_params(
	client: &dyn TonClient,
	collection: &TonAddress,
) -> Result<RoyaltyParams> {
	let stack = client.run_get_method(collection, "royalty_params", &[]).await?;
	if stack.len() < 3 {
		return Err(Error::UnexpectedResponse(format!(
			"royalty_params returned {} items, want 3",
			stack.len()
		)));
	}
	Ok(RoyaltyParams {
		numerator: narrow_u16(stack[0].as_u64()?)?,
		denominator: narrow_u16(stack[1].as_u64()?)?,
		destination: stack[2].as_address()?,
	})
}

/// Query an item's `get_nft_data` get-method.
pub async fn get_nft_data(client: &dyn TonClient, item: &TonAddress) -> Result<NftData> {
	let stack = client.run_get_method(item, "get_nft_data", &[]).await?;
	if stack.len() < 5 {
		return Err(Error::UnexpectedResponse(format!(
			"get_nft_data returned {} items, want 5",
			stack.len()
		)));
	}
	Ok(NftData {
		initialized: stack[0].as_int()? != &num_bigint::BigInt::from(0),
		index: stack[1].as_u64()?,
		collection_address: stack[2].as_address()?,
		owner_address: stack[3].as_address().ok(),
		individual_content: stack[4].as_cell().ok().cloned(),
	})
}

fn narrow_u16(value: u64) -> Result<u16> {
	u16::try_from(value)
		.map_err(|_| Error::UnexpectedResponse(format!("royalty part {value} exceeds 16 bits")))
}
