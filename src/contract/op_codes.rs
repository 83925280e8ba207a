//! Message operation codes for the supported contract families.

// Jetton (TEP-74) wallet and master operations.
pub const JETTON_TRANSFER_OPCODE: u32 = 0x0f8a7ea5;
pub const JETTON_TRANSFER_NOTIFICATION_OPCODE: u32 = 0x7362d09c;
pub const JETTON_INTERNAL_TRANSFER_OPCODE: u32 = 0x178d4519;
pub const JETTON_EXCESSES_OPCODE: u32 = 0xd53276db;
pub const JETTON_BURN_OPCODE: u32 = 0x595f07bc;
pub const JETTON_MINT_OPCODE: u32 = 0x642b7d07;
pub const JETTON_CHANGE_ADMIN_OPCODE: u32 = 0x6501f354;
pub const JETTON_CLAIM_ADMIN_OPCODE: u32 = 0xfb88e119;
pub const JETTON_DROP_ADMIN_OPCODE: u32 = 0x7431f221;
pub const JETTON_CHANGE_METADATA_URI_OPCODE: u32 = 0xcb862902;

// NFT (TEP-62) item operations.
pub const NFT_TRANSFER_OPCODE: u32 = 0x5fcc3d14;
pub const NFT_EDIT_CONTENT_OPCODE: u32 = 0x1a0b9d51;
pub const NFT_TRANSFER_EDITORSHIP_OPCODE: u32 = 0x1c04412a;

// Soulbound (TEP-85) item operations.
pub const SBT_REVOKE_OPCODE: u32 = 0x6f89f5e3;
pub const SBT_DESTROY_OPCODE: u32 = 0x1f04537a;

// Collection operations (small sequential codes by convention).
pub const NFT_MINT_OPCODE: u32 = 1;
pub const BATCH_NFT_MINT_OPCODE: u32 = 2;
pub const CHANGE_COLLECTION_OWNER_OPCODE: u32 = 3;
pub const COLLECTION_EDIT_CONTENT_OPCODE: u32 = 4;
pub const RETURN_COLLECTION_BALANCE_OPCODE: u32 = 5;

// TON DNS.
pub const CHANGE_DNS_RECORD_OPCODE: u32 = 0x4eb1f0f9;

// Getgems fixed-price sale.
pub const SALE_CANCEL_OPCODE: u32 = 3;
