//! # Transaction Codes
//!
//! Every transaction carries a numeric code. Codes are split into two
//! disjoint spaces:
//!
//! - **User codes** in `[FIRST_CALL_TRANSACTION, LAST_CALL_TRANSACTION]`,
//!   assigned by application interfaces.
//! - **Transport-internal codes** (ping, interface query, dump, ...), packed
//!   from four ASCII characters. These never reach application handlers.

/// Numeric code identifying one call on an interface.
pub type TransactionCode = u32;

/// Bit set of per-transaction flags.
pub type TransactionFlags = u32;

/// Packs four ASCII characters into a code, most significant byte first.
const fn pack_chars(c: [u8; 4]) -> TransactionCode {
    ((c[0] as u32) << 24) | ((c[1] as u32) << 16) | ((c[2] as u32) << 8) | (c[3] as u32)
}

/// First code available to application interfaces.
pub const FIRST_CALL_TRANSACTION: TransactionCode = 0x0000_0001;
/// Last code available to application interfaces.
pub const LAST_CALL_TRANSACTION: TransactionCode = 0x00ff_ffff;

pub const PING_TRANSACTION: TransactionCode = pack_chars(*b"_PNG");
pub const DUMP_TRANSACTION: TransactionCode = pack_chars(*b"_DMP");
pub const SHELL_COMMAND_TRANSACTION: TransactionCode = pack_chars(*b"_CMD");
pub const INTERFACE_TRANSACTION: TransactionCode = pack_chars(*b"_NTF");
pub const SYSPROPS_TRANSACTION: TransactionCode = pack_chars(*b"_SPR");

/// The caller does not wait for a reply.
pub const FLAG_ONEWAY: TransactionFlags = 0x01;

/// Returns true if `code` lies in the application-reserved window.
#[inline]
pub fn is_user_code(code: TransactionCode) -> bool {
    (FIRST_CALL_TRANSACTION..=LAST_CALL_TRANSACTION).contains(&code)
}

/// Returns true if `flags` request a one-way (fire and forget) call.
#[inline]
pub fn is_oneway(flags: TransactionFlags) -> bool {
    flags & FLAG_ONEWAY != 0
}
