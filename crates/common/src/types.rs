//! Scalar types shared by every ledger.

/// Token or currency quantity in fixed units (real values scaled by 10^18).
pub type Amount = u128;

/// Unix seconds. Zero is reserved: the escrow ledger uses it as the
/// "cannot be reclaimed" sentinel, so live timestamps start at 1.
pub type Timestamp = u64;

/// Account identifier: 20 raw bytes, rendered as hex at the edges.
pub type Address = [u8; 20];

/// Escrow transaction identifier, unique per arbitrator.
pub type TransactionId = u64;

/// Hex rendering for logs and error paths.
pub fn display_address(addr: &Address) -> String {
    format!("0x{}", hex::encode(addr))
}
