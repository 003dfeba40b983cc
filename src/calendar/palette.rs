//! Deterministic display colors for clients.

/// Ordered palette; persisted bookings store these tags verbatim.
pub const PALETTE: [&str; 8] = [
    "bg-emerald-400",
    "bg-blue-400",
    "bg-violet-400",
    "bg-pink-400",
    "bg-amber-400",
    "bg-orange-400",
    "bg-red-400",
    "bg-teal-400",
];

/// Picks a palette entry from the sum of the client's character codes.
///
/// Each character contributes its first UTF-16 code unit so tags stay
/// identical to those already persisted. Distinct names may share a color.
pub fn color_of(client: &str) -> &'static str {
    PALETTE[palette_index(client)]
}

pub fn palette_index(client: &str) -> usize {
    let mut units = [0u16; 2];
    let sum: u64 = client
        .chars()
        .map(|ch| u64::from(ch.encode_utf16(&mut units)[0]))
        .sum();
    (sum % PALETTE.len() as u64) as usize
}
