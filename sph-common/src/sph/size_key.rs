//! Size descriptor parsing
//!
//! Sample sizes arrive as free-form text ("Plasmid 21-30 kb", "PCR - 300 bp",
//! "4 kb"). The lookup key is the descriptor's decimal digits, in order,
//! with everything else dropped.

/// Reduce a size descriptor to its canonical lookup key
///
/// No unit awareness: "1.5 kb" becomes "15" and "21-30 kb" becomes "2130".
/// Returns an empty string when the descriptor has no digits.
pub fn canonical_key(descriptor: &str) -> String {
    descriptor.chars().filter(char::is_ascii_digit).collect()
}
