use phf::phf_map;

pub const UTF8_SPACE: u8 = 32;
pub const UTF8_STAR: u8 = 42;
pub const UTF8_DASH: u8 = 45;
pub const UTF8_SEMICOLON: u8 = 59;
pub const UTF8_GREATER_THAN: u8 = 62;
pub const UTF8_UNDERSCORE: u8 = 95;
pub const UTF8_PIPE: u8 = 124;

/// The gap symbol written into alignments.
pub const UTF8_GAP: u8 = UTF8_UNDERSCORE;

/// The padding byte placed at index 0 of every sequence.
pub const PAD_BYTE: u8 = 255;

/// The number of residues covered by the substitution tables (20 standard + B, Z, X).
pub const NUM_SCORED_RESIDUES: usize = 23;

/// The digital byte of the gap symbol; it sits just past the scored residues.
pub const DIGITAL_GAP: u8 = 23;

pub const AMINO_ALPHABET_WITH_DEGENERATE: [&str; 24] = [
    "A", "R", "N", "D", "C", "Q", "E", "G", "H", "I", "L", "K", "M", "F", "P", "S", "T", "W", "Y",
    "V", "B", "Z", "X", "_",
];

pub const UTF8_TO_DIGITAL_AMINO: phf::Map<u8, u8> = phf_map! {
    // upper case
    65u8 => 0,    // A
    82u8 => 1,    // R
    78u8 => 2,    // N
    68u8 => 3,    // D
    67u8 => 4,    // C
    81u8 => 5,    // Q
    69u8 => 6,    // E
    71u8 => 7,    // G
    72u8 => 8,    // H
    73u8 => 9,    // I
    76u8 => 10,   // L
    75u8 => 11,   // K
    77u8 => 12,   // M
    70u8 => 13,   // F
    80u8 => 14,   // P
    83u8 => 15,   // S
    84u8 => 16,   // T
    87u8 => 17,   // W
    89u8 => 18,   // Y
    86u8 => 19,   // V
    // lower case
    97u8 => 0,    // a
    114u8 => 1,   // r
    110u8 => 2,   // n
    100u8 => 3,   // d
    99u8 => 4,    // c
    113u8 => 5,   // q
    101u8 => 6,   // e
    103u8 => 7,   // g
    104u8 => 8,   // h
    105u8 => 9,   // i
    108u8 => 10,  // l
    107u8 => 11,  // k
    109u8 => 12,  // m
    102u8 => 13,  // f
    112u8 => 14,  // p
    115u8 => 15,  // s
    116u8 => 16,  // t
    119u8 => 17,  // w
    121u8 => 18,  // y
    118u8 => 19,  // v
    // degenerate characters
    66u8 => 20,   // B
    90u8 => 21,   // Z
    88u8 => 22,   // X
    98u8 => 20,   // b
    122u8 => 21,  // z
    120u8 => 22,  // x
    // gaps
    95u8 => 23,   // _
    45u8 => 23,   // -
};

pub const AMINO_INVERSE_MAP: phf::Map<u8, u8> = phf_map! {
    0u8  => 65,   // A
    1u8  => 82,   // R
    2u8  => 78,   // N
    3u8  => 68,   // D
    4u8  => 67,   // C
    5u8  => 81,   // Q
    6u8  => 69,   // E
    7u8  => 71,   // G
    8u8  => 72,   // H
    9u8  => 73,   // I
    10u8 => 76,   // L
    11u8 => 75,   // K
    12u8 => 77,   // M
    13u8 => 70,   // F
    14u8 => 80,   // P
    15u8 => 83,   // S
    16u8 => 84,   // T
    17u8 => 87,   // W
    18u8 => 89,   // Y
    19u8 => 86,   // V
    // end base alphabet
    20u8 => 66,   // B
    21u8 => 90,   // Z
    22u8 => 88,   // X
    23u8 => 95,   // _
    255u8 => 32,  // space
};

/// Returns true for either accepted gap symbol.
#[inline]
pub fn is_gap(utf8_byte: u8) -> bool {
    utf8_byte == UTF8_UNDERSCORE || utf8_byte == UTF8_DASH
}

/// Maps a UTF8 byte to its digital residue, if it belongs to the alphabet.
#[inline]
pub fn digital_amino(utf8_byte: u8) -> Option<u8> {
    UTF8_TO_DIGITAL_AMINO.get(&utf8_byte).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_round_trip() {
        AMINO_ALPHABET_WITH_DEGENERATE
            .iter()
            .enumerate()
            .for_each(|(idx, letter)| {
                let utf8 = letter.as_bytes()[0];
                assert_eq!(digital_amino(utf8), Some(idx as u8));
                assert_eq!(AMINO_INVERSE_MAP.get(&(idx as u8)), Some(&utf8));
            });
    }

    #[test]
    fn test_case_and_gap_symbols() {
        assert_eq!(digital_amino(b'w'), digital_amino(b'W'));
        assert_eq!(digital_amino(b'-'), Some(DIGITAL_GAP));
        assert_eq!(digital_amino(b'_'), Some(DIGITAL_GAP));
        assert!(is_gap(b'-'));
        assert!(!is_gap(b'A'));
        // outside of the accepted protein alphabet
        assert_eq!(digital_amino(b'J'), None);
        assert_eq!(digital_amino(b'O'), None);
        assert_eq!(digital_amino(b'*'), None);
    }
}
