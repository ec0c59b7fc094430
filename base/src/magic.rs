/*
  Mantis, a UCI-compatible chess engine.
  Copyright (C) 2024 The Mantis Authors (see AUTHORS.md file)

  Mantis is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Mantis is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Magic bitboards, used for generating bishop and rook sliding attacks.
//!
//! This table is loaded once from a set of saved magic numbers; there is no
//! runtime magic-number search here (that is a standalone developer utility,
//! not something the engine needs at startup).

use super::{Bitboard, Direction, Square};

use once_cell::sync::Lazy;

use std::{
    convert::TryFrom,
    mem::{transmute, MaybeUninit},
};

/// A master copy of the main magic table. Used for generating bishop,
/// rook, and queen moves.
pub static MAGIC: Lazy<AttacksTable> = Lazy::new(AttacksTable::load);

/// A saved list of magics for rooks, indexed by raw square index. Some
/// magics for sizes below the required bitshift amount were taken from the
/// Chessprogramming Wiki.
const SAVED_ROOK_MAGICS: [Bitboard; 64] = [
    Bitboard::new(0x4080_0020_4000_1480),
    Bitboard::new(0x0040_0010_0140_2000),
    Bitboard::new(0x0300_2000_1810_4100),
    Bitboard::new(0x2100_0409_0110_0120),
    Bitboard::new(0x8a00_0600_0408_2070),
    Bitboard::new(0x0080_0144_0002_0080),
    Bitboard::new(0x1100_2500_208a_0004),
    Bitboard::new(0x0900_0042_2201_8100),
    Bitboard::new(0x0208_8002_28c0_0081),
    Bitboard::new(0x2280_4010_0340_2000),
    Bitboard::new(0x0008_8010_0020_0184),
    Bitboard::new(0x0001_0020_1000_0900),
    Bitboard::new(0x0182_0006_0010_6008),
    Bitboard::new(0x2058_8004_0080_0200),
    Bitboard::new(0x0004_8002_0080_0900),
    Bitboard::new(0x052d_0012_0040_a100),
    Bitboard::new(0x0540_0880_0080_24c1),
    Bitboard::new(0x2000_8480_4002_2000),
    Bitboard::new(0x0400_4100_1100_6000),
    Bitboard::new(0x0040_a100_3001_0108),
    Bitboard::new(0x1204_8080_0800_0402),
    Bitboard::new(0x0802_8080_0400_2201),
    Bitboard::new(0x1002_8080_5200_0500),
    Bitboard::new(0x0004_0a00_2112_4184),
    Bitboard::new(0x0640_0128_8008_8040),
    Bitboard::new(0x8410_4000_8020_008a),
    Bitboard::new(0x0400_2008_8010_0080),
    Bitboard::new(0x2001_0121_0009_1004),
    Bitboard::new(0x1200_0d01_0008_0010),
    Bitboard::new(0x6004_0004_0120_1008),
    Bitboard::new(0x7500_aa04_0008_4110),
    Bitboard::new(0x0100_0052_0004_0981),
    Bitboard::new(0x0040_8040_0280_0020),
    Bitboard::new(0x0470_0020_0640_0240),
    Bitboard::new(0x0001_2000_8080_1000),
    Bitboard::new(0x0000_0812_0200_2040),
    Bitboard::new(0x00c0_8044_0080_0800),
    Bitboard::new(0x9000_800a_0080_0400),
    Bitboard::new(0x0001_0004_0100_0600),
    Bitboard::new(0x0042_1088_ca00_2401),
    Bitboard::new(0x0000_c000_228d_8000),
    Bitboard::new(0x6410_0420_1440_4001),
    Bitboard::new(0x1002_0040_8226_0014),
    Bitboard::new(0x206a_0088_11c2_0021),
    Bitboard::new(0x0002_0018_1022_0024),
    Bitboard::new(0x2001_0200_0400_8080),
    Bitboard::new(0x1000_0801_100c_001a),
    Bitboard::new(0x0048_0082_5402_0011),
    Bitboard::new(0x48FF_FE99_FECF_AA00),
    Bitboard::new(0x48FF_FE99_FECF_AA00),
    Bitboard::new(0x497F_FFAD_FF9C_2E00),
    Bitboard::new(0x613F_FFDD_FFCE_9200),
    Bitboard::new(0xffff_ffe9_ffe7_ce00),
    Bitboard::new(0xffff_fff5_fff3_e600),
    Bitboard::new(0x0003_ff95_e5e6_a4c0),
    Bitboard::new(0x510F_FFF5_F63C_96A0),
    Bitboard::new(0xEBFF_FFB9_FF9F_C526),
    Bitboard::new(0x61FF_FEDD_FEED_AEAE),
    Bitboard::new(0x53BF_FFED_FFDE_B1A2),
    Bitboard::new(0x127F_FFB9_FFDF_B5F6),
    Bitboard::new(0x411F_FFDD_FFDB_F4D6),
    Bitboard::new(0x0822_0024_0810_4502),
    Bitboard::new(0x0003_ffef_27ee_be74),
    Bitboard::new(0x7645_FFFE_CBFE_A79E),
];

/// A saved list of magics for bishops, indexed by raw square index. Some
/// magics for sizes below the required bitshift amount were taken from the
/// Chessprogramming Wiki.
const SAVED_BISHOP_MAGICS: [Bitboard; 64] = [
    Bitboard::new(0xffed_f9fd_7cfc_ffff),
    Bitboard::new(0xfc09_6285_4a77_f576),
    Bitboard::new(0x0012_2808_c102_a004),
    Bitboard::new(0x2851_2400_8240_0440),
    Bitboard::new(0x0011_1040_1100_0202),
    Bitboard::new(0x0008_2208_2000_0010),
    Bitboard::new(0xfc0a_66c6_4a7e_f576),
    Bitboard::new(0x7ffd_fdfc_bd79_ffff),
    Bitboard::new(0xfc08_46a6_4a34_fff6),
    Bitboard::new(0xfc08_7a87_4a3c_f7f6),
    Bitboard::new(0x0009_8802_0420_a000),
    Bitboard::new(0x8000_4404_0080_8200),
    Bitboard::new(0x208c_8450_c001_3407),
    Bitboard::new(0x1980_1105_2010_8030),
    Bitboard::new(0xfc08_64ae_59b4_ff76),
    Bitboard::new(0x3c08_60af_4b35_ff76),
    Bitboard::new(0x73C0_1AF5_6CF4_CFFB),
    Bitboard::new(0x41A0_1CFA_D64A_AFFC),
    Bitboard::new(0x0604_0002_04a2_0202),
    Bitboard::new(0x0002_8208_0602_4000),
    Bitboard::new(0x008a_0024_2201_0201),
    Bitboard::new(0x2082_0040_8801_0802),
    Bitboard::new(0x7c0c_028f_5b34_ff76),
    Bitboard::new(0xfc0a_028e_5ab4_df76),
    Bitboard::new(0x0810_0420_d104_1080),
    Bitboard::new(0x0904_5100_0210_0100),
    Bitboard::new(0x0202_2808_0406_4403),
    Bitboard::new(0x004c_0040_0c03_0082),
    Bitboard::new(0x0602_0010_0200_5011),
    Bitboard::new(0x7209_0200_c108_9000),
    Bitboard::new(0x4211_4104_2400_8805),
    Bitboard::new(0x0002_8484_2126_0804),
    Bitboard::new(0xc001_0412_1121_2004),
    Bitboard::new(0x0208_0188_0004_4800),
    Bitboard::new(0x0080_2064_1058_0800),
    Bitboard::new(0x0000_2011_0008_0084),
    Bitboard::new(0x0208_0034_0009_4100),
    Bitboard::new(0x2190_4102_0000_4058),
    Bitboard::new(0x0188_8214_0180_8080),
    Bitboard::new(0x2006_0a02_0000_c4c0),
    Bitboard::new(0xDCEF_D9B5_4BFC_C09F),
    Bitboard::new(0xF95F_FA76_5AFD_602B),
    Bitboard::new(0x200a_1041_1000_2040),
    Bitboard::new(0x0800_000c_0831_0c00),
    Bitboard::new(0x0218_0401_0a01_0400),
    Bitboard::new(0x1092_2004_0022_4100),
    Bitboard::new(0x43ff_9a5c_f4ca_0c01),
    Bitboard::new(0x4BFF_CD8E_7C58_7601),
    Bitboard::new(0xfc0f_f286_5334_f576),
    Bitboard::new(0xfc0b_f6ce_5924_f576),
    Bitboard::new(0x8052_2060_8c30_0001),
    Bitboard::new(0x2084_1050_4202_0400),
    Bitboard::new(0xe018_8010_2206_0220),
    Bitboard::new(0x0001_1220_4901_0200),
    Bitboard::new(0xc3ff_b7dc_36ca_8c89),
    Bitboard::new(0xc3ff_8a54_f4ca_2c89),
    Bitboard::new(0xffff_fcfc_fd79_edff),
    Bitboard::new(0xfc08_63fc_cb14_7576),
    Bitboard::new(0x40a0_0400_6213_3000),
    Bitboard::new(0x0142_0280_0084_0400),
    Bitboard::new(0x0009_0900_1006_1200),
    Bitboard::new(0x0800_8445_2810_0308),
    Bitboard::new(0xfc08_7e8e_4bb2_f736),
    Bitboard::new(0x43ff_9e4e_f4ca_2c89),
];

/// The number of bits used to express the magic lookups for rooks at each
/// raw square index.
const ROOK_BITS: [u8; 64] = [
    12, 11, 11, 11, 11, 11, 11, 12, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    11, 10, 10, 10, 10, 10, 10, 11, //
    10, 9, 9, 9, 9, 9, 9, 10, //
    11, 10, 10, 10, 10, 11, 10, 11, //
];

/// The number of bits used to express the magic lookups for bishops at each
/// raw square index.
const BISHOP_BITS: [u8; 64] = [
    5, 4, 5, 5, 5, 5, 4, 5, //
    4, 4, 5, 5, 5, 5, 4, 4, //
    4, 4, 7, 7, 7, 7, 4, 4, //
    5, 5, 7, 9, 9, 7, 5, 5, //
    5, 5, 7, 9, 9, 7, 5, 5, //
    4, 4, 7, 7, 7, 7, 4, 4, //
    4, 4, 5, 5, 5, 5, 4, 4, //
    5, 4, 5, 5, 5, 5, 4, 5, //
];

#[derive(Clone, Debug)]
/// A complete magic table which can generate moves for rooks and bishops.
pub struct AttacksTable {
    rook_table: [SquareAttacks; 64],
    bishop_table: [SquareAttacks; 64],
}

impl AttacksTable {
    /// Create an empty `AttacksTable`.
    fn new() -> AttacksTable {
        let rook_table = {
            // SAFETY: We will immediately overwrite this.
            let mut data: [MaybeUninit<SquareAttacks>; 64] =
                unsafe { MaybeUninit::uninit().assume_init() };
            for elem in &mut data[..] {
                *elem = MaybeUninit::new(SquareAttacks::new());
            }
            // SAFETY: The entire block was overwritten with correct data.
            unsafe { transmute(data) }
        };
        let bishop_table = {
            // SAFETY: We will immediately overwrite this.
            let mut data: [MaybeUninit<SquareAttacks>; 64] =
                unsafe { MaybeUninit::uninit().assume_init() };
            for elem in &mut data[..] {
                *elem = MaybeUninit::new(SquareAttacks::new());
            }
            // SAFETY: The entire block was overwritten with correct data.
            unsafe { transmute(data) }
        };
        AttacksTable {
            rook_table,
            bishop_table,
        }
    }

    /// Create a pre-loaded `AttacksTable`.
    ///
    /// # Panics
    ///
    /// Panics if two different occupancies hash to the same key for some
    /// square, which would mean the saved magic constants above are wrong.
    /// This can only happen from a corrupted build of the engine, so a hard
    /// panic at startup is preferable to limping along with a broken table.
    fn load() -> AttacksTable {
        let mut table = AttacksTable::new();
        load_magic_helper(&mut table.rook_table, true);
        load_magic_helper(&mut table.bishop_table, false);

        table
    }

    #[inline(always)]
    /// Get the attacks that a rook on `sq` could make given `occupancy`.
    pub fn rook_attacks(&self, occupancy: Bitboard, sq: Square) -> Bitboard {
        get_attacks(occupancy, sq, &self.rook_table)
    }

    #[inline(always)]
    /// Get the attacks that a bishop on `sq` could make given `occupancy`.
    pub fn bishop_attacks(&self, occupancy: Bitboard, sq: Square) -> Bitboard {
        get_attacks(occupancy, sq, &self.bishop_table)
    }
}

/// A structure containing all the information needed to generate moves for a
/// rook or bishop from one square.
#[derive(Clone, Debug)]
struct SquareAttacks {
    /// A mask which, when &ed with the occupancy bitboard, will give only the
    /// bits that matter when computing moves.
    mask: Bitboard,
    /// The magic number to multiply to hash the current board effectively.
    magic: Bitboard,
    /// A lookup vector of squares attacked.
    attacks: Vec<Bitboard>,
    /// The shift related to this square.
    shift: u8,
}

impl SquareAttacks {
    /// Create an empty `SquareAttacks`.
    fn new() -> SquareAttacks {
        SquareAttacks {
            mask: Bitboard::EMPTY,
            magic: Bitboard::EMPTY,
            attacks: Vec::new(),
            shift: 0,
        }
    }
}

/// A helper function to load data into a `AttacksTable`. `is_rook` is `true` if
/// you are loading data for a rook, and `false` for a bishop.
fn load_magic_helper(table: &mut [SquareAttacks; 64], is_rook: bool) {
    #[allow(clippy::cast_possible_truncation)]
    for i in 0..64 {
        // square of the piece making attacks
        let sq = Square::try_from(i as u8).unwrap();
        if is_rook {
            table[i].mask = get_rook_mask(sq);
            table[i].magic = SAVED_ROOK_MAGICS[i];
            table[i].shift = 64 - ROOK_BITS[i];
        } else {
            table[i].mask = get_bishop_mask(sq);
            table[i].magic = SAVED_BISHOP_MAGICS[i];
            table[i].shift = 64 - BISHOP_BITS[i];
        }
        table[i]
            .attacks
            .resize(1 << (64 - table[i].shift), Bitboard::EMPTY);
        let num_points = table[i].mask.len();
        for j in 0..(1 << num_points) {
            let occupancy = index_to_occupancy(j, table[i].mask);
            let directions = if is_rook {
                &Direction::ROOK_DIRECTIONS
            } else {
                &Direction::BISHOP_DIRECTIONS
            };
            let attack = directional_attacks(sq, directions, occupancy);
            let key = compute_magic_key(occupancy, table[i].magic, table[i].shift);
            if table[i].attacks[key].is_empty() {
                table[i].attacks[key] = attack;
            } else if table[i].attacks[key] != attack {
                println!(
                    "failed to load {} magics for square {sq}",
                    if is_rook { "rook" } else { "bishop" }
                );
                panic!("hash collision occurred while loading saved magic numbers");
            }
        }
    }
}

/// Get the attacks a square has, given a magic lookup table and the current
/// occupancy.
fn get_attacks(occupancy: Bitboard, sq: Square, table: &[SquareAttacks; 64]) -> Bitboard {
    // SAFETY: `sq` is a valid square, so accessing it by array lookup is OK.
    // Additionally, we can trust that the key was masked correctly in
    // `compute_magic_key` as it was shifted out properly.
    let magic_data = unsafe { table.get_unchecked(sq as usize) };
    let masked_occupancy = occupancy & magic_data.mask;
    let key = compute_magic_key(masked_occupancy, magic_data.magic, magic_data.shift);

    unsafe { *magic_data.attacks.get_unchecked(key) }
}

#[inline(always)]
/// Use magic hashing to get the index to look up attacks in a bitboad.
fn compute_magic_key(occupancy: Bitboard, magic: Bitboard, shift: u8) -> usize {
    usize::from((occupancy * magic) >> shift)
}

/// Create the mask for the relevant bits in magic of a rook. `sq` is the
/// square that a rook would occupy to receive this mask.
fn get_rook_mask(sq: Square) -> Bitboard {
    let index = sq as i8;
    // sequence of 1s down the same row as the piece to move, except on the
    // ends
    let row_mask = Bitboard::new(0x7E << (8 * (index / 8)));
    // sequence of 1s down the same col as the piece to move, except on the
    // ends
    let col_mask = Bitboard::new(0x0001_0101_0101_0100 << (index % 8));
    // note: pieces at the end of the travel don't matter, which is why the
    // masks aren't uniform

    // in the col mask or row mask, but not the piece to move
    // xor operation will remove the square the piece is on
    (row_mask ^ col_mask) & !Bitboard::from(sq)
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
/// Create the mask for the relevant bits in magic of a bishop. `sq` is the
/// square that a bishop would be on to receiver this mask.
fn get_bishop_mask(sq: Square) -> Bitboard {
    /// A Bitboard made of 1's around the ring of the board, and 0's in the middle
    const RING_MASK: Bitboard = Bitboard::new(0xFF81_8181_8181_81FF);

    // thank u chessprogramming wiki for this code
    (Bitboard::diagonal(sq) ^ Bitboard::anti_diagonal(sq)) & !RING_MASK
}

/// Given some mask, create the occupancy bitboard according to this index.
/// `index` must be less than or equal to 2 ^ (number of ones in `mask`).
fn index_to_occupancy(index: usize, mask: Bitboard) -> Bitboard {
    let mut result = Bitboard::EMPTY;
    let num_points = mask.len();
    let mut editable_mask = mask;
    // go from right to left in the bits of num_points,
    // and add an occupancy if something is there
    for i in 0..num_points {
        let shift_size = editable_mask.trailing_zeros();
        //make a bitboard which only occupies the rightmost square
        let occupier = Bitboard::new(1 << shift_size);
        //remove the occupier from the mask
        editable_mask &= !occupier;
        if (index & (1 << i)) != 0 {
            //the bit corresponding to the occupier is nonzero
            result |= occupier;
        }
    }

    result
}

/// Construct the squares attacked by the pieces at `sq` if it could move along
/// the directions in `dirs`, when the board is occupied by the pieces in
/// `occupancy`. This is slow and should only be used for initializing magic
/// bitboards (instead of for move generation.)
fn directional_attacks(sq: Square, dirs: &[Direction], occupancy: Bitboard) -> Bitboard {
    let mut result = Bitboard::EMPTY;
    for dir in dirs.iter() {
        let mut current_square = sq;
        for _ in 0..7 {
            if !is_valid_step(current_square, *dir) {
                break;
            }
            current_square += *dir;
            result.insert(current_square);
            if occupancy.contains(current_square) {
                break;
            }
        }
    }

    result
}

/// Return whether the following move is a single-step.
fn is_valid_step(sq: Square, dir: Direction) -> bool {
    sq.chebyshev_to(sq + dir) <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_mask() {
        assert_eq!(
            get_rook_mask(Square::A8),
            Bitboard::new(0x0001_0101_0101_017E)
        );

        assert_eq!(
            get_rook_mask(Square::E8),
            Bitboard::new(0x0010_1010_1010_107E)
        );

        assert_eq!(
            get_rook_mask(Square::E4),
            Bitboard::new(0x0010_106E_1010_1000)
        );
    }

    #[test]
    fn bishop_mask() {
        assert_eq!(
            get_bishop_mask(Square::A8),
            Bitboard::new(0x0040_2010_0804_0200)
        );

        assert_eq!(
            get_bishop_mask(Square::E8),
            Bitboard::new(0x0000_0000_0244_2800)
        );

        assert_eq!(
            get_bishop_mask(Square::E4),
            Bitboard::new(0x0044_2800_2844_0200)
        );
    }

    #[test]
    fn valid_index_to_occupancy() {
        let mask = Bitboard::new(0b1111);
        for i in 0..16 {
            let occu = index_to_occupancy(i, mask);
            assert_eq!(occu, Bitboard::new(i as u64));
        }
    }

    #[test]
    fn magic_rook_attacks() {
        let table = AttacksTable::load();
        let occupancies = [Bitboard::new(0x103), Bitboard::new(0x1FC3)];
        let squares = [Square::A8, Square::A8];
        let attacks = [Bitboard::new(0x102), Bitboard::new(0x102)];
        for i in 0..2 {
            let resulting_attack = table.rook_attacks(occupancies[i], squares[i]);
            assert_eq!(attacks[i], resulting_attack);
        }
    }

    #[test]
    fn magic_bishop_attacks_directional() {
        let occupancies = [
            Bitboard::new(0x0000_0000_0000_0201),
            Bitboard::new(0x0102_0000_0000_0000),
            Bitboard::new(0xFFFF_0000_0000_FFFF),
            Bitboard::new(0xFFFF_0000_0000_FFFF),
        ];
        let squares = [Square::A8, Square::A1, Square::C8, Square::F8];
        let attacks = [
            Bitboard::new(0x0000_0000_0000_0200),
            Bitboard::new(0x0002_0000_0000_0000),
            Bitboard::new(0x0000_0000_0000_0A00),
            Bitboard::new(0x0000_0000_0000_5000),
        ];
        for i in 0..4 {
            let resulting_attack =
                directional_attacks(squares[i], &Direction::BISHOP_DIRECTIONS, occupancies[i]);
            assert_eq!(attacks[i], resulting_attack);
        }
    }

    #[test]
    fn bishop_attacks() {
        let table = AttacksTable::load();
        let occupancies = [
            Bitboard::new(0x0000_0000_0000_0201),
            Bitboard::new(0x0102_0000_0000_0000),
            Bitboard::new(0xFFFF_0000_0000_FFFF),
            Bitboard::new(0xFFFF_0000_0000_FFFF),
        ];
        let squares = [Square::A8, Square::A1, Square::C8, Square::F8];
        let attacks = [
            Bitboard::new(0x0000_0000_0000_0200),
            Bitboard::new(0x0002_0000_0000_0000),
            Bitboard::new(0x0000_0000_0000_0A00),
            Bitboard::new(0x0000_0000_0000_5000),
        ];
        for i in 0..4 {
            let resulting_attack = table.bishop_attacks(occupancies[i], squares[i]);
            assert_eq!(attacks[i], resulting_attack);
        }
    }
}
