//! The four-letter nucleotide alphabet: complement and alphabet checks.

use crate::error::{LoopDbError, Result};
use bio::alphabets::Alphabet;
use lazy_static::lazy_static;

lazy_static! {
    static ref DNA_ALPHABET: Alphabet = Alphabet::new(b"ACGT");
}

/// Complement of a single base. Anything outside A, C, G, T is rejected.
#[inline(always)]
pub fn letter_complement(letter: u8) -> Option<u8> {
    match letter {
        b'A' => Some(b'T'),
        b'C' => Some(b'G'),
        b'G' => Some(b'C'),
        b'T' => Some(b'A'),
        _ => None,
    }
}

/// Reverse complement of `seq`; `entity` names the owner for error reports.
pub fn reverse_complement(entity: &str, seq: &str) -> Result<String> {
    let bytes = seq.as_bytes();
    let mut ret = Vec::with_capacity(bytes.len());
    for (offset, base) in bytes.iter().enumerate().rev() {
        let complement = letter_complement(*base).ok_or_else(|| LoopDbError::InvalidBase {
            entity: entity.to_string(),
            base: *base as char,
            offset,
        })?;
        ret.push(complement);
    }
    // Only ASCII bases are ever pushed
    Ok(ret.into_iter().map(char::from).collect())
}

#[inline(always)]
pub fn is_dna(seq: &[u8]) -> bool {
    DNA_ALPHABET.is_word(seq)
}

/// Fails with `InvalidAlphabet` on the first character outside A, C, G, T.
pub fn validate_alphabet(entity: &str, seq: &[u8]) -> Result<()> {
    if is_dna(seq) {
        return Ok(());
    }
    match seq.iter().position(|base| !DNA_ALPHABET.is_word([*base])) {
        Some(offset) => Err(LoopDbError::InvalidAlphabet {
            entity: entity.to_string(),
            base: seq[offset] as char,
            offset,
        }),
        None => Ok(()),
    }
}
