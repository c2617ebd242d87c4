//! Pairing code generators.

use std::collections::VecDeque;

use parking_lot::Mutex;
use rand::Rng;

use crate::domain::pairing::{PairingCode, CODE_ALPHABET};
use crate::ports::CodeGenerator;

/// Draws each character uniformly from [`CODE_ALPHABET`] using the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> PairingCode {
        let mut rng = rand::thread_rng();
        PairingCode::from_alphabet_bytes(
            (0..length).map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]),
        )
    }
}

/// Hands out a scripted sequence of codes, repeating the last one forever.
///
/// Lets tests pin the code a session receives and provoke collisions.
#[derive(Debug)]
pub struct SequenceCodeGenerator {
    codes: Mutex<VecDeque<PairingCode>>,
}

impl SequenceCodeGenerator {
    pub fn new(codes: impl IntoIterator<Item = PairingCode>) -> Self {
        Self {
            codes: Mutex::new(codes.into_iter().collect()),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self, length: usize) -> PairingCode {
        let mut codes = self.codes.lock();
        match codes.len() {
            0 => RandomCodeGenerator.generate(length),
            1 => codes[0].clone(),
            _ => codes.pop_front().unwrap_or_else(|| RandomCodeGenerator.generate(length)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_codes_have_requested_length_and_alphabet() {
        let generator = RandomCodeGenerator;
        for _ in 0..200 {
            let code = generator.generate(6);
            assert_eq!(code.as_str().len(), 6);
            assert!(code
                .as_str()
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn random_codes_vary() {
        let generator = RandomCodeGenerator;
        let first = generator.generate(8);
        let differs = (0..20).any(|_| generator.generate(8) != first);
        assert!(differs);
    }

    #[test]
    fn sequence_generator_repeats_last_code() {
        let codes = ["AB12CD", "ZZ99ZZ"].map(|c| PairingCode::parse(c).unwrap());
        let generator = SequenceCodeGenerator::new(codes);

        assert_eq!(generator.generate(6).as_str(), "AB12CD");
        assert_eq!(generator.generate(6).as_str(), "ZZ99ZZ");
        assert_eq!(generator.generate(6).as_str(), "ZZ99ZZ");
    }
}
