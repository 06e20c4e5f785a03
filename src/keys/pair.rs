// Copyright 2019 Stichting Organism
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A Rust implementation of Schnorr key generation,

use crate::keys::{PublicKey, SecretKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use crate::signature::Signature;
use crate::SchnorrError;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// The length of a secp256k1 Schnorr `Keypair`, in bytes.
pub const KEYPAIR_LENGTH: usize = SECRET_KEY_LENGTH + PUBLIC_KEY_LENGTH;

/// An Schnorr keypair.
#[derive(Debug, Clone)]
pub struct Keypair {
    /// The secret half of this keypair.
    pub secret: SecretKey,
    /// The public half of this keypair.
    pub public: PublicKey,
}

impl From<SecretKey> for Keypair {
    fn from(secret: SecretKey) -> Keypair {
        let public = PublicKey::from_secret(&secret);
        Keypair { secret, public }
    }
}

impl ::zeroize::Zeroize for Keypair {
    fn zeroize(&mut self) {
        self.secret.zeroize();
    }
}

impl Drop for Keypair {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Keypair {
    /// Convert this keypair to bytes.
    ///
    /// # Returns
    ///
    /// An array of bytes, `[u8; KEYPAIR_LENGTH]`.  The first
    /// `SECRET_KEY_LENGTH` of bytes is the `SecretKey`, and the next
    /// `PUBLIC_KEY_LENGTH` bytes is the `PublicKey`
    pub fn to_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        let mut bytes: [u8; KEYPAIR_LENGTH] = [0u8; KEYPAIR_LENGTH];

        bytes[..SECRET_KEY_LENGTH].copy_from_slice(self.secret.as_bytes());
        bytes[SECRET_KEY_LENGTH..].copy_from_slice(self.public.as_bytes());
        bytes
    }

    /// Construct a `Keypair` from the bytes of a `SecretKey` and `PublicKey`.
    ///
    /// Both halves are validated and must belong together.
    ///
    /// # Returns
    ///
    /// A `Result` whose okay value is an Schnorr `Keypair` or whose error value
    /// is an `SchnorrError` describing the error that occurred.
    pub fn from_bytes(bytes: &[u8]) -> Result<Keypair, SchnorrError> {
        if bytes.len() != KEYPAIR_LENGTH {
            return Err(SchnorrError::BytesLengthError {
                name: "Keypair",
                length: KEYPAIR_LENGTH,
            });
        }
        let secret = SecretKey::from_bytes(&bytes[..SECRET_KEY_LENGTH])?;
        let public = PublicKey::from_bytes(&bytes[SECRET_KEY_LENGTH..])?;

        if PublicKey::from_secret(&secret) != public {
            return Err(SchnorrError::InvalidPrivateKey);
        }

        Ok(Keypair { secret, public })
    }

    /// Generate an schnorr keypair.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::rngs::OsRng;
    /// use bip_schnorr::*;
    ///
    /// let keypair: Keypair = Keypair::generate(&mut OsRng);
    /// ```
    ///
    /// # Input
    ///
    /// A CSPRNG with a `fill_bytes()` method, e.g. `rand_chacha::ChaChaRng`.
    pub fn generate<R>(csprng: &mut R) -> Keypair
    where
        R: CryptoRng + RngCore,
    {
        let sk: SecretKey = SecretKey::generate(csprng);
        let pk: PublicKey = PublicKey::from_secret(&sk);

        Keypair {
            public: pk,
            secret: sk,
        }
    }

    /// Derive the `PublicKey` corresponding to this `SecretKey`.
    pub fn from_secret(s: &SecretKey) -> Keypair {
        Keypair {
            secret: s.clone(),
            public: PublicKey::from_secret(s),
        }
    }

    /// Sign a 32 byte message with this keypair's secret key.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, SchnorrError> {
        Signature::sign(message, &self.secret)
    }

    /// Verify a signature on a message with this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SchnorrError> {
        signature.verify(message, &self.public)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn keypair_bytes_round_trip() {
        let keypair = Keypair::generate(&mut ChaChaRng::from_seed([21u8; 32]));
        let restored = Keypair::from_bytes(&keypair.to_bytes()).unwrap();

        assert_eq!(restored.secret, keypair.secret);
        assert_eq!(restored.public, keypair.public);
    }

    #[test]
    fn mismatched_halves_are_rejected() {
        let mut csprng = ChaChaRng::from_seed([22u8; 32]);
        let a = Keypair::generate(&mut csprng);
        let b = Keypair::generate(&mut csprng);

        let mut bytes = a.to_bytes();
        bytes[SECRET_KEY_LENGTH..].copy_from_slice(b.public.as_bytes());
        assert!(Keypair::from_bytes(&bytes).is_err());
        assert!(Keypair::from_bytes(&bytes[1..]).is_err());
    }

    #[test]
    fn keypair_signs_and_verifies() {
        let keypair = Keypair::from(SecretKey::generate(&mut ChaChaRng::from_seed([23u8; 32])));
        let message = [42u8; 32];

        let signature = keypair.sign(&message).unwrap();
        assert!(keypair.verify(&message, &signature).is_ok());
        assert!(keypair.verify(&[43u8; 32], &signature).is_err());
    }

    #[test]
    fn keypair_zeroize() {
        let mut keypair = Keypair::generate(&mut ChaChaRng::from_seed([24u8; 32]));
        keypair.zeroize();

        assert_eq!(keypair.secret.as_bytes(), &[0u8; SECRET_KEY_LENGTH]);
        assert_ne!(keypair.public.as_bytes(), &[0u8; PUBLIC_KEY_LENGTH]);
    }
}
