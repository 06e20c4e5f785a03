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

//! Schnorr Secret Key generation

use core::fmt::Debug;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::curve::Secp256k1;
use crate::errors::SchnorrError;
use crate::tools::{check_length, decode_int};

/// The length of a secp256k1 Schnorr `SecretKey`, in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// An Schnorr secret key, a big-endian scalar in `[1, n-1]`.
#[derive(Clone)]
pub struct SecretKey(pub(crate) [u8; SECRET_KEY_LENGTH]);

impl Debug for SecretKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "SecretKey(..)")
    }
}

impl Eq for SecretKey {}
impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}
impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Overwrite secret key material with null bytes when it goes out of scope.
impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl SecretKey {
    const DESCRIPTION: &'static str = "A secp256k1 Schnorr secret key as 32 bytes.";

    /// Convert this secret key to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.0
    }

    /// View this secret key as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LENGTH] {
        &self.0
    }

    /// Construct a `SecretKey` from a slice of bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use bip_schnorr::*;
    ///
    /// # fn doctest() -> Result<SecretKey, SchnorrError> {
    /// let secret_key_bytes: [u8; SECRET_KEY_LENGTH] = [
    ///    157, 097, 177, 157, 239, 253, 090, 096,
    ///    186, 132, 074, 244, 146, 236, 044, 196,
    ///    068, 073, 197, 105, 123, 050, 105, 025,
    ///    112, 059, 172, 003, 028, 174, 127, 096, ];
    ///
    /// let secret_key: SecretKey = SecretKey::from_bytes(&secret_key_bytes)?;
    /// #
    /// # Ok(secret_key)
    /// # }
    /// #
    /// # fn main() {
    /// #     let result = doctest();
    /// #     assert!(result.is_ok());
    /// # }
    /// ```
    ///
    /// # Returns
    ///
    /// A `Result` whose okay value is an Schnorr `SecretKey` or whose error value
    /// is `BytesLengthError` for the wrong length and `InvalidPrivateKey` for a
    /// scalar that is zero or not below the group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<SecretKey, SchnorrError> {
        check_length("SecretKey", bytes, SECRET_KEY_LENGTH)?;

        let scalar = decode_int(bytes, SECRET_KEY_LENGTH)?;
        if scalar.is_zero() || scalar >= Secp256k1::parameters().n {
            return Err(SchnorrError::InvalidPrivateKey);
        }

        let mut bits = [0u8; SECRET_KEY_LENGTH];
        bits.copy_from_slice(bytes);

        Ok(SecretKey(bits))
    }

    /// Generate a `SecretKey` from a `csprng`.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::rngs::OsRng;
    /// use bip_schnorr::*;
    ///
    /// let secret_key: SecretKey = SecretKey::generate(&mut OsRng);
    /// let public_key: PublicKey = PublicKey::from_secret(&secret_key);
    /// ```
    ///
    /// # Input
    ///
    /// A CSPRNG with a `fill_bytes()` method, e.g. `rand_chacha::ChaChaRng`
    pub fn generate<T>(csprng: &mut T) -> SecretKey
    where
        T: CryptoRng + RngCore,
    {
        let mut bits = [0u8; SECRET_KEY_LENGTH];

        // rejection sampling, the chance of a retry is about 2^-128
        loop {
            csprng.fill_bytes(&mut bits);
            if let Ok(key) = SecretKey::from_bytes(&bits) {
                bits.zeroize();
                return key;
            }
        }
    }
}

serde_boilerplate!(SecretKey);

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn generate_is_seeded() {
        let a = SecretKey::generate(&mut ChaChaRng::from_seed([5u8; 32]));
        let b = SecretKey::generate(&mut ChaChaRng::from_seed([5u8; 32]));
        let c = SecretKey::generate(&mut ChaChaRng::from_seed([6u8; 32]));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(SecretKey::from_bytes(a.as_bytes()).unwrap(), a);
    }

    #[test]
    fn wrong_length_is_a_format_error() {
        assert_eq!(
            SecretKey::from_bytes(&[1u8; 31]),
            Err(SchnorrError::BytesLengthError {
                name: "SecretKey",
                length: SECRET_KEY_LENGTH
            })
        );
    }

    #[test]
    fn zeroize_clears_the_scalar() {
        let mut key = SecretKey::generate(&mut ChaChaRng::from_seed([8u8; 32]));
        key.zeroize();
        assert_eq!(key.0, [0u8; SECRET_KEY_LENGTH]);
    }

    #[test]
    fn debug_does_not_leak() {
        let key = SecretKey::generate(&mut ChaChaRng::from_seed([8u8; 32]));
        assert_eq!(format!("{:?}", key), "SecretKey(..)");
    }
}
