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

//! Schnorr Public Key generation,

use k256::ProjectivePoint;
use std::fmt::Debug;

use crate::curve::{Curve, Secp256k1};
use crate::keys::SecretKey;
use crate::signature::public_key_of;
use crate::SchnorrError;

/// The length of a secp256k1 Schnorr `PublicKey`, in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// An Schnorr public key, a SEC1 compressed secp256k1 point.
///
/// Construction always checks the point decodes.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PublicKey(pub(crate) [u8; PUBLIC_KEY_LENGTH]);

impl Debug for PublicKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "PublicKey( {:?} )", &self.0[..])
    }
}

impl PublicKey {
    const DESCRIPTION: &'static str = "A 33 byte compressed secp256k1 point.";

    /// Convert this public key to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0
    }

    /// View this public key as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Decode into the curve point.
    pub fn to_point(&self) -> Result<ProjectivePoint, SchnorrError> {
        Secp256k1.decode_point(&self.0)
    }

    /// Construct a `PublicKey` from a slice of bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use bip_schnorr::*;
    ///
    /// # fn doctest() -> Result<PublicKey, SchnorrError> {
    /// let public_key_bytes: [u8; PUBLIC_KEY_LENGTH] = [
    ///     0x02, 0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0,
    ///     0x62, 0x95, 0xce, 0x87, 0x0b, 0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d,
    ///     0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98];
    ///
    /// let public_key = PublicKey::from_bytes(&public_key_bytes)?;
    /// #
    /// # Ok(public_key)
    /// # }
    /// #
    /// # fn main() {
    /// #     assert!(doctest().is_ok());
    /// # }
    /// ```
    ///
    /// # Returns
    ///
    /// A `Result` whose okay value is an Schnorr `PublicKey` or whose error value
    /// is an `SchnorrError` describing the error that occurred.
    pub fn from_bytes(bytes: &[u8]) -> Result<PublicKey, SchnorrError> {
        Secp256k1.decode_point(bytes)?;

        let mut compressed = [0u8; PUBLIC_KEY_LENGTH];
        compressed.copy_from_slice(bytes);
        Ok(PublicKey(compressed))
    }

    /// Derive this public key from its corresponding `SecretKey`.
    ///
    /// A zeroized `SecretKey` has no public key. Debug builds panic on it,
    /// release builds return the all zero key, which `from_bytes` and every
    /// verification reject.
    pub fn from_secret(secret_key: &SecretKey) -> PublicKey {
        let mut compressed = [0u8; PUBLIC_KEY_LENGTH];

        let encoded = public_key_of(&Secp256k1, secret_key.as_bytes());
        debug_assert!(encoded.is_ok(), "public key of a zeroized secret key");

        if let Ok(encoded) = encoded {
            compressed.copy_from_slice(&encoded);
        }

        PublicKey(compressed)
    }
}

impl From<&SecretKey> for PublicKey {
    fn from(source: &SecretKey) -> PublicKey {
        PublicKey::from_secret(source)
    }
}

serde_boilerplate!(PublicKey);
