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

//! A Rust implementation of Schnorr signing and verification.
//!
//! The nonce is derived from the secret key and the message, and is
//! negated when needed so that the y-coordinate of `R` is a quadratic
//! residue. That lets a signature carry only `x(R)`.

use core::fmt::Debug;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

use crate::curve::{Curve, Secp256k1};
use crate::errors::SchnorrError;
use crate::keys::{PublicKey, SecretKey};
use crate::tools::{check_length, decode_int, encode_int};

/// The length of a secp256k1 Schnorr `Signature`, in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// The length of a message, in bytes. Messages are pre-hashed.
pub const MESSAGE_LENGTH: usize = 32;

/// Sign a `size` byte `message` with a `size` byte big-endian private key.
///
/// Signing is deterministic: the same key and message always produce the
/// same `x(R) || s` bytes.
///
/// # Errors
///
/// * `BytesLengthError` if the message or key has the wrong length.
/// * `InvalidPrivateKey` if the key is zero or not below `n`.
/// * `NonceZero` if the derived nonce is zero. This is never retried.
pub fn sign<C: Curve>(
    curve: &C,
    message: &[u8],
    private_key: &[u8],
) -> Result<Vec<u8>, SchnorrError> {
    let params = curve.params();
    let size = params.size;

    check_length("message", message, size)?;
    check_length("private key", private_key, size)?;

    let a = decode_int(private_key, size)?;

    if a.is_zero() || a >= params.n {
        debug!("refusing to sign with an out of range private key");
        return Err(SchnorrError::InvalidPrivateKey);
    }

    // k' = int(hash(bytes(d) || m)) mod n
    let mut k = curve.challenge_hash(&[private_key, message]);

    if k.is_zero() {
        debug!("derived nonce is zero");
        return Err(SchnorrError::NonceZero);
    }

    let g = curve.generator();
    let nonce_point = curve.mul(&g, &k);

    let (rx, ry) = match (curve.affine_x(&nonce_point), curve.affine_y(&nonce_point)) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(SchnorrError::PointDecompressionError),
    };

    // k = k' if jacobi(y(R)) = 1, otherwise n - k'
    if curve.quadratic_residue(&ry) != 1 {
        k = &params.n - &k;
    }

    // never trust a cached public key here
    let public_point = curve.mul(&g, &a);
    let a_raw = curve.encode_point(&public_point)?;
    let r_raw = encode_int(&rx, size)?;

    // e = int(hash(bytes(x(R)) || bytes(d*G) || m)) mod n
    let e = curve.challenge_hash(&[&r_raw, &a_raw, message]);

    let s = (&k + &e * &a) % &params.n;

    let mut signature = r_raw;
    signature.extend_from_slice(&encode_int(&s, size)?);
    Ok(signature)
}

/// Verify a `2*size` byte signature on a `size` byte message.
///
/// Every malformed input and every failed check answers `false`.
pub fn verify<C: Curve>(curve: &C, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    match verify_checked(curve, message, signature, public_key) {
        Ok(()) => true,
        Err(err) => {
            debug!(%err, "schnorr signature rejected");
            false
        }
    }
}

fn verify_checked<C: Curve>(
    curve: &C,
    message: &[u8],
    signature: &[u8],
    public_key: &[u8],
) -> Result<(), SchnorrError> {
    let params = curve.params();
    let size = params.size;

    check_length("message", message, size)?;
    check_length("signature", signature, size * 2)?;

    let (r_raw, s_raw) = signature.split_at(size);
    let r = decode_int(r_raw, size)?;
    let s = decode_int(s_raw, size)?;

    if r >= params.p || s >= params.n {
        return Err(SchnorrError::ScalarFormatError);
    }

    let a = curve.decode_point(public_key)?;

    // e = int(hash(bytes(r) || bytes(P) || m)) mod n
    let e = curve.challenge_hash(&[r_raw, public_key, message]);

    // R = s*G - e*P
    let minus_e = &params.n - &e;
    let nonce_point = curve.mul_add(&curve.generator(), &s, &a, &minus_e);

    if curve.is_infinity(&nonce_point) {
        return Err(SchnorrError::InvalidSignature);
    }

    let (x, y) = match (curve.affine_x(&nonce_point), curve.affine_y(&nonce_point)) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(SchnorrError::InvalidSignature),
    };

    if curve.quadratic_residue(&y) != 1 {
        return Err(SchnorrError::InvalidSignature);
    }

    if x != r {
        return Err(SchnorrError::InvalidSignature);
    }

    Ok(())
}

/// Derive the encoded public key `encode(d*G)` of a private key.
pub fn public_key_of<C: Curve>(curve: &C, private_key: &[u8]) -> Result<Vec<u8>, SchnorrError> {
    let params = curve.params();

    check_length("private key", private_key, params.size)?;
    let a = decode_int(private_key, params.size)?;

    if a.is_zero() || a >= params.n {
        return Err(SchnorrError::InvalidPrivateKey);
    }

    let point = curve.mul(&curve.generator(), &a);
    curve.encode_point(&point)
}

/// An Schnorr signature over secp256k1.
///
/// # Note
///
/// These signatures are "detached"—that is, they do **not** include a copy
/// of the message which has been signed.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    /// `r` is the x-coordinate of the nonce point `R`, whose y-coordinate
    /// is always a quadratic residue.
    pub(crate) r: [u8; 32],

    /// `s` is a scalar, formed by `s = k + e*d`
    /// e = HASH(x(R), PublicKey, message)
    pub(crate) s: [u8; 32],
}

impl Debug for Signature {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "Signature( r: {:?}, s: {:?} )", &self.r, &self.s)
    }
}

impl Default for Signature {
    fn default() -> Signature {
        Signature {
            r: [0u8; 32],
            s: [0u8; 32],
        }
    }
}

impl Signature {
    const DESCRIPTION: &'static str = "A 64 byte secp256k1 Schnorr signature";

    /// Convert this `Signature` to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        bytes
    }

    /// Construct a `Signature` from a slice of bytes.
    ///
    /// Only the length is checked here, range checks happen during verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Signature, SchnorrError> {
        check_length("Signature", bytes, SIGNATURE_LENGTH)?;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(Signature { r, s })
    }

    /// Sign a 32 byte message with this `SecretKey`.
    pub fn sign(message: &[u8], secret_key: &SecretKey) -> Result<Signature, SchnorrError> {
        let bytes = sign(&Secp256k1, message, secret_key.as_bytes())?;
        Signature::from_bytes(&bytes)
    }

    /// Verify this signature on a 32 byte message with a public key.
    ///
    /// # Return
    ///
    /// Returns `Ok(())` if the signature is valid, and `Err` otherwise.
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> Result<(), SchnorrError> {
        if verify(&Secp256k1, message, &self.to_bytes(), public_key.as_bytes()) {
            Ok(())
        } else {
            Err(SchnorrError::InvalidSignature)
        }
    }
}

serde_boilerplate!(Signature);
