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

//! The group a Schnorr signature lives in.
//!
//! Signing and verification only ever talk to a [`Curve`]. The curve owns
//! point arithmetic, point codecs and the challenge hash, everything else
//! (nonce canonicalisation, range checks, batching) is protocol logic and
//! lives in [`crate::signature`] and [`crate::batch`].

use core::fmt::Debug;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::errors::SchnorrError;
use crate::tools::jacobi;

mod secp256k1;
pub use secp256k1::Secp256k1;

/// Immutable domain parameters of a short Weierstrass curve `y² = x³ + b`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveParams {
    /// Field modulus.
    pub p: BigUint,
    /// Prime order of the group generated by `g`.
    pub n: BigUint,
    /// Additive constant of the curve equation.
    pub b: BigUint,
    /// Byte length of every scalar and coordinate encoding.
    pub size: usize,
    /// Byte length of an encoded public key.
    pub point_size: usize,
}

impl CurveParams {
    /// Whether `p ≡ 3 (mod 4)`, in which case `c^((p+1)/4)` is a square root.
    pub fn has_simple_sqrt(&self) -> bool {
        (&self.p % 4u32) == BigUint::from(3u32)
    }
}

/// Scalar and point operations consumed by the signature protocol.
///
/// Scalars are passed as integers in `[0, n)`, field elements as integers
/// in `[0, p)`. Implementations must not panic on any input.
pub trait Curve {
    /// A group element, possibly the point at infinity.
    type Point: Clone + PartialEq + Debug;

    /// Domain parameters of this curve.
    fn params(&self) -> &CurveParams;

    /// The distinguished generator `g`.
    fn generator(&self) -> Self::Point;

    /// Recover a point from a public key encoding.
    fn decode_point(&self, bytes: &[u8]) -> Result<Self::Point, SchnorrError>;

    /// Encode a finite point. Fails on the point at infinity.
    fn encode_point(&self, point: &Self::Point) -> Result<Vec<u8>, SchnorrError>;

    /// Build a point from affine coordinates, failing if it is not on the curve.
    fn point_from_affine(&self, x: &BigUint, y: &BigUint) -> Result<Self::Point, SchnorrError>;

    /// Affine x-coordinate, `None` for the point at infinity.
    fn affine_x(&self, point: &Self::Point) -> Option<BigUint>;

    /// Affine y-coordinate, `None` for the point at infinity.
    fn affine_y(&self, point: &Self::Point) -> Option<BigUint>;

    /// Group law.
    fn add(&self, a: &Self::Point, b: &Self::Point) -> Self::Point;

    /// `point * k`.
    fn mul(&self, point: &Self::Point, k: &BigUint) -> Self::Point;

    /// `a * x + b * y`.
    fn mul_add(&self, a: &Self::Point, x: &BigUint, b: &Self::Point, y: &BigUint) -> Self::Point {
        self.add(&self.mul(a, x), &self.mul(b, y))
    }

    /// Whether `point` is the identity.
    fn is_infinity(&self, point: &Self::Point) -> bool;

    /// Hash of the concatenated `parts`, reduced modulo `n`.
    fn challenge_hash(&self, parts: &[&[u8]]) -> BigUint;

    /// Legendre symbol of `x` over the field modulus.
    fn quadratic_residue(&self, x: &BigUint) -> i8 {
        jacobi(x, &self.params().p)
    }

    /// Candidate square root `c^((p+1)/4) mod p`.
    ///
    /// `None` when the modulus is not `3 mod 4`. The caller still has to
    /// check the candidate squares back to `c`.
    fn sqrt(&self, c: &BigUint) -> Option<BigUint> {
        let params = self.params();

        if params.p.is_zero() || !params.has_simple_sqrt() {
            return None;
        }

        let exp = (&params.p + 1u32) >> 2u32;
        Some(c.modpow(&exp, &params.p))
    }
}

/// secp256k1 with a tampered hash or tampered parameters, for exercising
/// failure paths the real curve never reaches.
#[cfg(test)]
pub(crate) mod tampered {
    use super::*;
    use k256::ProjectivePoint as Point;

    pub(crate) struct Tampered {
        params: CurveParams,
        zero_nonce: bool,
    }

    impl Tampered {
        /// Hashes of the two part nonce input come out as zero.
        pub(crate) fn zero_nonce() -> Tampered {
            Tampered {
                params: Secp256k1::parameters().clone(),
                zero_nonce: true,
            }
        }

        /// Field modulus `p + 2`, which is `1 mod 4`.
        pub(crate) fn without_simple_sqrt() -> Tampered {
            let mut params = Secp256k1::parameters().clone();
            params.p += 2u32;

            Tampered {
                params,
                zero_nonce: false,
            }
        }
    }

    impl Curve for Tampered {
        type Point = Point;

        fn params(&self) -> &CurveParams {
            &self.params
        }

        fn generator(&self) -> Point {
            Secp256k1.generator()
        }

        fn decode_point(&self, bytes: &[u8]) -> Result<Point, SchnorrError> {
            Secp256k1.decode_point(bytes)
        }

        fn encode_point(&self, point: &Point) -> Result<Vec<u8>, SchnorrError> {
            Secp256k1.encode_point(point)
        }

        fn point_from_affine(&self, x: &BigUint, y: &BigUint) -> Result<Point, SchnorrError> {
            Secp256k1.point_from_affine(x, y)
        }

        fn affine_x(&self, point: &Point) -> Option<BigUint> {
            Secp256k1.affine_x(point)
        }

        fn affine_y(&self, point: &Point) -> Option<BigUint> {
            Secp256k1.affine_y(point)
        }

        fn add(&self, a: &Point, b: &Point) -> Point {
            Secp256k1.add(a, b)
        }

        fn mul(&self, point: &Point, k: &BigUint) -> Point {
            Secp256k1.mul(point, k)
        }

        fn is_infinity(&self, point: &Point) -> bool {
            Secp256k1.is_infinity(point)
        }

        fn challenge_hash(&self, parts: &[&[u8]]) -> BigUint {
            if self.zero_nonce && parts.len() == 2 {
                return BigUint::zero();
            }
            Secp256k1.challenge_hash(parts)
        }
    }
}
