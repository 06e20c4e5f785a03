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

//! The Extra Sauce
//!
//! Fixed width big-endian integer codecs and the Jacobi symbol. Scalars
//! and field elements travel through the protocol as `BigUint`s and
//! only become bytes at the edges.

use crate::errors::SchnorrError;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Decode `bytes` as a big-endian integer of exactly `size` bytes.
///
/// The value is never reduced. Callers range check against `p` or `n`.
pub fn decode_int(bytes: &[u8], size: usize) -> Result<BigUint, SchnorrError> {
    if bytes.len() != size {
        return Err(SchnorrError::BytesLengthError {
            name: "integer",
            length: size,
        });
    }

    Ok(BigUint::from_bytes_be(bytes))
}

/// Encode `x` as `size` big-endian bytes, left padded with zeros.
pub fn encode_int(x: &BigUint, size: usize) -> Result<Vec<u8>, SchnorrError> {
    let raw = x.to_bytes_be();

    // `to_bytes_be` of zero is `[0]`
    let raw = if x.is_zero() { Vec::new() } else { raw };

    if raw.len() > size {
        return Err(SchnorrError::ScalarFormatError);
    }

    let mut out = vec![0u8; size - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Reject `bytes` unless it is exactly `length` long.
pub(crate) fn check_length(
    name: &'static str,
    bytes: &[u8],
    length: usize,
) -> Result<(), SchnorrError> {
    if bytes.len() != length {
        return Err(SchnorrError::BytesLengthError { name, length });
    }
    Ok(())
}

fn low_bits(x: &BigUint, mask: u32) -> u32 {
    x.iter_u32_digits().next().unwrap_or(0) & mask
}

/// Jacobi symbol `(a | m)` for odd `m`, one of `-1`, `0` or `1`.
///
/// For a prime modulus this is the Legendre symbol: `1` for a non-zero
/// square, `-1` for a non-square and `0` for multiples of `m`.
pub fn jacobi(a: &BigUint, m: &BigUint) -> i8 {
    if m.is_zero() || low_bits(m, 1) == 0 {
        return 0;
    }

    let mut a = a % m;
    let mut m = m.clone();
    let mut t = 1i8;

    while !a.is_zero() {
        while low_bits(&a, 1) == 0 {
            a >>= 1u32;
            let r = low_bits(&m, 7);
            if r == 3 || r == 5 {
                t = -t;
            }
        }

        std::mem::swap(&mut a, &mut m);

        if low_bits(&a, 3) == 3 && low_bits(&m, 3) == 3 {
            t = -t;
        }

        a = &a % &m;
    }

    if m.is_one() {
        t
    } else {
        0
    }
}
