// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD, URL_SAFE_NO_PAD},
        DecodePaddingMode,
    },
    Engine as _,
};

/// `base64url` engine which accepts input with or without padding.
const URL_SAFE_ANY_PAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Returns the `base64url`-encoded string **without padding** of the given
/// `input`.
pub fn base64_url_encode<T: AsRef<[u8]>>(input: T) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decodes the given `payload` as a `base64url`-encoded string into bytes.
///
/// Padding is optional.
pub fn base64_url_decode<T: AsRef<[u8]>>(payload: T) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_ANY_PAD.decode(payload)
}

/// Returns the `base64`-encoded string, with padding, of the given `input`.
pub fn base64_encode<T: AsRef<[u8]>>(input: T) -> String {
    STANDARD.encode(input)
}

/// Decodes the given `payload` as a `base64`-encoded string **with padding**
/// into bytes.
pub fn base64_decode<T: AsRef<[u8]>>(payload: T) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CASES: [(&str, &str); 4] = [
        ("Hello, World!", "SGVsbG8sIFdvcmxkIQ"),
        ("", ""),
        ("Rust! 🚀", "UnVzdCEg8J-agA"),
        ("no padding here", "bm8gcGFkZGluZyBoZXJl"),
    ];

    #[test]
    fn test_base64_url_encode() {
        for (input, expected) in TEST_CASES {
            assert_eq!(base64_url_encode(input), expected, "{input}");
        }
    }

    #[test]
    fn test_base64_url_decode() {
        for (expected, input) in TEST_CASES {
            let result = base64_url_decode(input).unwrap();
            assert_eq!(result, expected.as_bytes(), "{input}");
        }
    }

    #[test]
    fn test_base64_url_decode_accepts_padding() {
        let result = base64_url_decode("SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(result, b"Hello, World!");
    }

    #[test]
    fn test_base64_url_decode_rejects_standard_alphabet() {
        let err = base64_url_decode("3q2+7w").unwrap_err();
        assert!(matches!(err, base64::DecodeError::InvalidByte(3, b'+')));
    }

    #[test]
    fn test_base64_standard() {
        let input = [0xDE, 0xAD, 0xBE, 0xEF];
        assert_eq!(base64_encode(input), "3q2+7w==");
        assert_eq!(base64_decode("3q2+7w==").unwrap(), input);
        assert!(base64_decode("3q2-7w==").is_err());
    }
}
