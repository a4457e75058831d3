// Key Records
// Textual "<keySize>,<n>,<e-or-d>" form of a key, optionally base64-wrapped

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use num_traits::Zero;

use super::bigint::RsaBigInt;
use super::keygen::{KeyPair, PrivateKey, PublicKey};
use crate::error::{Result, RsaError};

/// Persisted form of one half of a key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    /// Bit length of each prime factor
    pub key_size: u32,
    pub modulus: RsaBigInt,
    /// `e` for a public record, `d` for a private one
    pub exponent: RsaBigInt,
}

impl KeyRecord {
    pub fn new(key_size: u32, modulus: RsaBigInt, exponent: RsaBigInt) -> Self {
        Self {
            key_size,
            modulus,
            exponent,
        }
    }

    /// Plain comma-separated triple
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Base64 of the plain triple
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_text())
    }

    /// Parse either the plain triple or its base64 wrapping
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.contains(',') {
            return Self::parse_plain(trimmed);
        }

        // Line-wrapped base64 is accepted
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        let decoded = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| RsaError::KeyRecordParseError(format!("invalid base64: {}", e)))?;
        let plain = String::from_utf8(decoded)
            .map_err(|_| RsaError::KeyRecordParseError("record is not UTF-8".to_string()))?;

        Self::parse_plain(plain.trim())
    }

    fn parse_plain(text: &str) -> Result<Self> {
        let fields: Vec<&str> = text.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(RsaError::KeyRecordParseError(format!(
                "expected 3 fields, found {}",
                fields.len()
            )));
        }

        let key_size = fields[0].parse::<u32>().map_err(|e| {
            RsaError::KeyRecordParseError(format!("invalid key size `{}`: {}", fields[0], e))
        })?;
        let modulus = parse_decimal("modulus", fields[1])?;
        let exponent = parse_decimal("exponent", fields[2])?;

        if key_size == 0 || modulus.is_zero() || exponent.is_zero() {
            return Err(RsaError::KeyRecordParseError(
                "key size, modulus and exponent must be non-zero".to_string(),
            ));
        }
        if modulus.bits() > 2 * u64::from(key_size) {
            return Err(RsaError::KeyRecordParseError(format!(
                "{}-bit modulus is too large for key size {}",
                modulus.bits(),
                key_size
            )));
        }

        Ok(Self::new(key_size, modulus, exponent))
    }
}

fn parse_decimal(field: &str, text: &str) -> Result<RsaBigInt> {
    text.parse::<RsaBigInt>()
        .map_err(|e| RsaError::KeyRecordParseError(format!("invalid {} `{}`: {}", field, text, e)))
}

impl fmt::Display for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.key_size, self.modulus, self.exponent)
    }
}

impl FromStr for KeyRecord {
    type Err = RsaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&PublicKey> for KeyRecord {
    fn from(key: &PublicKey) -> Self {
        Self::new(key.key_size(), key.modulus().clone(), key.exponent().clone())
    }
}

impl From<&PrivateKey> for KeyRecord {
    fn from(key: &PrivateKey) -> Self {
        Self::new(key.key_size(), key.modulus().clone(), key.exponent().clone())
    }
}

impl PublicKey {
    pub fn from_record(record: &KeyRecord) -> Self {
        PublicKey::new(record.modulus.clone(), record.exponent.clone())
    }
}

impl PrivateKey {
    pub fn from_record(record: &KeyRecord) -> Self {
        PrivateKey::new(record.modulus.clone(), record.exponent.clone())
    }
}

impl KeyPair {
    /// (public, private) records for the key store
    pub fn to_records(&self) -> (KeyRecord, KeyRecord) {
        let size = self.key_size();
        let public_key = self.public_key();
        let private_key = self.private_key();
        (
            KeyRecord::new(size, public_key.modulus().clone(), public_key.exponent().clone()),
            KeyRecord::new(size, private_key.modulus().clone(), private_key.exponent().clone()),
        )
    }

    /// Rebuild a pair from its two records
    pub fn from_records(public: &KeyRecord, private: &KeyRecord) -> Result<Self> {
        if public.key_size != private.key_size {
            return Err(RsaError::KeyRecordParseError(format!(
                "key sizes differ: {} and {}",
                public.key_size, private.key_size
            )));
        }
        let pair = KeyPair::new(PublicKey::from_record(public), PrivateKey::from_record(private))?;
        if pair.key_size() != public.key_size {
            return Err(RsaError::KeyRecordParseError(format!(
                "key size {} does not match the {}-bit modulus",
                public.key_size,
                public.modulus.bits()
            )));
        }
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    fn textbook_record() -> KeyRecord {
        KeyRecord::new(8, from_u64(3233), from_u64(17))
    }

    #[test]
    fn test_to_text() {
        assert_eq!(textbook_record().to_text(), "8,3233,17");
    }

    #[test]
    fn test_to_base64() {
        assert_eq!(textbook_record().to_base64(), "OCwzMjMzLDE3");
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(KeyRecord::parse("8,3233,17").unwrap(), textbook_record());
        assert_eq!(KeyRecord::parse(" 8, 3233 ,17\n").unwrap(), textbook_record());
    }

    #[test]
    fn test_parse_base64() {
        assert_eq!(KeyRecord::parse("OCwzMjMzLDE3").unwrap(), textbook_record());
        assert_eq!("OCwzMjMz\nLDE3\n".parse::<KeyRecord>().unwrap(), textbook_record());
    }

    #[test]
    fn test_parse_large_values() {
        let text = format!("1024,{},{}", (from_u64(1) << 2047) + 1u8, from_u64(65537));
        let record = KeyRecord::parse(&text).unwrap();
        assert_eq!(record.key_size, 1024);
        assert_eq!(record.modulus.bits(), 2048);
        assert_eq!(KeyRecord::parse(&record.to_base64()).unwrap(), record);
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "",
            "8,3233",
            "8,3233,17,1",
            "x,3233,17",
            "8,-3233,17",
            "8,3233,abc",
            "8,0,17",
            "0,3233,17",
            "4,3233,17",
            "!!!not base64!!!",
        ] {
            assert!(
                matches!(KeyRecord::parse(bad), Err(RsaError::KeyRecordParseError(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_key_conversions() {
        let record = textbook_record();
        let public = PublicKey::from_record(&record);
        assert_eq!(public.modulus(), &from_u64(3233));
        assert_eq!(public.exponent(), &from_u64(17));

        let private = PrivateKey::from_record(&KeyRecord::new(8, from_u64(3233), from_u64(2753)));
        assert_eq!(private.exponent(), &from_u64(2753));
        assert_eq!(KeyRecord::from(&private).exponent, from_u64(2753));
    }

    #[test]
    fn test_pair_records() {
        let pair = KeyPair::new(
            PublicKey::new(from_u64(3233), from_u64(17)),
            PrivateKey::new(from_u64(3233), from_u64(2753)),
        )
        .unwrap();

        let (public, private) = pair.to_records();
        assert_eq!(public.to_text(), format!("{},3233,17", pair.key_size()));
        assert_eq!(private.to_text(), format!("{},3233,2753", pair.key_size()));

        let rebuilt = KeyPair::from_records(&public, &private).unwrap();
        assert_eq!(rebuilt.public_key(), pair.public_key());
        assert_eq!(rebuilt.private_key(), pair.private_key());
    }

    #[test]
    fn test_pair_records_key_size_must_match_modulus() {
        // 3233 has 12 bits, so the only consistent prime size is 8
        let public = KeyRecord::new(12, from_u64(3233), from_u64(17));
        let private = KeyRecord::new(12, from_u64(3233), from_u64(2753));
        assert!(matches!(
            KeyPair::from_records(&public, &private),
            Err(RsaError::KeyRecordParseError(_))
        ));

        let public = KeyRecord::new(8, from_u64(3233), from_u64(17));
        let private = KeyRecord::new(16, from_u64(3233), from_u64(2753));
        assert!(matches!(
            KeyPair::from_records(&public, &private),
            Err(RsaError::KeyRecordParseError(_))
        ));

        let private = KeyRecord::new(8, from_u64(3233), from_u64(2753));
        assert_eq!(KeyPair::from_records(&public, &private).unwrap().key_size(), 8);
    }
}
