//! Longitudinal redundancy check over a complete frame.
//!
//! The checksum byte at `L-2` is the XOR of every byte before it, and the
//! trailer byte at `L-1` is that checksum inverted.

use crate::types::IntegrityFault;

/// XOR of all bytes in `body`
pub fn checksum(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Check both trailing bytes of `frame`. Each is an independent failure point.
pub fn verify(frame: &[u8]) -> Result<(), IntegrityFault> {
    let len = frame.len();
    if len < 2 {
        return Err(IntegrityFault::TooShort { len });
    }

    let sum = checksum(&frame[..len - 2]);
    let found = frame[len - 2];
    if sum != found {
        return Err(IntegrityFault::Checksum {
            expected: sum,
            found,
        });
    }

    let inverted = sum ^ 0xFF;
    let found = frame[len - 1];
    if inverted != found {
        return Err(IntegrityFault::Trailer {
            expected: inverted,
            found,
        });
    }

    Ok(())
}

pub fn validate(frame: &[u8]) -> bool {
    verify(frame).is_ok()
}

/// Append checksum and trailer to `body`, producing a frame `validate` accepts
pub fn seal(body: &[u8]) -> Vec<u8> {
    let sum = checksum(body);
    let mut frame = Vec::with_capacity(body.len() + 2);
    frame.extend_from_slice(body);
    frame.push(sum);
    frame.push(sum ^ 0xFF);
    frame
}
