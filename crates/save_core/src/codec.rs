//! Byte-level record encode/decode traits (little-endian, length-prefixed).

/// Types implementing save encoding write themselves into a byte buffer.
pub trait SaveEncode {
    fn encode(&self, out: &mut Vec<u8>);
}

/// Types implementing save decoding reconstruct themselves from a byte slice,
/// consuming what they read.
pub trait SaveDecode: Sized {
    fn decode(inp: &mut &[u8]) -> anyhow::Result<Self>;
}

/// Consume exactly `N` bytes from the front of `inp`.
pub fn take<const N: usize>(inp: &mut &[u8]) -> anyhow::Result<[u8; N]> {
    if inp.len() < N {
        anyhow::bail!("short read: wanted {N} bytes, have {}", inp.len());
    }
    let (a, b) = inp.split_at(N);
    *inp = b;
    let mut buf = [0u8; N];
    buf.copy_from_slice(a);
    Ok(buf)
}

impl SaveEncode for u32 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl SaveDecode for u32 {
    fn decode(inp: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(u32::from_le_bytes(take::<4>(inp)?))
    }
}

impl SaveEncode for i32 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl SaveDecode for i32 {
    fn decode(inp: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(i32::from_le_bytes(take::<4>(inp)?))
    }
}

impl SaveEncode for u16 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl SaveDecode for u16 {
    fn decode(inp: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(u16::from_le_bytes(take::<2>(inp)?))
    }
}

impl SaveEncode for u8 {
    fn encode(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }
}

impl SaveDecode for u8 {
    fn decode(inp: &mut &[u8]) -> anyhow::Result<Self> {
        Ok(take::<1>(inp)?[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_and_reports_short_reads() {
        let buf = [1u8, 2, 3, 4, 5];
        let mut s: &[u8] = &buf;
        assert_eq!(take::<4>(&mut s).unwrap(), [1, 2, 3, 4]);
        assert_eq!(s.len(), 1);
        assert!(take::<2>(&mut s).is_err());
    }

    #[test]
    fn primitive_roundtrip() {
        let mut buf = Vec::new();
        0xDEAD_BEEF_u32.encode(&mut buf);
        (-17_i32).encode(&mut buf);
        7_u16.encode(&mut buf);
        2_u8.encode(&mut buf);
        let mut s: &[u8] = &buf;
        assert_eq!(u32::decode(&mut s).unwrap(), 0xDEAD_BEEF);
        assert_eq!(i32::decode(&mut s).unwrap(), -17);
        assert_eq!(u16::decode(&mut s).unwrap(), 7);
        assert_eq!(u8::decode(&mut s).unwrap(), 2);
        assert!(s.is_empty());
    }
}
