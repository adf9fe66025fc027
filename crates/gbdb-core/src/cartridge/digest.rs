use md5::{Digest, Md5};

/// MD5 of the whole image as lowercase hex, used as the catalog's content identity.
pub fn content_hash(image: &[u8]) -> String {
    hex::encode(Md5::digest(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_digests() {
        assert_eq!(content_hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(content_hash(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }
}
