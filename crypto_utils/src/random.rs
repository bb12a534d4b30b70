//! Cryptographically secure random bytes from the operating system.

use rand::RngCore;
use rand::rngs::OsRng;

pub fn secure_random_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    OsRng.fill_bytes(&mut buf);
    buf
}

pub fn secure_random_array<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    OsRng.fill_bytes(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_requested_length_and_differs() {
        assert_eq!(secure_random_bytes(17).len(), 17);
        let a: [u8; 32] = secure_random_array();
        let b: [u8; 32] = secure_random_array();
        assert_ne!(a, b);
    }
}
