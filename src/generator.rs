use rand::Rng;

/// Payload sizes written by the `generate_random` binary when none are given.
pub const DEFAULT_SIZES: [usize; 4] = [100, 1000, 10000, 100000];

/// `len` bytes drawn uniformly from every byte value except `sentinel`.
pub fn random_payload<R: Rng + ?Sized>(len: usize, sentinel: u8, rng: &mut R) -> Vec<u8> {
    (0..len)
        .map(|_| {
            // Draw from the 255 remaining values and shift past the sentinel.
            let b: u8 = rng.gen_range(0..=254);
            if b >= sentinel { b + 1 } else { b }
        })
        .collect()
}

/// File name of the generated payload of `size` bytes.
pub fn payload_file_name(size: usize) -> String {
    format!("random{}.txt", size)
}
