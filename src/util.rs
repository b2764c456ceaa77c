use rand::RngCore;

macro_rules! slice_as_array_ref {
    ($s:expr, $len:expr) => {
        if $s.len() != $len {
            Err(())
        } else {
            Ok(unsafe {
                &*($s.as_ptr() as *const [_; $len])
            })
        }
    }
}

/// XORs `src` into `dst` byte by byte. Both slices must be the same length.
pub(crate) fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());

    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Returns `len` uniformly random bytes.
pub(crate) fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0; len];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}
