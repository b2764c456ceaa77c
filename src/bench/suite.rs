//! The standard benchmark table: CBC encryption and decryption at several buffer sizes, next to
//! OpenSSL's own AES-CBC as a reference point.

use std::num::NonZeroUsize;

use openssl::error::ErrorStack;
use openssl::symm::{self, Cipher};
use thiserror::Error;

use crate::{cbc, BitBuffer};
use crate::aes::{self, InvalidKeyLength, Key};
use crate::bench::{MetricsSink, Runner};
use crate::util::random_bytes;

/// One row group of the suite: a buffer size and how many trials to average over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub name: String,
    pub size: usize,
    pub repetitions: NonZeroUsize,
}

impl Case {
    /// # Panics
    ///
    /// If `repetitions` is zero.
    pub fn new(name: &str, size: usize, repetitions: usize) -> Self {
        Case {
            name: name.to_owned(),
            size,
            repetitions: NonZeroUsize::new(repetitions).expect("at least one repetition"),
        }
    }
}

/// The 256-bit key from NIST SP 800-38A, used by the default table.
pub const DEFAULT_KEY: [u8; 32] = [
    0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe,
    0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d, 0x77, 0x81,
    0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7,
    0x2d, 0x98, 0x10, 0xa3, 0x09, 0x14, 0xdf, 0xf4,
];

pub const DEFAULT_IV: [u8; aes::BLOCK_LEN] = [
    0xf0, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7,
    0xf8, 0xf9, 0xfa, 0xfb, 0xfc, 0xfd, 0xfe, 0xff,
];

#[derive(Clone, Debug)]
pub struct SuiteConfig {
    pub key: Vec<u8>,
    pub iv: [u8; aes::BLOCK_LEN],
    pub cases: Vec<Case>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        SuiteConfig {
            key: DEFAULT_KEY.to_vec(),
            iv: DEFAULT_IV,
            cases: vec![
                Case::new("8MB", 1 << 23, 1),
                Case::new("1MB", 1 << 20, 10),
                Case::new("1KB", 1 << 10, 10_000),
                Case::new("64 byte", 1 << 6, 100_000),
            ],
        }
    }
}

impl SuiteConfig {
    /// The default table with a hundredth of the repetitions, for smoke runs.
    pub fn quick() -> Self {
        let mut config = SuiteConfig::default();
        for case in &mut config.cases {
            let reps = (case.repetitions.get() / 100).max(1);
            case.repetitions = NonZeroUsize::new(reps).unwrap_or(case.repetitions);
        }

        config
    }
}

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error(transparent)]
    Key(#[from] InvalidKeyLength),

    #[error("CBC operation failed")]
    Cbc(#[from] crate::Error),

    #[error("OpenSSL failure")]
    OpenSsl(#[from] ErrorStack),
}

fn reference_cipher(key: Key) -> Cipher {
    match key {
        Key::Aes128(_) => Cipher::aes_128_cbc(),
        Key::Aes192(_) => Cipher::aes_192_cbc(),
        Key::Aes256(_) => Cipher::aes_256_cbc(),
    }
}

/// Runs every case in `config`, reporting three results per case to `sink`:
///
/// - `cbc-bench encrypt <name>`
/// - `cbc-bench decrypt <name>`
/// - `openssl aes-<bits>-cbc <name>`
///
/// The key is scheduled once and shared by every run. Each trial gets freshly generated random
/// input.
pub fn run_suite<S>(config: &SuiteConfig, sink: &mut S) -> Result<(), SuiteError>
    where S: MetricsSink + ?Sized
{
    let key = Key::from_bytes(&config.key)?;
    let schedule = aes::openssl::Schedule::new(key)?;
    let reference = reference_cipher(key);
    let iv = BitBuffer::from_bytes(&config.iv);
    let runner = Runner::new();

    tracing::debug!(key_bits = key.bits(), cases = config.cases.len(), "starting suite");

    for case in &config.cases {
        let size = case.size;
        let reps = case.repetitions;

        runner.run(
            &format!("cbc-bench encrypt {}", case.name),
            || Ok(BitBuffer::from_bytes(&random_bytes(size))),
            |pt| cbc::encrypt(&schedule, &pt, &iv),
            reps,
            &mut *sink,
        )?;

        runner.run(
            &format!("cbc-bench decrypt {}", case.name),
            || cbc::encrypt(&schedule, &BitBuffer::from_bytes(&random_bytes(size)), &iv),
            |ct| cbc::decrypt(&schedule, &ct, &iv),
            reps,
            &mut *sink,
        )?;

        runner.run(
            &format!("openssl aes-{}-cbc {}", key.bits(), case.name),
            || Ok(random_bytes(size)),
            |pt| symm::encrypt(reference, key.as_slice(), Some(&config.iv[..]), &pt),
            reps,
            &mut *sink,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::Report;

    fn tiny() -> SuiteConfig {
        SuiteConfig {
            cases: vec![Case::new("16 byte", 16, 3), Case::new("33 byte", 33, 2)],
            ..SuiteConfig::default()
        }
    }

    #[test]
    fn default_table() {
        let config = SuiteConfig::default();
        assert_eq!(config.key, DEFAULT_KEY);
        assert_eq!(config.key[..4], [0x60, 0x3d, 0xeb, 0x10]);
        assert_eq!(config.iv, DEFAULT_IV);
        assert_eq!(config.iv[0], 0xf0);
        assert_eq!(config.iv[15], 0xff);

        let sizes: Vec<_> = config.cases.iter().map(|c| (c.size, c.repetitions.get())).collect();
        assert_eq!(sizes, [(1 << 23, 1), (1 << 20, 10), (1024, 10_000), (64, 100_000)]);
    }

    #[test]
    fn quick_keeps_at_least_one_repetition() {
        let reps: Vec<_> = SuiteConfig::quick().cases.iter().map(|c| c.repetitions.get()).collect();
        assert_eq!(reps, [1, 1, 100, 1000]);
    }

    #[test]
    fn reports_every_case() {
        let mut report = Report::default();
        run_suite(&tiny(), &mut report).unwrap();

        let labels: Vec<_> = report.rows().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, [
            "cbc-bench encrypt 16 byte",
            "cbc-bench decrypt 16 byte",
            "openssl aes-256-cbc 16 byte",
            "cbc-bench encrypt 33 byte",
            "cbc-bench decrypt 33 byte",
            "openssl aes-256-cbc 33 byte",
        ]);
    }

    #[test]
    fn bad_key_is_reported_before_running() {
        let config = SuiteConfig { key: vec![0; 20], ..tiny() };
        let mut report = Report::default();

        match run_suite(&config, &mut report) {
            Err(SuiteError::Key(InvalidKeyLength(20))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(report.rows().is_empty());
    }
}
