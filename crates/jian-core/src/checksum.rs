//! 文件校验和计算.
//!
//! 数字保存流程中, 校验和用于入库前后的完整性比对.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256, Sha512};

use crate::error::{JianError, JianResult};

/// 校验和算法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
}

impl Algorithm {
    /// 按名称解析算法, 大小写与连字符不敏感
    pub fn from_name(name: &str) -> JianResult<Self> {
        match name.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(JianError::AlgorithmNotFound(name.to_owned())),
        }
    }
}

/// 计算文件校验和, 返回十六进制字符串.
///
/// 文件不存在时返回 I/O 错误.
pub fn checksum(path: &Path, algorithm: Algorithm) -> JianResult<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = [0u8; 64 * 1024];

    match algorithm {
        Algorithm::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let n = reader.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            Ok(hex::encode(hasher.finalize()))
        }
        Algorithm::Sha512 => {
            let mut hasher = Sha512::new();
            loop {
                let n = reader.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            Ok(hex::encode(hasher.finalize()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sha256_已知值() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"abc").unwrap();
        drop(f);

        assert_eq!(
            checksum(&path, Algorithm::Sha256).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_未知算法报错() {
        assert!(matches!(
            Algorithm::from_name("md5000"),
            Err(JianError::AlgorithmNotFound(_))
        ));
        assert!(Algorithm::from_name("SHA-256").is_ok());
    }

    #[test]
    fn test_文件不存在报错() {
        let err = checksum(Path::new("no_such_file"), Algorithm::Sha256);
        assert!(matches!(err, Err(JianError::Io(_))));
    }
}
