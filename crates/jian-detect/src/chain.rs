//! 检测器链.
//!
//! 按固定优先级依次运行检测器, 在第一个给出确定 mimetype 的
//! 检测器处停止. 调用方预定义的 mimetype/version 优先于检测值,
//! 检测器只负责补全空缺.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::detector::{Detection, Detector};
use crate::extension::ExtensionDetector;
use crate::signature::SignatureDetector;

/// 检测时读取的文件头部大小
const HEADER_SIZE: usize = 8192;

/// 检测器链
pub struct DetectorChain {
    /// 检测器列表 (优先级从高到低)
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorChain {
    /// 创建空的检测器链
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// 创建带内置检测器的检测器链
    ///
    /// 顺序固定: 签名检测器先行, 扩展名检测器兜底.
    pub fn with_default_detectors() -> Self {
        let mut chain = Self::new();
        chain.register(Box::new(SignatureDetector));
        chain.register(Box::new(ExtensionDetector));
        chain
    }

    /// 注册一个检测器 (追加到链末尾)
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// 对头部数据运行检测链, 返回第一个确定的结果
    pub fn detect(&self, header: &[u8], filename: Option<&str>) -> Detection {
        for detector in &self.detectors {
            let detection = detector.detect(header, filename);
            if detection.found() {
                debug!("{} 识别出 {}", detector.name(), detection.mimetype);
                return detection;
            }
        }
        Detection::unknown()
    }

    /// 检测文件格式.
    ///
    /// 文件缺失或不可读时不报错, 返回占位符结果,
    /// 由下游把缺失记录为错误.
    pub fn detect_path(&self, path: Option<&Path>) -> Detection {
        let Some(path) = path else {
            return Detection::unknown();
        };

        let mut header = vec![0u8; HEADER_SIZE];
        let n = match File::open(path).and_then(|mut f| f.read(&mut header)) {
            Ok(n) => n,
            Err(err) => {
                debug!("读取文件头部失败, 按未识别处理: {err}");
                return Detection::unknown();
            }
        };
        header.truncate(n);

        let filename = path.file_name().and_then(|n| n.to_str());
        self.detect(&header, filename)
    }

    /// 检测文件格式, 预定义值优先.
    ///
    /// 检测始终运行, 但预定义的 mimetype/version 在非空处覆盖检测值.
    pub fn detect_with_predefined(
        &self,
        path: Option<&Path>,
        mimetype: Option<&str>,
        version: Option<&str>,
    ) -> Detection {
        let mut detection = self.detect_path(path);
        if let Some(mime) = mimetype {
            // 预定义 mimetype 覆盖时, 检测出的版本只在同格式下可信
            if !detection.mimetype.eq_ignore_ascii_case(mime) {
                detection.version = jian_core::UNAV.to_owned();
            }
            detection.mimetype = mime.to_owned();
        }
        if let Some(ver) = version {
            detection.version = ver.to_owned();
        }
        detection
    }
}

impl Default for DetectorChain {
    fn default() -> Self {
        Self::with_default_detectors()
    }
}
