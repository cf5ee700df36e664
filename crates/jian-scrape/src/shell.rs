//! 外部工具同步调用.
//!
//! 刮取器通过本模块调用第三方校验工具: 阻塞等待进程结束,
//! 返回退出码与捕获的标准输出/错误. 工具输出可能含有无法
//! 表示为 UTF-8 的字节, 一律做有损替换而不是让整次刮取失败.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use jian_core::JianResult;
use log::debug;

/// 一次外部工具调用的结果
#[derive(Debug)]
pub struct ShellResult {
    /// 进程退出码; 被信号终止时为 -1
    pub returncode: i32,
    /// 标准输出 (有损 UTF-8)
    pub stdout: String,
    /// 标准错误 (有损 UTF-8)
    pub stderr: String,
}

impl ShellResult {
    /// 退出码是否为 0
    pub fn success(&self) -> bool {
        self.returncode == 0
    }
}

/// 同步运行外部工具.
///
/// 仅进程无法启动 (二进制缺失等) 时返回错误; 非零退出属于
/// 正常返回, 由调用方解释.
pub fn run<I, S>(program: &str, args: I) -> JianResult<ShellResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    debug!("调用外部工具: {program}");
    let output = Command::new(program).args(args).output()?;

    Ok(ShellResult {
        returncode: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// 运行以文件路径为最后参数的外部工具 (常见调用形态)
pub fn run_on_file(program: &str, args: &[&str], path: &Path) -> JianResult<ShellResult> {
    let mut all: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
    all.push(path.as_os_str());
    run(program, all)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_运行_捕获输出与退出码() {
        let result = run("sh", ["-c", "echo out; echo err >&2; exit 3"]).unwrap();
        assert_eq!(result.returncode, 3);
        assert_eq!(result.stdout.trim(), "out");
        assert_eq!(result.stderr.trim(), "err");
        assert!(!result.success());
    }

    #[test]
    fn test_运行_二进制缺失报错() {
        assert!(run("no-such-binary-jian", [""; 0]).is_err());
    }
}
