use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::OcrEngine;
use crate::config::ExtractionConfig;
use crate::error::ExtractionError;

/// 外部 tesseract 命令行识别
///
/// 可执行文件路径和语言在构造时注入, 图片经 stdin 传入, 文本从 stdout 读回。
#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: PathBuf,
    language: String,
}

impl TesseractCli {
    pub fn new(command: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(&config.tesseract_cmd, &config.ocr_language)
    }
}

impl OcrEngine for TesseractCli {
    fn extract_text(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        if image_bytes.is_empty() {
            return Err(ExtractionError::Ocr("empty image".to_string()));
        }

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l"])
            .arg(&self.language)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // 写 stdin 与读 stdout/stderr 并行, 子进程提前退出时也要回收并保留 stderr
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(image_bytes),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or_else(|_| {
                Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "stdin writer thread panicked",
                ))
            });
            (output, written)
        });

        let output = output?;
        if !output.status.success() {
            return Err(ExtractionError::Ocr(format!(
                "{} exited with {}: {}",
                self.command.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        written?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
