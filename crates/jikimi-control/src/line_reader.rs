//! 길이 제한 행 리더.
//!
//! 개행이 올 때까지 부분 행을 버퍼링하되, 버퍼 길이를 한도로 제한한다 —
//! 개행 없이 데이터를 쏟아붓는 클라이언트가 메모리를 무한정 키우지
//! 못하게 하는 하드닝. 한도 초과와 UTF-8 위반은 세션 종료 사유다.

use jikimi_core::error::CoreError;
use tokio::io::{AsyncRead, AsyncReadExt};

/// 읽기 청크 크기
const READ_CHUNK_BYTES: usize = 1024;

/// 개행 구분 행 리더 — 행 길이 상한 포함
pub struct BoundedLineReader<R> {
    inner: R,
    buffer: Vec<u8>,
    max_line_bytes: usize,
}

impl<R: AsyncRead + Unpin> BoundedLineReader<R> {
    /// 새 리더 생성
    pub fn new(inner: R, max_line_bytes: usize) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            max_line_bytes,
        }
    }

    /// 다음 행 반환 (개행 제외).
    ///
    /// - `Ok(Some(_))` — 완성된 한 행
    /// - `Ok(None)` — EOF (개행 없이 남은 부분 행은 버린다)
    /// - `Err(Protocol)` — 행 길이 한도 초과 또는 UTF-8 위반
    pub async fn next_line(&mut self) -> Result<Option<String>, CoreError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
                line.pop(); // 개행 제거
                let line = String::from_utf8(line)
                    .map_err(|_| CoreError::Protocol("UTF-8이 아닌 명령 행".to_string()))?;
                return Ok(Some(line));
            }

            if self.buffer.len() > self.max_line_bytes {
                return Err(CoreError::Protocol(format!(
                    "명령 행이 한도 {} bytes를 초과",
                    self.max_line_bytes
                )));
            }

            let mut chunk = [0u8; READ_CHUNK_BYTES];
            let n = self.inner.read(&mut chunk).await?;
            if n == 0 {
                return Ok(None);
            }
            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }
}
