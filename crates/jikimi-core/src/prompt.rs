//! 프롬프트 파일 로딩.
//!
//! 프롬프트는 매 감시 사이클마다 파일에서 다시 읽는다 — 서버 재시작 없이
//! 프롬프트를 수정할 수 있게 하는 원 시스템의 동작을 유지한다.

use crate::error::CoreError;
use std::path::Path;

/// 프롬프트 파일을 읽어 반환.
///
/// 빈 프롬프트(공백만 있는 경우 포함)는 설정 에러다 — 네트워크 호출 전에
/// 감지되어 실패 결과로 알림 경로에 흘러간다.
pub fn load_prompt(path: impl AsRef<Path>) -> Result<String, CoreError> {
    let path = path.as_ref();
    let prompt = std::fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!("프롬프트 파일 읽기 실패: {}: {}", path.display(), e))
    })?;

    if prompt.trim().is_empty() {
        return Err(CoreError::Config("LLM prompt is empty".to_string()));
    }

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_valid_prompt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Describe the instrument status.").unwrap();
        let prompt = load_prompt(file.path()).unwrap();
        assert!(prompt.contains("instrument status"));
    }

    #[test]
    fn empty_prompt_is_config_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_prompt(file.path()).unwrap_err();
        assert!(err.to_string().contains("LLM prompt is empty"));
    }

    #[test]
    fn whitespace_only_prompt_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "   \n\t  ").unwrap();
        assert!(load_prompt(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = load_prompt("/nonexistent/PROMPT_FILE.txt");
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
