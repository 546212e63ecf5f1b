//! 감시 영역 (화면 캡처 사각형).

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// 화면 캡처 대상 사각형.
///
/// 주 모니터 기준 좌표. 세션의 감시 루프가 시작된 뒤에는 변경되지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// 좌상단 x 좌표
    pub x: i32,
    /// 좌상단 y 좌표
    pub y: i32,
    /// 너비 (양수)
    pub width: u32,
    /// 높이 (양수)
    pub height: u32,
}

impl Region {
    /// 영역 생성 — 너비/높이는 양수여야 한다
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 {
            return Err(CoreError::Validation {
                field: "width".to_string(),
                message: "0보다 커야 합니다".to_string(),
            });
        }
        if height == 0 {
            return Err(CoreError::Validation {
                field: "height".to_string(),
                message: "0보다 커야 합니다".to_string(),
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// 와이어 `zone` 배열 `[x, y, w, h]`에서 영역 생성
    pub fn from_zone(zone: [i64; 4]) -> Result<Self, CoreError> {
        let [x, y, w, h] = zone;
        let x = i32::try_from(x).map_err(|_| zone_range_error("x"))?;
        let y = i32::try_from(y).map_err(|_| zone_range_error("y"))?;
        let width = u32::try_from(w).map_err(|_| zone_range_error("width"))?;
        let height = u32::try_from(h).map_err(|_| zone_range_error("height"))?;
        Self::new(x, y, width, height)
    }

    /// 와이어 `zone` 배열로 변환
    pub fn to_zone(&self) -> [i64; 4] {
        [
            self.x as i64,
            self.y as i64,
            self.width as i64,
            self.height as i64,
        ]
    }
}

fn zone_range_error(field: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        message: "zone 값이 표현 범위를 벗어났습니다".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_region() {
        let region = Region::new(10, 20, 100, 50).unwrap();
        assert_eq!(region.x, 10);
        assert_eq!(region.width, 100);
    }

    #[test]
    fn zero_width_rejected() {
        assert!(Region::new(0, 0, 0, 50).is_err());
    }

    #[test]
    fn zero_height_rejected() {
        assert!(Region::new(0, 0, 100, 0).is_err());
    }

    #[test]
    fn from_zone_roundtrip() {
        let region = Region::from_zone([0, 0, 100, 50]).unwrap();
        assert_eq!(region.to_zone(), [0, 0, 100, 50]);
    }

    #[test]
    fn from_zone_negative_size_rejected() {
        assert!(Region::from_zone([0, 0, -100, 50]).is_err());
    }

    #[test]
    fn from_zone_negative_origin_allowed() {
        // 다중 모니터 환경에서는 음수 원점이 나올 수 있다
        let region = Region::from_zone([-1920, 0, 640, 480]).unwrap();
        assert_eq!(region.x, -1920);
    }
}
