//! 스크린 캡처.
//!
//! xcap 기반 주 모니터 캡처 + 영역 크롭 + PNG 인코딩.
//! 영역 좌표는 주 모니터 기준이다.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use jikimi_core::error::CoreError;
use jikimi_core::models::region::Region;
use jikimi_core::ports::frame_source::FrameSource;
use tracing::debug;
use xcap::Monitor;

/// 영역 캡처 — xcap 기반 [`FrameSource`] 구현
pub struct RegionCapture;

impl RegionCapture {
    /// 새 캡처 인스턴스 생성
    pub fn new() -> Self {
        Self
    }

    /// 주 모니터 전체 프레임 캡처
    fn capture_primary() -> Result<DynamicImage, CoreError> {
        let monitors = Monitor::all()
            .map_err(|e| CoreError::Capture(format!("모니터 목록 조회 실패: {e}")))?;

        let monitor = monitors
            .into_iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| Monitor::all().ok()?.into_iter().next())
            .ok_or_else(|| CoreError::Capture("모니터를 찾을 수 없음".to_string()))?;

        let image = monitor
            .capture_image()
            .map_err(|e| CoreError::Capture(format!("스크린 캡처 실패: {e}")))?;

        debug!("스크린 캡처 완료: {}x{}", image.width(), image.height());

        Ok(DynamicImage::ImageRgba8(image))
    }

    /// 프레임에서 영역을 잘라낸다. 프레임 경계로 클램프하며,
    /// 영역이 프레임 밖에 있으면 캡처 에러.
    fn crop_to_region(frame: &DynamicImage, region: Region) -> Result<DynamicImage, CoreError> {
        let (frame_w, frame_h) = (frame.width(), frame.height());

        let x = region.x.max(0) as u32;
        let y = region.y.max(0) as u32;
        if x >= frame_w || y >= frame_h {
            return Err(CoreError::Capture(format!(
                "영역이 화면 밖입니다: ({}, {}) / 화면 {}x{}",
                region.x, region.y, frame_w, frame_h
            )));
        }

        let width = region.width.min(frame_w - x);
        let height = region.height.min(frame_h - y);

        Ok(frame.crop_imm(x, y, width, height))
    }

    /// PNG 인코딩
    fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CoreError> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| CoreError::Capture(format!("PNG 인코딩 실패: {e}")))?;
        Ok(buffer.into_inner())
    }
}

impl FrameSource for RegionCapture {
    fn capture_region(&self, region: Region) -> Result<Vec<u8>, CoreError> {
        let frame = Self::capture_primary()?;
        let cropped = Self::crop_to_region(&frame, region)?;
        let png = Self::encode_png(&cropped)?;

        debug!(
            width = cropped.width(),
            height = cropped.height(),
            bytes = png.len(),
            "영역 캡처 완료"
        );

        Ok(png)
    }
}

impl Default for RegionCapture {
    fn default() -> Self {
        Self::new()
    }
}
