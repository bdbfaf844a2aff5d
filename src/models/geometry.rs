use serde::{Deserialize, Serialize};

/// 오버레이 로컬 좌표 (부동소수점 픽셀)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 펫이 움직일 수 있는 화면 영역.
/// origin은 데스크톱 좌표, 펫 위치는 origin 기준 로컬 좌표.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenBounds {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenBounds {
    /// 데스크톱 좌표를 오버레이 로컬 좌표로 변환
    pub fn to_local(&self, desktop: Position) -> Position {
        Position::new(desktop.x - self.origin_x, desktop.y - self.origin_y)
    }
}

/// 모니터 정보 (논리 픽셀)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenInfo {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// 사방으로 margin만큼 확장한 사각형
    pub fn expand(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }
}
