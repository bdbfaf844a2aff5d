use crate::config::DisplayConfig;
use crate::models::geometry::{Position, Rect, ScreenBounds, ScreenInfo};
use rand::Rng;

/// 위치를 화면 경계 내로 제한한다.
/// x: [margin, width - size - margin], y: [0, height - size]
pub fn clamp_position(pos: Position, size: f64, bounds: &ScreenBounds, margin: f64) -> Position {
    let max_x = (bounds.width - size - margin).max(margin);
    let max_y = (bounds.height - size).max(0.0);
    Position {
        x: pos.x.clamp(margin, max_x),
        y: pos.y.clamp(0.0, max_y),
    }
}

/// 바닥 모드에서 펫이 붙는 y 좌표
pub fn ground_y(size: f64, bounds: &ScreenBounds, ground_offset: f64) -> f64 {
    (bounds.height - size - ground_offset).max(0.0)
}

pub fn center(pos: Position, size: f64) -> Position {
    Position {
        x: pos.x + size / 2.0,
        y: pos.y + size / 2.0,
    }
}

pub fn distance(a: Position, b: Position) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// 점이 사각형 안(경계 포함)에 있는지
pub fn is_inside_rect(point: Position, rect: &Rect) -> bool {
    point.x >= rect.x
        && point.x <= rect.x + rect.width
        && point.y >= rect.y
        && point.y <= rect.y + rect.height
}

/// 상단 중앙 컨트롤 패널 영역
pub fn control_panel_rect(screen_width: f64, width: f64, height: f64, margin_top: f64) -> Rect {
    Rect {
        x: (screen_width - width) / 2.0,
        y: margin_top,
        width,
        height,
    }
}

/// 모든 모니터를 덮는 사각형. 모니터가 없으면 None.
pub fn union_bounds(monitors: &[ScreenInfo]) -> Option<ScreenBounds> {
    let first = monitors.first()?;
    let (mut min_x, mut min_y) = (first.x as f64, first.y as f64);
    let (mut max_x, mut max_y) = (min_x, min_y);

    for m in monitors {
        min_x = min_x.min(m.x as f64);
        min_y = min_y.min(m.y as f64);
        max_x = max_x.max(m.x as f64 + m.width as f64);
        max_y = max_y.max(m.y as f64 + m.height as f64);
    }

    Some(ScreenBounds {
        origin_x: min_x,
        origin_y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// 펫이 활동하는 영역: 화면 경계 + 가장자리 여유 + 바닥 모드
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub bounds: ScreenBounds,
    pub edge_margin: f64,
    pub ground_mode: bool,
    pub ground_offset: f64,
}

impl Arena {
    pub fn new(bounds: ScreenBounds, display: &DisplayConfig) -> Self {
        Self {
            bounds,
            edge_margin: display.edge_margin,
            ground_mode: display.ground_mode,
            ground_offset: display.ground_offset,
        }
    }

    /// 경계 내로 제한하고, 바닥 모드면 y를 바닥에 고정한다.
    pub fn constrain(&self, pos: Position, size: f64) -> Position {
        let mut clamped = clamp_position(pos, size, &self.bounds, self.edge_margin);
        if self.ground_mode {
            clamped.y = ground_y(size, &self.bounds, self.ground_offset);
        }
        clamped
    }

    /// 경계 안의 균등 분포 무작위 목표
    pub fn random_target<R: Rng + ?Sized>(&self, size: f64, rng: &mut R) -> Position {
        let min_x = self.edge_margin;
        let max_x = (self.bounds.width - size - self.edge_margin).max(min_x);
        let max_y = (self.bounds.height - size).max(0.0);

        let x = min_x + rng.random::<f64>() * (max_x - min_x);
        let y = rng.random::<f64>() * max_y;
        self.constrain(Position::new(x, y), size)
    }

    /// 화면 중앙 (바닥 모드면 바닥 위)
    pub fn spawn_point(&self, size: f64, slot: usize) -> Position {
        let x = self.bounds.width / 2.0 - size / 2.0 + slot as f64 * size;
        let y = self.bounds.height / 2.0 - size / 2.0;
        self.constrain(Position::new(x, y), size)
    }
}
