use crate::ir::{Point, Sector, Side};

/// Degrees to radians, matching the host's angle convention.
pub const RADIAN: f64 = std::f64::consts::PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorGeometry {
    /// Point on the outer arc at the sector's mid angle.
    pub anchor: Point,
    /// Same direction, pushed out by `extra_radius`.
    pub outside: Point,
    pub side: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unplaceable {
    InvalidRadius,
    NonFiniteAngle,
    NonFiniteCenter,
}

impl Unplaceable {
    pub fn reason(self) -> &'static str {
        match self {
            Unplaceable::InvalidRadius => "outer radius is not a positive finite number",
            Unplaceable::NonFiniteAngle => "mid angle is not finite",
            Unplaceable::NonFiniteCenter => "center is not finite",
        }
    }
}

/// Resolve the anchor and candidate label points of one sector.
///
/// Bad input is reported before any trigonometry runs so the caller can drop
/// the label and keep going with the rest of the chart.
pub fn resolve_sector_geometry(
    sector: &Sector,
    extra_radius: f64,
) -> Result<SectorGeometry, Unplaceable> {
    if !sector.outer_radius.is_finite() || sector.outer_radius <= 0.0 {
        return Err(Unplaceable::InvalidRadius);
    }
    if !sector.mid_angle.is_finite() {
        return Err(Unplaceable::NonFiniteAngle);
    }
    if !sector.cx.is_finite() || !sector.cy.is_finite() {
        return Err(Unplaceable::NonFiniteCenter);
    }

    let (sin, cos) = (-sector.mid_angle * RADIAN).sin_cos();
    let anchor = Point::new(
        sector.cx + sector.outer_radius * cos,
        sector.cy + sector.outer_radius * sin,
    );
    let label_radius = sector.outer_radius + extra_radius;
    let outside = Point::new(sector.cx + label_radius * cos, sector.cy + label_radius * sin);
    let side = if outside.x >= sector.cx {
        Side::Right
    } else {
        Side::Left
    };

    Ok(SectorGeometry {
        anchor,
        outside,
        side,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(mid_angle: f64, outer_radius: f64) -> Sector {
        Sector {
            index: 0,
            name: "queued".to_string(),
            value: 10.0,
            percent: 50.0,
            fill: "#8884d8".to_string(),
            mid_angle,
            outer_radius,
            cx: 150.0,
            cy: 150.0,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn east_is_right_and_level_with_center() {
        let geometry = resolve_sector_geometry(&sector(0.0, 100.0), 22.0).unwrap();
        assert!(close(geometry.anchor.x, 250.0));
        assert!(close(geometry.anchor.y, 150.0));
        assert!(close(geometry.outside.x, 272.0));
        assert_eq!(geometry.side, Side::Right);
    }

    #[test]
    fn positive_angles_rise_on_screen() {
        let geometry = resolve_sector_geometry(&sector(90.0, 100.0), 22.0).unwrap();
        assert!(close(geometry.anchor.x, 150.0));
        assert!(close(geometry.anchor.y, 50.0));
        assert!(close(geometry.outside.y, 28.0));
    }

    #[test]
    fn west_half_is_left() {
        let geometry = resolve_sector_geometry(&sector(180.0, 100.0), 22.0).unwrap();
        assert_eq!(geometry.side, Side::Left);
        assert!(close(geometry.outside.x, 28.0));
    }

    #[test]
    fn rejects_degenerate_sectors() {
        assert_eq!(
            resolve_sector_geometry(&sector(10.0, 0.0), 22.0),
            Err(Unplaceable::InvalidRadius)
        );
        assert_eq!(
            resolve_sector_geometry(&sector(10.0, f64::NAN), 22.0),
            Err(Unplaceable::InvalidRadius)
        );
        assert_eq!(
            resolve_sector_geometry(&sector(f64::INFINITY, 100.0), 22.0),
            Err(Unplaceable::NonFiniteAngle)
        );
        let mut off_screen = sector(10.0, 100.0);
        off_screen.cx = f64::NAN;
        assert_eq!(
            resolve_sector_geometry(&off_screen, 22.0),
            Err(Unplaceable::NonFiniteCenter)
        );
    }
}
