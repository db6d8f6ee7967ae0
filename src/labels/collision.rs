use crate::ir::Side;

/// Vertical extent labels may occupy: `center_y ± limit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalBand {
    pub center_y: f64,
    pub limit: f64,
}

impl VerticalBand {
    pub fn new(center_y: f64, limit: f64) -> Self {
        Self { center_y, limit }
    }

    pub fn clamp(&self, y: f64) -> f64 {
        // max/min instead of clamp: limit may be negative.
        y.max(self.center_y - self.limit)
            .min(self.center_y + self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub y: f64,
    pub steps: usize,
    /// False when the step cap was hit before every prior label was cleared.
    pub converged: bool,
}

/// Per-side record of label y-coordinates committed during one render pass.
///
/// Owned by a single chart instance; never share one between charts.
#[derive(Debug, Clone)]
pub struct CollisionStack {
    left: Vec<f64>,
    right: Vec<f64>,
    max_steps: usize,
}

impl Default for CollisionStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionStack {
    pub const DEFAULT_MAX_STEPS: usize = 60;

    pub fn new() -> Self {
        Self::with_max_steps(Self::DEFAULT_MAX_STEPS)
    }

    pub fn with_max_steps(max_steps: usize) -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            max_steps,
        }
    }

    /// Forget every committed label. Call once before each render pass.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }

    pub fn committed(&self, side: Side) -> &[f64] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push `candidate_y` away from the chart's horizontal midline in
    /// `min_gap` steps until it clears every label already on `side`, then
    /// clamp it into `band` and record it.
    ///
    /// The search stops after `max_steps` displacements; the last candidate
    /// is accepted even if it still overlaps.
    pub fn place(
        &mut self,
        candidate_y: f64,
        side: Side,
        min_gap: f64,
        band: VerticalBand,
    ) -> Placement {
        let dir = if candidate_y >= band.center_y { 1.0 } else { -1.0 };
        let stack = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };

        let clears = |y: f64| stack.iter().all(|prev| (y - prev).abs() >= min_gap);
        let mut y = candidate_y;
        let mut steps = 0;
        let mut converged = clears(y);
        while !converged && steps < self.max_steps {
            y += dir * min_gap;
            steps += 1;
            converged = clears(y);
        }

        let y = band.clamp(y);
        stack.push(y);
        Placement {
            y,
            steps,
            converged,
        }
    }
}
