//! Columnar layout. A `Layout` owns a visible-slice `range` over a
//! workspace's ordered client list and decides, for each client index, a
//! screen rectangle or the fact that it should be hidden.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// On-screen rectangle in the coordinate space of the root window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Rect { x, y, w, h }
    }
}

/// What should happen to the client at a given workspace-relative index
/// after an `arrange()` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Show(usize, Rect),
    Hide(usize),
}

/// The four layout variants, in the fixed cycle order used by `next`/`prev`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    OneColumn,
    TwoColumns,
    ThreeColumns,
    FourColumns,
}

const CYCLE: [LayoutKind; 4] = [
    LayoutKind::OneColumn,
    LayoutKind::TwoColumns,
    LayoutKind::ThreeColumns,
    LayoutKind::FourColumns,
];

impl LayoutKind {
    /// The maximum number of concurrently visible columns.
    pub fn max_cols(self) -> usize {
        match self {
            LayoutKind::OneColumn => 1,
            LayoutKind::TwoColumns => 2,
            LayoutKind::ThreeColumns => 3,
            LayoutKind::FourColumns => 4,
        }
    }

    /// Cycle to the next (or, reversed, previous) variant, wrapping modularly
    /// in both directions.
    pub fn cycle(self, reverse: bool) -> LayoutKind {
        let i = CYCLE.iter().position(|&k| k == self).unwrap();
        let n = CYCLE.len();
        let next = if reverse {
            (i + n - 1) % n
        } else {
            (i + 1) % n
        };
        CYCLE[next]
    }
}

/// Bound to exactly one workspace for its lifetime. `range` is the
/// half-open visible slice, always satisfying `0 <= start <= end <= n` and
/// `end - start <= max_cols`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub kind: LayoutKind,
    pub range: Range<usize>,
}

impl Layout {
    pub fn new(kind: LayoutKind) -> Self {
        Layout { kind, range: 0..0 }
    }

    /// Slide the visible window to keep `current` in view, anchored to the
    /// right, clamped to the left edge.
    pub fn update_range(&mut self, n: usize, current: Option<usize>) {
        let m = self.kind.max_cols();
        self.range = match (n, current) {
            (0, _) | (_, None) => 0..0,
            (_, Some(i)) if i < m => 0..m.min(n),
            (_, Some(i)) => {
                let end = (i + 1).min(n);
                let start = end.saturating_sub(m);
                start..end
            }
        };
    }

    /// Pure function of `(n, (w, h), borderpx, max_cols, current)`. Returns
    /// one [`Placement`] per client index in `0..n`.
    pub fn arrange(&self, n: usize, w: u32, h: u32, borderpx: u32, current: Option<usize>) -> Vec<Placement> {
        let b = borderpx as i32;
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![Placement::Show(0, Rect::new(-b, -b, w, h))];
        }

        match self.kind {
            LayoutKind::OneColumn => (0..n)
                .map(|j| match current {
                    Some(i) if i == j => Placement::Show(j, Rect::new(-b, -b, w, h)),
                    _ => Placement::Hide(j),
                })
                .collect(),
            _ => {
                let m = self.kind.max_cols();
                let col_h = h.saturating_sub(2 * borderpx);
                if n <= m {
                    let cw = w / n as u32;
                    let col_w = cw.saturating_sub(2 * borderpx);
                    (0..n)
                        .map(|j| {
                            let x = j as i32 * (cw as i32 - 2 * b) + 2 * b * j as i32;
                            Placement::Show(j, Rect::new(x, 0, col_w, col_h))
                        })
                        .collect()
                } else {
                    let cw = w / m as u32;
                    let col_w = cw.saturating_sub(2 * borderpx);
                    (0..n)
                        .map(|j| {
                            if self.range.contains(&j) {
                                let col = j - self.range.start;
                                let x = col as i32 * (cw as i32 - 2 * b) + 2 * b * col as i32;
                                Placement::Show(j, Rect::new(x, 0, col_w, col_h))
                            } else {
                                Placement::Hide(j)
                            }
                        })
                        .collect()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1200x800 screen, borderpx=4, ThreeColumns, three clients: one column
    // per client, evenly split.
    #[test]
    fn three_columns_three_clients_splits_evenly() {
        let mut layout = Layout::new(LayoutKind::ThreeColumns);
        layout.update_range(3, Some(0));
        let placements = layout.arrange(3, 1200, 800, 4, Some(0));
        assert_eq!(
            placements,
            vec![
                Placement::Show(0, Rect::new(0, 0, 392, 792)),
                Placement::Show(1, Rect::new(400, 0, 392, 792)),
                Placement::Show(2, Rect::new(800, 0, 392, 792)),
            ]
        );
    }

    // FourColumns, five clients, focus on index 4 -> range [1, 5).
    #[test]
    fn four_columns_five_clients_focus_last() {
        let mut layout = Layout::new(LayoutKind::FourColumns);
        layout.update_range(5, Some(4));
        assert_eq!(layout.range, 1..5);

        let placements = layout.arrange(5, 1200, 800, 0, Some(4));
        assert_eq!(placements[0], Placement::Hide(0));
        assert_eq!(placements[1], Placement::Show(1, Rect::new(0, 0, 300, 800)));
        assert_eq!(placements[2], Placement::Show(2, Rect::new(300, 0, 300, 800)));
        assert_eq!(placements[3], Placement::Show(3, Rect::new(600, 0, 300, 800)));
        assert_eq!(placements[4], Placement::Show(4, Rect::new(900, 0, 300, 800)));
    }

    // OneColumn, two clients, focus on second.
    #[test]
    fn one_column_focus_second() {
        let layout = Layout::new(LayoutKind::OneColumn);
        let placements = layout.arrange(2, 1200, 800, 4, Some(1));
        assert_eq!(placements[0], Placement::Hide(0));
        assert_eq!(placements[1], Placement::Show(1, Rect::new(-4, -4, 1200, 800)));
    }

    #[test]
    fn single_client_is_fullscreen_regardless_of_variant() {
        for kind in CYCLE {
            let layout = Layout::new(kind);
            let placements = layout.arrange(1, 1200, 800, 4, Some(0));
            assert_eq!(placements, vec![Placement::Show(0, Rect::new(-4, -4, 1200, 800))]);
        }
    }

    #[test]
    fn empty_workspace_is_a_no_op() {
        let layout = Layout::new(LayoutKind::ThreeColumns);
        assert!(layout.arrange(0, 1200, 800, 4, None).is_empty());
    }

    #[test]
    fn cycle_is_modular_in_both_directions() {
        let mut k = LayoutKind::OneColumn;
        for _ in 0..4 {
            k = k.cycle(false);
        }
        assert_eq!(k, LayoutKind::OneColumn);

        let mut k = LayoutKind::OneColumn;
        for _ in 0..4 {
            k = k.cycle(true);
        }
        assert_eq!(k, LayoutKind::OneColumn);

        assert_eq!(LayoutKind::OneColumn.cycle(true), LayoutKind::FourColumns);
    }

    #[test]
    fn range_width_never_exceeds_max_cols() {
        for kind in CYCLE {
            let m = kind.max_cols();
            for n in 0..20usize {
                for focus in 0..n {
                    let mut layout = Layout::new(kind);
                    layout.update_range(n, Some(focus));
                    assert!(layout.range.end >= layout.range.start);
                    assert!(layout.range.end - layout.range.start <= m);
                    assert!(layout.range.end <= n);
                    assert!(layout.range.contains(&focus));
                }
            }
        }
    }

    #[quickcheck_macros::quickcheck]
    fn range_bounds_hold_for_arbitrary_input(n: usize, focus_seed: usize, kind_seed: u8) -> bool {
        let n = n % 64;
        let kind = CYCLE[(kind_seed as usize) % CYCLE.len()];
        let mut layout = Layout::new(kind);
        let current = if n == 0 { None } else { Some(focus_seed % n) };
        layout.update_range(n, current);
        let m = kind.max_cols();
        layout.range.start <= layout.range.end
            && layout.range.end <= n
            && layout.range.end - layout.range.start <= m
            && current.map_or(true, |i| layout.range.contains(&i))
    }

    #[quickcheck_macros::quickcheck]
    fn arrange_is_deterministic(n: usize, focus_seed: usize, kind_seed: u8, w: u32, h: u32, borderpx: u8) -> bool {
        let n = n % 32;
        let w = w % 4096 + 1;
        let h = h % 4096 + 1;
        let kind = CYCLE[(kind_seed as usize) % CYCLE.len()];
        let current = if n == 0 { None } else { Some(focus_seed % n) };

        let mut a = Layout::new(kind);
        a.update_range(n, current);
        let mut b = Layout::new(kind);
        b.update_range(n, current);

        let placements_a = a.arrange(n, w, h, borderpx as u32, current);
        let placements_b = b.arrange(n, w, h, borderpx as u32, current);
        placements_a == placements_b
    }

    #[quickcheck_macros::quickcheck]
    fn layout_cycle_restores_original(kind_seed: u8) -> bool {
        let start = CYCLE[(kind_seed as usize) % CYCLE.len()];
        let mut k = start;
        for _ in 0..CYCLE.len() {
            k = k.cycle(false);
        }
        k == start
    }
}
